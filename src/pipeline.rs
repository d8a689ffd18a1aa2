//! The two entry points of the symmetrization pipeline.
//!
//! [`normalize_and_symmetrize`] wraps the machine with a control tape first and is meant for
//! machines straight from a producer. [`symmetrize`] skips the wrapping and expects a machine
//! that is already in the normalized shape.

use tracing::info_span;

use crate::analyzer::analyze;
use crate::control::wrap;
use crate::doubler::double;
use crate::namer::StatePool;
use crate::serializer::serialize;
use crate::splitter::split;
use crate::symmetrizer::symmetric_closure;
use crate::types::{Machine, MachineError};

/// Wraps, doubles, serializes, splits and symmetrizes a k-tape machine.
///
/// # Returns
///
/// * `Ok(Machine)` with `2(k + 1)` tapes and a symmetric command set.
/// * `Err(MachineError)` if the machine is malformed or has no unique accept command.
pub fn normalize_and_symmetrize(machine: &Machine) -> Result<Machine, MachineError> {
    let _span = info_span!("normalize_and_symmetrize", tapes = machine.tape_count()).entered();

    analyze(machine)?;
    let wrapped = wrap(machine)?;
    run(&wrapped)
}

/// Doubles, serializes, splits and symmetrizes a k-tape machine.
///
/// # Returns
///
/// * `Ok(Machine)` with `2k` tapes and a symmetric command set.
/// * `Err(MachineError)` if the machine is malformed.
pub fn symmetrize(machine: &Machine) -> Result<Machine, MachineError> {
    let _span = info_span!("symmetrize", tapes = machine.tape_count()).entered();

    analyze(machine)?;
    run(machine)
}

fn run(machine: &Machine) -> Result<Machine, MachineError> {
    let doubled = double(machine)?;
    let mut pool = StatePool::new(doubled.states);

    let commands = doubled.commands.into_iter().collect::<Vec<_>>();
    let serialized = serialize(&mut pool, &commands)?;
    let canonical = split(&mut pool, serialized)?;
    let commands = symmetric_closure(&canonical)?;

    Ok(Machine {
        input_alphabet: doubled.input_alphabet,
        alphabets: doubled.alphabets,
        states: pool.into_inner(),
        commands,
        start: doubled.start,
        access: doubled.access,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MachineCatalog;
    use crate::control::control_states;
    use crate::parser::parse;
    use crate::types::{Command, State, StateBase, Symbol};
    use std::collections::BTreeSet;

    fn catalog() -> Vec<Machine> {
        (0..MachineCatalog::get_machine_count())
            .map(|index| MachineCatalog::get_machine_by_index(index).unwrap())
            .collect()
    }

    fn generated(state: &State) -> bool {
        state.rank > 0 || matches!(state.base, StateBase::Fresh { .. })
    }

    #[test]
    fn test_single_step_scenario() {
        let machine = MachineCatalog::get_machine_by_name("single-step").unwrap();
        let result = symmetrize(&machine).unwrap();

        assert_eq!(result.tape_count(), 2);
        assert_eq!(result.commands.len(), 4);
        assert!(result.is_symmetric());

        let q = ["q0", "q1"].map(State::named);
        assert!(q.iter().all(|state| result.states[0].contains(state)));
        assert_eq!(result.states[0].len(), 2);

        // Mirror tape: two siblings and one bridging state.
        assert_eq!(result.states[1].len(), 3);
        assert!(result.states[1].iter().all(generated));
        assert!(result.states[1].is_disjoint(&result.states[0]));

        let forward = result
            .commands
            .iter()
            .find(|c| c.tapes[0].before.state == State::named("q0") && c.tapes[0].is_live())
            .unwrap();
        assert_eq!(forward.tapes[0].after.left, Symbol::Literal('a'));
        assert!(result.commands.contains(&forward.reverse()));
    }

    #[test]
    fn test_arity_law() {
        for machine in catalog() {
            let k = machine.tape_count();

            let short = symmetrize(&machine).unwrap();
            assert_eq!(short.tape_count(), 2 * k);
            assert!(short.commands.iter().all(|c| c.arity() == 2 * k));

            let full = normalize_and_symmetrize(&machine).unwrap();
            assert_eq!(full.tape_count(), 2 * (k + 1));
            assert!(full.commands.iter().all(|c| c.arity() == 2 * (k + 1)));
            assert_eq!(full.alphabets.len(), 2 * (k + 1));
            assert_eq!(full.states.len(), 2 * (k + 1));
        }
    }

    #[test]
    fn test_symmetry_law() {
        for machine in catalog() {
            for result in [symmetrize(&machine), normalize_and_symmetrize(&machine)] {
                let result = result.unwrap();
                assert!(result.is_symmetric());

                let reversed = result
                    .commands
                    .iter()
                    .map(Command::reverse)
                    .collect::<BTreeSet<_>>();
                assert_eq!(reversed, result.commands);
            }
        }
    }

    #[test]
    fn test_output_is_canonical_and_well_formed() {
        for machine in catalog() {
            let result = normalize_and_symmetrize(&machine).unwrap();

            assert!(result.commands.iter().all(Command::is_canonical));
            assert_eq!(analyze(&result), Ok(()));
        }
    }

    /// Checks the output state sets against the input sets, where input tape `t` became
    /// output tape `2t` and got mirror tape `2t + 1`.
    fn assert_fresh(inputs: &[BTreeSet<State>], result: &Machine) {
        assert_eq!(result.states.len(), 2 * inputs.len());

        for (tape, states) in inputs.iter().enumerate() {
            let original = &result.states[2 * tape];
            assert!(states.is_subset(original), "tape {tape} lost states");
            assert!(original.difference(states).all(generated));

            let mirror = &result.states[2 * tape + 1];
            assert!(mirror.iter().all(generated));
            for (other, states) in result.states.iter().enumerate() {
                if other != 2 * tape + 1 {
                    assert!(
                        states.is_disjoint(mirror),
                        "mirror tape {} shares states with tape {other}",
                        2 * tape + 1
                    );
                }
            }
        }

        for (tape, states) in result.states.iter().enumerate() {
            for (other, others) in result.states.iter().enumerate().skip(tape + 1) {
                assert!(
                    states.intersection(others).all(|state| !generated(state)),
                    "tapes {tape} and {other} share a generated state"
                );
            }
        }
    }

    #[test]
    fn test_freshness_law_with_control_tape() {
        for machine in catalog() {
            let result = normalize_and_symmetrize(&machine).unwrap();

            let mut inputs = machine.states.clone();
            inputs.push(control_states());
            assert_fresh(&inputs, &result);
        }
    }

    #[test]
    fn test_symmetrize_accepts_generated_states() {
        for machine in catalog() {
            let wrapped = wrap(&machine).unwrap();
            let once = symmetrize(&machine).unwrap();

            for input in [wrapped, once] {
                assert!(input.states.iter().flatten().any(generated));

                let result = symmetrize(&input).unwrap();
                assert_fresh(&input.states, &result);
                assert!(result.is_symmetric());
                assert_eq!(analyze(&result), Ok(()));
            }
        }
    }

    #[test]
    fn test_freshness_law() {
        for machine in catalog() {
            let result = symmetrize(&machine).unwrap();

            for (tape, states) in machine.states.iter().enumerate() {
                let original = &result.states[2 * tape];
                assert!(states.is_subset(original));
                assert!(original.difference(states).all(generated));

                let mirror = &result.states[2 * tape + 1];
                assert!(mirror.iter().all(generated));
                assert!(result
                    .states
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != 2 * tape + 1)
                    .all(|(_, other)| other.is_disjoint(mirror)));
            }
        }
    }

    #[test]
    fn test_determinism_law() {
        for machine in catalog() {
            assert_eq!(symmetrize(&machine), symmetrize(&machine));
            assert_eq!(
                normalize_and_symmetrize(&machine),
                normalize_and_symmetrize(&machine)
            );
        }
    }

    #[test]
    fn test_precondition_law() {
        let missing = parse(
            "input: a\nstart: q0\naccess: q1\ncommands:\n  (_, q0, _) -> (a, q2, _)\n",
        );
        // q1 is declared by `access:`, so the machine parses but no command reaches it.
        let missing = missing.unwrap();
        assert_eq!(
            normalize_and_symmetrize(&missing),
            Err(MachineError::MissingAcceptCommand)
        );

        let ambiguous = parse(
            "input: a\nstart: q0\naccess: q1\ncommands:\n  (_, q0, _) -> (a, q1, _)\n  (_, q2, _) -> (a, q1, _)\n",
        )
        .unwrap();
        assert_eq!(
            normalize_and_symmetrize(&ambiguous),
            Err(MachineError::AmbiguousAcceptCommand(2))
        );

        // The short pipeline does not look for an accept command.
        assert!(symmetrize(&missing).is_ok());
    }

    #[test]
    fn test_malformed_machine_is_rejected() {
        let mut machine = MachineCatalog::get_machine_by_name("single-step").unwrap();
        machine.access.push(State::named("q1"));

        assert!(matches!(
            symmetrize(&machine),
            Err(MachineError::ArityMismatch { .. })
        ));
    }
}
