//! This module provides the structural checks a machine has to pass before it enters the
//! symmetrization pipeline, and the lookup of its unique accept command.

use crate::types::{Command, Machine, MachineError};

/// Analyzes a `Machine` for structural errors.
///
/// The checks run in order and the first failure is returned:
/// - at least one tape, and every per-tape list of the same length
/// - every command spans every tape
/// - every start, access and context state belongs to its tape's state set
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(MachineError::ArityMismatch)` or `Err(MachineError::UnknownState)` otherwise.
pub fn analyze(machine: &Machine) -> Result<(), MachineError> {
    [check_structure, check_command_arity, check_known_states]
        .iter()
        .try_for_each(|check| check(machine))
}

/// Checks that the machine has tapes and that the per-tape fields agree on their number.
fn check_structure(machine: &Machine) -> Result<(), MachineError> {
    let tapes = machine.tape_count();
    if tapes == 0 {
        return Err(MachineError::arity("start states", 1, 0));
    }

    let fields = [
        ("access states", machine.access.len()),
        ("alphabets", machine.alphabets.len()),
        ("state sets", machine.states.len()),
    ];

    match fields.iter().find(|(_, len)| *len != tapes) {
        Some((what, len)) => Err(MachineError::arity(*what, tapes, *len)),
        None => Ok(()),
    }
}

/// Checks that every command has one tape command per tape.
fn check_command_arity(machine: &Machine) -> Result<(), MachineError> {
    let tapes = machine.tape_count();

    match machine.commands.iter().find(|c| c.arity() != tapes) {
        Some(command) => Err(MachineError::arity(
            format!("command {command}"),
            tapes,
            command.arity(),
        )),
        None => Ok(()),
    }
}

/// Checks that every referenced state is declared on the tape that references it.
fn check_known_states(machine: &Machine) -> Result<(), MachineError> {
    let contexts = machine.commands.iter().flat_map(|command| {
        command.tapes.iter().enumerate().flat_map(|(tape, step)| {
            [(tape, &step.before.state), (tape, &step.after.state)]
        })
    });

    machine
        .start
        .iter()
        .enumerate()
        .chain(machine.access.iter().enumerate())
        .chain(contexts)
        .find(|(tape, state)| !machine.states[*tape].contains(*state))
        .map_or(Ok(()), |(tape, state)| {
            Err(MachineError::UnknownState {
                tape,
                state: state.clone(),
            })
        })
}

/// Finds the single command whose per-tape targets are exactly the access states.
///
/// # Returns
///
/// * `Ok(&Command)` if exactly one command qualifies.
/// * `Err(MachineError::MissingAcceptCommand)` if none does.
/// * `Err(MachineError::AmbiguousAcceptCommand)` if several do.
pub fn find_accept_command(machine: &Machine) -> Result<&Command, MachineError> {
    let access = machine.access.iter().collect::<Vec<_>>();
    let mut candidates = machine
        .commands
        .iter()
        .filter(|command| command.targets() == access);

    match (candidates.next(), candidates.count()) {
        (None, _) => Err(MachineError::MissingAcceptCommand),
        (Some(command), 0) => Ok(command),
        (Some(_), rest) => Err(MachineError::AmbiguousAcceptCommand(rest + 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Context, State, Symbol, TapeCommand};
    use std::collections::BTreeSet;

    fn create_test_machine(commands: Vec<Command>) -> Machine {
        Machine {
            input_alphabet: BTreeSet::from([Symbol::Literal('a')]),
            alphabets: vec![BTreeSet::from([Symbol::Literal('a')])],
            states: vec![["q0", "q1", "q2"].into_iter().map(State::named).collect()],
            commands: commands.into_iter().collect(),
            start: vec![State::named("q0")],
            access: vec![State::named("q1")],
        }
    }

    fn create_single_tape_command(from: &str, to: &str) -> Command {
        Command::new(vec![TapeCommand::new(
            Context::bare(State::named(from)),
            Context::new(Symbol::Literal('a'), State::named(to), Symbol::Empty),
        )])
    }

    #[test]
    fn test_valid_machine() {
        let machine = create_test_machine(vec![create_single_tape_command("q0", "q1")]);
        assert!(analyze(&machine).is_ok());
    }

    #[test]
    fn test_no_tapes() {
        let mut machine = create_test_machine(vec![]);
        machine.start.clear();

        assert!(matches!(
            analyze(&machine),
            Err(MachineError::ArityMismatch { found: 0, .. })
        ));
    }

    #[test]
    fn test_mismatched_access_states() {
        let mut machine = create_test_machine(vec![]);
        machine.access.push(State::named("q1"));

        match analyze(&machine) {
            Err(MachineError::ArityMismatch {
                what,
                expected,
                found,
            }) => {
                assert_eq!(what, "access states");
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("Expected ArityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_command_with_wrong_arity() {
        let mut command = create_single_tape_command("q0", "q1");
        command.tapes.push(TapeCommand::idle(State::named("q0")));
        let machine = create_test_machine(vec![command]);

        assert!(matches!(
            analyze(&machine),
            Err(MachineError::ArityMismatch {
                expected: 1,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_state_in_command() {
        let machine = create_test_machine(vec![create_single_tape_command("q0", "q9")]);

        assert_eq!(
            analyze(&machine),
            Err(MachineError::UnknownState {
                tape: 0,
                state: State::named("q9"),
            })
        );
    }

    #[test]
    fn test_accept_command_missing() {
        let machine = create_test_machine(vec![create_single_tape_command("q0", "q2")]);
        assert_eq!(
            find_accept_command(&machine),
            Err(MachineError::MissingAcceptCommand)
        );
    }

    #[test]
    fn test_accept_command_unique() {
        let accept = create_single_tape_command("q0", "q1");
        let machine =
            create_test_machine(vec![accept.clone(), create_single_tape_command("q0", "q2")]);

        assert_eq!(find_accept_command(&machine), Ok(&accept));
    }

    #[test]
    fn test_accept_command_ambiguous() {
        let machine = create_test_machine(vec![
            create_single_tape_command("q0", "q1"),
            create_single_tape_command("q2", "q1"),
        ]);

        assert_eq!(
            find_accept_command(&machine),
            Err(MachineError::AmbiguousAcceptCommand(2))
        );
    }
}
