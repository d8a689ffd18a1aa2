//! The state/alphabet doubler.
//!
//! Every tape `i` of the input becomes tape `2i` of the output and gets a mirror tape `2i + 1`
//! right after it. The mirror tape has a wrapped copy of the alphabet, a sibling for every state,
//! and runs the mirrored version of every tape command in lock-step with the original tape.

use std::collections::{BTreeMap, BTreeSet};
use std::iter;

use tracing::debug;

use crate::namer::sibling_of;
use crate::types::{Command, Context, Machine, MachineError, State, Symbol, TapeCommand};

/// Maps each state of one tape to its mirror-tape sibling.
struct Mirror {
    tape: usize,
    states: BTreeMap<State, State>,
}

impl Mirror {
    fn state(&self, state: &State) -> Result<State, MachineError> {
        self.states
            .get(state)
            .cloned()
            .ok_or_else(|| MachineError::UnknownState {
                tape: self.tape,
                state: state.clone(),
            })
    }

    fn context(&self, context: &Context) -> Result<Context, MachineError> {
        Ok(Context::new(
            context.left.mirror(),
            self.state(&context.state)?,
            context.right.mirror(),
        ))
    }

    fn tape_command(&self, step: &TapeCommand) -> Result<TapeCommand, MachineError> {
        Ok(TapeCommand::new(
            self.context(&step.before)?,
            self.context(&step.after)?,
        ))
    }

    fn mirror_set(&self) -> BTreeSet<State> {
        self.states.values().cloned().collect()
    }
}

/// Builds the sibling maps for every tape, in tape order.
///
/// Each sibling is derived against the original sets and all mirror sets built so far, so no
/// sibling collides with any tape.
fn mirrors(states: &[BTreeSet<State>]) -> Result<Vec<Mirror>, MachineError> {
    let mut taken: Vec<BTreeSet<State>> = Vec::with_capacity(states.len());
    let mut mirrors = Vec::with_capacity(states.len());

    for (tape, tape_states) in states.iter().enumerate() {
        let mut current = BTreeSet::new();
        let mut map = BTreeMap::new();

        for state in tape_states {
            let sibling = sibling_of(
                state,
                states.iter().chain(&taken).chain(iter::once(&current)),
            )?;
            current.insert(sibling.clone());
            map.insert(state.clone(), sibling);
        }

        taken.push(current);
        mirrors.push(Mirror { tape, states: map });
    }

    Ok(mirrors)
}

/// Interleaves every per-tape value with its mirror counterpart.
fn interleave<T>(originals: &[T], mirrored: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Clone,
{
    originals
        .iter()
        .cloned()
        .zip(mirrored)
        .flat_map(|(original, mirror)| [original, mirror])
        .collect()
}

/// Doubles every tape of `machine`.
///
/// # Returns
///
/// * `Ok(Machine)` with `2k` tapes and every command of arity `2k`.
/// * `Err(MachineError::ArityMismatch)` if a command does not span every tape.
/// * `Err(MachineError::UnknownState)` if a referenced state is missing from its tape's set.
/// * `Err(MachineError::NamesExhausted)` if a state has no sibling rank left.
pub fn double(machine: &Machine) -> Result<Machine, MachineError> {
    let tapes = machine.tape_count();
    let mirrors = mirrors(&machine.states)?;

    let start = machine
        .start
        .iter()
        .zip(&mirrors)
        .map(|(state, mirror)| mirror.state(state))
        .collect::<Result<Vec<_>, _>>()?;
    let access = machine
        .access
        .iter()
        .zip(&mirrors)
        .map(|(state, mirror)| mirror.state(state))
        .collect::<Result<Vec<_>, _>>()?;

    let mut commands = BTreeSet::new();
    for command in &machine.commands {
        if command.arity() != tapes {
            return Err(MachineError::arity(
                format!("command {command}"),
                tapes,
                command.arity(),
            ));
        }

        let mut doubled = Vec::with_capacity(2 * tapes);
        for (step, mirror) in command.tapes.iter().zip(&mirrors) {
            doubled.push(step.clone());
            doubled.push(mirror.tape_command(step)?);
        }
        commands.insert(Command::new(doubled));
    }

    let alphabets = machine
        .alphabets
        .iter()
        .map(|alphabet| alphabet.iter().map(Symbol::mirror).collect::<BTreeSet<_>>());

    debug!(
        tapes = 2 * tapes,
        commands = commands.len(),
        "doubled states and alphabets"
    );

    Ok(Machine {
        input_alphabet: machine.input_alphabet.clone(),
        alphabets: interleave(&machine.alphabets, alphabets),
        states: interleave(&machine.states, mirrors.iter().map(Mirror::mirror_set)),
        commands,
        start: interleave(&machine.start, start),
        access: interleave(&machine.access, access),
    })
}
