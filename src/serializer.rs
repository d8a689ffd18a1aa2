//! The multi-tape serializer.
//!
//! A command moves all of its live tapes at once. The serializer replaces it by a chain of
//! commands, one per live tape in ascending tape order, where round `r` commits the step of the
//! `r`-th live tape. Live tapes that have not committed yet are walked through fresh bridging
//! states, one per round, so no tape shows its final state before its own round. Tapes that
//! already committed idle at their final state, and tapes that were never live keep their
//! original (identity) tape command in every round.

use tracing::debug;

use crate::namer::StatePool;
use crate::types::{Command, Context, MachineError, State, TapeCommand};

/// Splits one command into its chain of single-tape rounds.
fn serialize_command(
    pool: &mut StatePool,
    command: &Command,
) -> Result<Vec<Command>, MachineError> {
    if command.arity() != pool.tape_count() {
        return Err(MachineError::InvalidCommandShape(format!(
            "command spans {} tapes, state sets cover {}",
            command.arity(),
            pool.tape_count()
        )));
    }

    let live = command
        .tapes
        .iter()
        .enumerate()
        .filter(|(_, step)| step.is_live())
        .map(|(tape, _)| tape)
        .collect::<Vec<_>>();

    if live.len() <= 1 {
        return Ok(vec![command.clone()]);
    }

    // The state each tape is currently in along the chain.
    let mut current: Vec<State> = command
        .tapes
        .iter()
        .map(|step| step.before.state.clone())
        .collect();

    let mut rounds = Vec::with_capacity(live.len());
    for (round, &committing) in live.iter().enumerate() {
        let mut tapes = command.tapes.clone();

        for &tape in &live[..round] {
            tapes[tape] = TapeCommand::idle(command.tapes[tape].after.state.clone());
        }

        let original = &command.tapes[committing];
        tapes[committing] = TapeCommand::new(
            Context::new(
                original.before.left.clone(),
                current[committing].clone(),
                original.before.right.clone(),
            ),
            original.after.clone(),
        );

        for &tape in &live[round + 1..] {
            let bridge = pool.fresh(tape)?;
            tapes[tape] = TapeCommand::new(
                Context::bare(current[tape].clone()),
                Context::bare(bridge.clone()),
            );
            current[tape] = bridge;
        }

        rounds.push(Command::new(tapes));
    }

    Ok(rounds)
}

/// Serializes every command so that each resulting command commits the step of one tape.
///
/// Fresh bridging states are recorded in `pool`.
///
/// # Returns
///
/// * `Ok(Vec<Command>)` with the rounds of every command, in input order.
/// * `Err(MachineError::InvalidCommandShape)` if a command does not span every tape of `pool`.
pub fn serialize(
    pool: &mut StatePool,
    commands: &[Command],
) -> Result<Vec<Command>, MachineError> {
    let mut serialized = Vec::with_capacity(commands.len());
    for command in commands {
        serialized.extend(serialize_command(pool, command)?);
    }

    debug!(
        input = commands.len(),
        output = serialized.len(),
        "serialized multi-tape commands"
    );

    Ok(serialized)
}
