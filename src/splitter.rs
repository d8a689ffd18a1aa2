//! The canonical-form splitter.
//!
//! A command whose every tape command has a boundary or don't-care left symbol on at least one
//! side is canonical and passes through. Any other command is split into two half-steps joined
//! by one fresh intermediate state per tape:
//!
//! ```text
//! (l, s, r) -> (l', s', r')   becomes   (l, s, r) -> (_, m, _)   and   (_, m, _) -> (l', s', r')
//! ```

use tracing::debug;

use crate::namer::StatePool;
use crate::types::{Command, Context, MachineError, TapeCommand};

/// Splits every non-canonical command into two canonical half-steps.
///
/// # Returns
///
/// * `Ok(Vec<Command>)` where every command is canonical.
/// * `Err(MachineError::InvalidCommandShape)` if a command does not span every tape of `pool`.
pub fn split(
    pool: &mut StatePool,
    commands: Vec<Command>,
) -> Result<Vec<Command>, MachineError> {
    let mut canonical = Vec::with_capacity(commands.len());
    let mut split_count = 0;

    for command in commands {
        if command.arity() != pool.tape_count() {
            return Err(MachineError::InvalidCommandShape(format!(
                "command spans {} tapes, state sets cover {}",
                command.arity(),
                pool.tape_count()
            )));
        }

        if command.is_canonical() {
            canonical.push(command);
            continue;
        }

        let middle = pool.fresh_for_all(0..command.arity())?;
        let (first, second): (Vec<TapeCommand>, Vec<TapeCommand>) = command
            .tapes
            .into_iter()
            .zip(middle)
            .map(|(step, middle)| {
                let bare = Context::bare(middle);
                (
                    step.clone().with_after(bare.clone()),
                    step.with_before(bare),
                )
            })
            .unzip();

        canonical.push(Command::new(first));
        canonical.push(Command::new(second));
        split_count += 1;
    }

    debug!(
        split = split_count,
        output = canonical.len(),
        "split commands into canonical form"
    );

    Ok(canonical)
}
