//! The symmetrizer: closes a canonical command list under reversal.

use std::collections::BTreeSet;

use tracing::debug;

use crate::types::{Command, MachineError};

/// Returns the union of `commands` and their reverses.
///
/// Duplicates collapse; the set is ordered by the derived total order on commands, so the
/// result does not depend on the order of `commands`.
///
/// # Returns
///
/// * `Ok(BTreeSet<Command>)` closed under [`Command::reverse`].
/// * `Err(MachineError::InvalidCommandShape)` if a command is empty or the commands disagree
///   in arity.
pub fn symmetric_closure(commands: &[Command]) -> Result<BTreeSet<Command>, MachineError> {
    let arity = commands.first().map_or(0, Command::arity);

    let mut relation = BTreeSet::new();
    for command in commands {
        if command.arity() == 0 || command.arity() != arity {
            return Err(MachineError::InvalidCommandShape(format!(
                "command {command} spans {} tapes, expected {arity}",
                command.arity()
            )));
        }

        relation.insert(command.reverse());
        relation.insert(command.clone());
    }

    debug!(
        input = commands.len(),
        output = relation.len(),
        "closed relation under reversal"
    );

    Ok(relation)
}
