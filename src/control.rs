//! The control-tape wrapper.
//!
//! Embeds a k-tape machine into a (k+1)-tape machine whose last tape is a bookkeeping tape with
//! the fixed lifecycle `Start -> Running -> Final -> Accept`. The command set is rebuilt in
//! stages glued through the control state:
//!
//! 1. entry: the control tape logs the accept command and every data tape leaves its start
//!    state for a stage-local state;
//! 2. body: every other command is logged once while the data tapes idle;
//! 3. exit: the data tapes return to their start states and the control tape reaches `Final`;
//! 4. replay: the original commands run with the control tape resting at `Final`;
//! 5. accept: with every data tape at its access state the control tape moves to `Accept`.

use std::collections::BTreeSet;

use tracing::debug;

use crate::analyzer::find_accept_command;
use crate::namer::StatePool;
use crate::types::{
    Command, Context, ControlState, Machine, MachineError, State, Symbol, TapeCommand,
};

/// The state set of the control tape.
pub fn control_states() -> BTreeSet<State> {
    [
        ControlState::Start,
        ControlState::Running,
        ControlState::Final,
        ControlState::Accept,
    ]
    .into_iter()
    .map(State::control)
    .collect()
}

/// A control-tape context at the left edge with the given right symbol.
fn control_context(state: ControlState, right: Symbol) -> Context {
    Context::new(Symbol::LeftBoundary, State::control(state), right)
}

/// A control-tape step that leaves the right cell unconstrained before and writes `right` after.
fn control_step(from: ControlState, to: ControlState, right: Symbol) -> TapeCommand {
    TapeCommand::new(
        control_context(from, Symbol::Empty),
        control_context(to, right),
    )
}

/// Builds a command from per-tape steps on the data tapes plus one step on the control tape.
fn with_control(data: impl IntoIterator<Item = TapeCommand>, control: TapeCommand) -> Command {
    Command::new(data.into_iter().chain(std::iter::once(control)).collect())
}

/// Moves every data tape from `from[i]` to `to[i]` without touching its cells.
fn relabel(from: &[State], to: &[State]) -> Result<Vec<TapeCommand>, MachineError> {
    if from.len() != to.len() {
        return Err(MachineError::arity(
            "stage-local states",
            from.len(),
            to.len(),
        ));
    }

    Ok(from
        .iter()
        .zip(to)
        .map(|(from, to)| {
            TapeCommand::new(Context::bare(from.clone()), Context::bare(to.clone()))
        })
        .collect())
}

/// Wraps `machine` with a control tape.
///
/// The input must satisfy [`crate::analyzer::analyze`] and have exactly one accept command.
///
/// # Returns
///
/// * `Ok(Machine)` with `k + 1` tapes, the control tape last.
/// * `Err(MachineError::MissingAcceptCommand)` or `Err(MachineError::AmbiguousAcceptCommand)`
///   if the accept command cannot be identified.
pub fn wrap(machine: &Machine) -> Result<Machine, MachineError> {
    let accept = find_accept_command(machine)?;
    let data_tapes = machine.tape_count();

    let mut pool = StatePool::new(machine.states.clone());
    let stage = pool.fresh_for_all(0..data_tapes)?;

    let mut commands = BTreeSet::new();

    // Entry
    commands.insert(with_control(
        relabel(&machine.start, &stage)?,
        control_step(
            ControlState::Start,
            ControlState::Running,
            Symbol::Logged(accept.clone()),
        ),
    ));

    // Body
    for command in machine.commands.iter().filter(|c| *c != accept) {
        commands.insert(with_control(
            stage.iter().cloned().map(TapeCommand::idle),
            control_step(
                ControlState::Running,
                ControlState::Running,
                Symbol::Logged(command.clone()),
            ),
        ));
    }

    // Exit
    commands.insert(with_control(
        relabel(&stage, &machine.start)?,
        control_step(ControlState::Running, ControlState::Final, Symbol::Empty),
    ));

    // Replay
    let resting = control_step(ControlState::Final, ControlState::Final, Symbol::Empty);
    for command in &machine.commands {
        commands.insert(with_control(command.tapes.iter().cloned(), resting.clone()));
    }

    // Accept
    commands.insert(with_control(
        machine.access.iter().cloned().map(TapeCommand::idle),
        control_step(ControlState::Final, ControlState::Accept, Symbol::Empty),
    ));

    let mut states = pool.into_inner();
    states.push(control_states());

    let mut alphabets = machine.alphabets.clone();
    alphabets.push(
        machine
            .commands
            .iter()
            .cloned()
            .map(Symbol::Logged)
            .collect(),
    );

    let mut start = machine.start.clone();
    start.push(State::control(ControlState::Start));
    let mut access = machine.access.clone();
    access.push(State::control(ControlState::Accept));

    debug!(
        tapes = data_tapes + 1,
        commands = commands.len(),
        "wrapped machine with control tape"
    );

    Ok(Machine {
        input_alphabet: machine.input_alphabet.clone(),
        alphabets,
        states,
        commands,
        start,
        access,
    })
}
