//! This module defines the core data structures shared by every phase of the symmetrization
//! pipeline: tape symbols, states, per-tape contexts, commands, machines and the error type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The text used for the don't-care marker in machine descriptions.
pub const EMPTY_SYMBOL: char = '_';
/// The text used for the left boundary marker in machine descriptions.
pub const LEFT_BOUNDARY_SYMBOL: char = '<';
/// The text used for the right boundary marker in machine descriptions.
pub const RIGHT_BOUNDARY_SYMBOL: char = '>';

/// A symbol that may appear in a context of a tape command.
///
/// The three markers are structural: they describe where the head sits or that the tape
/// is not involved, and they are shared between a tape and its mirror. Every other
/// variant is data and gets wrapped when mirrored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// The head sits at the left edge of the tape.
    LeftBoundary,
    /// The head sits at the right edge of the tape.
    RightBoundary,
    /// Don't-care: the tape cell is not constrained or not used.
    Empty,
    /// A data symbol supplied by the producer of the machine.
    Literal(char),
    /// The mirror-tape copy of a data symbol.
    Mirrored(Box<Symbol>),
    /// A bookkeeping symbol recording which command fired.
    Logged(Command),
}

impl Symbol {
    /// Returns `true` for the boundary and don't-care markers.
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            Symbol::LeftBoundary | Symbol::RightBoundary | Symbol::Empty
        )
    }

    /// Returns `true` if the symbol may stand as the left part of a canonical context.
    pub fn is_pure_left(&self) -> bool {
        matches!(self, Symbol::LeftBoundary | Symbol::Empty)
    }

    /// Returns the mirror-alphabet counterpart of this symbol. Markers map to themselves.
    pub fn mirror(&self) -> Symbol {
        match self {
            Symbol::LeftBoundary | Symbol::RightBoundary | Symbol::Empty => self.clone(),
            Symbol::Literal(_) | Symbol::Mirrored(_) | Symbol::Logged(_) => {
                Symbol::Mirrored(Box::new(self.clone()))
            }
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::LeftBoundary => write!(f, "{LEFT_BOUNDARY_SYMBOL}"),
            Symbol::RightBoundary => write!(f, "{RIGHT_BOUNDARY_SYMBOL}"),
            Symbol::Empty => write!(f, "{EMPTY_SYMBOL}"),
            Symbol::Literal(c) => write!(f, "{c}"),
            Symbol::Mirrored(inner) => write!(f, "{inner}'"),
            Symbol::Logged(command) => write!(f, "[{command}]"),
        }
    }
}

/// The four states of the control tape added by the control-tape wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlState {
    Start,
    Running,
    Final,
    Accept,
}

/// Where a state identifier comes from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateBase {
    /// A state named by the producer of the machine.
    Named(String),
    /// A state of the control tape.
    Control(ControlState),
    /// A state generated by the state namer. `origin` is the tape the state was allocated
    /// for, numbered as in the machine of the phase that allocated it; later phases may move
    /// the state to another tape without changing its identity. Within a pool, every
    /// `(origin, index)` pair names at most one state across all tapes.
    Fresh { origin: usize, index: u32 },
}

/// A state identifier, scoped to the state set of exactly one tape.
///
/// `rank` is the sibling generation: `0` for states as they were created, and bumped by
/// [`crate::namer::sibling_of`] whenever a disjoint counterpart is needed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct State {
    pub base: StateBase,
    pub rank: u32,
}

impl State {
    /// Creates a producer state with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            base: StateBase::Named(name.into()),
            rank: 0,
        }
    }

    /// Creates a control-tape state.
    pub fn control(state: ControlState) -> Self {
        Self {
            base: StateBase::Control(state),
            rank: 0,
        }
    }

    /// Returns the same base with a different sibling rank.
    pub fn with_rank(&self, rank: u32) -> Self {
        Self {
            base: self.base.clone(),
            rank,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            StateBase::Named(name) => write!(f, "{name}")?,
            StateBase::Control(state) => write!(f, "{state:?}")?,
            StateBase::Fresh { origin, index } => write!(f, "t{origin}#{index}")?,
        }
        for _ in 0..self.rank {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// One tape's situation before or after a step: the symbols around the head and the state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Context {
    pub left: Symbol,
    pub state: State,
    pub right: Symbol,
}

impl Context {
    pub fn new(left: Symbol, state: State, right: Symbol) -> Self {
        Self { left, state, right }
    }

    /// A context that constrains nothing but the state.
    pub fn bare(state: State) -> Self {
        Self::new(Symbol::Empty, state, Symbol::Empty)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.left, self.state, self.right)
    }
}

/// The before/after pair of contexts a command prescribes for a single tape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TapeCommand {
    pub before: Context,
    pub after: Context,
}

impl TapeCommand {
    pub fn new(before: Context, after: Context) -> Self {
        Self { before, after }
    }

    /// A no-op that keeps the tape in `state` without looking at its cells.
    pub fn idle(state: State) -> Self {
        let context = Context::bare(state);
        Self::new(context.clone(), context)
    }

    /// Replaces the before context.
    pub fn with_before(self, before: Context) -> Self {
        Self { before, ..self }
    }

    /// Replaces the after context.
    pub fn with_after(self, after: Context) -> Self {
        Self { after, ..self }
    }

    /// Returns `true` if the step changes this tape at all.
    pub fn is_live(&self) -> bool {
        self.before != self.after
    }

    /// Returns `true` if the left symbol is a boundary or don't-care marker on at least one
    /// side of the step.
    pub fn is_canonical(&self) -> bool {
        self.before.left.is_pure_left() || self.after.left.is_pure_left()
    }

    /// Swaps the before and after contexts.
    pub fn reverse(&self) -> Self {
        Self::new(self.after.clone(), self.before.clone())
    }
}

impl fmt::Display for TapeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.before, self.after)
    }
}

/// A transition rule that fires on all tapes synchronously, one `TapeCommand` per tape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Command {
    pub tapes: Vec<TapeCommand>,
}

impl Command {
    pub fn new(tapes: Vec<TapeCommand>) -> Self {
        Self { tapes }
    }

    /// The number of tapes this command spans.
    pub fn arity(&self) -> usize {
        self.tapes.len()
    }

    /// The state each tape is left in after the command fires.
    pub fn targets(&self) -> Vec<&State> {
        self.tapes.iter().map(|tape| &tape.after.state).collect()
    }

    /// Returns `true` if every tape command is in canonical form.
    pub fn is_canonical(&self) -> bool {
        self.tapes.iter().all(TapeCommand::is_canonical)
    }

    /// The syntactic reverse: before and after swapped on every tape.
    pub fn reverse(&self) -> Self {
        Self::new(self.tapes.iter().map(TapeCommand::reverse).collect())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tape) in self.tapes.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{tape}")?;
        }
        Ok(())
    }
}

/// A multi-tape nondeterministic Turing machine given by its transition relation.
///
/// Every "one per tape" field has the same length, the tape count. The machine accepts
/// when every tape is in its access state at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// The symbols the input word is made of.
    pub input_alphabet: BTreeSet<Symbol>,
    /// The data symbols each tape may hold.
    pub alphabets: Vec<BTreeSet<Symbol>>,
    /// The states each tape may be in.
    pub states: Vec<BTreeSet<State>>,
    /// The transition relation.
    pub commands: BTreeSet<Command>,
    /// The start state of each tape.
    pub start: Vec<State>,
    /// The access (accepting) state of each tape.
    pub access: Vec<State>,
}

impl Machine {
    /// The number of tapes, taken from the start-state list.
    pub fn tape_count(&self) -> usize {
        self.start.len()
    }

    /// Returns `true` if every command's reverse is also a command.
    pub fn is_symmetric(&self) -> bool {
        self.commands
            .iter()
            .all(|command| self.commands.contains(&command.reverse()))
    }
}

/// Represents the errors raised while loading or transforming a machine.
///
/// All of them are fatal: the transformation has no meaning on malformed input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// No command moves every tape into its access state.
    #[error("No command reaches the access states")]
    MissingAcceptCommand,
    /// More than one command moves every tape into its access state.
    #[error("{0} commands reach the access states, expected exactly one")]
    AmbiguousAcceptCommand(usize),
    /// Per-tape lists disagree in length, or a command does not span every tape.
    #[error("Arity mismatch in {what}: expected {expected}, found {found}")]
    ArityMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    /// An internal structure does not have the shape the pipeline expects.
    #[error("Invalid command shape: {0}")]
    InvalidCommandShape(String),
    /// A state is referenced on a tape whose state set does not contain it.
    #[error("State {state} is not in the state set of tape {tape}")]
    UnknownState { tape: usize, state: State },
    /// The namer has no identifier left past the given state.
    #[error("No state can be generated past {0}")]
    NamesExhausted(State),
    /// Indicates an error during the parsing of a machine description.
    #[error("Machine parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error related to reading machine files.
    #[error("File error: {0}")]
    FileError(String),
}

impl MachineError {
    pub(crate) fn arity(what: impl Into<String>, expected: usize, found: usize) -> Self {
        MachineError::ArityMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}
