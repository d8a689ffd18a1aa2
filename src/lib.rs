//! This crate turns the transition relation of a multi-tape nondeterministic Turing machine
//! into an equivalent symmetric relation, one closed under swapping the before and after
//! contexts of every command.
//!
//! The pipeline wraps the machine with a control tape, doubles every tape with a mirror tape,
//! serializes multi-tape commands, splits commands into canonical form and finally adds the
//! reverse of every command. Supporting modules parse and render machine descriptions and
//! provide a catalog of sample machines.

pub mod analyzer;
pub mod catalog;
pub mod control;
pub mod doubler;
pub mod encoder;
pub mod loader;
pub mod namer;
pub mod parser;
pub mod pipeline;
pub mod serializer;
pub mod splitter;
pub mod symmetrizer;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the structural checks from the analyzer module.
pub use analyzer::{analyze, find_accept_command};
/// Re-exports `MachineCatalog` and the parsed `MACHINES` from the catalog module.
pub use catalog::{CatalogEntry, MachineCatalog, MACHINES};
/// Re-exports the rendering functions from the encoder module.
pub use encoder::{encode, to_json};
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the state generators from the namer module.
pub use namer::{fresh, sibling_of, StatePool};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the two pipeline entry points.
pub use pipeline::{normalize_and_symmetrize, symmetrize};
/// Re-exports the machine model and error type from the types module.
pub use types::{
    Command, Context, ControlState, Machine, MachineError, State, StateBase, Symbol, TapeCommand,
};
