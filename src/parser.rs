//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! It reads the `.tm` text format defined in `grammar.pest` into a validated `Machine`.
//!
//! State sets are inferred from the start, access and command contexts of each tape; alphabets
//! from the literals each tape's commands use, with the input alphabet added to tape 0.

use crate::{
    analyzer::analyze,
    types::{Command, Context, Machine, MachineError, State, Symbol, TapeCommand},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::BTreeSet;

/// Derives a `PestParser` for the machine description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses the given input string into a `Machine`.
///
/// # Returns
///
/// * `Ok(Machine)` if the input is successfully parsed and validated.
/// * `Err(MachineError::ParseError)` if there are syntax errors or the per-tape lists disagree.
/// * `Err(MachineError::ArityMismatch)` if the machine fails validation.
pub fn parse(input: &str) -> Result<Machine, MachineError> {
    let root = MachineParser::parse(Rule::machine, input)
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .unwrap();

    let machine = parse_machine(root)?;
    analyze(&machine)?;

    Ok(machine)
}

/// Parses the top-level sections of a machine description.
fn parse_machine(pair: Pair<Rule>) -> Result<Machine, MachineError> {
    let mut input_alphabet = BTreeSet::new();
    let mut start = Vec::new();
    let mut access = Vec::new();
    let mut commands = Vec::new();
    let mut access_span = None;

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::input => input_alphabet = p.into_inner().map(parse_symbol).collect(),
            Rule::start => start = parse_states(p),
            Rule::access => {
                access_span = Some(p.as_span());
                access = parse_states(p);
            }
            Rule::commands => {
                for command in p.into_inner() {
                    commands.push(parse_command(command, start.len())?);
                }
            }
            _ => {} // EOI
        }
    }

    let tapes = start.len();
    if let Some(span) = access_span.filter(|_| access.len() != tapes) {
        return Err(parse_error(
            &format!("Expected {} access states, found {}", tapes, access.len()),
            span,
        ));
    }

    let mut states = vec![BTreeSet::new(); tapes];
    let mut alphabets = vec![BTreeSet::new(); tapes];

    for (tape, state) in start.iter().enumerate().chain(access.iter().enumerate()) {
        states[tape].insert(state.clone());
    }

    for command in &commands {
        for (tape, step) in command.tapes.iter().enumerate() {
            for context in [&step.before, &step.after] {
                states[tape].insert(context.state.clone());
                for symbol in [&context.left, &context.right] {
                    if !symbol.is_marker() {
                        alphabets[tape].insert(symbol.clone());
                    }
                }
            }
        }
    }

    if let Some(first) = alphabets.first_mut() {
        first.extend(input_alphabet.iter().cloned());
    }

    Ok(Machine {
        input_alphabet,
        alphabets,
        states,
        commands: commands.into_iter().collect(),
        start,
        access,
    })
}

/// Parses a `|`-separated list of states.
fn parse_states(pair: Pair<Rule>) -> Vec<State> {
    // Rule: (start | access) > states > [state]
    pair.into_inner()
        .flat_map(|states| states.into_inner())
        .map(parse_state)
        .collect()
}

/// Parses a state name; trailing `'` marks give its sibling rank.
fn parse_state(pair: Pair<Rule>) -> State {
    let text = pair.as_str();
    let name = text.trim_end_matches('\'');
    let rank = (text.len() - name.len()) as u32;

    State::named(name).with_rank(rank)
}

/// Parses one command line; every command has to span `tapes` tapes.
fn parse_command(pair: Pair<Rule>, tapes: usize) -> Result<Command, MachineError> {
    let span = pair.as_span();
    let steps = pair
        .into_inner()
        .map(parse_tape_command)
        .collect::<Vec<_>>();

    if steps.len() != tapes {
        return Err(parse_error(
            &format!("Command spans {} tapes, expected {}", steps.len(), tapes),
            span,
        ));
    }

    Ok(Command::new(steps))
}

/// Parses `(l, s, r) -> (l', s', r')`.
fn parse_tape_command(pair: Pair<Rule>) -> TapeCommand {
    let mut contexts = pair.into_inner().map(parse_context);
    let before = contexts.next().unwrap();
    let after = contexts.next().unwrap();

    TapeCommand::new(before, after)
}

/// Parses `(l, s, r)`.
fn parse_context(pair: Pair<Rule>) -> Context {
    let mut pairs = pair.into_inner();
    let left = parse_symbol(pairs.next().unwrap());
    let state = parse_state(pairs.next().unwrap());
    let right = parse_symbol(pairs.next().unwrap());

    Context::new(left, state, right)
}

/// Parses a marker or a single-character literal.
fn parse_symbol(pair: Pair<Rule>) -> Symbol {
    match pair.as_rule() {
        Rule::empty => Symbol::Empty,
        Rule::left_boundary => Symbol::LeftBoundary,
        Rule::right_boundary => Symbol::RightBoundary,
        _ => Symbol::Literal(pair.as_str().chars().next().unwrap_or_default()),
    }
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
