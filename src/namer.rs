//! Generation of fresh state identifiers.
//!
//! States are scoped to a single tape. [`fresh`] picks a new state that none of the given
//! sets contains, [`sibling_of`] derives a disjoint counterpart of an existing state that is
//! absent from every tape, and [`StatePool`] threads the growing per-tape sets through the
//! pipeline so that every call sees all names allocated so far.

use std::collections::BTreeSet;

use crate::types::{MachineError, State, StateBase};

/// Returns a state generated for tape `origin` that no set in `pools` contains.
///
/// The result is `Fresh { origin, index }` with an index one past the highest index any of
/// the sets uses for that origin, so repeated calls against sets that absorb each result never
/// repeat. Fails with [`MachineError::NamesExhausted`] once the index space is used up.
pub fn fresh<'a, I>(origin: usize, pools: I) -> Result<State, MachineError>
where
    I: IntoIterator<Item = &'a BTreeSet<State>>,
{
    let last = pools
        .into_iter()
        .flatten()
        .filter_map(|state| match state.base {
            StateBase::Fresh { origin: o, index } if o == origin => Some((index, state)),
            _ => None,
        })
        .max_by_key(|(index, _)| *index);

    let index = match last {
        None => 0,
        Some((index, state)) => index
            .checked_add(1)
            .ok_or_else(|| MachineError::NamesExhausted(state.clone()))?,
    };

    Ok(State {
        base: StateBase::Fresh { origin, index },
        rank: 0,
    })
}

/// Derives a sibling of `state` that is absent from every set in `pools`.
///
/// The sibling keeps the base of `state` and takes the lowest rank above it that no set uses,
/// so the same state and the same sets always yield the same sibling.
pub fn sibling_of<'a, I>(state: &State, pools: I) -> Result<State, MachineError>
where
    I: IntoIterator<Item = &'a BTreeSet<State>> + Clone,
{
    let exhausted = || MachineError::NamesExhausted(state.clone());

    let mut rank = state.rank.checked_add(1).ok_or_else(exhausted)?;
    loop {
        let candidate = state.with_rank(rank);
        if !pools.clone().into_iter().any(|set| set.contains(&candidate)) {
            return Ok(candidate);
        }
        rank = rank.checked_add(1).ok_or_else(exhausted)?;
    }
}

/// The authoritative per-tape state sets of a machine under construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatePool {
    tapes: Vec<BTreeSet<State>>,
}

impl StatePool {
    pub fn new(tapes: Vec<BTreeSet<State>>) -> Self {
        Self { tapes }
    }

    /// The number of tapes the pool covers.
    pub fn tape_count(&self) -> usize {
        self.tapes.len()
    }

    /// The state set of `tape`, if the tape exists.
    pub fn states(&self, tape: usize) -> Option<&BTreeSet<State>> {
        self.tapes.get(tape)
    }

    /// Allocates a fresh state on `tape` and records it in that tape's set.
    ///
    /// The state is absent from every tape of the pool, not only from `tape`.
    pub fn fresh(&mut self, tape: usize) -> Result<State, MachineError> {
        let count = self.tapes.len();
        if tape >= count {
            return Err(MachineError::arity("state pool", count, tape + 1));
        }

        let state = fresh(tape, &self.tapes)?;
        self.tapes[tape].insert(state.clone());
        Ok(state)
    }

    /// Allocates one fresh state on each of the given tapes.
    pub fn fresh_for_all(
        &mut self,
        tapes: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<State>, MachineError> {
        tapes.into_iter().map(|tape| self.fresh(tape)).collect()
    }

    /// Consumes the pool and returns the per-tape state sets.
    pub fn into_inner(self) -> Vec<BTreeSet<State>> {
        self.tapes
    }
}
