//! Aho-Corasick automaton engine.
//!
//! This crate builds a multi-pattern matching automaton from a set of literal
//! patterns and scans corpora in one linear pass, reporting every occurrence
//! of every pattern, overlapping and nested ones included.
//!
//! # Architecture
//!
//! - [`children`] -- Children containers keyed by symbol (ordered or hashed)
//! - [`trie`] -- Pattern insertion into the node arena
//! - [`completion`] -- Breadth-first failure/dictionary link computation
//! - [`automaton`] -- The completed automaton with a fail-walking transition
//! - [`dense`] -- Fully precomputed goto table variant
//! - [`lazy`] -- On-demand, memoized link computation variant
//! - [`search`] -- Streaming matcher: callbacks, iterators and chunked feeds
//! - [`dump`] -- Diagnostic listing of states and links
//!
//! Construction and search are separate types: a [`TrieBuilder`] accepts
//! patterns but cannot search, and completing it yields an [`AhoCorasick`]
//! that searches but cannot accept patterns. Searching before completion or
//! inserting after it is therefore rejected at compile time.
//!
//! ```
//! use polymatch_automaton::{AhoCorasick, Automaton};
//!
//! let ac = AhoCorasick::build(["he", "she", "his", "hers"].map(str::chars)).unwrap();
//! let mut spans = Vec::new();
//! ac.find("ushers".chars(), |start, end| {
//!     spans.push((start, end));
//!     true
//! });
//! assert_eq!(spans, vec![(1, 4), (2, 4), (2, 6)]);
//! ```

use std::fmt;

pub mod automaton;
pub mod children;
pub mod completion;
pub mod dense;
pub mod dump;
pub mod lazy;
pub mod search;
pub mod trie;

pub use automaton::AhoCorasick;
pub use children::{ChildMap, HashedChildren, OrderedChildren};
pub use dense::DenseAhoCorasick;
pub use lazy::LazyAhoCorasick;
pub use polymatch_core::{Match, PatternId, Span, Symbol};
pub use search::{FindIter, StreamSearcher};
pub use trie::TrieBuilder;

/// Error type for automaton construction.
///
/// Searching never fails; every construction failure surfaces here before
/// an automaton exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("pattern {pattern} has symbol {symbol} outside the alphabet at position {position}")]
    InvalidSymbol {
        pattern: usize,
        position: usize,
        symbol: String,
    },
    #[error("automaton would exceed the limit of {limit} states")]
    TooManyStates { limit: usize },
    #[error("pattern set would exceed the limit of {limit} patterns")]
    TooManyPatterns { limit: usize },
    #[error("goto table for {states} states and {classes} symbol classes is too large")]
    TableTooLarge { states: usize, classes: usize },
}

/// Index of a node in the automaton's arena.
///
/// Failure and dictionary links are stored as state ids, never as owning
/// handles, so every link is valid exactly as long as its arena is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    /// The root state, matching the empty prefix.
    pub const ROOT: StateId = StateId(0);

    /// Largest representable number of states.
    pub const LIMIT: usize = u32::MAX as usize;

    #[inline]
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trait for multi-pattern automata, abstracting over the transition strategy.
///
/// Implementors provide the goto function and the per-state output data; the
/// streaming search methods are provided on top of them and behave
/// identically for every strategy.
pub trait Automaton<S: Symbol> {
    /// Advance from `state` on `symbol`.
    ///
    /// Never fails: a symbol with no matching edge anywhere along the failure
    /// chain leads back to [`StateId::ROOT`].
    fn next_state(&self, state: StateId, symbol: S) -> StateId;

    /// Patterns terminating exactly at `state`, in insertion order.
    fn outputs(&self, state: StateId) -> &[PatternId];

    /// Nearest state along the failure chain (excluding `state` itself) that
    /// terminates a pattern.
    fn dictionary_link(&self, state: StateId) -> Option<StateId>;

    /// Length in symbols of `pattern`.
    fn pattern_len(&self, pattern: PatternId) -> usize;

    /// Number of inserted patterns, empty ones included.
    fn pattern_count(&self) -> usize;

    /// Number of states, root included.
    fn state_count(&self) -> usize;

    /// Scan `corpus`, calling `on_match(start, end)` for every occurrence.
    ///
    /// Returns `true` if the whole corpus was scanned, `false` if the callback
    /// returned `false` and stopped the scan.
    fn find<I, F>(&self, corpus: I, mut on_match: F) -> bool
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        F: FnMut(usize, usize) -> bool,
    {
        search::find_matches(self, corpus, |m| on_match(m.start(), m.end()))
    }

    /// Like [`Automaton::find`], but the callback also receives the pattern id.
    fn find_matches<I, F>(&self, corpus: I, on_match: F) -> bool
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        F: FnMut(Match) -> bool,
    {
        search::find_matches(self, corpus, on_match)
    }

    /// Iterate over all matches in `corpus`, lazily.
    fn find_iter<I>(&self, corpus: I) -> FindIter<'_, S, Self, I::IntoIter>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
    {
        FindIter::new(self, corpus.into_iter())
    }

    /// Start a chunked scan whose positions continue across chunks.
    fn stream(&self) -> StreamSearcher<'_, S, Self>
    where
        Self: Sized,
    {
        StreamSearcher::new(self)
    }
}

impl<S: Symbol, A: Automaton<S> + ?Sized> Automaton<S> for Box<A> {
    #[inline]
    fn next_state(&self, state: StateId, symbol: S) -> StateId {
        (**self).next_state(state, symbol)
    }

    #[inline]
    fn outputs(&self, state: StateId) -> &[PatternId] {
        (**self).outputs(state)
    }

    #[inline]
    fn dictionary_link(&self, state: StateId) -> Option<StateId> {
        (**self).dictionary_link(state)
    }

    #[inline]
    fn pattern_len(&self, pattern: PatternId) -> usize {
        (**self).pattern_len(pattern)
    }

    fn pattern_count(&self) -> usize {
        (**self).pattern_count()
    }

    fn state_count(&self) -> usize {
        (**self).state_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_id_limits() {
        assert_eq!(StateId::ROOT.as_usize(), 0);
        assert_eq!(StateId::from_index(7).map(StateId::as_usize), Some(7));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(StateId::from_index(StateId::LIMIT + 1), None);
    }

    #[test]
    fn boxed_automaton_searches() {
        let ac = AhoCorasick::build([b"ab".iter().copied()]).unwrap();
        let boxed: Box<dyn Automaton<u8>> = Box::new(ac);
        let spans: Vec<_> = boxed.find_iter(b"abab".iter().copied()).map(|m| m.span).collect();
        assert_eq!(spans, vec![Span::new(0, 2), Span::new(2, 4)]);
    }

    #[test]
    fn error_messages() {
        let err = BuildError::InvalidSymbol {
            pattern: 2,
            position: 1,
            symbol: "\\xff".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "pattern 2 has symbol \\xff outside the alphabet at position 1"
        );
        let err = BuildError::TableTooLarge {
            states: 10,
            classes: 3,
        };
        assert!(err.to_string().contains("10 states"));
    }
}
