// Streaming matcher: drives an automaton over a corpus and reports matches.
//
// Every scan owns its own current state, so any number of scans can share
// one automaton. Matches come out in increasing end position. For one end
// position, the outputs of the current state come first, then the
// dictionary chain toward the root; callers should not rely on that order.

use std::fmt;
use std::marker::PhantomData;

use polymatch_core::Match;

use crate::{Automaton, StateId, Symbol};

/// Enumerates the matches ending at one corpus position: the outputs of the
/// reached state, then the outputs of each node on its dictionary chain.
#[derive(Debug, Clone, Copy)]
struct Emissions {
    node: Option<StateId>,
    index: usize,
    end: usize,
}

impl Emissions {
    const EXHAUSTED: Emissions = Emissions {
        node: None,
        index: 0,
        end: 0,
    };

    fn at(state: StateId, end: usize) -> Self {
        Self {
            node: Some(state),
            index: 0,
            end,
        }
    }

    #[inline]
    fn next<S: Symbol, A: Automaton<S> + ?Sized>(&mut self, automaton: &A) -> Option<Match> {
        while let Some(node) = self.node {
            if let Some(&pattern) = automaton.outputs(node).get(self.index) {
                self.index += 1;
                let len = automaton.pattern_len(pattern);
                return Some(Match::new(pattern, self.end - len, self.end));
            }
            self.node = automaton.dictionary_link(node);
            self.index = 0;
        }
        None
    }
}

/// Scan `corpus` from the root state, passing every match to `on_match`.
///
/// Returns `false` as soon as `on_match` does, `true` once the corpus is
/// exhausted.
pub fn find_matches<S, A, I, F>(automaton: &A, corpus: I, mut on_match: F) -> bool
where
    S: Symbol,
    A: Automaton<S> + ?Sized,
    I: IntoIterator<Item = S>,
    F: FnMut(Match) -> bool,
{
    let mut state = StateId::ROOT;
    for (position, symbol) in corpus.into_iter().enumerate() {
        state = automaton.next_state(state, symbol);
        let mut emissions = Emissions::at(state, position + 1);
        while let Some(m) = emissions.next(automaton) {
            if !on_match(m) {
                return false;
            }
        }
    }
    true
}

// ---------------------------------------------------------------------------
// FindIter
// ---------------------------------------------------------------------------

/// Iterator over all matches of an automaton in a corpus.
///
/// Consumes corpus symbols only as far as needed to produce the next match,
/// so it works on unbounded symbol streams. Dropping the iterator is the
/// equivalent of aborting a callback scan.
pub struct FindIter<'a, S, A: ?Sized, I> {
    automaton: &'a A,
    symbols: I,
    state: StateId,
    position: usize,
    pending: Emissions,
    _symbol: PhantomData<fn() -> S>,
}

impl<'a, S, A, I> FindIter<'a, S, A, I>
where
    S: Symbol,
    A: Automaton<S> + ?Sized,
    I: Iterator<Item = S>,
{
    pub fn new(automaton: &'a A, symbols: I) -> Self {
        Self {
            automaton,
            symbols,
            state: StateId::ROOT,
            position: 0,
            pending: Emissions::EXHAUSTED,
            _symbol: PhantomData,
        }
    }

    /// Number of corpus symbols consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<S, A, I> Iterator for FindIter<'_, S, A, I>
where
    S: Symbol,
    A: Automaton<S> + ?Sized,
    I: Iterator<Item = S>,
{
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some(m) = self.pending.next(self.automaton) {
                return Some(m);
            }
            let symbol = self.symbols.next()?;
            self.state = self.automaton.next_state(self.state, symbol);
            self.position += 1;
            self.pending = Emissions::at(self.state, self.position);
        }
    }
}

impl<S, A: ?Sized, I> fmt::Debug for FindIter<'_, S, A, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindIter")
            .field("state", &self.state)
            .field("position", &self.position)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// StreamSearcher
// ---------------------------------------------------------------------------

/// Chunked scan whose state and positions carry over between chunks.
///
/// Matches spanning a chunk boundary are reported when the chunk holding
/// their last symbol is fed. Once a callback returns `false` the searcher is
/// aborted: further feeds report nothing until [`StreamSearcher::reset`].
pub struct StreamSearcher<'a, S, A: ?Sized> {
    automaton: &'a A,
    state: StateId,
    position: usize,
    aborted: bool,
    _symbol: PhantomData<fn() -> S>,
}

impl<'a, S, A> StreamSearcher<'a, S, A>
where
    S: Symbol,
    A: Automaton<S> + ?Sized,
{
    pub fn new(automaton: &'a A) -> Self {
        Self {
            automaton,
            state: StateId::ROOT,
            position: 0,
            aborted: false,
            _symbol: PhantomData,
        }
    }

    /// Scan the next chunk of the corpus.
    ///
    /// Match positions are relative to the start of the whole stream.
    /// Returns `false` if the scan is (or becomes) aborted.
    pub fn feed<I, F>(&mut self, chunk: I, mut on_match: F) -> bool
    where
        I: IntoIterator<Item = S>,
        F: FnMut(Match) -> bool,
    {
        if self.aborted {
            return false;
        }
        for symbol in chunk {
            self.state = self.automaton.next_state(self.state, symbol);
            self.position += 1;
            let mut emissions = Emissions::at(self.state, self.position);
            while let Some(m) = emissions.next(self.automaton) {
                if !on_match(m) {
                    self.aborted = true;
                    return false;
                }
            }
        }
        true
    }

    /// Symbols consumed since the start (or the last reset).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current automaton state.
    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Return to the root state at position 0, clearing any abort.
    pub fn reset(&mut self) {
        self.state = StateId::ROOT;
        self.position = 0;
        self.aborted = false;
    }
}

impl<S, A: ?Sized> fmt::Debug for StreamSearcher<'_, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSearcher")
            .field("state", &self.state)
            .field("position", &self.position)
            .field("aborted", &self.aborted)
            .finish()
    }
}
