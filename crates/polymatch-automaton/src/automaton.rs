// Completed Aho-Corasick automaton with a fail-walking transition function.

use std::fmt;
use std::marker::PhantomData;

use polymatch_core::{Alphabet, PatternId};

use crate::children::{ChildMap, OrderedChildren};
use crate::dump::AutomatonDump;
use crate::trie::{Node, TrieBuilder};
use crate::{Automaton, BuildError, StateId, Symbol};

/// A completed Aho-Corasick automaton.
///
/// Every node carries its failure and dictionary links; the structure is
/// immutable, so one automaton can serve any number of concurrent scans.
/// Transitions are resolved by walking failure links on a mismatch, which
/// costs amortized O(1) per corpus symbol. See
/// [`DenseAhoCorasick`](crate::DenseAhoCorasick) for a table-driven variant.
pub struct AhoCorasick<S: Symbol, M = OrderedChildren<S>> {
    pub(crate) nodes: Vec<Node<M>>,
    pub(crate) pattern_lens: Vec<usize>,
    pub(crate) alphabet: Box<dyn Alphabet<S>>,
    pub(crate) _symbol: PhantomData<fn() -> S>,
}

impl<S: Symbol, M> fmt::Debug for AhoCorasick<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AhoCorasick")
            .field("state_count", &self.nodes.len())
            .field("pattern_count", &self.pattern_lens.len())
            .finish()
    }
}

impl<S: Symbol> AhoCorasick<S> {
    /// Insert every pattern into a fresh builder and complete it.
    ///
    /// Aborts on the first invalid pattern; no automaton is returned unless
    /// every pattern was accepted. An empty pattern set yields a root-only
    /// automaton that matches nothing.
    pub fn build<I, P>(patterns: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
    {
        let mut builder = TrieBuilder::new();
        builder.extend(patterns)?;
        Ok(builder.complete())
    }
}

impl<S: Symbol, M: ChildMap<S>> AhoCorasick<S, M> {
    /// Reopen the automaton for further insertion.
    ///
    /// Failure and dictionary links are discarded; the returned builder must
    /// be completed again before searching. Pattern ids and the alphabet
    /// policy are preserved.
    pub fn into_builder(self) -> TrieBuilder<S, M> {
        let mut nodes = self.nodes;
        for node in &mut nodes {
            node.fail = StateId::ROOT;
            node.dictionary = None;
        }
        TrieBuilder {
            nodes,
            pattern_lens: self.pattern_lens,
            alphabet: self.alphabet,
        }
    }

    /// The classical goto function: follow the edge on `symbol`, falling back
    /// along failure links until one exists or the root is reached.
    #[inline]
    pub fn step(&self, state: StateId, symbol: S) -> StateId {
        let mut current = state;
        loop {
            let node = &self.nodes[current.as_usize()];
            if let Some(next) = node.children.get(symbol) {
                return next;
            }
            if current == StateId::ROOT {
                return StateId::ROOT;
            }
            current = node.fail;
        }
    }

    /// Direct trie edge from `state` on `symbol`, without failure fallback.
    #[inline]
    pub fn child(&self, state: StateId, symbol: S) -> Option<StateId> {
        self.nodes[state.as_usize()].children.get(symbol)
    }

    /// All direct trie edges out of `state`.
    pub fn children(&self, state: StateId) -> impl Iterator<Item = (S, StateId)> + '_ {
        self.nodes[state.as_usize()].children.edges()
    }

    /// Failure link of `state`. The root links to itself.
    #[inline]
    pub fn fail_link(&self, state: StateId) -> StateId {
        self.nodes[state.as_usize()].fail
    }

    /// Length of the prefix `state` represents.
    #[inline]
    pub fn depth(&self, state: StateId) -> usize {
        self.nodes[state.as_usize()].depth as usize
    }

    /// Length of the longest pattern, or 0 for an empty pattern set.
    pub fn max_pattern_len(&self) -> usize {
        self.pattern_lens.iter().copied().max().unwrap_or(0)
    }

    /// Diagnostic listing of every state and its links.
    pub fn dump(&self) -> AutomatonDump<'_, S, M> {
        AutomatonDump::new(self)
    }
}

impl<S: Symbol, M: ChildMap<S>> Automaton<S> for AhoCorasick<S, M> {
    #[inline]
    fn next_state(&self, state: StateId, symbol: S) -> StateId {
        self.step(state, symbol)
    }

    #[inline]
    fn outputs(&self, state: StateId) -> &[PatternId] {
        &self.nodes[state.as_usize()].outputs
    }

    #[inline]
    fn dictionary_link(&self, state: StateId) -> Option<StateId> {
        self.nodes[state.as_usize()].dictionary
    }

    #[inline]
    fn pattern_len(&self, pattern: PatternId) -> usize {
        self.pattern_lens[pattern.as_usize()]
    }

    fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    fn state_count(&self) -> usize {
        self.nodes.len()
    }
}
