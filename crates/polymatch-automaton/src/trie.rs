// Trie construction: pattern insertion into the node arena.

use std::fmt;

use polymatch_core::alphabet::AnySymbol;
use polymatch_core::{Alphabet, PatternId};
use tracing::debug;

use crate::children::{ChildMap, HashedChildren, OrderedChildren};
use crate::{BuildError, StateId, Symbol};

/// One automaton state: a distinct prefix of some inserted pattern.
///
/// `fail` and `dictionary` are only meaningful after completion; until then
/// they hold the root sentinel and `None`.
pub(crate) struct Node<M> {
    pub(crate) children: M,
    pub(crate) fail: StateId,
    pub(crate) dictionary: Option<StateId>,
    pub(crate) depth: u32,
    pub(crate) outputs: Vec<PatternId>,
}

impl<M: Default> Node<M> {
    fn new(depth: u32) -> Self {
        Self {
            children: M::default(),
            fail: StateId::ROOT,
            dictionary: None,
            depth,
            outputs: Vec::new(),
        }
    }
}

/// Accumulates patterns into a trie.
///
/// The builder is the only type that accepts patterns. Call
/// [`TrieBuilder::complete`] once every pattern is in to obtain a searchable
/// automaton.
pub struct TrieBuilder<S: Symbol, M = OrderedChildren<S>> {
    pub(crate) nodes: Vec<Node<M>>,
    /// Length of every inserted pattern, indexed by `PatternId`.
    pub(crate) pattern_lens: Vec<usize>,
    pub(crate) alphabet: Box<dyn Alphabet<S>>,
}

impl<S: Symbol, M> fmt::Debug for TrieBuilder<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieBuilder")
            .field("state_count", &self.nodes.len())
            .field("pattern_count", &self.pattern_lens.len())
            .finish()
    }
}

impl<S: Symbol> TrieBuilder<S> {
    /// Create a builder with ordered children and no alphabet restriction.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Symbol> TrieBuilder<S, HashedChildren<S>> {
    /// Create a builder with hashed children and no alphabet restriction.
    pub fn hashed() -> Self {
        Self::default()
    }
}

impl<S: Symbol, M: ChildMap<S>> Default for TrieBuilder<S, M> {
    fn default() -> Self {
        Self {
            nodes: vec![Node::new(0)],
            pattern_lens: Vec::new(),
            alphabet: Box::new(AnySymbol),
        }
    }
}

impl<S: Symbol, M: ChildMap<S>> TrieBuilder<S, M> {
    /// Restrict patterns to `alphabet`.
    ///
    /// Only patterns inserted afterwards are checked.
    pub fn alphabet(mut self, alphabet: impl Alphabet<S> + 'static) -> Self {
        self.alphabet = Box::new(alphabet);
        self
    }

    /// Insert one pattern and return its id.
    ///
    /// The pattern is validated against the alphabet before the trie is
    /// touched, so a rejected pattern leaves the builder unchanged.
    ///
    /// An empty pattern is accepted and receives an id, but a zero-length span
    /// is not an occurrence: it is never reported, and the root never becomes
    /// a pattern terminus.
    pub fn insert<P>(&mut self, pattern: P) -> Result<PatternId, BuildError>
    where
        P: IntoIterator<Item = S>,
    {
        let index = self.pattern_lens.len();
        let symbols: Vec<S> = pattern.into_iter().collect();

        if let Some(position) = symbols.iter().position(|&s| !self.alphabet.contains(s)) {
            return Err(BuildError::InvalidSymbol {
                pattern: index,
                position,
                symbol: symbols[position].display(),
            });
        }

        let id = PatternId::new(index).ok_or(BuildError::TooManyPatterns {
            limit: PatternId::MAX,
        })?;

        // Follow the existing path as far as it goes.
        let mut current = StateId::ROOT;
        let mut matched = 0;
        for &symbol in &symbols {
            match self.nodes[current.as_usize()].children.get(symbol) {
                Some(next) => {
                    current = next;
                    matched += 1;
                }
                None => break,
            }
        }

        let missing = symbols.len() - matched;
        if self.nodes.len() + missing > StateId::LIMIT {
            return Err(BuildError::TooManyStates {
                limit: StateId::LIMIT,
            });
        }

        for &symbol in &symbols[matched..] {
            let depth = self.nodes[current.as_usize()].depth + 1;
            let next = StateId::from_index(self.nodes.len()).ok_or(BuildError::TooManyStates {
                limit: StateId::LIMIT,
            })?;
            self.nodes.push(Node::new(depth));
            self.nodes[current.as_usize()].children.insert(symbol, next);
            current = next;
        }

        if !symbols.is_empty() {
            self.nodes[current.as_usize()].outputs.push(id);
        }
        self.pattern_lens.push(symbols.len());
        Ok(id)
    }

    /// Insert every pattern in order, stopping at the first error.
    ///
    /// Patterns inserted before the failing one stay in the builder; use
    /// [`AhoCorasick::build`](crate::AhoCorasick::build) to discard everything
    /// on error.
    pub fn extend<I, P>(&mut self, patterns: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
    {
        for pattern in patterns {
            self.insert(pattern)?;
        }
        debug!(
            states = self.nodes.len(),
            patterns = self.pattern_lens.len(),
            "extended trie"
        );
        Ok(())
    }

    /// Number of patterns inserted so far, empty ones included.
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Number of trie nodes, root included.
    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `pattern` (as a whole) has been inserted.
    pub fn contains<P>(&self, pattern: P) -> bool
    where
        P: IntoIterator<Item = S>,
    {
        let mut current = StateId::ROOT;
        let mut len = 0;
        for symbol in pattern {
            match self.nodes[current.as_usize()].children.get(symbol) {
                Some(next) => current = next,
                None => return false,
            }
            len += 1;
        }
        if len == 0 {
            return self.pattern_lens.contains(&0);
        }
        !self.nodes[current.as_usize()].outputs.is_empty()
    }
}
