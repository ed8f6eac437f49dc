// Dense goto table: every (state, symbol class) transition precomputed.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use hashbrown::HashMap;
use polymatch_core::PatternId;
use tracing::debug;

use crate::automaton::AhoCorasick;
use crate::children::{ChildMap, OrderedChildren};
use crate::{Automaton, BuildError, StateId, Symbol};

/// An automaton whose goto function is a precomputed table.
///
/// Only symbols that occur in some pattern get a column (a *symbol class*);
/// every other symbol leads to the root from any state. Each step is one
/// hash lookup for the class plus one table read, with no failure walking,
/// at the cost of `states x classes` table entries.
///
/// Failure and dictionary links are those of the wrapped [`AhoCorasick`].
pub struct DenseAhoCorasick<S: Symbol, M = OrderedChildren<S>> {
    inner: AhoCorasick<S, M>,
    classes: HashMap<S, u32>,
    stride: usize,
    table: Vec<StateId>,
}

impl<S: Symbol, M> fmt::Debug for DenseAhoCorasick<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseAhoCorasick")
            .field("state_count", &self.inner.nodes.len())
            .field("pattern_count", &self.inner.pattern_lens.len())
            .field("classes", &self.stride)
            .finish()
    }
}

impl<S: Symbol, M: ChildMap<S>> DenseAhoCorasick<S, M> {
    /// Precompute the full goto table of a completed automaton.
    ///
    /// Fails with [`BuildError::TableTooLarge`] if the table size overflows.
    pub fn new(inner: AhoCorasick<S, M>) -> Result<Self, BuildError> {
        let symbols: BTreeSet<S> = inner
            .nodes
            .iter()
            .flat_map(|node| node.children.edges().map(|(symbol, _)| symbol))
            .collect();
        let classes: HashMap<S, u32> = symbols
            .iter()
            .enumerate()
            .map(|(class, &symbol)| (symbol, class as u32))
            .collect();

        let states = inner.nodes.len();
        let stride = classes.len();
        let size = states.checked_mul(stride).ok_or(BuildError::TableTooLarge {
            states,
            classes: stride,
        })?;
        let mut table = vec![StateId::ROOT; size];

        // Rows are filled by increasing depth, so the row of a node's failure
        // target is always final before the node's own row is derived from it.
        let mut queue = VecDeque::from([StateId::ROOT]);
        while let Some(state) = queue.pop_front() {
            let row = state.as_usize() * stride;
            let node = &inner.nodes[state.as_usize()];
            if state != StateId::ROOT {
                let fail_row = node.fail.as_usize() * stride;
                table.copy_within(fail_row..fail_row + stride, row);
            }
            for (symbol, child) in node.children.edges() {
                table[row + classes[&symbol] as usize] = child;
                queue.push_back(child);
            }
        }

        debug!(states, classes = stride, entries = size, "built dense goto table");
        Ok(Self {
            inner,
            classes,
            stride,
            table,
        })
    }

    /// Number of symbol classes (table columns).
    pub fn class_count(&self) -> usize {
        self.stride
    }

    /// The wrapped automaton.
    pub fn automaton(&self) -> &AhoCorasick<S, M> {
        &self.inner
    }

    pub fn into_inner(self) -> AhoCorasick<S, M> {
        self.inner
    }
}

impl<S: Symbol, M: ChildMap<S>> TryFrom<AhoCorasick<S, M>> for DenseAhoCorasick<S, M> {
    type Error = BuildError;

    fn try_from(inner: AhoCorasick<S, M>) -> Result<Self, BuildError> {
        Self::new(inner)
    }
}

impl<S: Symbol, M: ChildMap<S>> Automaton<S> for DenseAhoCorasick<S, M> {
    #[inline]
    fn next_state(&self, state: StateId, symbol: S) -> StateId {
        match self.classes.get(&symbol) {
            Some(&class) => self.table[state.as_usize() * self.stride + class as usize],
            None => StateId::ROOT,
        }
    }

    #[inline]
    fn outputs(&self, state: StateId) -> &[PatternId] {
        self.inner.outputs(state)
    }

    #[inline]
    fn dictionary_link(&self, state: StateId) -> Option<StateId> {
        self.inner.dictionary_link(state)
    }

    #[inline]
    fn pattern_len(&self, pattern: PatternId) -> usize {
        self.inner.pattern_len(pattern)
    }

    fn pattern_count(&self) -> usize {
        self.inner.pattern_count()
    }

    fn state_count(&self) -> usize {
        self.inner.state_count()
    }
}
