// Automaton completion: breadth-first failure and dictionary link computation.

use std::collections::VecDeque;
use std::marker::PhantomData;

use tracing::debug;

use crate::automaton::AhoCorasick;
use crate::children::ChildMap;
use crate::trie::{Node, TrieBuilder};
use crate::{StateId, Symbol};

impl<S: Symbol, M: ChildMap<S>> TrieBuilder<S, M> {
    /// Compute every failure and dictionary link and freeze the trie.
    ///
    /// Consumes the builder: the returned automaton can search but accepts no
    /// more patterns. To add patterns later, reopen it with
    /// [`AhoCorasick::into_builder`], which discards the links and requires a
    /// new completion.
    pub fn complete(mut self) -> AhoCorasick<S, M> {
        compute_links::<S, M>(&mut self.nodes);
        debug!(
            states = self.nodes.len(),
            patterns = self.pattern_lens.len(),
            "completed automaton"
        );
        AhoCorasick {
            nodes: self.nodes,
            pattern_lens: self.pattern_lens,
            alphabet: self.alphabet,
            _symbol: PhantomData,
        }
    }
}

/// Fill in `fail` and `dictionary` for every node, in breadth-first order.
///
/// Visiting nodes by increasing depth guarantees that when a node's links are
/// computed, the links of every shallower node (in particular its parent's
/// whole failure chain) are already final.
pub(crate) fn compute_links<S: Symbol, M: ChildMap<S>>(nodes: &mut [Node<M>]) {
    let mut queue = VecDeque::new();

    nodes[StateId::ROOT.as_usize()].fail = StateId::ROOT;
    nodes[StateId::ROOT.as_usize()].dictionary = None;

    // Depth-1 nodes have no proper suffix but the empty one.
    let first_level: Vec<StateId> = nodes[StateId::ROOT.as_usize()]
        .children
        .edges()
        .map(|(_, child)| child)
        .collect();
    for child in first_level {
        let node = &mut nodes[child.as_usize()];
        node.fail = StateId::ROOT;
        node.dictionary = None;
        queue.push_back(child);
    }

    let mut edges: Vec<(S, StateId)> = Vec::new();
    while let Some(parent) = queue.pop_front() {
        edges.clear();
        edges.extend(nodes[parent.as_usize()].children.edges());

        for &(symbol, child) in &edges {
            let fail = resolve_fail(nodes, nodes[parent.as_usize()].fail, symbol);
            let dictionary = if nodes[fail.as_usize()].outputs.is_empty() {
                nodes[fail.as_usize()].dictionary
            } else {
                Some(fail)
            };

            let node = &mut nodes[child.as_usize()];
            node.fail = fail;
            node.dictionary = dictionary;
            queue.push_back(child);
        }
    }
}

/// Walk the failure chain from `start` until a node with an edge on `symbol`
/// is found, and return that edge's target (root if the chain runs out).
fn resolve_fail<S: Symbol, M: ChildMap<S>>(nodes: &[Node<M>], start: StateId, symbol: S) -> StateId {
    let mut current = start;
    loop {
        let node = &nodes[current.as_usize()];
        if let Some(next) = node.children.get(symbol) {
            return next;
        }
        if current == StateId::ROOT {
            return StateId::ROOT;
        }
        current = node.fail;
    }
}
