// Lazy automaton: failure links, dictionary links and transitions computed
// on first use and memoized.

use std::fmt;
use std::sync::OnceLock;

use dashmap::DashMap;
use polymatch_core::PatternId;
use tracing::{debug, trace};

use crate::children::{ChildMap, OrderedChildren};
use crate::trie::TrieBuilder;
use crate::{Automaton, StateId, Symbol};

struct LazyNode<S, M> {
    children: M,
    parent: StateId,
    /// Edge label from the parent; `None` only for the root.
    symbol: Option<S>,
    depth: u32,
    outputs: Vec<PatternId>,
    fail: OnceLock<StateId>,
    dictionary: OnceLock<Option<StateId>>,
}

/// An automaton that skips the completion pass.
///
/// Links are resolved the first time a scan needs them and cached, so the
/// automaton is ready immediately and only pays for the states a corpus
/// actually reaches. The resolved links are identical to the ones
/// [`TrieBuilder::complete`] computes eagerly.
///
/// The caches are write-once cells and a concurrent map with
/// insert-if-absent semantics, so scans may share a `LazyAhoCorasick` across
/// threads from the start. Call [`LazyAhoCorasick::warm`] to resolve every
/// link up front instead.
///
/// Link resolution keeps its pending work on the heap, so trie depth is not
/// limited by the thread's stack.
pub struct LazyAhoCorasick<S: Symbol, M = OrderedChildren<S>> {
    nodes: Vec<LazyNode<S, M>>,
    pattern_lens: Vec<usize>,
    transitions: DashMap<(StateId, S), StateId>,
}

impl<S: Symbol, M> fmt::Debug for LazyAhoCorasick<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyAhoCorasick")
            .field("state_count", &self.nodes.len())
            .field("pattern_count", &self.pattern_lens.len())
            .field("cached_transitions", &self.transitions.len())
            .finish()
    }
}

impl<S: Symbol, M: ChildMap<S>> From<TrieBuilder<S, M>> for LazyAhoCorasick<S, M> {
    fn from(builder: TrieBuilder<S, M>) -> Self {
        Self::new(builder)
    }
}

impl<S: Symbol, M: ChildMap<S>> LazyAhoCorasick<S, M> {
    /// Freeze `builder` without computing any links.
    pub fn new(builder: TrieBuilder<S, M>) -> Self {
        let TrieBuilder {
            nodes, pattern_lens, ..
        } = builder;

        let mut parents: Vec<(StateId, Option<S>)> = vec![(StateId::ROOT, None); nodes.len()];
        for (index, node) in nodes.iter().enumerate() {
            // The builder never creates more than `StateId::LIMIT` nodes.
            let parent = StateId(index as u32);
            for (symbol, child) in node.children.edges() {
                parents[child.as_usize()] = (parent, Some(symbol));
            }
        }

        let nodes: Vec<LazyNode<S, M>> = nodes
            .into_iter()
            .zip(parents)
            .map(|(node, (parent, symbol))| {
                // Root and depth-1 links are known without any work.
                let shallow = node.depth <= 1;
                LazyNode {
                    children: node.children,
                    parent,
                    symbol,
                    depth: node.depth,
                    outputs: node.outputs,
                    fail: if shallow {
                        OnceLock::from(StateId::ROOT)
                    } else {
                        OnceLock::new()
                    },
                    dictionary: if shallow {
                        OnceLock::from(None)
                    } else {
                        OnceLock::new()
                    },
                }
            })
            .collect();

        debug!(
            states = nodes.len(),
            patterns = pattern_lens.len(),
            "froze trie for lazy completion"
        );
        Self {
            nodes,
            pattern_lens,
            transitions: DashMap::new(),
        }
    }

    /// Failure link of `state`, resolving it (and any unresolved links it
    /// depends on) on first request.
    pub fn fail_link(&self, state: StateId) -> StateId {
        if let Some(&fail) = self.nodes[state.as_usize()].fail.get() {
            return fail;
        }

        // Every node pushed is strictly shallower than the one below it, and
        // depth-1 links are preset, so the stack is bounded by `depth(state)`.
        let mut stack = vec![state];
        while let Some(&top) = stack.last() {
            let node = &self.nodes[top.as_usize()];
            if node.fail.get().is_some() {
                stack.pop();
                continue;
            }
            let Some(&parent_fail) = self.nodes[node.parent.as_usize()].fail.get() else {
                stack.push(node.parent);
                continue;
            };
            let Some(symbol) = node.symbol else {
                let _ = node.fail.set(StateId::ROOT);
                stack.pop();
                continue;
            };
            match self.walk_resolved(parent_fail, symbol) {
                Ok(target) => {
                    let _ = node.fail.set(target);
                    stack.pop();
                }
                Err(unresolved) => stack.push(unresolved),
            }
        }

        self.nodes[state.as_usize()]
            .fail
            .get()
            .copied()
            .unwrap_or(StateId::ROOT)
    }

    /// Goto from `state` on `symbol` using only links that are already
    /// resolved. Returns the first state on the chain whose failure link is
    /// still missing instead of resolving it.
    fn walk_resolved(&self, state: StateId, symbol: S) -> Result<StateId, StateId> {
        let mut current = state;
        loop {
            let node = &self.nodes[current.as_usize()];
            if let Some(next) = node.children.get(symbol) {
                return Ok(next);
            }
            if current == StateId::ROOT {
                return Ok(StateId::ROOT);
            }
            if let Some(cached) = self.transitions.get(&(current, symbol)).map(|entry| *entry) {
                return Ok(cached);
            }
            match node.fail.get() {
                Some(&fail) => current = fail,
                None => return Err(current),
            }
        }
    }

    /// The goto function, memoizing every transition that needed a failure
    /// walk.
    pub fn step(&self, state: StateId, symbol: S) -> StateId {
        if let Some(next) = self.nodes[state.as_usize()].children.get(symbol) {
            return next;
        }
        if state == StateId::ROOT {
            return StateId::ROOT;
        }
        if let Some(cached) = self.transitions.get(&(state, symbol)).map(|entry| *entry) {
            return cached;
        }

        let mut current = self.fail_link(state);
        let target = loop {
            if let Some(next) = self.nodes[current.as_usize()].children.get(symbol) {
                break next;
            }
            if current == StateId::ROOT {
                break StateId::ROOT;
            }
            if let Some(cached) = self.transitions.get(&(current, symbol)).map(|entry| *entry) {
                break cached;
            }
            current = self.fail_link(current);
        };

        let target = *self.transitions.entry((state, symbol)).or_insert(target);
        trace!(%state, symbol = %symbol.display(), %target, "cached transition");
        target
    }

    fn resolve_dictionary(&self, state: StateId) -> Option<StateId> {
        if let Some(&dictionary) = self.nodes[state.as_usize()].dictionary.get() {
            return dictionary;
        }

        // Nodes on the failure chain up to the first terminal or resolved
        // node all share one dictionary link.
        let mut pending = Vec::new();
        let mut current = state;
        let link = loop {
            if let Some(&dictionary) = self.nodes[current.as_usize()].dictionary.get() {
                break dictionary;
            }
            pending.push(current);
            let fail = self.fail_link(current);
            if !self.nodes[fail.as_usize()].outputs.is_empty() {
                break Some(fail);
            }
            current = fail;
        };

        for &node_id in pending.iter().rev() {
            let _ = self.nodes[node_id.as_usize()].dictionary.set(link);
        }
        link
    }

    /// Resolve every failure and dictionary link now.
    pub fn warm(&self) {
        for index in 0..self.nodes.len() {
            let state = StateId(index as u32);
            self.fail_link(state);
            self.resolve_dictionary(state);
        }
        debug!(states = self.nodes.len(), "resolved all lazy links");
    }

    /// Number of states whose failure link is resolved.
    pub fn resolved_links(&self) -> usize {
        self.nodes.iter().filter(|n| n.fail.get().is_some()).count()
    }

    /// Number of memoized transitions.
    pub fn cached_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Length of the prefix `state` represents.
    pub fn depth(&self, state: StateId) -> usize {
        self.nodes[state.as_usize()].depth as usize
    }
}

impl<S: Symbol, M: ChildMap<S>> Automaton<S> for LazyAhoCorasick<S, M> {
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
        self.resolve_dictionary(state)
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

#[cfg(test)]
mod tests {
    use std::thread;

    use polymatch_core::Match;

    use super::*;
    use crate::AhoCorasick;
    use crate::children::HashedChildren;

    const PATTERNS: [&str; 8] = ["he", "is", "she", "his", "her", "h", "hishera", "azaza"];

    fn builder() -> TrieBuilder<char> {
        let mut builder = TrieBuilder::new();
        builder.extend(PATTERNS.map(str::chars)).unwrap();
        builder
    }

    #[test]
    fn nothing_resolved_before_first_scan() {
        let lazy = LazyAhoCorasick::new(builder());
        // root, "h", "i", "s", "a"
        assert_eq!(lazy.resolved_links(), 5);
        assert_eq!(lazy.cached_transitions(), 0);
    }

    #[test]
    fn links_match_eager_completion() {
        let lazy = LazyAhoCorasick::from(builder());
        let eager = builder().complete();
        lazy.warm();
        assert_eq!(lazy.resolved_links(), lazy.state_count());
        for index in 0..eager.state_count() {
            let state = StateId::from_index(index).unwrap();
            assert_eq!(lazy.fail_link(state), eager.fail_link(state), "fail of {state}");
            assert_eq!(
                lazy.dictionary_link(state),
                eager.dictionary_link(state),
                "dictionary of {state}"
            );
            assert_eq!(lazy.depth(state), eager.depth(state));
        }
    }

    #[test]
    fn scanning_resolves_only_visited_states() {
        let lazy = LazyAhoCorasick::new(builder());
        let found: Vec<Match> = lazy.find_iter("zzzhe".chars()).collect();
        assert_eq!(found.len(), 2);
        assert!(lazy.resolved_links() < lazy.state_count());
    }

    #[test]
    fn transitions_are_memoized() {
        let lazy = LazyAhoCorasick::new(builder());
        let h = lazy.step(StateId::ROOT, 'h');
        let hi = lazy.step(h, 'i');
        // "hi" has no 'z' edge anywhere on its failure chain.
        assert_eq!(lazy.step(hi, 'z'), StateId::ROOT);
        let cached = lazy.cached_transitions();
        assert!(cached >= 1);
        assert_eq!(lazy.step(hi, 'z'), StateId::ROOT);
        assert_eq!(lazy.cached_transitions(), cached);
    }

    #[test]
    fn agrees_with_eager_on_many_corpora() {
        let eager = builder().complete();
        let lazy = LazyAhoCorasick::new(builder());
        for corpus in ["hisher", "", "azazaza", "shishera", "hhhhe", "xyz"] {
            let expected: Vec<Match> = eager.find_iter(corpus.chars()).collect();
            let actual: Vec<Match> = lazy.find_iter(corpus.chars()).collect();
            assert_eq!(actual, expected, "corpus {corpus:?}");
        }
    }

    #[test]
    fn deep_trie_resolves_without_recursion() {
        const DEPTH: usize = 500_000;
        let mut builder = TrieBuilder::<u8>::new();
        builder.insert(std::iter::repeat_n(b'a', DEPTH)).unwrap();
        builder.insert([b'a']).unwrap();
        let lazy = LazyAhoCorasick::new(builder);

        let mut state = StateId::ROOT;
        for _ in 0..DEPTH {
            state = lazy.next_state(state, b'a');
        }
        assert_eq!(lazy.depth(state), DEPTH);

        let single = lazy.step(StateId::ROOT, b'a');
        assert_eq!(lazy.dictionary_link(state), Some(single));
        assert_eq!(lazy.depth(lazy.fail_link(state)), DEPTH - 1);
        assert_eq!(lazy.resolved_links(), lazy.state_count());
    }

    #[test]
    fn deep_failure_chain_across_branches() {
        // "b" followed by a long run of 'a' fails into the all-'a' branch at
        // every level, so resolving the deepest link walks another branch
        // whose links are not resolved yet.
        const DEPTH: usize = 200_000;
        let mut builder = TrieBuilder::<u8>::new();
        builder.insert(std::iter::repeat_n(b'a', DEPTH)).unwrap();
        builder
            .insert(std::iter::once(b'b').chain(std::iter::repeat_n(b'a', DEPTH)))
            .unwrap();
        let lazy = LazyAhoCorasick::new(builder);

        let mut state = lazy.step(StateId::ROOT, b'b');
        for _ in 0..DEPTH {
            state = lazy.step(state, b'a');
        }
        let fail = lazy.fail_link(state);
        assert_eq!(lazy.depth(fail), DEPTH);
        assert_eq!(lazy.outputs(fail).len(), 1);
        assert_eq!(lazy.dictionary_link(state), Some(fail));
    }

    #[test]
    fn concurrent_first_use() {
        let mut hashed = TrieBuilder::<char, HashedChildren<char>>::hashed();
        hashed.extend(PATTERNS.map(str::chars)).unwrap();
        let lazy = LazyAhoCorasick::new(hashed);
        let expected: Vec<Match> = AhoCorasick::build(PATTERNS.map(str::chars))
            .unwrap()
            .find_iter("hishersheazazaza".chars())
            .collect();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| lazy.find_iter("hishersheazazaza".chars()).collect::<Vec<_>>())
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
