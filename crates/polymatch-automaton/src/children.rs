// Children containers: symbol -> child state mapping for trie nodes.

use std::collections::BTreeMap;

use crate::{StateId, Symbol};

/// Ordered children: deterministic iteration, O(log σ) lookup.
pub type OrderedChildren<S> = BTreeMap<S, StateId>;

/// Hashed children: O(1) amortized lookup, unspecified iteration order.
pub type HashedChildren<S> = hashbrown::HashMap<S, StateId>;

/// Associative container mapping a symbol to a child state.
///
/// The choice of container affects lookup cost and the iteration order seen
/// by diagnostic dumps, never the matches an automaton reports.
pub trait ChildMap<S: Symbol>: Default + Send + Sync {
    /// Child reached on `symbol`, if any.
    fn get(&self, symbol: S) -> Option<StateId>;

    /// Add or replace the edge on `symbol`.
    fn insert(&mut self, symbol: S, child: StateId);

    /// Number of outgoing edges.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All outgoing edges. Order depends on the container.
    fn edges(&self) -> impl Iterator<Item = (S, StateId)> + '_;
}

impl<S: Symbol> ChildMap<S> for BTreeMap<S, StateId> {
    #[inline]
    fn get(&self, symbol: S) -> Option<StateId> {
        BTreeMap::get(self, &symbol).copied()
    }

    #[inline]
    fn insert(&mut self, symbol: S, child: StateId) {
        BTreeMap::insert(self, symbol, child);
    }

    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn edges(&self) -> impl Iterator<Item = (S, StateId)> + '_ {
        self.iter().map(|(&symbol, &child)| (symbol, child))
    }
}

impl<S: Symbol> ChildMap<S> for hashbrown::HashMap<S, StateId> {
    #[inline]
    fn get(&self, symbol: S) -> Option<StateId> {
        hashbrown::HashMap::get(self, &symbol).copied()
    }

    #[inline]
    fn insert(&mut self, symbol: S, child: StateId) {
        hashbrown::HashMap::insert(self, symbol, child);
    }

    #[inline]
    fn len(&self) -> usize {
        hashbrown::HashMap::len(self)
    }

    fn edges(&self) -> impl Iterator<Item = (S, StateId)> + '_ {
        self.iter().map(|(&symbol, &child)| (symbol, child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<M: ChildMap<u8>>() -> Vec<(u8, StateId)> {
        let mut map = M::default();
        assert!(map.is_empty());
        map.insert(b'c', StateId(3));
        map.insert(b'a', StateId(1));
        map.insert(b'b', StateId(2));
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(b'a'), Some(StateId(1)));
        assert_eq!(map.get(b'z'), None);
        map.insert(b'a', StateId(9));
        assert_eq!(map.get(b'a'), Some(StateId(9)));
        let mut edges: Vec<_> = map.edges().collect();
        edges.sort();
        edges
    }

    #[test]
    fn backends_agree() {
        let ordered = exercise::<OrderedChildren<u8>>();
        let hashed = exercise::<HashedChildren<u8>>();
        assert_eq!(ordered, hashed);
        assert_eq!(ordered.len(), 3);
    }

    #[test]
    fn ordered_edges_are_sorted() {
        let mut map = OrderedChildren::<char>::default();
        for (i, c) in "zyx".chars().enumerate() {
            ChildMap::insert(&mut map, c, StateId(i as u32 + 1));
        }
        let symbols: Vec<char> = map.edges().map(|(c, _)| c).collect();
        assert_eq!(symbols, vec!['x', 'y', 'z']);
    }
}
