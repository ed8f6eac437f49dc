// Alphabet policies: which symbols a pattern may contain.

use std::collections::BTreeSet;
use std::fmt;

use crate::Symbol;

/// A policy deciding which symbols are allowed in patterns.
///
/// The builder checks every symbol of a pattern against its alphabet before
/// touching the trie, so a rejected pattern never leaves partial state behind.
/// Corpus symbols are never validated: a symbol outside the alphabet simply
/// has no trie edge and sends the automaton back toward the root.
pub trait Alphabet<S: Symbol>: Send + Sync {
    /// Returns `true` if `symbol` may appear in a pattern.
    fn contains(&self, symbol: S) -> bool;
}

/// Accepts every symbol. This is the default policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnySymbol;

impl<S: Symbol> Alphabet<S> for AnySymbol {
    #[inline]
    fn contains(&self, _symbol: S) -> bool {
        true
    }
}

/// Accepts 7-bit ASCII only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascii;

impl Alphabet<u8> for Ascii {
    #[inline]
    fn contains(&self, symbol: u8) -> bool {
        symbol.is_ascii()
    }
}

impl Alphabet<char> for Ascii {
    #[inline]
    fn contains(&self, symbol: char) -> bool {
        symbol.is_ascii()
    }
}

/// Accepts symbols in an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRange<S> {
    pub low: S,
    pub high: S,
}

impl<S: Symbol> SymbolRange<S> {
    pub fn new(low: S, high: S) -> Self {
        Self { low, high }
    }
}

impl<S: Symbol> Alphabet<S> for SymbolRange<S> {
    #[inline]
    fn contains(&self, symbol: S) -> bool {
        self.low <= symbol && symbol <= self.high
    }
}

/// Accepts an explicit, finite set of symbols (e.g. `ACGT` for DNA).
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolSet<S> {
    symbols: BTreeSet<S>,
}

impl<S: Symbol> SymbolSet<S> {
    /// Number of distinct symbols in the set.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<S: Symbol> FromIterator<S> for SymbolSet<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl<S: Symbol> fmt::Debug for SymbolSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.symbols.iter().map(|s| s.display()))
            .finish()
    }
}

impl<S: Symbol> Alphabet<S> for SymbolSet<S> {
    #[inline]
    fn contains(&self, symbol: S) -> bool {
        self.symbols.contains(&symbol)
    }
}

/// Wraps a predicate closure as an alphabet policy.
pub struct Predicate<F>(pub F);

impl<S: Symbol, F> Alphabet<S> for Predicate<F>
where
    F: Fn(S) -> bool + Send + Sync,
{
    #[inline]
    fn contains(&self, symbol: S) -> bool {
        (self.0)(symbol)
    }
}
