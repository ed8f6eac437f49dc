// Diagnostic dump of an automaton's states, edges and links.

use std::fmt;

use crate::automaton::AhoCorasick;
use crate::children::ChildMap;
use crate::{Automaton, StateId, Symbol};

/// Human-readable listing of every state of an [`AhoCorasick`].
///
/// One line per state, in arena order:
///
/// ```text
/// 3 depth=2 fail=1 dict=- out=[0]
///   e -> 4
/// ```
///
/// Edge order follows the children container, so dumps of hashed automata
/// are not stable across runs.
pub struct AutomatonDump<'a, S: Symbol, M> {
    automaton: &'a AhoCorasick<S, M>,
}

impl<'a, S: Symbol, M: ChildMap<S>> AutomatonDump<'a, S, M> {
    pub(crate) fn new(automaton: &'a AhoCorasick<S, M>) -> Self {
        Self { automaton }
    }
}

impl<S: Symbol, M: ChildMap<S>> fmt::Display for AutomatonDump<'_, S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ac = self.automaton;
        for index in 0..ac.state_count() {
            let state = StateId(index as u32);
            write!(
                f,
                "{state} depth={} fail={} dict=",
                ac.depth(state),
                ac.fail_link(state)
            )?;
            match ac.dictionary_link(state) {
                Some(dictionary) => write!(f, "{dictionary}")?,
                None => f.write_str("-")?,
            }
            f.write_str(" out=[")?;
            for (i, pattern) in ac.outputs(state).iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{pattern}")?;
            }
            f.write_str("]\n")?;
            for (symbol, child) in ac.children(state) {
                writeln!(f, "  {} -> {child}", symbol.display())?;
            }
        }
        Ok(())
    }
}
