// Symbol type used to key trie edges and automaton transitions.

use std::fmt::Debug;
use std::hash::Hash;

/// A single input symbol.
///
/// Transitions are keyed by symbols, so a symbol must support equality,
/// a total order (for the ordered children backend) and hashing (for the
/// hashed backend and the lazy transition cache). Symbols are small `Copy`
/// values; a completed automaton is shared across threads, so they must also
/// be `Send + Sync`.
pub trait Symbol: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Render the symbol for diagnostic dumps.
    fn display(self) -> String;
}

impl Symbol for u8 {
    fn display(self) -> String {
        if self.is_ascii_graphic() {
            (self as char).to_string()
        } else {
            format!("\\x{self:02x}")
        }
    }
}

impl Symbol for char {
    fn display(self) -> String {
        self.escape_debug().to_string()
    }
}

impl Symbol for u16 {
    fn display(self) -> String {
        format!("{self:#06x}")
    }
}

impl Symbol for u32 {
    fn display(self) -> String {
        format!("{self:#010x}")
    }
}
