//! String interning for identifiers
//!
//! All names in the compiler are interned `Symbol`s; the session owns one
//! `Interner` and hands out cheap copyable keys. `lasso`'s threaded rodeo is
//! already lock-free for concurrent interning, so the handle is just an
//! `Arc` around it.

use lasso::ThreadedRodeo;
use std::sync::Arc;

pub use lasso::Spur as Symbol;

/// Thread-safe string interner shared across a compilation session
#[derive(Clone, Default)]
pub struct Interner {
    rodeo: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Creates an empty interner
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Interns a string, returning its symbol
    pub fn intern(&self, text: &str) -> Symbol {
        self.rodeo.get_or_intern(text)
    }

    /// Resolves a symbol back to its string
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.rodeo.resolve(&sym)
    }

    /// Looks up a string without interning it
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.rodeo.get(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_round_trip() {
        let interner = Interner::new();
        let sym = interner.intern("monitor_enter");
        assert_eq!(interner.resolve(sym), "monitor_enter");
        assert_eq!(interner.intern("monitor_enter"), sym);
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = Interner::new();
        assert!(interner.get("missing").is_none());
        let sym = interner.intern("present");
        assert_eq!(interner.get("present"), Some(sym));
    }
}
