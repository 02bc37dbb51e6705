//! Working set of one interactive session

use crate::domain::{StockSnapshot, Symbol};
use crate::error::{Result, StockError};

/// Requested symbols in insertion order, and the snapshots built so far
#[derive(Debug, Default)]
pub struct SessionState {
    symbols: Vec<Symbol>,
    snapshots: Vec<StockSnapshot>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol to the working set.
    ///
    /// Duplicates are detected before the format check, so re-entering an
    /// accepted symbol in another case always reports a duplicate.
    pub fn add_symbol(&mut self, raw: &str) -> Result<&Symbol> {
        let normalized = raw.trim().to_uppercase();
        if self.symbols.iter().any(|s| s.as_str() == normalized) {
            return Err(StockError::DuplicateSymbol(normalized));
        }

        let symbol = Symbol::parse(&normalized)?;
        self.symbols.push(symbol);
        Ok(&self.symbols[self.symbols.len() - 1])
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn record_snapshot(&mut self, snapshot: StockSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[StockSnapshot] {
        &self.snapshots
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_each_symbol_once() {
        let mut state = SessionState::new();
        assert_eq!(state.add_symbol("AAPL").unwrap().as_str(), "AAPL");

        let err = state.add_symbol("aapl").unwrap_err();
        assert!(matches!(err, StockError::DuplicateSymbol(ref s) if s == "AAPL"));

        state.add_symbol("msft").unwrap();
        let symbols: Vec<&str> = state.symbols().iter().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_rejects_bad_length_without_changes() {
        let mut state = SessionState::new();
        state.add_symbol("IBM").unwrap();

        for raw in ["", "TOOLONGSYM", "ABCDEF"] {
            let err = state.add_symbol(raw).unwrap_err();
            assert!(matches!(err, StockError::InvalidSymbol(_)));
        }
        assert_eq!(state.symbols().len(), 1);
    }

    #[test]
    fn test_starts_empty() {
        let state = SessionState::new();
        assert!(state.is_empty());
        assert!(state.snapshots().is_empty());
    }
}
