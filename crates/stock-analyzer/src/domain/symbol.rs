use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::StockError;

/// Longest accepted ticker, in characters.
pub const MAX_SYMBOL_LEN: usize = 5;

/// Normalized ticker symbol: trimmed, uppercased, 1 to 5 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, StockError> {
        let normalized = input.trim().to_uppercase();
        let len = normalized.chars().count();
        if len == 0 || len > MAX_SYMBOL_LEN {
            return Err(StockError::InvalidSymbol(normalized));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = StockError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
