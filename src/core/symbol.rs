//! Ticker symbols
//!
//! Symbols are validated once at the request boundary and normalized to
//! upper case, so "goog" and "GOOG" share one stock record.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub const MAX_LEN: usize = 12;

    /// Parse and normalize a raw ticker
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SymbolError::Empty);
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(SymbolError::TooLong(trimmed.len()));
        }
        if let Some(c) = trimmed.chars().find(|c| !is_symbol_char(*c)) {
            return Err(SymbolError::InvalidChar(c));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[inline(always)]
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("symbol is empty")]
    Empty,
    #[error("symbol is {0} characters long")]
    TooLong(usize),
    #[error("symbol contains invalid character {0:?}")]
    InvalidChar(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(Symbol::parse("goog").unwrap().as_str(), "GOOG");
        assert_eq!(Symbol::parse(" AAPL ").unwrap().as_str(), "AAPL");
        assert_eq!(Symbol::parse("BRK.B").unwrap().as_str(), "BRK.B");
        assert_eq!(Symbol::parse("rds-a").unwrap().as_str(), "RDS-A");
    }

    #[test]
    fn test_symbol_rejects_malformed() {
        assert_eq!(Symbol::parse(""), Err(SymbolError::Empty));
        assert_eq!(Symbol::parse("   "), Err(SymbolError::Empty));
        assert_eq!(Symbol::parse("GOOG/../x"), Err(SymbolError::InvalidChar('/')));
        assert_eq!(Symbol::parse("A B"), Err(SymbolError::InvalidChar(' ')));
        assert_eq!(
            Symbol::parse("ABCDEFGHIJKLM"),
            Err(SymbolError::TooLong(13))
        );
    }

    #[test]
    fn test_symbol_from_str() {
        let symbol: Symbol = "msft".parse().unwrap();
        assert_eq!(symbol.to_string(), "MSFT");
    }
}
