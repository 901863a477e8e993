//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// An on-chain account address (SS58 text form).
///
/// The accounting core never decodes the address; it is only compared,
/// ordered and displayed. Ordering is lexicographic so maps keyed by address
/// iterate deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create an address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty or contains whitespace. Use
    /// [`Address::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(address) => address,
            Err(e) => panic!("{e}"),
        }
    }

    /// Validate and wrap a raw address string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines and tables, e.g. `5Grw…utQY`.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}\u{2026}{tail}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("5Grw utQY").is_err());
        assert!(Address::parse("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY").is_ok());
    }

    #[test]
    fn short_form_keeps_head_and_tail() {
        let a = Address::new("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert_eq!(a.short(), "5Grw\u{2026}utQY");
        assert_eq!(Address::new("alice").short(), "alice");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Address, _> = serde_json::from_str("\"alice\"");
        assert_eq!(ok.unwrap(), Address::new("alice"));
        let bad: Result<Address, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
