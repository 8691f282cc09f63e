//! Caller account identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// An opaque caller account, as presented by the transport layer.
///
/// The core never inspects the contents beyond equality; it only requires
/// the identifier to be non-empty and free of surrounding whitespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier from a raw string.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() || s.trim() != s {
            return Err(TypesError::InvalidAccount(s));
        }
        Ok(Self(s))
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = TypesError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_padded() {
        assert!(AccountId::new("").is_err());
        assert!(AccountId::new(" alice").is_err());
        assert!(AccountId::new("alice\n").is_err());
    }

    #[test]
    fn accepts_plain_identifier() {
        let id = AccountId::try_from("alice").unwrap();
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
    }
}
