//! Token parsing and validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checksum::checksum_positional;
use crate::error::IdentityError;

/// Exact byte length of a token.
pub const TOKEN_LEN: usize = 8;

/// Allowed category markers at position 0.
pub const CATEGORY_MARKERS: [u8; 3] = [b'A', b'B', b'C'];

/// Check a token and report the first defect found.
///
/// Total over all inputs: never panics, whatever the bytes.
pub fn inspect(bytes: &[u8]) -> Result<(), IdentityError> {
    if bytes.len() != TOKEN_LEN {
        return Err(IdentityError::WrongLength {
            expected: TOKEN_LEN,
            actual: bytes.len(),
        });
    }
    if !CATEGORY_MARKERS.contains(&bytes[0]) {
        return Err(IdentityError::BadCategory(char::from(bytes[0])));
    }

    let mut digits = [0u8; 6];
    for (offset, slot) in digits.iter_mut().enumerate() {
        *slot = digit_at(bytes, offset + 1)?;
    }
    let found = digit_at(bytes, 7)?;

    let expected = checksum_positional(&digits);
    if found != expected {
        return Err(IdentityError::ChecksumMismatch { expected, found });
    }
    Ok(())
}

/// `true` iff `bytes` is a well-formed token with a matching check digit.
pub fn validate_bytes(bytes: &[u8]) -> bool {
    inspect(bytes).is_ok()
}

/// `true` iff `token` is a well-formed token with a matching check digit.
pub fn validate(token: &str) -> bool {
    validate_bytes(token.as_bytes())
}

fn digit_at(bytes: &[u8], position: usize) -> Result<u8, IdentityError> {
    let b = bytes[position];
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(IdentityError::NonDigit { position })
    }
}

/// A token that has passed [`inspect`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        inspect(raw.as_bytes())?;
        Ok(Self(raw.to_owned()))
    }

    /// Build a token from a marker and six digits, appending the check digit.
    pub fn issue(marker: char, digits: [u8; 6]) -> Result<Self, IdentityError> {
        if let Some(offset) = digits.iter().position(|&d| d > 9) {
            return Err(IdentityError::NonDigit { position: offset + 1 });
        }
        let mut raw = String::with_capacity(TOKEN_LEN);
        raw.push(marker);
        raw.extend(digits.iter().map(|&d| char::from(b'0' + d)));
        raw.push(char::from(b'0' + checksum_positional(&digits)));
        Self::parse(&raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn category(&self) -> char {
        char::from(self.0.as_bytes()[0])
    }
}

impl TryFrom<String> for IdentityToken {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        inspect(s.as_bytes())?;
        Ok(Self(s))
    }
}

impl From<IdentityToken> for String {
    fn from(token: IdentityToken) -> Self {
        token.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
