use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity token must be {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("identity token category marker {0:?} is not one of A, B, C")]
    BadCategory(char),

    #[error("identity token has a non-digit at position {position}")]
    NonDigit { position: usize },

    #[error("identity token check digit is {found}, expected {expected}")]
    ChecksumMismatch { expected: u8, found: u8 },
}
