//! Errors raised while constructing shared value types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account identifier: {0:?}")]
    InvalidAccount(String),

    #[error("phase number {0} is out of range (0..=3)")]
    InvalidPhase(u8),

    #[error("time window start {start} is not before end {end}")]
    InvalidWindow { start: u64, end: u64 },
}
