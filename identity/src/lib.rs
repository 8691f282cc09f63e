//! Identity tokens for voters and candidates.
//!
//! A token is exactly 8 ASCII characters:
//!
//! ```text
//!   B 1 2 3 4 5 6 9
//!   │ └────┬────┘ └─ check digit = weighted sum of the six digits mod 10
//!   │      └────── six payload digits (positions 1..=6)
//!   └───────────── category marker, one of `A`, `B`, `C`
//! ```
//!
//! The checksum is an offline self-check, not identity proofing.

pub mod checksum;
pub mod error;
pub mod token;

pub use checksum::{checksum_parity, checksum_positional, EVEN_WEIGHT, ODD_WEIGHT};
pub use error::IdentityError;
pub use token::{inspect, validate, validate_bytes, IdentityToken, CATEGORY_MARKERS, TOKEN_LEN};
