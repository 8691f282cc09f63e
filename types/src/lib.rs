//! Fundamental types for the ballot workspace.
//!
//! This crate defines the value types shared across every other crate:
//! account identifiers, round/candidate/party identifiers, timestamps and
//! the injected clock, time windows, and the election phase enum.

pub mod account;
pub mod error;
pub mod ids;
pub mod phase;
pub mod time;

pub use account::AccountId;
pub use error::TypesError;
pub use ids::{CandidateId, PartyNumber, RoundId};
pub use phase::Phase;
pub use time::{Clock, SystemClock, TimeWindow, Timestamp};
