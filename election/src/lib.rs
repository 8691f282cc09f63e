//! Round-based elections.
//!
//! An administrator opens a round, adds candidates during Setup, and steps
//! the round through Registration, Voting and Closed. Voters register one
//! self-checking identity token per round and cast exactly one ballot. Once a
//! round is closed the tally engine reports per-party counts and the
//! plurality winner (ties go to the lowest candidate id).
//!
//! Invariants held against any caller:
//! - candidate ids, party numbers and party names are unique per round;
//! - an identity token registers at most once per round;
//! - a voter casts at most one ballot;
//! - phases only move forward, one step at a time;
//! - round N+1 cannot open while round N is open.
//!
//! Every operation validates fully before it writes; a rejected call has no
//! observable effect.

pub mod admin;
pub mod candidate;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod event;
pub mod phase;
pub mod round;
pub mod snapshot;
pub mod tally;
pub mod voter;

pub use admin::AdminSet;
pub use candidate::{Candidate, CandidateInput, CandidateKey, CandidateRegistry};
pub use config::{ElectionConfig, PartyNumberPolicy, WindowPolicy};
pub use eligibility::EligibilityRegistry;
pub use engine::ElectionEngine;
pub use error::ElectionError;
pub use event::ElectionEvent;
pub use phase::{PhaseChange, PhaseController};
pub use round::{ElectionRound, RoundMetadata, WindowKind};
pub use tally::{PartyResult, TallyEngine, WinnerResult};
pub use voter::{Voter, VoterProfile, VoterRegistry};
