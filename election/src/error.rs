use ballot_identity::IdentityError;
use ballot_types::{AccountId, CandidateId, Phase, RoundId};
use thiserror::Error;

use crate::candidate::CandidateKey;
use crate::round::WindowKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElectionError {
    // ── Authorization ────────────────────────────────────────────────────
    #[error("account {0} is not an administrator")]
    Unauthorized(AccountId),

    // ── Not found ────────────────────────────────────────────────────────
    #[error("{0} does not exist")]
    RoundNotFound(RoundId),

    #[error("candidate {0} not found")]
    NotFound(CandidateId),

    // ── Phase ────────────────────────────────────────────────────────────
    #[error("operation requires phase {required}, round is in {actual}")]
    WrongPhase { required: Phase, actual: Phase },

    #[error("cannot move from {from} to phase number {to}")]
    InvalidTransition { from: Phase, to: u8 },

    #[error("{kind} window does not contain {now}s")]
    OutsideWindow { kind: WindowKind, now: u64 },

    #[error("time window start {start}s is not before end {end}s")]
    InvalidWindow { start: u64, end: u64 },

    #[error("{0} is closed")]
    RoundClosed(RoundId),

    #[error("{previous} is still open (phase {phase})")]
    PreviousRoundOpen { previous: RoundId, phase: Phase },

    #[error("tally is not available until the round is closed (phase {0})")]
    ElectionNotClosed(Phase),

    // ── Uniqueness ───────────────────────────────────────────────────────
    #[error("candidate id {0} is already in use")]
    DuplicateId(CandidateId),

    #[error("party {0} is already in use")]
    DuplicateParty(String),

    #[error("identity token {0} is already in use")]
    DuplicateIdentity(String),

    // ── Integrity ────────────────────────────────────────────────────────
    #[error("{0}")]
    InvalidRange(String),

    #[error("{0} must not be empty")]
    InvalidName(&'static str),

    #[error("invalid identity token: {0}")]
    InvalidIdentity(#[from] IdentityError),

    #[error("candidate identity token is required")]
    MissingIdentity,

    #[error("identity token does not match the one bound at registration")]
    IdentityMismatch,

    #[error("no candidate for {0}")]
    UnknownCandidate(CandidateKey),

    // ── Voter state ──────────────────────────────────────────────────────
    #[error("account {0} is already registered")]
    AlreadyRegistered(AccountId),

    #[error("account {0} is not registered")]
    NotRegistered(AccountId),

    #[error("account {0} has already voted")]
    AlreadyVoted(AccountId),

    #[error("account {0} has no voting token")]
    NoToken(AccountId),

    // ── Tally ────────────────────────────────────────────────────────────
    #[error("round has no candidates")]
    NoCandidates,

    // ── Setup ────────────────────────────────────────────────────────────
    #[error("candidate removal is disabled")]
    RemovalDisabled,

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}
