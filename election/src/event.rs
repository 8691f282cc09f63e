//! Notifications emitted by committed operations.
//!
//! Events are buffered on the engine and handed to external observers via
//! `ElectionEngine::drain_events`. Nothing in the core depends on delivery.

use ballot_types::{AccountId, CandidateId, PartyNumber, Phase, RoundId, TimeWindow};
use serde::{Deserialize, Serialize};

use crate::round::WindowKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionEvent {
    RoundCreated {
        round: RoundId,
        name: String,
        admin_count: u32,
    },
    WindowSet {
        round: RoundId,
        kind: WindowKind,
        window: TimeWindow,
    },
    CandidateAdded {
        round: RoundId,
        candidate_id: CandidateId,
        party_number: PartyNumber,
    },
    CandidateRemoved {
        round: RoundId,
        candidate_id: CandidateId,
    },
    VoterRegistered {
        round: RoundId,
        account: AccountId,
    },
    VoteCast {
        round: RoundId,
        account: AccountId,
        candidate_id: CandidateId,
    },
    PhaseChanged {
        round: RoundId,
        from: Phase,
        to: Phase,
    },
}

impl ElectionEvent {
    /// The round every event is scoped to.
    pub fn round(&self) -> RoundId {
        match self {
            Self::RoundCreated { round, .. }
            | Self::WindowSet { round, .. }
            | Self::CandidateAdded { round, .. }
            | Self::CandidateRemoved { round, .. }
            | Self::VoterRegistered { round, .. }
            | Self::VoteCast { round, .. }
            | Self::PhaseChanged { round, .. } => *round,
        }
    }
}
