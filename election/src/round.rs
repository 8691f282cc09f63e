//! One election round: metadata, phase, registries and used-value sets.
//!
//! A round exclusively owns all of its state; rounds never share tables.
//! Every mutating method consults the phase controller first and validates
//! fully before writing, so a failed call leaves the round untouched.

use ballot_types::{AccountId, CandidateId, PartyNumber, Phase, RoundId, TimeWindow, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::candidate::{Candidate, CandidateInput, CandidateKey, CandidateRegistry};
use crate::config::{ElectionConfig, WindowPolicy};
use crate::eligibility::EligibilityRegistry;
use crate::phase::{PhaseChange, PhaseController};
use crate::voter::{VoterProfile, VoterRegistry};
use crate::ElectionError;

/// Which operation a time window gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Registration,
    Voting,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registration => f.write_str("registration"),
            Self::Voting => f.write_str("voting"),
        }
    }
}

/// Read-only summary of a round for administrators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundMetadata {
    pub id: RoundId,
    pub name: String,
    pub phase: Phase,
    /// Highest candidate id seen; see [`CandidateRegistry`] for why this is
    /// not a live count.
    pub candidate_count: CandidateId,
    pub live_candidates: usize,
    pub registered_voters: u64,
    pub cast_votes: u64,
    pub admin_count: u32,
    pub registration_window: Option<TimeWindow>,
    pub voting_window: Option<TimeWindow>,
    pub created_at: Timestamp,
    pub phase_history: Vec<PhaseChange>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionRound {
    pub(crate) id: RoundId,
    pub(crate) name: String,
    pub(crate) admin_count: u32,
    pub(crate) created_at: Timestamp,
    pub(crate) phase: PhaseController,
    pub(crate) registration_window: Option<TimeWindow>,
    pub(crate) voting_window: Option<TimeWindow>,
    pub(crate) candidates: CandidateRegistry,
    pub(crate) voters: VoterRegistry,
    pub(crate) eligibility: EligibilityRegistry,
}

impl ElectionRound {
    pub(crate) fn new(id: RoundId, name: String, admin_count: u32, now: Timestamp) -> Self {
        Self {
            id,
            name,
            admin_count,
            created_at: now,
            phase: PhaseController::new(),
            registration_window: None,
            voting_window: None,
            candidates: CandidateRegistry::new(),
            voters: VoterRegistry::new(),
            eligibility: EligibilityRegistry::new(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    pub fn phase_controller(&self) -> &PhaseController {
        &self.phase
    }

    pub fn candidates(&self) -> &CandidateRegistry {
        &self.candidates
    }

    pub fn voters(&self) -> &VoterRegistry {
        &self.voters
    }

    pub fn eligibility(&self) -> &EligibilityRegistry {
        &self.eligibility
    }

    pub fn window(&self, kind: WindowKind) -> Option<TimeWindow> {
        match kind {
            WindowKind::Registration => self.registration_window,
            WindowKind::Voting => self.voting_window,
        }
    }

    pub fn metadata(&self) -> RoundMetadata {
        RoundMetadata {
            id: self.id,
            name: self.name.clone(),
            phase: self.phase(),
            candidate_count: self.candidates.max_id(),
            live_candidates: self.candidates.live_count(),
            registered_voters: self.voters.registered_count(),
            cast_votes: self.voters.cast_count(),
            admin_count: self.admin_count,
            registration_window: self.registration_window,
            voting_window: self.voting_window,
            created_at: self.created_at,
            phase_history: self.phase.history().to_vec(),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────────

    pub(crate) fn set_window(
        &mut self,
        kind: WindowKind,
        window: TimeWindow,
    ) -> Result<(), ElectionError> {
        if self.phase().is_terminal() {
            return Err(ElectionError::RoundClosed(self.id));
        }
        match kind {
            WindowKind::Registration => self.registration_window = Some(window),
            WindowKind::Voting => self.voting_window = Some(window),
        }
        Ok(())
    }

    /// Under [`WindowPolicy::Enforced`], `now` must lie inside the window for
    /// `kind`; an unset window rejects everything.
    pub(crate) fn check_window(
        &self,
        kind: WindowKind,
        policy: WindowPolicy,
        now: Timestamp,
    ) -> Result<(), ElectionError> {
        if policy == WindowPolicy::Unchecked {
            return Ok(());
        }
        match self.window(kind) {
            Some(window) if window.contains(now) => Ok(()),
            _ => Err(ElectionError::OutsideWindow {
                kind,
                now: now.as_secs(),
            }),
        }
    }

    pub(crate) fn add_candidate(
        &mut self,
        input: CandidateInput,
        config: &ElectionConfig,
        now: Timestamp,
    ) -> Result<&Candidate, ElectionError> {
        self.phase.require(Phase::Setup)?;
        self.candidates
            .add(input, config, &mut self.eligibility, now)
    }

    pub(crate) fn remove_candidate(
        &mut self,
        id: CandidateId,
        config: &ElectionConfig,
    ) -> Result<Candidate, ElectionError> {
        if !config.allow_candidate_removal {
            return Err(ElectionError::RemovalDisabled);
        }
        self.phase.require(Phase::Setup)?;
        self.candidates.remove(id, &mut self.eligibility)
    }

    pub(crate) fn register_voter(
        &mut self,
        account: &AccountId,
        identity: &str,
        profile: VoterProfile,
        config: &ElectionConfig,
        now: Timestamp,
    ) -> Result<(), ElectionError> {
        self.phase.require(Phase::Registration)?;
        self.check_window(WindowKind::Registration, config.window_policy, now)?;
        self.voters.register(
            account,
            identity,
            profile,
            &mut self.eligibility,
            config.candidate_identity,
            now,
        )?;
        Ok(())
    }

    /// Record one ballot. Returns the candidate id that received it.
    pub(crate) fn cast_vote(
        &mut self,
        account: &AccountId,
        identity: &str,
        key: CandidateKey,
        config: &ElectionConfig,
        now: Timestamp,
    ) -> Result<CandidateId, ElectionError> {
        self.phase.require(Phase::Voting)?;
        self.check_window(WindowKind::Voting, config.window_policy, now)?;
        self.voters.check_ballot(account, identity)?;
        let candidate_id = self.candidates.resolve(key)?;

        self.voters.consume_token(account)?;
        self.candidates.record_vote(candidate_id);
        Ok(candidate_id)
    }

    pub(crate) fn advance(
        &mut self,
        target: Phase,
        now: Timestamp,
    ) -> Result<PhaseChange, ElectionError> {
        self.phase.advance(target, now)
    }

    /// Party number held by candidate `id`, if present.
    pub fn party_of(&self, id: CandidateId) -> Option<PartyNumber> {
        self.candidates.get(id).map(|c| c.party_number)
    }
}
