//! Election engine: the round manager and the caller-facing surface.
//!
//! Rounds live in an arena indexed by round id. A new round may only be
//! opened once its predecessor is closed. Each operation reads the clock
//! once, checks the caller's capability, locates the round, and delegates to
//! it; every committed change is logged and buffered as an [`ElectionEvent`].

use ballot_types::{AccountId, CandidateId, Clock, PartyNumber, Phase, RoundId, TimeWindow, Timestamp};
use ballot_utils::format_duration;

use crate::admin::AdminSet;
use crate::candidate::{Candidate, CandidateInput, CandidateKey};
use crate::config::ElectionConfig;
use crate::event::ElectionEvent;
use crate::round::{ElectionRound, RoundMetadata, WindowKind};
use crate::tally::{PartyResult, TallyEngine, WinnerResult};
use crate::voter::{Voter, VoterProfile};
use crate::ElectionError;

pub struct ElectionEngine<C: Clock> {
    config: ElectionConfig,
    admins: AdminSet,
    /// Administrator count at initialisation, copied into every round.
    admin_snapshot: u32,
    clock: C,
    rounds: Vec<ElectionRound>,
    pending_events: Vec<ElectionEvent>,
}

impl<C: Clock> ElectionEngine<C> {
    pub fn new(config: ElectionConfig, admins: AdminSet, clock: C) -> Result<Self, ElectionError> {
        config.validate()?;
        let admin_snapshot = u32::try_from(admins.len())
            .map_err(|_| ElectionError::Config("too many administrators".into()))?;
        Ok(Self {
            config,
            admins,
            admin_snapshot,
            clock,
            rounds: Vec::new(),
            pending_events: Vec::new(),
        })
    }

    /// Resume from previously snapshotted rounds.
    ///
    /// Rounds must be numbered `1..=n` in order, every round but the last
    /// must be closed, and stored candidates must fit `config`'s ranges.
    pub fn restore(
        config: ElectionConfig,
        admins: AdminSet,
        clock: C,
        rounds: Vec<ElectionRound>,
    ) -> Result<Self, ElectionError> {
        let mut engine = Self::new(config, admins, clock)?;
        let last = rounds.len();
        for (index, round) in rounds.into_iter().enumerate() {
            let expected = RoundId::new(index as u64 + 1);
            if round.id() != expected {
                return Err(ElectionError::CorruptSnapshot(format!(
                    "expected {expected}, found {}",
                    round.id()
                )));
            }
            if index + 1 < last && !round.phase().is_terminal() {
                return Err(ElectionError::CorruptSnapshot(format!(
                    "{} is open but is not the latest round",
                    round.id()
                )));
            }
            round.check_consistency()?;
            round.check_limits(&engine.config)?;
            engine.rounds.push(round);
        }
        tracing::info!(rounds = engine.rounds.len(), "restored election state");
        Ok(engine)
    }

    // ── Round manager ────────────────────────────────────────────────────

    /// Open the next round in Setup phase.
    pub fn create_round(
        &mut self,
        caller: &AccountId,
        name: &str,
    ) -> Result<RoundId, ElectionError> {
        let now = self.clock.now();
        self.admins.authorize(caller)?;
        if name.trim().is_empty() {
            return Err(ElectionError::InvalidName("round name"));
        }
        if let Some(previous) = self.rounds.last() {
            if !previous.phase().is_terminal() {
                return Err(ElectionError::PreviousRoundOpen {
                    previous: previous.id(),
                    phase: previous.phase(),
                });
            }
        }

        let id = self
            .rounds
            .last()
            .map(|r| r.id().next())
            .unwrap_or(RoundId::FIRST);
        self.rounds.push(ElectionRound::new(
            id,
            name.to_string(),
            self.admin_snapshot,
            now,
        ));

        tracing::info!(round = %id, name, admins = self.admin_snapshot, "round created");
        self.pending_events.push(ElectionEvent::RoundCreated {
            round: id,
            name: name.to_string(),
            admin_count: self.admin_snapshot,
        });
        Ok(id)
    }

    /// Set the registration or voting window of a round that is not closed.
    pub fn set_window(
        &mut self,
        caller: &AccountId,
        round: RoundId,
        kind: WindowKind,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<(), ElectionError> {
        self.admins.authorize(caller)?;
        let window = TimeWindow::new(start, end).map_err(|_| ElectionError::InvalidWindow {
            start: start.as_secs(),
            end: end.as_secs(),
        })?;
        self.round_mut(round)?.set_window(kind, window)?;

        tracing::info!(
            round = %round,
            %kind,
            "window set from {start} for {}",
            format_duration(end.as_secs() - start.as_secs())
        );
        self.pending_events.push(ElectionEvent::WindowSet {
            round,
            kind,
            window,
        });
        Ok(())
    }

    /// Step a round to `target`, which must be exactly one phase ahead.
    pub fn advance_phase(
        &mut self,
        caller: &AccountId,
        round: RoundId,
        target: Phase,
    ) -> Result<(), ElectionError> {
        self.admins.authorize(caller)?;
        self.step_phase(round, target.as_u8())
    }

    /// [`advance_phase`](Self::advance_phase) by raw phase number. Numbers
    /// outside the four phases are an invalid transition.
    pub fn advance_phase_number(
        &mut self,
        caller: &AccountId,
        round: RoundId,
        target: u8,
    ) -> Result<(), ElectionError> {
        self.admins.authorize(caller)?;
        self.step_phase(round, target)
    }

    fn step_phase(&mut self, round: RoundId, target: u8) -> Result<(), ElectionError> {
        let now = self.clock.now();
        let entry = self.round_mut(round)?;
        let from = entry.phase();
        let phase = Phase::try_from(target)
            .map_err(|_| ElectionError::InvalidTransition { from, to: target })?;
        let change = entry.advance(phase, now)?;

        tracing::info!(round = %round, from = %change.from, to = %change.to, "phase changed");
        self.pending_events.push(ElectionEvent::PhaseChanged {
            round,
            from: change.from,
            to: change.to,
        });
        Ok(())
    }

    // ── Candidate registry ───────────────────────────────────────────────

    pub fn add_candidate(
        &mut self,
        caller: &AccountId,
        round: RoundId,
        input: CandidateInput,
    ) -> Result<(), ElectionError> {
        let now = self.clock.now();
        self.admins.authorize(caller)?;
        let config = &self.config;
        let entry = self
            .rounds
            .get_mut(Self::index(round)?)
            .ok_or(ElectionError::RoundNotFound(round))?;
        let candidate = entry.add_candidate(input, config, now)?;
        let (candidate_id, party_number) = (candidate.id, candidate.party_number);

        tracing::debug!(round = %round, candidate_id, party_number, "candidate added");
        self.pending_events.push(ElectionEvent::CandidateAdded {
            round,
            candidate_id,
            party_number,
        });
        Ok(())
    }

    pub fn remove_candidate(
        &mut self,
        caller: &AccountId,
        round: RoundId,
        candidate_id: CandidateId,
    ) -> Result<(), ElectionError> {
        self.admins.authorize(caller)?;
        let config = &self.config;
        let entry = self
            .rounds
            .get_mut(Self::index(round)?)
            .ok_or(ElectionError::RoundNotFound(round))?;
        let removed = entry.remove_candidate(candidate_id, config)?;

        tracing::debug!(
            round = %round,
            candidate_id,
            max_id = entry.candidates().max_id(),
            "candidate removed"
        );
        self.pending_events.push(ElectionEvent::CandidateRemoved {
            round,
            candidate_id: removed.id,
        });
        Ok(())
    }

    pub fn candidate(
        &self,
        round: RoundId,
        candidate_id: CandidateId,
    ) -> Result<&Candidate, ElectionError> {
        self.round(round)?
            .candidates()
            .get(candidate_id)
            .ok_or(ElectionError::NotFound(candidate_id))
    }

    /// Candidates in ascending id order.
    pub fn candidates(&self, round: RoundId) -> Result<Vec<&Candidate>, ElectionError> {
        Ok(self.round(round)?.candidates().iter().collect())
    }

    // ── Voter registry ───────────────────────────────────────────────────

    /// Register the caller as a voter in `round`.
    pub fn register_voter(
        &mut self,
        caller: &AccountId,
        round: RoundId,
        identity: &str,
        profile: VoterProfile,
    ) -> Result<(), ElectionError> {
        let now = self.clock.now();
        let config = &self.config;
        let entry = self
            .rounds
            .get_mut(Self::index(round)?)
            .ok_or(ElectionError::RoundNotFound(round))?;
        entry.register_voter(caller, identity, profile, config, now)?;

        tracing::debug!(round = %round, account = %caller, "voter registered");
        self.pending_events.push(ElectionEvent::VoterRegistered {
            round,
            account: caller.clone(),
        });
        Ok(())
    }

    /// Cast the caller's single ballot in `round`.
    pub fn cast_vote(
        &mut self,
        caller: &AccountId,
        round: RoundId,
        identity: &str,
        candidate: CandidateKey,
    ) -> Result<(), ElectionError> {
        let now = self.clock.now();
        let config = &self.config;
        let entry = self
            .rounds
            .get_mut(Self::index(round)?)
            .ok_or(ElectionError::RoundNotFound(round))?;
        let candidate_id = entry.cast_vote(caller, identity, candidate, config, now)?;

        tracing::debug!(round = %round, account = %caller, candidate_id, "vote cast");
        self.pending_events.push(ElectionEvent::VoteCast {
            round,
            account: caller.clone(),
            candidate_id,
        });
        Ok(())
    }

    pub fn voter(&self, round: RoundId, account: &AccountId) -> Result<Option<&Voter>, ElectionError> {
        Ok(self.round(round)?.voters().get(account))
    }

    // ── Tally ────────────────────────────────────────────────────────────

    pub fn all_party_votes(
        &self,
        round: RoundId,
    ) -> Result<Vec<(PartyNumber, u64)>, ElectionError> {
        TallyEngine.all_party_votes(self.round(round)?)
    }

    pub fn winning_party(&self, round: RoundId) -> Result<PartyResult, ElectionError> {
        TallyEngine.winning_party(self.round(round)?)
    }

    pub fn winner(&self, round: RoundId) -> Result<WinnerResult, ElectionError> {
        TallyEngine.winner(self.round(round)?)
    }

    pub fn total_votes(&self, round: RoundId) -> Result<u64, ElectionError> {
        TallyEngine.total_votes(self.round(round)?)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn phase(&self, round: RoundId) -> Result<Phase, ElectionError> {
        Ok(self.round(round)?.phase())
    }

    /// Full round metadata (administrators only).
    pub fn metadata(
        &self,
        caller: &AccountId,
        round: RoundId,
    ) -> Result<RoundMetadata, ElectionError> {
        self.admins.authorize(caller)?;
        Ok(self.round(round)?.metadata())
    }

    /// Administrator list (administrators only).
    pub fn admins(&self, caller: &AccountId) -> Result<Vec<AccountId>, ElectionError> {
        self.admins.authorize(caller)?;
        Ok(self.admins.list())
    }

    pub fn current_round(&self) -> Option<RoundId> {
        self.rounds.last().map(|r| r.id())
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn round(&self, round: RoundId) -> Result<&ElectionRound, ElectionError> {
        self.rounds
            .get(Self::index(round)?)
            .ok_or(ElectionError::RoundNotFound(round))
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<ElectionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn round_mut(&mut self, round: RoundId) -> Result<&mut ElectionRound, ElectionError> {
        self.rounds
            .get_mut(Self::index(round)?)
            .ok_or(ElectionError::RoundNotFound(round))
    }

    fn index(round: RoundId) -> Result<usize, ElectionError> {
        round
            .get()
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or(ElectionError::RoundNotFound(round))
    }
}
