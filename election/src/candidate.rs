//! Candidate registry.
//!
//! Candidates are keyed by a small positive id. Alongside the table the
//! registry keeps a tracker of the highest id ever added; it doubles as the
//! round's "candidate count" and as the upper bound of the tally scan. The
//! tracker is not a live count: after a removal below the maximum it still
//! reports the maximum, and only a removal of the maximum itself shrinks it
//! (via a rescan of the ids below).

use ballot_identity::IdentityToken;
use ballot_types::{CandidateId, PartyNumber, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{ElectionConfig, PartyNumberPolicy};
use crate::eligibility::EligibilityRegistry;
use crate::ElectionError;

/// How a ballot names the candidate it is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKey {
    Id(CandidateId),
    Party(PartyNumber),
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "candidate id {id}"),
            Self::Party(n) => write!(f, "party number {n}"),
        }
    }
}

/// Caller-supplied description of a new candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInput {
    pub id: CandidateId,
    pub party_number: PartyNumber,
    pub party_name: String,
    pub name: String,
    pub age: u32,
    pub branch: String,
    pub policy: String,
    pub identity: Option<String>,
}

impl CandidateInput {
    pub fn new(
        id: CandidateId,
        party_number: PartyNumber,
        party_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            party_number,
            party_name: party_name.into(),
            name: name.into(),
            age: 0,
            branch: String::new(),
            policy: String::new(),
            identity: None,
        }
    }

    pub fn with_profile(
        mut self,
        age: u32,
        branch: impl Into<String>,
        policy: impl Into<String>,
    ) -> Self {
        self.age = age;
        self.branch = branch.into();
        self.policy = policy.into();
        self
    }

    pub fn with_identity(mut self, token: impl Into<String>) -> Self {
        self.identity = Some(token.into());
        self
    }
}

/// A stored candidate. Only `votes` changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub party_number: PartyNumber,
    pub party_name: String,
    pub name: String,
    pub age: u32,
    pub branch: String,
    pub policy: String,
    pub identity: Option<IdentityToken>,
    pub votes: u64,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRegistry {
    candidates: BTreeMap<CandidateId, Candidate>,
    max_id: CandidateId,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `input` against the round's rules and used-value sets, then
    /// store it. Nothing is written unless every check passes.
    pub fn add(
        &mut self,
        input: CandidateInput,
        config: &ElectionConfig,
        eligibility: &mut EligibilityRegistry,
        now: Timestamp,
    ) -> Result<&Candidate, ElectionError> {
        if input.id == 0 || input.id > config.max_candidate_id {
            return Err(ElectionError::InvalidRange(format!(
                "candidate id {} outside 1..={}",
                input.id, config.max_candidate_id
            )));
        }
        if input.party_number == 0 || input.party_number > config.max_party_number {
            return Err(ElectionError::InvalidRange(format!(
                "party number {} outside 1..={}",
                input.party_number, config.max_party_number
            )));
        }
        if config.party_numbers == PartyNumberPolicy::MatchCandidateId
            && input.party_number != input.id
        {
            return Err(ElectionError::InvalidRange(format!(
                "party number {} must equal candidate id {}",
                input.party_number, input.id
            )));
        }
        if self.candidates.contains_key(&input.id) {
            return Err(ElectionError::DuplicateId(input.id));
        }
        if self.by_party(input.party_number).is_some() {
            return Err(ElectionError::DuplicateParty(format!(
                "number {}",
                input.party_number
            )));
        }
        if input.party_name.is_empty() {
            return Err(ElectionError::InvalidName("party name"));
        }
        if eligibility.is_party_name_used(&input.party_name) {
            return Err(ElectionError::DuplicateParty(format!(
                "name {:?}",
                input.party_name
            )));
        }
        let identity = match input.identity.as_deref() {
            Some(raw) => {
                let token = IdentityToken::parse(raw)?;
                if eligibility.is_candidate_identity_used(&token) {
                    return Err(ElectionError::DuplicateIdentity(token.to_string()));
                }
                Some(token)
            }
            None if config.candidate_identity => return Err(ElectionError::MissingIdentity),
            None => None,
        };

        // Commit.
        eligibility.mark_party_name(&input.party_name);
        if let Some(token) = &identity {
            eligibility.mark_candidate_identity(token.clone());
        }
        self.max_id = self.max_id.max(input.id);
        let candidate = Candidate {
            id: input.id,
            party_number: input.party_number,
            party_name: input.party_name,
            name: input.name,
            age: input.age,
            branch: input.branch,
            policy: input.policy,
            identity,
            votes: 0,
            created_at: now,
        };
        Ok(self.candidates.entry(candidate.id).or_insert(candidate))
    }

    /// Delete a candidate, free its party name, and rescan for the new
    /// maximum id. The candidate's identity token stays consumed.
    pub fn remove(
        &mut self,
        id: CandidateId,
        eligibility: &mut EligibilityRegistry,
    ) -> Result<Candidate, ElectionError> {
        let removed = self
            .candidates
            .remove(&id)
            .ok_or(ElectionError::NotFound(id))?;
        eligibility.release_party_name(&removed.party_name);

        let previous_max = self.max_id;
        let mut max = 0;
        for candidate_id in 1..=previous_max {
            if self.candidates.contains_key(&candidate_id) {
                max = candidate_id;
            }
        }
        self.max_id = max;
        Ok(removed)
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(&id)
    }

    pub fn by_party(&self, party_number: PartyNumber) -> Option<&Candidate> {
        self.candidates
            .values()
            .find(|c| c.party_number == party_number)
    }

    /// Map a ballot's candidate reference to a stored candidate id.
    pub fn resolve(&self, key: CandidateKey) -> Result<CandidateId, ElectionError> {
        let found = match key {
            CandidateKey::Id(id) => self.get(id),
            CandidateKey::Party(n) => self.by_party(n),
        };
        found
            .map(|c| c.id)
            .ok_or(ElectionError::UnknownCandidate(key))
    }

    /// Add one vote. Returns the new count, or `None` if `id` is absent.
    pub(crate) fn record_vote(&mut self, id: CandidateId) -> Option<u64> {
        self.candidates.get_mut(&id).map(|c| {
            c.votes += 1;
            c.votes
        })
    }

    /// Highest id ever added and not since removed-and-rescanned away.
    pub fn max_id(&self) -> CandidateId {
        self.max_id
    }

    /// Number of candidates actually stored.
    pub fn live_count(&self) -> usize {
        self.candidates.len()
    }

    /// Candidates in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CandidateRegistry, EligibilityRegistry, ElectionConfig) {
        (
            CandidateRegistry::new(),
            EligibilityRegistry::new(),
            ElectionConfig::default(),
        )
    }

    #[test]
    fn add_stores_zero_votes_and_timestamp() {
        let (mut reg, mut elig, config) = setup();
        let input = CandidateInput::new(1, 10, "Alpha League", "Alpha")
            .with_profile(44, "north", "more parks");
        let c = reg.add(input, &config, &mut elig, Timestamp::new(7)).unwrap();
        assert_eq!(c.votes, 0);
        assert_eq!(c.created_at, Timestamp::new(7));
        assert_eq!(c.branch, "north");
        assert!(elig.is_party_name_used("Alpha League"));
        assert_eq!(reg.max_id(), 1);
    }

    #[test]
    fn rejects_out_of_range_ids() {
        let (mut reg, mut elig, config) = setup();
        for (id, party) in [(0, 1), (51, 1), (1, 0), (1, 100)] {
            let err = reg
                .add(
                    CandidateInput::new(id, party, "P", "N"),
                    &config,
                    &mut elig,
                    Timestamp::EPOCH,
                )
                .unwrap_err();
            assert!(matches!(err, ElectionError::InvalidRange(_)), "{id}/{party}");
        }
        assert!(reg.is_empty());
        assert_eq!(elig.party_name_count(), 0);
    }

    #[test]
    fn strict_policy_requires_party_equal_to_id() {
        let (mut reg, mut elig, mut config) = setup();
        config.party_numbers = PartyNumberPolicy::MatchCandidateId;
        let err = reg
            .add(CandidateInput::new(2, 3, "P", "N"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidRange(_)));
        assert!(reg
            .add(CandidateInput::new(3, 3, "P", "N"), &config, &mut elig, Timestamp::EPOCH)
            .is_ok());
    }

    #[test]
    fn duplicates_are_rejected_without_side_effects() {
        let (mut reg, mut elig, config) = setup();
        reg.add(CandidateInput::new(1, 10, "Alpha", "A"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();

        let dup_id = reg.add(CandidateInput::new(1, 11, "Beta", "B"), &config, &mut elig, Timestamp::EPOCH);
        assert_eq!(dup_id.unwrap_err(), ElectionError::DuplicateId(1));
        assert!(!elig.is_party_name_used("Beta"));

        let dup_num = reg.add(CandidateInput::new(2, 10, "Beta", "B"), &config, &mut elig, Timestamp::EPOCH);
        assert!(matches!(dup_num, Err(ElectionError::DuplicateParty(_))));

        let dup_name = reg.add(CandidateInput::new(2, 11, "Alpha", "B"), &config, &mut elig, Timestamp::EPOCH);
        assert!(matches!(dup_name, Err(ElectionError::DuplicateParty(_))));

        assert_eq!(reg.live_count(), 1);
        assert_eq!(reg.max_id(), 1);
    }

    #[test]
    fn empty_party_name_is_checked_after_uniqueness() {
        let (mut reg, mut elig, config) = setup();
        reg.add(CandidateInput::new(1, 10, "Alpha", "A"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();

        let dup_id = reg.add(CandidateInput::new(1, 11, "", ""), &config, &mut elig, Timestamp::EPOCH);
        assert_eq!(dup_id.unwrap_err(), ElectionError::DuplicateId(1));
        let dup_num = reg.add(CandidateInput::new(2, 10, "", ""), &config, &mut elig, Timestamp::EPOCH);
        assert!(matches!(dup_num, Err(ElectionError::DuplicateParty(_))));
        let empty = reg.add(CandidateInput::new(2, 11, "", "B"), &config, &mut elig, Timestamp::EPOCH);
        assert_eq!(empty.unwrap_err(), ElectionError::InvalidName("party name"));

        // Candidate names carry no rule of their own.
        let unnamed = reg
            .add(CandidateInput::new(2, 11, "Beta", ""), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();
        assert!(unnamed.name.is_empty());
    }

    #[test]
    fn identity_rules() {
        let (mut reg, mut elig, mut config) = setup();
        config.candidate_identity = true;

        let missing = reg.add(CandidateInput::new(1, 1, "A", "A"), &config, &mut elig, Timestamp::EPOCH);
        assert_eq!(missing.unwrap_err(), ElectionError::MissingIdentity);

        let bad = reg.add(
            CandidateInput::new(1, 1, "A", "A").with_identity("B1234560"),
            &config,
            &mut elig,
            Timestamp::EPOCH,
        );
        assert!(matches!(bad, Err(ElectionError::InvalidIdentity(_))));

        reg.add(
            CandidateInput::new(1, 1, "A", "A").with_identity("B1234569"),
            &config,
            &mut elig,
            Timestamp::EPOCH,
        )
        .unwrap();
        let reused = reg.add(
            CandidateInput::new(2, 2, "B", "B").with_identity("B1234569"),
            &config,
            &mut elig,
            Timestamp::EPOCH,
        );
        assert_eq!(
            reused.unwrap_err(),
            ElectionError::DuplicateIdentity("B1234569".into())
        );
        assert!(!elig.is_party_name_used("B"));
    }

    #[test]
    fn resolve_by_id_or_party() {
        let (mut reg, mut elig, config) = setup();
        reg.add(CandidateInput::new(4, 40, "D", "D"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();
        assert_eq!(reg.resolve(CandidateKey::Id(4)), Ok(4));
        assert_eq!(reg.resolve(CandidateKey::Party(40)), Ok(4));
        assert_eq!(
            reg.resolve(CandidateKey::Party(4)),
            Err(ElectionError::UnknownCandidate(CandidateKey::Party(4)))
        );
    }

    #[test]
    fn removal_frees_party_name_and_rescans_max() {
        let (mut reg, mut elig, config) = setup();
        for id in [1, 3, 5] {
            reg.add(
                CandidateInput::new(id, id * 10, format!("P{id}"), "N"),
                &config,
                &mut elig,
                Timestamp::EPOCH,
            )
            .unwrap();
        }
        assert_eq!(reg.max_id(), 5);

        // Removing below the maximum leaves the tracker untouched.
        reg.remove(3, &mut elig).unwrap();
        assert_eq!(reg.max_id(), 5);
        assert_eq!(reg.live_count(), 2);
        assert!(!elig.is_party_name_used("P3"));

        reg.remove(5, &mut elig).unwrap();
        assert_eq!(reg.max_id(), 1);

        assert_eq!(reg.remove(5, &mut elig).unwrap_err(), ElectionError::NotFound(5));

        reg.remove(1, &mut elig).unwrap();
        assert_eq!(reg.max_id(), 0);
        assert!(reg.is_empty());
    }

    #[test]
    fn readding_lower_id_keeps_higher_tracker() {
        let (mut reg, mut elig, config) = setup();
        reg.add(CandidateInput::new(2, 2, "B", "B"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();
        reg.add(CandidateInput::new(7, 7, "G", "G"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();
        reg.remove(2, &mut elig).unwrap();
        reg.add(CandidateInput::new(1, 2, "B", "B2"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();
        // Two live candidates, tracker still reports 7.
        assert_eq!(reg.live_count(), 2);
        assert_eq!(reg.max_id(), 7);
    }

    #[test]
    fn record_vote_counts_up() {
        let (mut reg, mut elig, config) = setup();
        reg.add(CandidateInput::new(1, 1, "A", "A"), &config, &mut elig, Timestamp::EPOCH)
            .unwrap();
        assert_eq!(reg.record_vote(1), Some(1));
        assert_eq!(reg.record_vote(1), Some(2));
        assert_eq!(reg.record_vote(9), None);
    }
}
