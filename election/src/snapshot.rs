//! Binary snapshots of a single round.
//!
//! Layout (logical): metadata, phase history, id-keyed candidate table,
//! account-keyed voter table, and the round's used-value sets, encoded with
//! `bincode`. Decoding re-checks the counters and the used-value sets against
//! the tables, so a tampered or truncated snapshot is refused rather than
//! resumed. [`ElectionRound::check_limits`] additionally holds a decoded
//! round to the ranges of the configuration it is resumed under.

use std::collections::BTreeSet;

use crate::config::{ElectionConfig, PartyNumberPolicy};
use crate::round::ElectionRound;
use crate::ElectionError;

impl ElectionRound {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ElectionError> {
        bincode::serialize(self).map_err(|e| ElectionError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ElectionError> {
        let round: Self =
            bincode::deserialize(bytes).map_err(|e| ElectionError::Serialization(e.to_string()))?;
        round.check_consistency()?;
        Ok(round)
    }

    fn corrupt(&self, what: String) -> ElectionError {
        ElectionError::CorruptSnapshot(format!("{}: {what}", self.id))
    }

    pub(crate) fn check_consistency(&self) -> Result<(), ElectionError> {
        if !self.phase.is_consistent() {
            return Err(self.corrupt("phase history does not walk forward from setup".into()));
        }
        self.check_candidates()?;
        self.check_voters()?;

        let voted = self.voters.iter().filter(|v| v.voted).count() as u64;
        let tallied: u64 = self.candidates.iter().map(|c| c.votes).sum();
        if voted != self.voters.cast_count() || tallied != voted {
            return Err(self.corrupt(format!(
                "{voted} voters marked voted, {} cast, {tallied} tallied",
                self.voters.cast_count()
            )));
        }
        Ok(())
    }

    /// The tracker equals the highest stored id, party numbers and names are
    /// unique, the name set matches the table exactly, and every candidate
    /// identity is recorded as consumed.
    fn check_candidates(&self) -> Result<(), ElectionError> {
        let highest = self.candidates.iter().map(|c| c.id).max().unwrap_or(0);
        if highest != self.candidates.max_id() {
            return Err(self.corrupt(format!(
                "tracked maximum {} but highest candidate is {highest}",
                self.candidates.max_id()
            )));
        }

        let mut numbers = BTreeSet::new();
        let mut names = BTreeSet::new();
        for c in self.candidates.iter() {
            if c.id == 0 {
                return Err(self.corrupt("candidate id 0".into()));
            }
            if !numbers.insert(c.party_number) {
                return Err(self.corrupt(format!("party number {} held twice", c.party_number)));
            }
            if !names.insert(c.party_name.clone()) {
                return Err(self.corrupt(format!("party name {:?} held twice", c.party_name)));
            }
            if let Some(token) = &c.identity {
                if !self.eligibility.is_candidate_identity_used(token) {
                    return Err(self.corrupt(format!(
                        "candidate {} identity {token} not marked used",
                        c.id
                    )));
                }
            }
        }
        if &names != self.eligibility.party_names() {
            return Err(self.corrupt("used party names do not match the candidate table".into()));
        }
        Ok(())
    }

    /// Every record is keyed by its own account, is registered, holds its
    /// token exactly until it votes, and uses an identity no other record
    /// uses; the identity set matches the table exactly.
    fn check_voters(&self) -> Result<(), ElectionError> {
        let mut identities = BTreeSet::new();
        let mut records = 0u64;
        for (key, voter) in self.voters.entries() {
            records += 1;
            if key != &voter.account {
                return Err(self.corrupt(format!(
                    "voter record {} stored under {key}",
                    voter.account
                )));
            }
            if !voter.registered || voter.token == voter.voted {
                return Err(self.corrupt(format!("voter {key} has an impossible state")));
            }
            if !identities.insert(voter.identity.clone()) {
                return Err(self.corrupt(format!("identity {} held twice", voter.identity)));
            }
        }
        if records != self.voters.registered_count() {
            return Err(self.corrupt(format!(
                "{records} voter records but {} registrations",
                self.voters.registered_count()
            )));
        }
        if &identities != self.eligibility.voter_identities() {
            return Err(self.corrupt("used voter identities do not match the voter table".into()));
        }
        Ok(())
    }

    /// Hold stored candidates to the id and party-number ranges of `config`
    /// and to its party-number policy.
    pub(crate) fn check_limits(&self, config: &ElectionConfig) -> Result<(), ElectionError> {
        if self.candidates.max_id() > config.max_candidate_id {
            return Err(self.corrupt(format!(
                "tracked maximum {} above configured {}",
                self.candidates.max_id(),
                config.max_candidate_id
            )));
        }
        for c in self.candidates.iter() {
            if c.party_number == 0 || c.party_number > config.max_party_number {
                return Err(self.corrupt(format!(
                    "candidate {} party number {} outside 1..={}",
                    c.id, c.party_number, config.max_party_number
                )));
            }
            if config.party_numbers == PartyNumberPolicy::MatchCandidateId
                && c.party_number != c.id
            {
                return Err(self.corrupt(format!(
                    "candidate {} holds party number {}",
                    c.id, c.party_number
                )));
            }
        }
        Ok(())
    }
}
