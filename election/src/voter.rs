//! Voter registry: one ballot-eligibility record per account per round.

use ballot_identity::IdentityToken;
use ballot_types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::eligibility::EligibilityRegistry;
use crate::ElectionError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterProfile {
    pub name: String,
    pub age: u32,
    pub region: String,
}

/// A registered voter.
///
/// After registration only `voted` and `token` ever change, exactly once,
/// from `(false, true)` to `(true, false)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub account: AccountId,
    pub registered: bool,
    pub voted: bool,
    /// Single-use voting token.
    pub token: bool,
    pub identity: IdentityToken,
    pub profile: VoterProfile,
    pub registered_at: Timestamp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRegistry {
    voters: BTreeMap<AccountId, Voter>,
    registered: u64,
    cast: u64,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `account` under `identity`.
    ///
    /// `reject_candidate_identities` additionally refuses tokens already
    /// consumed by a candidate of the same round.
    pub fn register(
        &mut self,
        account: &AccountId,
        identity: &str,
        profile: VoterProfile,
        eligibility: &mut EligibilityRegistry,
        reject_candidate_identities: bool,
        now: Timestamp,
    ) -> Result<&Voter, ElectionError> {
        let token = IdentityToken::parse(identity)?;
        if eligibility.is_voter_identity_used(&token)
            || (reject_candidate_identities && eligibility.is_candidate_identity_used(&token))
        {
            return Err(ElectionError::DuplicateIdentity(token.to_string()));
        }
        if self.voters.contains_key(account) {
            return Err(ElectionError::AlreadyRegistered(account.clone()));
        }

        eligibility.mark_voter_identity(token.clone());
        self.registered += 1;
        let voter = Voter {
            account: account.clone(),
            registered: true,
            voted: false,
            token: true,
            identity: token,
            profile,
            registered_at: now,
        };
        Ok(self.voters.entry(account.clone()).or_insert(voter))
    }

    /// Check that `account` may cast a ballot with `identity`. Mutates nothing.
    pub fn check_ballot(&self, account: &AccountId, identity: &str) -> Result<(), ElectionError> {
        let voter = self
            .voters
            .get(account)
            .filter(|v| v.registered)
            .ok_or_else(|| ElectionError::NotRegistered(account.clone()))?;
        if voter.identity.as_str() != identity {
            return Err(ElectionError::IdentityMismatch);
        }
        if voter.voted {
            return Err(ElectionError::AlreadyVoted(account.clone()));
        }
        if !voter.token {
            return Err(ElectionError::NoToken(account.clone()));
        }
        Ok(())
    }

    /// Flip `voted` on and burn the token. Refuses with the same errors as
    /// [`check_ballot`] when the record is absent, has voted, or holds no
    /// token, and then changes nothing.
    ///
    /// [`check_ballot`]: Self::check_ballot
    pub(crate) fn consume_token(&mut self, account: &AccountId) -> Result<(), ElectionError> {
        let voter = self
            .voters
            .get_mut(account)
            .filter(|v| v.registered)
            .ok_or_else(|| ElectionError::NotRegistered(account.clone()))?;
        if voter.voted {
            return Err(ElectionError::AlreadyVoted(account.clone()));
        }
        if !voter.token {
            return Err(ElectionError::NoToken(account.clone()));
        }
        voter.voted = true;
        voter.token = false;
        self.cast += 1;
        Ok(())
    }

    pub fn get(&self, account: &AccountId) -> Option<&Voter> {
        self.voters.get(account)
    }

    pub fn registered_count(&self) -> u64 {
        self.registered
    }

    pub fn cast_count(&self) -> u64 {
        self.cast
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voter> {
        self.voters.values()
    }

    /// Table entries with their keys, for snapshot checks.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&AccountId, &Voter)> {
        self.voters.iter()
    }
}
