//! Per-round used-value sets: party names and identity tokens.

use ballot_identity::IdentityToken;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRegistry {
    /// Case-sensitive exact party names.
    party_names: BTreeSet<String>,
    /// Identities consumed by candidates.
    candidate_identities: BTreeSet<IdentityToken>,
    /// Identities consumed by voter registration.
    voter_identities: BTreeSet<IdentityToken>,
}

impl EligibilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_party_name_used(&self, name: &str) -> bool {
        self.party_names.contains(name)
    }

    pub fn mark_party_name(&mut self, name: &str) {
        self.party_names.insert(name.to_owned());
    }

    /// Free a party name slot for reuse. Returns whether it was held.
    pub fn release_party_name(&mut self, name: &str) -> bool {
        self.party_names.remove(name)
    }

    pub fn is_candidate_identity_used(&self, token: &IdentityToken) -> bool {
        self.candidate_identities.contains(token)
    }

    pub fn mark_candidate_identity(&mut self, token: IdentityToken) {
        self.candidate_identities.insert(token);
    }

    pub fn is_voter_identity_used(&self, token: &IdentityToken) -> bool {
        self.voter_identities.contains(token)
    }

    pub fn mark_voter_identity(&mut self, token: IdentityToken) {
        self.voter_identities.insert(token);
    }

    pub fn party_name_count(&self) -> usize {
        self.party_names.len()
    }

    pub fn voter_identity_count(&self) -> usize {
        self.voter_identities.len()
    }

    pub(crate) fn party_names(&self) -> &BTreeSet<String> {
        &self.party_names
    }

    pub(crate) fn voter_identities(&self) -> &BTreeSet<IdentityToken> {
        &self.voter_identities
    }
}
