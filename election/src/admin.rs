//! Administrator role set.
//!
//! Authorisation is an explicit membership check against a fixed set of
//! accounts, kept apart from election state.

use ballot_types::AccountId;
use std::collections::BTreeSet;

use crate::ElectionError;

/// Accounts allowed to run administrator-only operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSet {
    members: BTreeSet<AccountId>,
}

impl AdminSet {
    /// Build the set. At least one administrator is required.
    pub fn new(members: impl IntoIterator<Item = AccountId>) -> Result<Self, ElectionError> {
        let members: BTreeSet<AccountId> = members.into_iter().collect();
        if members.is_empty() {
            return Err(ElectionError::Config(
                "at least one administrator is required".into(),
            ));
        }
        Ok(Self { members })
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.members.contains(account)
    }

    /// Fail with `Unauthorized` unless `caller` is an administrator.
    pub fn authorize(&self, caller: &AccountId) -> Result<(), ElectionError> {
        if self.contains(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "rejected administrator operation");
            Err(ElectionError::Unauthorized(caller.clone()))
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Administrators in ascending order.
    pub fn list(&self) -> Vec<AccountId> {
        self.members.iter().cloned().collect()
    }
}
