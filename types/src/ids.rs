//! Round, candidate and party identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Small positive integer naming a candidate within one round.
pub type CandidateId = u32;

/// Small positive integer naming a candidate's slate within one round.
pub type PartyNumber = u32;

/// Identifier of an election round. Allocated from 1 upwards, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(u64);

impl RoundId {
    /// The first round ever created.
    pub const FIRST: Self = Self(1);

    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The round that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The round that precedes this one, if any.
    pub fn previous(&self) -> Option<Self> {
        (self.0 > 1).then(|| Self(self.0 - 1))
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_round_has_no_predecessor() {
        assert_eq!(RoundId::FIRST.previous(), None);
        assert_eq!(RoundId::new(2).previous(), Some(RoundId::FIRST));
        assert_eq!(RoundId::FIRST.next(), RoundId::new(2));
    }
}
