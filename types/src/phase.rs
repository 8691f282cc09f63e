//! The four election phases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Phase of an election round. Strictly ordered, no cycle, no rollback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    /// Candidates are being added.
    Setup = 0,
    /// Voters register their identity tokens.
    Registration = 1,
    /// Registered voters cast their single ballot.
    Voting = 2,
    /// Terminal. Tally queries become legal.
    Closed = 3,
}

impl Phase {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The phase reachable from this one, or `None` for the terminal phase.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Setup => Some(Self::Registration),
            Self::Registration => Some(Self::Voting),
            Self::Voting => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Registration => "registration",
            Self::Voting => "voting",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<u8> for Phase {
    type Error = TypesError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::Setup),
            1 => Ok(Self::Registration),
            2 => Ok(Self::Voting),
            3 => Ok(Self::Closed),
            other => Err(TypesError::InvalidPhase(other)),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_steps_by_one() {
        let mut phase = Phase::Setup;
        let mut seen = vec![phase.as_u8()];
        while let Some(next) = phase.next() {
            phase = next;
            seen.push(phase.as_u8());
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(phase.is_terminal());
    }

    #[test]
    fn out_of_range_number_is_rejected() {
        assert_eq!(Phase::try_from(4), Err(TypesError::InvalidPhase(4)));
        assert_eq!(Phase::try_from(2), Ok(Phase::Voting));
    }
}
