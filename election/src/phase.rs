//! Phase controller: the per-round state machine.
//!
//! `Setup → Registration → Voting → Closed`. The only legal move is one step
//! forward; there is no rollback.

use ballot_types::{Phase, Timestamp};
use serde::{Deserialize, Serialize};

use crate::ElectionError;

/// A committed phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
    pub at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseController {
    current: Phase,
    history: Vec<PhaseChange>,
}

impl PhaseController {
    pub fn new() -> Self {
        Self {
            current: Phase::Setup,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    /// Fail with `WrongPhase` unless the round is in `required`.
    pub fn require(&self, required: Phase) -> Result<(), ElectionError> {
        if self.current == required {
            Ok(())
        } else {
            Err(ElectionError::WrongPhase {
                required,
                actual: self.current,
            })
        }
    }

    /// Step to `target`, which must be exactly one past the current phase.
    pub fn advance(&mut self, target: Phase, now: Timestamp) -> Result<PhaseChange, ElectionError> {
        self.check_advance(target.as_u8())?;
        let change = PhaseChange {
            from: self.current,
            to: target,
            at: now,
        };
        self.current = target;
        self.history.push(change);
        Ok(change)
    }

    /// Validate a transition to phase number `target` without applying it.
    pub fn check_advance(&self, target: u8) -> Result<(), ElectionError> {
        match self.current.next() {
            Some(next) if next.as_u8() == target => Ok(()),
            _ => Err(ElectionError::InvalidTransition {
                from: self.current,
                to: target,
            }),
        }
    }

    /// Transitions taken so far, oldest first.
    pub fn history(&self) -> &[PhaseChange] {
        &self.history
    }

    /// When the round entered `phase`, if it has.
    pub fn entered_at(&self, phase: Phase) -> Option<Timestamp> {
        self.history.iter().find(|c| c.to == phase).map(|c| c.at)
    }

    /// Rebuild-time sanity check: history must be a gapless walk from Setup.
    pub(crate) fn is_consistent(&self) -> bool {
        let mut expected = Phase::Setup;
        for change in &self.history {
            if change.from != expected || Some(change.to) != expected.next() {
                return false;
            }
            expected = change.to;
        }
        expected == self.current
    }
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}
