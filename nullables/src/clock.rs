//! Nullable clock: deterministic time for testing.

use ballot_types::{Clock, Timestamp};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, and never moves backwards.
#[derive(Debug)]
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    /// Move the clock forward to `secs`. Earlier values are ignored.
    pub fn set(&self, secs: u64) {
        if secs > self.current.get() {
            self.current.set(secs);
        }
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_when_told() {
        let clock = NullClock::new(100);
        assert_eq!(clock.now(), Timestamp::new(100));
        clock.advance(5);
        assert_eq!(clock.now(), Timestamp::new(105));
    }

    #[test]
    fn set_never_moves_backwards() {
        let clock = NullClock::new(100);
        clock.set(50);
        assert_eq!(clock.now(), Timestamp::new(100));
        clock.set(200);
        assert_eq!(clock.now(), Timestamp::new(200));
    }

    #[test]
    fn shared_reference_is_a_clock() {
        fn read(c: impl Clock) -> Timestamp {
            c.now()
        }
        let clock = NullClock::new(7);
        assert_eq!(read(&clock), Timestamp::new(7));
    }
}
