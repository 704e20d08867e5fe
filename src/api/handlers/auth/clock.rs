//! Clock boundary for expiry comparisons.
//!
//! Expiry is checked lazily at consumption time, so the only time source the
//! core needs is `now()`. Tests inject a fixed clock to cross the expiry
//! boundary without sleeping.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};
    use chrono::{Duration, Utc};

    #[test]
    fn system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn fixed_clock_never_moves() {
        let frozen = Utc::now() - Duration::hours(2);
        let clock = FixedClock(frozen);
        assert_eq!(clock.now(), frozen);
        assert_eq!(clock.now(), frozen);
    }
}
