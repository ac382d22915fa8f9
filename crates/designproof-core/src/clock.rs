//! Injected time and identifier sources.
//!
//! Timestamps and certificate ids are the only non-deterministic inputs to a
//! certificate. Both come through these traits so tests can pin them.

use time::OffsetDateTime;
use uuid::Uuid;

/// Source of UTC timestamps.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> OffsetDateTime;
}

/// Source of certificate identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.0
    }
}

/// Random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_differ() {
        let ids = RandomIds;
        assert_ne!(ids.next_id(), ids.next_id());
        assert_eq!(ids.next_id().get_version_num(), 4);
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let clock = FixedClock(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(clock.now_utc(), clock.now_utc());
    }
}
