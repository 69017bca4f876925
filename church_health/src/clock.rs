use std::cell::Cell;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Source of time for a session.
///
/// Timestamps are recorded in a fixed time zone, hence the fixed offset.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Blocks the caller. Used between append attempts.
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> SystemClock {
        SystemClock { offset }
    }

    /// Builds a clock from an offset expressed in hours (+08:00 is `8`).
    pub fn with_offset_hours(hours: i32) -> Option<SystemClock> {
        FixedOffset::east_opt(hours * 3600).map(SystemClock::new)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that only moves when told to. Sleeping advances it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<FixedOffset>>,
    slept: Cell<Duration>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> ManualClock {
        ManualClock {
            current: Cell::new(start),
            slept: Cell::new(Duration::ZERO),
        }
    }

    /// Starts at the given local time, read in the given offset.
    pub fn at(local: NaiveDateTime, offset: FixedOffset) -> Option<ManualClock> {
        offset
            .from_local_datetime(&local)
            .single()
            .map(ManualClock::new)
    }

    pub fn advance(&self, duration: Duration) {
        let step =
            chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        self.current.set(self.current.get() + step);
    }

    /// Total time spent in [`Clock::sleep`].
    pub fn slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.current.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + duration);
        self.advance(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}
