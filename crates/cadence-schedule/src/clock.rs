use chrono::{DateTime, Utc};

/// Source of "current time" for a [`Scheduler`](crate::Scheduler).
///
/// The engine never reads a system clock directly; queries read the injected
/// clock once per call, which keeps every query a pure function of
/// `(spec, now)` and makes tests deterministic.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
