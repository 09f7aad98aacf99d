//! Occurrence-enumeration engine for recurring calendar events.
//!
//! A [`ScheduleSpec`] captures an abstract recurrence rule — one-time,
//! daily, weekly, monthly, or yearly, with optional intervals, explicit
//! weekday/day/month sets, or relative day selection ("the last weekday",
//! "the first Friday") — and answers, relative to a caller-supplied moment:
//! what is the next or previous occurrence, and what are the N most recent
//! completed or N next upcoming occurrences. Results are timezone-aware
//! starts paired with a fixed per-occurrence duration.
//!
//! Everything is pure: the spec is immutable after construction, queries
//! re-derive their answer from `(spec, now)`, and enumeration is a lazy
//! [`fallible_iterator::FallibleIterator`] bounded by a per-frequency search
//! window, so asking for a handful of occurrences never walks an open-ended
//! rule further than needed.
//!
//! ```
//! use cadence_schedule::{RecurrenceConfig, ScheduleConfig, ScheduleSpec};
//! use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
//!
//! let spec = ScheduleSpec::new(ScheduleConfig {
//!     start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
//!     start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//!     end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
//!     time_zone: Utc,
//!     end_date: None,
//!     recurrence: RecurrenceConfig::Daily { interval: 3 },
//! });
//!
//! let now = Utc.with_ymd_and_hms(2025, 8, 1, 8, 0, 0).unwrap();
//! let next = spec.next_occurrence(&now).unwrap().unwrap();
//! assert_eq!(next.start, Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap());
//! ```

pub mod clock;
mod error;
mod prelude;
pub mod recurrence;
pub mod schedule;
mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use recurrence::{
    MonthDays, MonthDaysConfig, OccurrenceIndex, Position, Recurrence, RecurrenceConfig,
    RelativeOccurrence,
};
pub use schedule::{Occurrence, OccurrenceIter, ScheduleConfig, ScheduleSpec, Scheduler};
