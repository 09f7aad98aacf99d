mod iter;
mod query;
mod window;


pub use iter::OccurrenceIter;
pub use query::Scheduler;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};

use crate::prelude::*;
use crate::recurrence::{Recurrence, RecurrenceConfig};

/// Plain configuration for a schedule.
///
/// [`ScheduleSpec::new`] consumes this and applies the silent normalization
/// rules: out-of-range weekday/day/month values are discarded, zero intervals
/// become 1, and empty sets are seeded from `start_date`. Anomalous input is
/// never a construction error.
#[derive(Debug, Clone)]
pub struct ScheduleConfig<Tz: TimeZone> {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    /// End of each occurrence. At or before `start_time` means the occurrence
    /// wraps past midnight into the next day.
    pub end_time: NaiveTime,
    pub time_zone: Tz,
    /// Inclusive upper bound on occurrence dates.
    pub end_date: Option<NaiveDate>,
    pub recurrence: RecurrenceConfig,
}

/// Immutable schedule specification.
///
/// Holds no query state: every query is re-derived from the spec and a
/// caller-supplied "now", so one instance can be shared across threads
/// freely.
#[derive(Debug, Clone)]
pub struct ScheduleSpec<Tz: TimeZone> {
    start_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    tz: Tz,
    end_date: Option<NaiveDate>,
    recurrence: Recurrence,
    duration: Duration,
}

impl<Tz: TimeZone> ScheduleSpec<Tz> {
    pub fn new(config: ScheduleConfig<Tz>) -> Self {
        let duration = occurrence_duration(config.start_time, config.end_time);
        let recurrence = config.recurrence.normalize(config.start_date);
        Self {
            start_date: config.start_date,
            start_time: config.start_time,
            end_time: config.end_time,
            tz: config.time_zone,
            end_date: config.end_date,
            recurrence,
            duration,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    /// Fixed duration shared by every occurrence of this schedule.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The instant after which the schedule produces nothing further:
    /// a one-time event's own end, or the end date at the end time.
    /// `None` for an open-ended recurring schedule.
    pub fn expiration(&self) -> Result<Option<DateTime<Tz>>> {
        match &self.recurrence {
            Recurrence::OneTime => {
                let start = self.first_start()?;
                let end = start
                    .checked_add_signed(self.duration)
                    .ok_or(Error::OutOfRange("one-time expiration"))?;
                Ok(Some(end))
            }
            _ => {
                let Some(end_date) = self.end_date else {
                    return Ok(None);
                };
                // an overnight span's final occurrence ends on the next day
                let end_date = if self.end_time <= self.start_time {
                    end_date
                        .succ_opt()
                        .ok_or(Error::OutOfRange("schedule expiration"))?
                } else {
                    end_date
                };
                Ok(Some(self.zoned(end_date, self.end_time)?))
            }
        }
    }

    pub(crate) fn zoned(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
        DateTime::try_from(W((self.tz.clone(), date.and_time(time))))
    }

    /// First instant the schedule can ever produce.
    pub(crate) fn first_start(&self) -> Result<DateTime<Tz>> {
        self.zoned(self.start_date, self.start_time)
    }

    pub(crate) fn occurrence(&self, start: DateTime<Tz>) -> Occurrence<Tz> {
        Occurrence {
            start,
            duration: self.duration,
        }
    }
}

/// One concrete expansion of a schedule: a zoned start plus the schedule's
/// fixed per-occurrence duration. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub duration: Duration,
}

impl<Tz: TimeZone> Occurrence<Tz> {
    pub fn end(&self) -> DateTime<Tz> {
        self.start.clone() + self.duration
    }
}

fn occurrence_duration(start: NaiveTime, end: NaiveTime) -> Duration {
    if end <= start {
        Duration::hours(24) + (end - start)
    } else {
        end - start
    }
}

#[cfg(test)]
mod duration_tests {
    use super::*;

    fn hm(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn test_plain_duration() {
        assert_eq!(
            occurrence_duration(hm(9, 0), hm(17, 0)),
            Duration::hours(8)
        );
    }

    #[test]
    fn test_overnight_duration_is_positive() {
        assert_eq!(
            occurrence_duration(hm(22, 0), hm(2, 0)),
            Duration::hours(4)
        );
    }

    #[test]
    fn test_equal_times_span_a_full_day() {
        assert_eq!(
            occurrence_duration(hm(9, 0), hm(9, 0)),
            Duration::hours(24)
        );
    }
}
