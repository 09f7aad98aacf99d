mod relative;

pub use relative::{OccurrenceIndex, Position, RelativeOccurrence};

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

/// How a schedule repeats, normalized and immutable.
///
/// Produced from a [`RecurrenceConfig`] during spec construction; every
/// invariant below is already enforced here (intervals at least 1, sets
/// non-empty, values in range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    OneTime,
    Daily {
        interval: u32,
    },
    Weekly {
        interval: u32,
        /// Ascending by ISO weekday number, never empty.
        weekdays: Vec<Weekday>,
    },
    Monthly {
        interval: u32,
        days: MonthDays,
    },
    Yearly {
        interval: u32,
        /// 1-12, ascending, never empty.
        months: BTreeSet<u32>,
        days: MonthDays,
    },
}

/// Day selection within a month. Explicit day numbers and a relative rule
/// are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthDays {
    /// 1-31, ascending. A day the current month does not have is skipped
    /// for that month.
    OnDays(BTreeSet<u32>),
    Relative(RelativeOccurrence),
}

/// Recurrence as supplied by the caller, before normalization.
///
/// Out-of-range values (weekday outside 1-7 with Monday as 1, day outside
/// 1-31, month outside 1-12) are discarded silently; a zero interval becomes
/// 1; empty sets are seeded from the schedule's start date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceConfig {
    OneTime,
    Daily {
        interval: u32,
    },
    Weekly {
        interval: u32,
        weekdays: Vec<u32>,
    },
    Monthly {
        interval: u32,
        days: MonthDaysConfig,
    },
    Yearly {
        interval: u32,
        months: Vec<u32>,
        days: MonthDaysConfig,
    },
}

/// Day selection as supplied by the caller. Picking `Relative` rather than
/// `OnDays` (or the reverse) is the whole choice; there is no additive
/// combination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MonthDaysConfig {
    /// Defaults to the schedule's start day.
    #[default]
    Unset,
    OnDays(Vec<u32>),
    Relative(RelativeOccurrence),
}

impl RecurrenceConfig {
    pub(crate) fn normalize(self, start: NaiveDate) -> Recurrence {
        match self {
            Self::OneTime => Recurrence::OneTime,
            Self::Daily { interval } => Recurrence::Daily {
                interval: interval.max(1),
            },
            Self::Weekly { interval, weekdays } => {
                let numbers: BTreeSet<u32> = weekdays
                    .into_iter()
                    .filter(|n| (1..=7).contains(n))
                    .collect();
                let mut weekdays: Vec<Weekday> =
                    numbers.into_iter().filter_map(weekday_from_iso).collect();
                if weekdays.is_empty() {
                    weekdays.push(start.weekday());
                }
                Recurrence::Weekly {
                    interval: interval.max(1),
                    weekdays,
                }
            }
            Self::Monthly { interval, days } => Recurrence::Monthly {
                interval: interval.max(1),
                days: days.normalize(start),
            },
            Self::Yearly {
                interval,
                months,
                days,
            } => {
                let mut months: BTreeSet<u32> = months
                    .into_iter()
                    .filter(|m| (1..=12).contains(m))
                    .collect();
                if months.is_empty() {
                    months.insert(start.month());
                }
                Recurrence::Yearly {
                    interval: interval.max(1),
                    months,
                    days: days.normalize(start),
                }
            }
        }
    }
}

impl MonthDaysConfig {
    fn normalize(self, start: NaiveDate) -> MonthDays {
        let days = match self {
            Self::Relative(rel) => return MonthDays::Relative(rel),
            Self::Unset => BTreeSet::new(),
            Self::OnDays(days) => days
                .into_iter()
                .filter(|d| (1..=31).contains(d))
                .collect(),
        };
        if days.is_empty() {
            MonthDays::OnDays(BTreeSet::from([start.day()]))
        } else {
            MonthDays::OnDays(days)
        }
    }
}

fn weekday_from_iso(n: u32) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        // a Friday
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    #[test]
    fn test_zero_interval_becomes_one() {
        let rule = RecurrenceConfig::Daily { interval: 0 }.normalize(start());
        assert_eq!(rule, Recurrence::Daily { interval: 1 });
    }

    #[test]
    fn test_weekly_discards_out_of_range_weekdays() {
        let rule = RecurrenceConfig::Weekly {
            interval: 1,
            weekdays: vec![0, 3, 8, 99],
        }
        .normalize(start());
        assert_eq!(
            rule,
            Recurrence::Weekly {
                interval: 1,
                weekdays: vec![Weekday::Wed],
            }
        );
    }

    #[test]
    fn test_weekly_empty_set_seeds_start_weekday() {
        let rule = RecurrenceConfig::Weekly {
            interval: 2,
            weekdays: vec![],
        }
        .normalize(start());
        assert_eq!(
            rule,
            Recurrence::Weekly {
                interval: 2,
                weekdays: vec![Weekday::Fri],
            }
        );
    }

    #[test]
    fn test_monthly_unset_days_seed_start_day() {
        let rule = RecurrenceConfig::Monthly {
            interval: 1,
            days: MonthDaysConfig::Unset,
        }
        .normalize(start());
        assert_eq!(
            rule,
            Recurrence::Monthly {
                interval: 1,
                days: MonthDays::OnDays(BTreeSet::from([1])),
            }
        );
    }

    #[test]
    fn test_monthly_discards_out_of_range_days() {
        let rule = RecurrenceConfig::Monthly {
            interval: 1,
            days: MonthDaysConfig::OnDays(vec![0, 15, 31, 32]),
        }
        .normalize(start());
        assert_eq!(
            rule,
            Recurrence::Monthly {
                interval: 1,
                days: MonthDays::OnDays(BTreeSet::from([15, 31])),
            }
        );
    }

    #[test]
    fn test_yearly_defaults_seed_start_month_and_day() {
        let rule = RecurrenceConfig::Yearly {
            interval: 1,
            months: vec![],
            days: MonthDaysConfig::Unset,
        }
        .normalize(start());
        assert_eq!(
            rule,
            Recurrence::Yearly {
                interval: 1,
                months: BTreeSet::from([8]),
                days: MonthDays::OnDays(BTreeSet::from([1])),
            }
        );
    }

    #[test]
    fn test_yearly_discards_out_of_range_months() {
        let rule = RecurrenceConfig::Yearly {
            interval: 1,
            months: vec![0, 1, 7, 13],
            days: MonthDaysConfig::Unset,
        }
        .normalize(start());
        let Recurrence::Yearly { months, .. } = rule else {
            panic!("expected yearly rule");
        };
        assert_eq!(months, BTreeSet::from([1, 7]));
    }

    #[test]
    fn test_relative_rule_is_kept() {
        let rel = RelativeOccurrence {
            index: OccurrenceIndex::Last,
            position: Position::AnyWeekday,
        };
        let rule = RecurrenceConfig::Monthly {
            interval: 1,
            days: MonthDaysConfig::Relative(rel),
        }
        .normalize(start());
        assert_eq!(
            rule,
            Recurrence::Monthly {
                interval: 1,
                days: MonthDays::Relative(rel),
            }
        );
    }
}
