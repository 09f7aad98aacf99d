use chrono::{Datelike, NaiveDate, Weekday};

use crate::utils::{days_in_month, last_day_of_month};

/// A day selected by rank within a month ("the first Friday", "the last
/// weekday") rather than by a fixed day number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelativeOccurrence {
    pub index: OccurrenceIndex,
    pub position: Position,
}

/// Which of the matching days the rule picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceIndex {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl OccurrenceIndex {
    fn ordinal(self) -> Option<usize> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }
}

/// The day category the rule matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    On(Weekday),
    AnyDay,
    /// Monday through Friday.
    AnyWeekday,
    /// Saturday or Sunday.
    AnyWeekendDay,
}

impl Position {
    pub(crate) fn matches(self, weekday: Weekday) -> bool {
        match self {
            Self::On(wd) => weekday == wd,
            Self::AnyDay => true,
            Self::AnyWeekday => !matches!(weekday, Weekday::Sat | Weekday::Sun),
            Self::AnyWeekendDay => matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

impl RelativeOccurrence {
    /// Resolves the rule within the given month, or `None` when that month
    /// has no such day (e.g. no fifth Monday). Pure and total over every
    /// valid (year, month in 1-12) pair.
    pub fn resolve(&self, year: i32, month: u32) -> Option<NaiveDate> {
        if let Position::AnyDay = self.position {
            return match self.index.ordinal() {
                Some(n) => NaiveDate::from_ymd_opt(year, month, n as u32),
                None => Some(last_day_of_month(year, month)),
            };
        }

        let matching: Vec<NaiveDate> = (1..=days_in_month(year, month))
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .filter(|date| self.position.matches(date.weekday()))
            .collect();

        match self.index.ordinal() {
            Some(n) => matching.get(n - 1).copied(),
            None => matching.last().copied(),
        }
    }
}
