use std::collections::VecDeque;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Weekday};
use fallible_iterator::FallibleIterator;

use super::ScheduleSpec;
use crate::prelude::*;
use crate::recurrence::{MonthDays, Recurrence};
use crate::utils::{ffwd_months, week_start};

impl<Tz: TimeZone> ScheduleSpec<Tz> {
    /// Lazy, forward-ordered stream of zoned occurrence starts within
    /// `[search_start, search_end]`. A window with `search_end` at or before
    /// `search_start` is empty without any iteration work. Rebuilding the
    /// iterator over the same window yields the same sequence.
    pub fn occurrences_between(
        &self,
        search_start: DateTime<Tz>,
        search_end: DateTime<Tz>,
    ) -> OccurrenceIter<'_, Tz> {
        OccurrenceIter::new(self, search_start, search_end)
    }
}

pub struct OccurrenceIter<'a, Tz: TimeZone> {
    spec: &'a ScheduleSpec<Tz>,
    window_start: DateTime<Tz>,
    window_end: DateTime<Tz>,
    /// Last candidate date: min(window end date, schedule end date).
    limit: NaiveDate,
    cursor: Cursor,
}

enum Cursor {
    Done,
    OneTime,
    Daily {
        next: NaiveDate,
        step: u64,
    },
    Weekly {
        day: NaiveDate,
        /// Monday of the week containing the schedule's start date.
        anchor: NaiveDate,
        interval: i64,
        weekdays: Vec<Weekday>,
    },
    Monthly {
        year: i32,
        month: u32,
        interval: i64,
        days: MonthDays,
        pending: VecDeque<NaiveDate>,
    },
    Yearly {
        year: i32,
        month_ix: usize,
        interval: i32,
        months: Vec<u32>,
        days: MonthDays,
        pending: VecDeque<NaiveDate>,
    },
}

impl<'a, Tz: TimeZone> OccurrenceIter<'a, Tz> {
    fn new(spec: &'a ScheduleSpec<Tz>, window_start: DateTime<Tz>, window_end: DateTime<Tz>) -> Self {
        let mut limit = window_end.date_naive();
        if let Some(end_date) = spec.end_date {
            limit = limit.min(end_date);
        }

        let cursor = if window_end <= window_start {
            Cursor::Done
        } else {
            let from = window_start.date_naive().max(spec.start_date);
            Cursor::for_rule(spec, from)
        };

        Self {
            spec,
            window_start,
            window_end,
            limit,
            cursor,
        }
    }

    /// Next candidate date by pure calendar rules; instant-level clipping to
    /// the window happens in `next`.
    fn advance(&mut self) -> Result<Option<NaiveDate>> {
        let limit = self.limit;
        let floor = self.spec.start_date;
        match &mut self.cursor {
            Cursor::Done => Ok(None),
            Cursor::OneTime => {
                self.cursor = Cursor::Done;
                if floor > limit {
                    return Ok(None);
                }
                Ok(Some(floor))
            }
            Cursor::Daily { next, step } => {
                let date = *next;
                if date > limit {
                    return Ok(None);
                }
                *next = date
                    .checked_add_days(Days::new(*step))
                    .ok_or(Error::OutOfRange("daily step"))?;
                Ok(Some(date))
            }
            Cursor::Weekly {
                day,
                anchor,
                interval,
                weekdays,
            } => {
                let mut date = *day;
                loop {
                    if date > limit {
                        return Ok(None);
                    }
                    let next = date
                        .succ_opt()
                        .ok_or(Error::OutOfRange("weekly step"))?;
                    let on_cycle =
                        (week_start(date) - *anchor).num_days() / 7 % *interval == 0;
                    if on_cycle && weekdays.contains(&date.weekday()) {
                        *day = next;
                        return Ok(Some(date));
                    }
                    date = next;
                }
            }
            Cursor::Monthly {
                year,
                month,
                interval,
                days,
                pending,
            } => loop {
                if let Some(date) = pending.pop_front() {
                    return Ok(Some(date));
                }
                if (*year, *month) > (limit.year(), limit.month()) {
                    return Ok(None);
                }
                let offset = months_from(floor, *year, *month);
                if offset % *interval == 0 {
                    resolve_month(days, *year, *month, floor, limit, pending);
                }
                let (y, m) = ffwd_months(*year, *month, 1);
                *year = y;
                *month = m;
            },
            Cursor::Yearly {
                year,
                month_ix,
                interval,
                months,
                days,
                pending,
            } => loop {
                if let Some(date) = pending.pop_front() {
                    return Ok(Some(date));
                }
                if *year > limit.year() {
                    return Ok(None);
                }
                if let Some(&month) = months.get(*month_ix) {
                    *month_ix += 1;
                    resolve_month(days, *year, month, floor, limit, pending);
                } else {
                    *year += *interval;
                    *month_ix = 0;
                }
            },
        }
    }
}

impl Cursor {
    /// `from` is the first date worth considering: the later of the window
    /// start and the schedule start.
    fn for_rule<Tz: TimeZone>(spec: &ScheduleSpec<Tz>, from: NaiveDate) -> Self {
        let start = spec.start_date;
        match spec.recurrence() {
            Recurrence::OneTime => Cursor::OneTime,
            Recurrence::Daily { interval } => {
                // jump straight to the first interval boundary at or after
                // `from` instead of stepping from the schedule start
                let step = *interval as i64;
                let since = (from - start).num_days();
                let rem = since % step;
                let skip = since + if rem == 0 { 0 } else { step - rem };
                Cursor::Daily {
                    next: start + chrono::Duration::days(skip),
                    step: step as u64,
                }
            }
            Recurrence::Weekly { interval, weekdays } => Cursor::Weekly {
                day: from,
                anchor: week_start(start),
                interval: *interval as i64,
                weekdays: weekdays.clone(),
            },
            Recurrence::Monthly { interval, days } => {
                let (mut year, mut month) = (start.year(), start.month());
                if (from.year(), from.month()) > (year, month) {
                    year = from.year();
                    month = from.month();
                }
                Cursor::Monthly {
                    year,
                    month,
                    interval: *interval as i64,
                    days: days.clone(),
                    pending: VecDeque::new(),
                }
            }
            Recurrence::Yearly {
                interval,
                months,
                days,
            } => {
                let interval = *interval as i32;
                // snap forward to the nearest interval year at or after `from`
                let mut year = start.year();
                if from.year() > year {
                    let rem = (from.year() - year) % interval;
                    year = from.year() + if rem == 0 { 0 } else { interval - rem };
                }
                Cursor::Yearly {
                    year,
                    month_ix: 0,
                    interval,
                    months: months.iter().copied().collect(),
                    days: days.clone(),
                    pending: VecDeque::new(),
                }
            }
        }
    }
}

impl<'a, Tz: TimeZone> FallibleIterator for OccurrenceIter<'a, Tz> {
    type Item = DateTime<Tz>;
    type Error = Error;

    fn next(&mut self) -> Result<Option<Self::Item>> {
        loop {
            let Some(date) = self.advance()? else {
                self.cursor = Cursor::Done;
                return Ok(None);
            };
            let start = self.spec.zoned(date, self.spec.start_time)?;
            if start < self.window_start {
                continue;
            }
            if start > self.window_end {
                self.cursor = Cursor::Done;
                return Ok(None);
            }
            return Ok(Some(start));
        }
    }
}

fn months_from(start: NaiveDate, year: i32, month: u32) -> i64 {
    (year as i64 - start.year() as i64) * 12 + month as i64 - start.month() as i64
}

/// Resolves the day selection within one month, clipped to `[floor, limit]`.
/// A day number the month does not have is skipped, not substituted.
fn resolve_month(
    days: &MonthDays,
    year: i32,
    month: u32,
    floor: NaiveDate,
    limit: NaiveDate,
    out: &mut VecDeque<NaiveDate>,
) {
    match days {
        MonthDays::OnDays(set) => {
            for &day in set {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    if date >= floor && date <= limit {
                        out.push_back(date);
                    }
                }
            }
        }
        MonthDays::Relative(rel) => {
            if let Some(date) = rel.resolve(year, month) {
                if date >= floor && date <= limit {
                    out.push_back(date);
                }
            }
        }
    }
}
