use std::collections::VecDeque;

use chrono::{DateTime, Duration, TimeZone};
use fallible_iterator::FallibleIterator;

use super::{Occurrence, ScheduleSpec};
use crate::clock::Clock;
use crate::prelude::*;
use crate::recurrence::Recurrence;

impl<Tz: TimeZone> ScheduleSpec<Tz> {
    /// The occurrence in progress at `now`, or failing that the first one
    /// starting at or after `now`. `None` once the schedule is exhausted.
    pub fn next_occurrence(&self, now: &DateTime<Tz>) -> Result<Option<Occurrence<Tz>>> {
        if let Some(active) = self.active_occurrence(now)? {
            return Ok(Some(active));
        }
        let end = self.plan_search_end(now, 1)?;
        let mut iter = self.occurrences_between(now.clone(), end);
        Ok(iter.next()?.map(|start| self.occurrence(start)))
    }

    /// The most recent fully completed occurrence: the latest one whose end
    /// is at or before `now`.
    pub fn previous_occurrence(&self, now: &DateTime<Tz>) -> Result<Option<Occurrence<Tz>>> {
        Ok(self.completed_occurrences(now, 1)?.into_iter().next())
    }

    /// Up to `max_items` fully completed occurrences, most recent first.
    /// `max_items == 0` returns empty without enumerating.
    pub fn completed_occurrences(
        &self,
        now: &DateTime<Tz>,
        max_items: usize,
    ) -> Result<Vec<Occurrence<Tz>>> {
        if max_items == 0 {
            return Ok(Vec::new());
        }
        let first = self.first_start()?;
        let mut recent: VecDeque<DateTime<Tz>> = VecDeque::with_capacity(max_items.min(64));
        let mut iter = self.occurrences_between(first, now.clone());
        while let Some(start) = iter.next()? {
            // starts are increasing and the duration is fixed, so the first
            // unfinished occurrence ends the scan
            if start.clone() + self.duration > *now {
                break;
            }
            if recent.len() == max_items {
                recent.pop_front();
            }
            recent.push_back(start);
        }
        Ok(recent
            .into_iter()
            .rev()
            .map(|start| self.occurrence(start))
            .collect())
    }

    /// Up to `max_items` occurrences starting at or after `now`, earliest
    /// first. `max_items == 0` returns empty without enumerating.
    pub fn upcoming_occurrences(
        &self,
        now: &DateTime<Tz>,
        max_items: usize,
    ) -> Result<Vec<Occurrence<Tz>>> {
        if max_items == 0 {
            return Ok(Vec::new());
        }
        let end = self.plan_search_end(now, max_items)?;
        self.occurrences_between(now.clone(), end)
            .take(max_items)
            .map(|start| Ok(self.occurrence(start)))
            .collect()
    }

    /// An occurrence whose span covers `now` (start at or before, end
    /// strictly after). The lookback window is one occurrence duration, or a
    /// full day for a one-time event.
    fn active_occurrence(&self, now: &DateTime<Tz>) -> Result<Option<Occurrence<Tz>>> {
        let lookback = match self.recurrence() {
            Recurrence::OneTime => Duration::days(1),
            _ => self.duration,
        };
        let from = now
            .clone()
            .checked_sub_signed(lookback)
            .ok_or(Error::OutOfRange("active lookback"))?;
        let mut iter = self.occurrences_between(from, now.clone());
        let mut active = None;
        while let Some(start) = iter.next()? {
            if start.clone() + self.duration > *now {
                active = Some(self.occurrence(start));
            }
        }
        Ok(active)
    }
}

/// Binds an immutable [`ScheduleSpec`] to an injected [`Clock`]. Each call
/// reads the clock once and delegates to the pure query functions, so
/// repeated calls at a frozen clock return identical results.
#[derive(Debug, Clone)]
pub struct Scheduler<Tz: TimeZone, C: Clock> {
    spec: ScheduleSpec<Tz>,
    clock: C,
}

impl<Tz: TimeZone, C: Clock> Scheduler<Tz, C> {
    pub fn new(spec: ScheduleSpec<Tz>, clock: C) -> Self {
        Self { spec, clock }
    }

    pub fn spec(&self) -> &ScheduleSpec<Tz> {
        &self.spec
    }

    pub fn next_occurrence(&self) -> Result<Option<Occurrence<Tz>>> {
        let now = self.now();
        self.spec.next_occurrence(&now)
    }

    pub fn previous_occurrence(&self) -> Result<Option<Occurrence<Tz>>> {
        let now = self.now();
        self.spec.previous_occurrence(&now)
    }

    pub fn completed_occurrences(&self, max_items: usize) -> Result<Vec<Occurrence<Tz>>> {
        let now = self.now();
        self.spec.completed_occurrences(&now, max_items)
    }

    pub fn upcoming_occurrences(&self, max_items: usize) -> Result<Vec<Occurrence<Tz>>> {
        let now = self.now();
        self.spec.upcoming_occurrences(&now, max_items)
    }

    fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(self.spec.time_zone())
    }
}
