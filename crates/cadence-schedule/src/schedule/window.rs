use chrono::{DateTime, Duration, TimeZone};

use super::ScheduleSpec;
use crate::prelude::*;
use crate::recurrence::{MonthDays, Recurrence};

impl<Tz: TimeZone> ScheduleSpec<Tz> {
    /// Upper bound instant to enumerate to so that roughly `max_items`
    /// occurrences fit. A finite expiration always wins, capping search cost
    /// outright. Otherwise the bound comes from a per-frequency density
    /// estimate plus one extra full cycle of slack; a sparse adversarial
    /// configuration may still under-fill, which surfaces as fewer results,
    /// never as a second pass or an error.
    pub(crate) fn plan_search_end(
        &self,
        now: &DateTime<Tz>,
        max_items: usize,
    ) -> Result<DateTime<Tz>> {
        if let Some(expiry) = self.expiration()? {
            return Ok(expiry);
        }

        let max = max_items as i64;
        let days = match self.recurrence() {
            // unreachable in practice: a one-time schedule always expires
            Recurrence::OneTime => 1,
            Recurrence::Daily { interval } => max * *interval as i64 + 1,
            Recurrence::Weekly { interval, weekdays } => {
                let per_week = weekdays.len().max(1) as i64;
                let weeks = div_ceil(max, per_week) * *interval as i64;
                weeks * 7 + 7
            }
            Recurrence::Monthly { interval, days } => {
                let per_month = density(days);
                let months = div_ceil(max, per_month) * *interval as i64 + *interval as i64;
                months * 31
            }
            Recurrence::Yearly {
                interval,
                months,
                days,
            } => {
                let per_year = months.len().max(1) as i64 * density(days);
                let years = div_ceil(max, per_year) * *interval as i64 + *interval as i64;
                years * 366
            }
        };

        let span = Duration::try_days(days).ok_or(Error::OutOfRange("search window"))?;
        now.clone()
            .checked_add_signed(span)
            .ok_or(Error::OutOfRange("search window"))
    }
}

/// Expected occurrences per matching month. A relative rule yields at most
/// one date per month regardless of how many days it inspects.
fn density(days: &MonthDays) -> i64 {
    match days {
        MonthDays::OnDays(set) => set.len().max(1) as i64,
        MonthDays::Relative(_) => 1,
    }
}

fn div_ceil(n: i64, d: i64) -> i64 {
    (n + d - 1) / d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::RecurrenceConfig;
    use crate::schedule::ScheduleConfig;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn daily(interval: u32, end_date: Option<NaiveDate>) -> ScheduleSpec<Utc> {
        ScheduleSpec::new(ScheduleConfig {
            start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            time_zone: Utc,
            end_date,
            recurrence: RecurrenceConfig::Daily { interval },
        })
    }

    #[test]
    fn test_expiration_caps_the_window() {
        use chrono::TimeZone;
        let end_date = NaiveDate::from_ymd_opt(2025, 8, 30).unwrap();
        let spec = daily(1, Some(end_date));
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 8, 0, 0).unwrap();
        let end = spec.plan_search_end(&now, 1_000_000).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 8, 30, 17, 0, 0).unwrap());
    }

    #[test]
    fn test_open_ended_daily_window_scales_with_items() {
        use chrono::TimeZone;
        let spec = daily(3, None);
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 8, 0, 0).unwrap();
        let end = spec.plan_search_end(&now, 10).unwrap();
        // 10 items x 3-day interval + 1 day of slack
        assert_eq!(end - now, Duration::days(31));
    }
}
