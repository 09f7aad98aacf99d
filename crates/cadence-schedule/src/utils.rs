use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone};

use crate::prelude::*;

impl<Tz: TimeZone> TryFrom<W<(Tz, NaiveDateTime)>> for DateTime<Tz> {
    type Error = Error;

    fn try_from(W((tz, dtm)): W<(Tz, NaiveDateTime)>) -> Result<Self> {
        match tz.from_local_datetime(&dtm) {
            chrono::LocalResult::None => {
                // the positive timezone transition (spring forward)
                tz.from_local_datetime(&(dtm + Duration::hours(1)))
                    .latest()
                    .ok_or(Error::InvalidLocalTime)
            }
            chrono::LocalResult::Single(dtm) => Ok(dtm),
            // the negative timezone transition (fallback)
            chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        }
    }
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap_or(NaiveDate::MAX)
        })
        .pred_opt()
        .unwrap_or(NaiveDate::MIN)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_month(year, month).day()
}

/// Advances (year, month) by `num` calendar months.
pub(crate) fn ffwd_months(year: i32, month: u32, num: u32) -> (i32, u32) {
    let total = month as i64 - 1 + num as i64;
    ((year as i64 + total / 12) as i32, (total % 12 + 1) as u32)
}

/// Monday of the week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    #[test]
    fn test_zone_attach_standard_time() {
        let est = New_York;
        let naive = NaiveDate::from_ymd_opt(2023, 1, 11)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let result = DateTime::try_from(W((est, naive))).unwrap();
        let expected = est.with_ymd_and_hms(2023, 1, 11, 23, 0, 0).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_zone_attach_spring_forward_gap() {
        // 02:30 does not exist on 2023-03-12 in New York; the conversion
        // lands on the other side of the gap.
        let est = New_York;
        let naive = NaiveDate::from_ymd_opt(2023, 3, 12)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let result = DateTime::try_from(W((est, naive))).unwrap();
        let expected = est.with_ymd_and_hms(2023, 3, 12, 3, 30, 0).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_zone_attach_fallback_is_earliest() {
        // 01:30 happens twice on 2023-11-05 in New York; the earlier
        // (daylight-time) reading wins.
        let est = New_York;
        let naive = NaiveDate::from_ymd_opt(2023, 11, 5)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let result = DateTime::try_from(W((est, naive))).unwrap();
        let expected = est
            .from_local_datetime(&naive)
            .earliest()
            .unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2025, 2),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            last_day_of_month(2025, 12),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_ffwd_months_wraps_years() {
        assert_eq!(ffwd_months(2025, 11, 1), (2025, 12));
        assert_eq!(ffwd_months(2025, 11, 2), (2026, 1));
        assert_eq!(ffwd_months(2025, 1, 25), (2027, 2));
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-08-01 is a Friday
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
            NaiveDate::from_ymd_opt(2025, 7, 28).unwrap()
        );
        let monday = NaiveDate::from_ymd_opt(2025, 7, 28).unwrap();
        assert_eq!(week_start(monday), monday);
    }
}
