//! Time helpers
//!
//! Timestamps are UTC milliseconds (i64) everywhere.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Update-time window for change reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportWindow {
    /// Trailing 7 days
    #[default]
    Week,
    /// Calendar month to date
    Month,
    /// Calendar year to date
    Year,
    /// Explicit inclusive range (millis)
    Range { start: i64, end: i64 },
}

impl ReportWindow {
    /// Resolve to inclusive `(start, end)` millisecond bounds relative to `now`.
    pub fn bounds(&self, now: i64) -> (i64, i64) {
        match *self {
            ReportWindow::Week => (now - 7 * 24 * 60 * 60 * 1000, now),
            ReportWindow::Month => {
                let today = to_datetime(now).date_naive();
                let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                    .unwrap_or(today);
                (start_of_day_millis(first), now)
            }
            ReportWindow::Year => {
                let today = to_datetime(now).date_naive();
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                (start_of_day_millis(first), now)
            }
            ReportWindow::Range { start, end } => (start, end),
        }
    }
}

/// Label for the month `offset` months before `now`, e.g. `"Mar 2026"`.
pub fn month_label(now: i64, offset: u32) -> String {
    let today = to_datetime(now).date_naive();
    let total = today.year() * 12 + today.month0() as i32 - offset as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .unwrap_or(today);
    date.format("%b %Y").to_string()
}

fn to_datetime(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
}

fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-08-23 12:00:00 UTC
    const NOW: i64 = 1_787_486_400_000;

    #[test]
    fn week_window_is_trailing_seven_days() {
        let (start, end) = ReportWindow::Week.bounds(NOW);
        assert_eq!(end, NOW);
        assert_eq!(end - start, 7 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn month_window_starts_on_the_first() {
        let (start, end) = ReportWindow::Month.bounds(NOW);
        let date = to_datetime(start).date_naive();
        assert_eq!(date.day(), 1);
        assert_eq!(date.month(), to_datetime(NOW).date_naive().month());
        assert_eq!(end, NOW);
    }

    #[test]
    fn year_window_starts_in_january() {
        let (start, _) = ReportWindow::Year.bounds(NOW);
        let date = to_datetime(start).date_naive();
        assert_eq!((date.month(), date.day()), (1, 1));
    }

    #[test]
    fn month_labels_walk_backwards_across_year_boundaries() {
        // NOW is in 2026; offset by current month0 + 1 lands in the prior year
        let current = to_datetime(NOW).date_naive();
        let label = month_label(NOW, current.month0() + 1);
        assert!(label.ends_with(&(current.year() - 1).to_string()));
    }
}
