use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{InvalidWindow, Timestamp, UnknownVariant};

/// Named period a report is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodSelector {
    Today,
    #[serde(rename = "week")]
    ThisWeek,
    #[serde(rename = "month")]
    ThisMonth,
    #[serde(rename = "quarter")]
    ThisQuarter,
    #[serde(rename = "year")]
    ThisYear,
    Custom,
}

impl PeriodSelector {
    /// Key used by the dashboards and in export file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodSelector::Today => "today",
            PeriodSelector::ThisWeek => "week",
            PeriodSelector::ThisMonth => "month",
            PeriodSelector::ThisQuarter => "quarter",
            PeriodSelector::ThisYear => "year",
            PeriodSelector::Custom => "custom",
        }
    }

    /// Parse a selector, falling back to the current month for anything
    /// unrecognised. The dashboards behaved this way and callers rely on it.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|err: UnknownVariant| {
            tracing::warn!(selector = %err.value, "unknown period selector, using current month");
            PeriodSelector::ThisMonth
        })
    }
}

impl FromStr for PeriodSelector {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "daily" => Ok(PeriodSelector::Today),
            "week" | "weekly" => Ok(PeriodSelector::ThisWeek),
            "month" | "monthly" => Ok(PeriodSelector::ThisMonth),
            "quarter" | "quarterly" => Ok(PeriodSelector::ThisQuarter),
            "year" | "yearly" => Ok(PeriodSelector::ThisYear),
            "custom" => Ok(PeriodSelector::Custom),
            _ => Err(UnknownVariant::new("period selector", s)),
        }
    }
}

impl std::fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open interval `[start, end)`. A record stamped exactly at `end`
/// belongs to the next window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, InvalidWindow> {
        if end < start {
            return Err(InvalidWindow::EndBeforeStart {
                start: start.date(),
                end: end.date(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Human-readable `dd/mm/yyyy - dd/mm/yyyy`. The end shown is the
    /// exclusive bound.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

fn midnight(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// First day of a month given as a zero-based offset from January of `year`;
/// offsets past December roll into the following years.
fn month_start(year: i32, month0: i32) -> NaiveDate {
    let year = year + month0.div_euclid(12);
    let month = month0.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

/// Resolve a period selector into a concrete window relative to `now`.
///
/// Weeks start on Sunday. A custom period needs both dates; its end date is
/// inclusive, so the window runs until midnight after it.
pub fn resolve_time_window(
    selector: PeriodSelector,
    now: Timestamp,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Result<TimeWindow, InvalidWindow> {
    let today = now.date();
    let (start, end) = match selector {
        PeriodSelector::Today => (today, add_days(today, 1)),
        PeriodSelector::ThisWeek => {
            let offset = today.weekday().num_days_from_sunday() as u64;
            let week_start = today
                .checked_sub_days(Days::new(offset))
                .unwrap_or(NaiveDate::MIN);
            (week_start, add_days(week_start, 7))
        }
        PeriodSelector::ThisMonth => {
            let month0 = today.month0() as i32;
            (
                month_start(today.year(), month0),
                month_start(today.year(), month0 + 1),
            )
        }
        PeriodSelector::ThisQuarter => {
            let quarter_month0 = (today.month0() / 3 * 3) as i32;
            (
                month_start(today.year(), quarter_month0),
                month_start(today.year(), quarter_month0 + 3),
            )
        }
        PeriodSelector::ThisYear => (
            month_start(today.year(), 0),
            month_start(today.year() + 1, 0),
        ),
        PeriodSelector::Custom => {
            let (Some(start), Some(end)) = (custom_start, custom_end) else {
                return Err(InvalidWindow::MissingBound);
            };
            if end < start {
                return Err(InvalidWindow::EndBeforeStart { start, end });
            }
            (start, add_days(end, 1))
        }
    };

    TimeWindow::new(midnight(start), midnight(end))
}

/// Keep the records whose timestamp, as read by `date_field`, falls inside
/// `window`.
pub fn filter_by_window<'a, T, F>(
    records: &'a [T],
    window: &TimeWindow,
    date_field: F,
) -> Vec<&'a T>
where
    F: Fn(&T) -> Timestamp,
{
    records
        .iter()
        .filter(|record| window.contains(date_field(record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> Timestamp {
        Timestamp::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_selector_roundtrip() {
        for selector in [
            PeriodSelector::Today,
            PeriodSelector::ThisWeek,
            PeriodSelector::ThisMonth,
            PeriodSelector::ThisQuarter,
            PeriodSelector::ThisYear,
            PeriodSelector::Custom,
        ] {
            assert_eq!(selector.as_str().parse::<PeriodSelector>().unwrap(), selector);
        }
    }

    #[test]
    fn test_admin_dashboard_aliases() {
        assert_eq!("daily".parse::<PeriodSelector>().unwrap(), PeriodSelector::Today);
        assert_eq!("weekly".parse::<PeriodSelector>().unwrap(), PeriodSelector::ThisWeek);
    }

    #[test]
    fn test_unknown_selector_falls_back_to_month() {
        assert_eq!(PeriodSelector::parse_lenient("fortnight"), PeriodSelector::ThisMonth);
        assert_eq!(PeriodSelector::parse_lenient("quarter"), PeriodSelector::ThisQuarter);
    }

    #[test]
    fn test_today_window() {
        let window =
            resolve_time_window(PeriodSelector::Today, at("2025-03-15", "18:45:00"), None, None)
                .unwrap();
        assert_eq!(window.start, at("2025-03-15", "00:00:00"));
        assert_eq!(window.end, at("2025-03-16", "00:00:00"));
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2025-03-12 is a Wednesday
        let window =
            resolve_time_window(PeriodSelector::ThisWeek, at("2025-03-12", "09:00:00"), None, None)
                .unwrap();
        assert_eq!(window.start, at("2025-03-09", "00:00:00"));
        assert_eq!(window.end, at("2025-03-16", "00:00:00"));

        // A Sunday is the first day of its own week
        let window =
            resolve_time_window(PeriodSelector::ThisWeek, at("2025-03-09", "23:59:59"), None, None)
                .unwrap();
        assert_eq!(window.start, at("2025-03-09", "00:00:00"));
    }

    #[test]
    fn test_week_crossing_year_boundary() {
        // 2025-01-01 is a Wednesday; its week starts on 2024-12-29
        let window =
            resolve_time_window(PeriodSelector::ThisWeek, at("2025-01-01", "10:00:00"), None, None)
                .unwrap();
        assert_eq!(window.start, at("2024-12-29", "00:00:00"));
        assert_eq!(window.end, at("2025-01-05", "00:00:00"));
    }

    #[test]
    fn test_month_window_december_rolls_over() {
        let window = resolve_time_window(
            PeriodSelector::ThisMonth,
            at("2024-12-31", "23:00:00"),
            None,
            None,
        )
        .unwrap();
        assert_eq!(window.start, at("2024-12-01", "00:00:00"));
        assert_eq!(window.end, at("2025-01-01", "00:00:00"));
    }

    #[test]
    fn test_quarter_window() {
        let window = resolve_time_window(
            PeriodSelector::ThisQuarter,
            at("2025-08-20", "12:00:00"),
            None,
            None,
        )
        .unwrap();
        assert_eq!(window.start, at("2025-07-01", "00:00:00"));
        assert_eq!(window.end, at("2025-10-01", "00:00:00"));

        let window = resolve_time_window(
            PeriodSelector::ThisQuarter,
            at("2025-11-02", "12:00:00"),
            None,
            None,
        )
        .unwrap();
        assert_eq!(window.start, at("2025-10-01", "00:00:00"));
        assert_eq!(window.end, at("2026-01-01", "00:00:00"));
    }

    #[test]
    fn test_year_window() {
        let window =
            resolve_time_window(PeriodSelector::ThisYear, at("2024-06-15", "12:00:00"), None, None)
                .unwrap();
        assert_eq!(window.start, at("2024-01-01", "00:00:00"));
        assert_eq!(window.end, at("2025-01-01", "00:00:00"));
    }

    #[test]
    fn test_custom_end_is_inclusive() {
        let window = resolve_time_window(
            PeriodSelector::Custom,
            at("2025-06-01", "00:00:00"),
            Some(day("2025-01-10")),
            Some(day("2025-01-12")),
        )
        .unwrap();
        assert!(window.contains(at("2025-01-10", "00:00:00")));
        assert!(window.contains(at("2025-01-12", "23:59:59")));
        assert!(!window.contains(at("2025-01-13", "00:00:00")));
        assert!(!window.contains(at("2025-01-09", "23:59:59")));
    }

    #[test]
    fn test_custom_single_day() {
        let window = resolve_time_window(
            PeriodSelector::Custom,
            at("2025-06-01", "00:00:00"),
            Some(day("2025-01-10")),
            Some(day("2025-01-10")),
        )
        .unwrap();
        assert_eq!(window.end - window.start, chrono::Duration::days(1));
    }

    #[test]
    fn test_custom_requires_both_bounds() {
        let now = at("2025-06-01", "00:00:00");
        assert_eq!(
            resolve_time_window(PeriodSelector::Custom, now, Some(day("2025-01-10")), None),
            Err(InvalidWindow::MissingBound)
        );
        assert_eq!(
            resolve_time_window(PeriodSelector::Custom, now, None, None),
            Err(InvalidWindow::MissingBound)
        );
    }

    #[test]
    fn test_custom_rejects_reversed_bounds() {
        let err = resolve_time_window(
            PeriodSelector::Custom,
            at("2025-06-01", "00:00:00"),
            Some(day("2025-01-12")),
            Some(day("2025-01-10")),
        )
        .unwrap_err();
        assert!(matches!(err, InvalidWindow::EndBeforeStart { .. }));
    }

    #[test]
    fn test_boundary_belongs_to_next_window() {
        let now = at("2025-01-31", "12:00:00");
        let january = resolve_time_window(PeriodSelector::ThisMonth, now, None, None).unwrap();
        let february = resolve_time_window(
            PeriodSelector::ThisMonth,
            at("2025-02-01", "00:00:00"),
            None,
            None,
        )
        .unwrap();
        let boundary = at("2025-02-01", "00:00:00");
        assert!(!january.contains(boundary));
        assert!(february.contains(boundary));
    }

    #[test]
    fn test_filter_by_window() {
        let window = TimeWindow::new(at("2025-01-10", "00:00:00"), at("2025-01-11", "00:00:00"))
            .unwrap();
        let stamps = vec![
            at("2025-01-09", "23:59:59"),
            at("2025-01-10", "00:00:00"),
            at("2025-01-10", "17:30:00"),
            at("2025-01-11", "00:00:00"),
        ];
        let kept = filter_by_window(&stamps, &window, |ts| *ts);
        assert_eq!(kept, vec![&stamps[1], &stamps[2]]);
    }

    #[test]
    fn test_label() {
        let window = TimeWindow::new(at("2025-01-01", "00:00:00"), at("2025-02-01", "00:00:00"))
            .unwrap();
        assert_eq!(window.label(), "01/01/2025 - 01/02/2025");
    }
}
