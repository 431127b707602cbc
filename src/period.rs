//! Period tokens and inclusive date windows

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::str::FromStr;

use crate::models::Waybill;

/// Symbolic period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Today,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    Custom,
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
            Period::Custom => "custom",
            Period::All => "all",
        }
    }
}

impl From<&str> for Period {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Period::Today,
            "week" => Period::Week,
            "month" => Period::Month,
            "quarter" => Period::Quarter,
            "year" => Period::Year,
            "custom" => Period::Custom,
            _ => Period::All,
        }
    }
}

impl FromStr for Period {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Period::from(s))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive `[start, end]` window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        let at = start_of_day(date);
        self.start <= at && at <= self.end
    }
}

/// Anything that carries a calendar date
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Waybill {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

fn months_back(now: NaiveDateTime, months: u32) -> NaiveDateTime {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Resolve a period into a concrete window relative to `now`.
///
/// `Custom` needs both bounds; with either one missing it behaves like `Month`.
pub fn resolve_window(
    period: Period,
    now: NaiveDateTime,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> DateWindow {
    let start = match period {
        Period::Today => start_of_day(now.date()),
        Period::Week => now - Duration::days(7),
        Period::Month => months_back(now, 1),
        Period::Quarter => months_back(now, 3),
        Period::Year => months_back(now, 12),
        Period::Custom => match (custom_start, custom_end) {
            (Some(start), Some(end)) => {
                return DateWindow {
                    start: start_of_day(start),
                    end: end_of_day(end),
                };
            }
            _ => months_back(now, 1),
        },
        // epoch
        Period::All => NaiveDateTime::default(),
    };

    DateWindow { start, end: now }
}

/// Keep records whose date lies inside the window, preserving order
pub fn filter_by_window<'a, T: Dated>(records: &'a [T], window: &DateWindow) -> Vec<&'a T> {
    records
        .iter()
        .filter(|r| window.contains(r.date()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn waybill_on(id: &str, day: NaiveDate) -> Waybill {
        Waybill {
            id: id.to_string(),
            trip_id: "trip-1".to_string(),
            date: day,
            passengers: 10,
            fare: 100.0,
            revenue: 1000.0,
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_period_tokens() {
        assert_eq!(Period::from("today"), Period::Today);
        assert_eq!(Period::from("Quarter"), Period::Quarter);
        assert_eq!(Period::from("custom"), Period::Custom);
        assert_eq!(Period::from("all"), Period::All);
        assert_eq!(Period::from("forever"), Period::All);
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
    }

    #[test]
    fn test_custom_window_is_inclusive() {
        let now = at(2024, 2, 1, 12, 0);
        let day = date(2024, 1, 10);
        let window = resolve_window(Period::Custom, now, Some(day), Some(day));

        let records = vec![
            waybill_on("before", date(2024, 1, 9)),
            waybill_on("same", day),
            waybill_on("after", date(2024, 1, 11)),
        ];
        let kept: Vec<&str> = filter_by_window(&records, &window)
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(kept, vec!["same"]);
        assert_eq!(window.end, date(2024, 1, 10).and_hms_milli_opt(23, 59, 59, 999).unwrap());
    }

    #[test]
    fn test_custom_reversed_bounds_match_nothing() {
        let now = at(2024, 2, 1, 12, 0);
        let window = resolve_window(Period::Custom, now, Some(date(2024, 1, 20)), Some(date(2024, 1, 10)));

        let records = vec![
            waybill_on("start", date(2024, 1, 20)),
            waybill_on("between", date(2024, 1, 15)),
            waybill_on("end", date(2024, 1, 10)),
        ];
        assert!(filter_by_window(&records, &window).is_empty());
    }

    #[test]
    fn test_custom_without_bounds_falls_back_to_month() {
        let now = at(2024, 3, 15, 9, 30);
        let custom = resolve_window(Period::Custom, now, Some(date(2024, 1, 1)), None);
        let month = resolve_window(Period::Month, now, None, None);
        assert_eq!(custom, month);
        assert_eq!(month.start, at(2024, 2, 15, 9, 30));
        assert_eq!(month.end, now);
    }

    #[test]
    fn test_today_starts_at_midnight() {
        let now = at(2024, 5, 20, 17, 45);
        let window = resolve_window(Period::Today, now, None, None);
        assert_eq!(window.start, at(2024, 5, 20, 0, 0));
        assert!(window.contains(date(2024, 5, 20)));
        assert!(!window.contains(date(2024, 5, 19)));
        assert!(!window.contains(date(2024, 5, 21)));
    }

    #[test]
    fn test_week_quarter_year_bounds() {
        let now = at(2024, 5, 20, 0, 0);
        assert_eq!(resolve_window(Period::Week, now, None, None).start, at(2024, 5, 13, 0, 0));
        assert_eq!(resolve_window(Period::Quarter, now, None, None).start, at(2024, 2, 20, 0, 0));
        assert_eq!(resolve_window(Period::Year, now, None, None).start, at(2023, 5, 20, 0, 0));

        // boundary record dated exactly at the window start is kept
        let window = resolve_window(Period::Week, now, None, None);
        assert!(window.contains(date(2024, 5, 13)));
        assert!(!window.contains(date(2024, 5, 12)));
    }

    #[test]
    fn test_month_clamps_short_months() {
        let now = at(2024, 3, 31, 8, 0);
        let window = resolve_window(Period::Month, now, None, None);
        assert_eq!(window.start, at(2024, 2, 29, 8, 0));
    }

    #[test]
    fn test_all_starts_at_epoch() {
        let now = at(2024, 5, 20, 12, 0);
        let window = resolve_window(Period::All, now, None, None);
        assert_eq!(window.start, at(1970, 1, 1, 0, 0));
        assert!(window.contains(date(1999, 12, 31)));
        assert!(!window.contains(date(2024, 5, 21)));
    }
}
