//! Summary figures for the landing page

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::aggregate::{self, aggregate_by_key, TripIndex};
use crate::models::{Trip, Waybill};
use crate::period::{filter_by_window, resolve_window, Period};
use crate::rank::{rank_by, top_n, Direction};

/// Directions listed on the dashboard
pub const TOP_DIRECTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionVolume {
    pub destination: String,
    pub passengers: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub period: Period,
    pub total_passengers: u64,
    pub total_revenue: f64,
    pub distinct_trips: usize,
    pub avg_load_percent: u32,
    pub today_passengers: u64,
    pub today_revenue: f64,
    pub top_directions: Vec<DirectionVolume>,
}

pub fn dashboard_summary(
    trips: &[Trip],
    waybills: &[Waybill],
    period: Period,
    now: NaiveDateTime,
) -> DashboardSummary {
    let window = resolve_window(period, now, None, None);
    let in_period = filter_by_window(waybills, &window);

    let total_passengers: u64 = in_period.iter().map(|w| u64::from(w.passengers)).sum();
    let total_revenue: f64 = in_period.iter().map(|w| w.revenue).sum();
    let distinct_trips = in_period
        .iter()
        .map(|w| w.trip_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let index = TripIndex::new(trips);
    let resolved = index.resolve(in_period.iter().copied());
    let avg_load_percent = if resolved.is_empty() {
        0
    } else {
        let sum: f64 = resolved
            .iter()
            .map(|(trip, w)| {
                if trip.seats == 0 {
                    0.0
                } else {
                    f64::from(w.passengers) / f64::from(trip.seats) * 100.0
                }
            })
            .sum();
        (sum / resolved.len() as f64).round() as u32
    };

    let today = now.date();
    let todays: Vec<&Waybill> = waybills.iter().filter(|w| w.date == today).collect();
    let today_passengers: u64 = todays.iter().map(|w| u64::from(w.passengers)).sum();
    let today_revenue: f64 = todays.iter().map(|w| w.revenue).sum();

    let mut directions: Vec<DirectionVolume> =
        aggregate_by_key(in_period.iter().copied(), trips, aggregate::by_destination)
            .into_vec()
            .into_iter()
            .map(|(destination, totals)| DirectionVolume {
                destination,
                passengers: totals.passengers,
                revenue: totals.revenue,
            })
            .collect();
    rank_by(&mut directions, |d| d.passengers as f64, Direction::Descending);

    DashboardSummary {
        period,
        total_passengers,
        total_revenue,
        distinct_trips,
        avg_load_percent,
        today_passengers,
        today_revenue,
        top_directions: top_n(directions, TOP_DIRECTIONS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_seeded_month_totals() {
        let seeded_at = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let data = seed::mock_data(seeded_at.naive_utc());
        // a fixed instant after every seeded timestamp
        let now = (seeded_at + Duration::hours(6)).naive_utc();

        let summary = dashboard_summary(&data.trips, &data.waybills, Period::Month, now);

        let window_start = now - Duration::days(30);
        let expected: u64 = data
            .waybills
            .iter()
            .filter(|w| w.date.and_hms_opt(0, 0, 0).unwrap() >= window_start)
            .map(|w| u64::from(w.passengers))
            .sum();
        assert_eq!(expected, 388);
        assert_eq!(summary.total_passengers, expected);
        assert_eq!(summary.total_revenue, 500700.0);
        assert_eq!(summary.distinct_trips, 8);
        assert_eq!(summary.today_passengers, 32 + 45 + 38);
        assert_eq!(summary.today_revenue, 25600.0 + 54000.0 + 34200.0);
    }

    #[test]
    fn test_top_directions_limited_to_five() {
        let seeded_at = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let data = seed::mock_data(seeded_at.naive_utc());
        let summary =
            dashboard_summary(&data.trips, &data.waybills, Period::Month, seeded_at.naive_utc());

        let names: Vec<&str> = summary
            .top_directions
            .iter()
            .map(|d| d.destination.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Saint Petersburg", "Moscow", "Rostov-on-Don", "Yekaterinburg", "Volgograd"]
        );
        assert_eq!(summary.top_directions[0].passengers, 87);
    }

    #[test]
    fn test_today_matches_seed_after_midnight() {
        // seeded and viewed at 00:30 on the same reference clock
        let now = chrono::NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap();
        let data = seed::mock_data(now);

        let summary = dashboard_summary(&data.trips, &data.waybills, Period::Today, now);
        assert_eq!(summary.today_passengers, 115);
        assert_eq!(summary.today_revenue, 113800.0);
        assert_eq!(summary.total_passengers, 115);
    }

    #[test]
    fn test_empty_store_gives_zero_summary() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap().naive_utc();
        let summary = dashboard_summary(&[], &[], Period::Week, now);
        assert_eq!(summary.total_passengers, 0);
        assert_eq!(summary.avg_load_percent, 0);
        assert!(summary.top_directions.is_empty());
    }
}
