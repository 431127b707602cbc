//! Analytics reports: passenger flow, direction load, trip load and money
//!
//! Every call filters the full collections by period and rebuilds the rows.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::aggregate::{self, aggregate_by_key, TripIndex};
use crate::models::{load_percent, Trip, Waybill};
use crate::period::{filter_by_window, resolve_window, Period};
use crate::rank::{compare_labels, rank_by, share_percent, Direction, MoneySort};

/// Rows shown on the money chart
pub const MONEY_CHART_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    PassengerFlow,
    DirectionLoad,
    TripLoad,
    Money,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::PassengerFlow,
        ReportKind::DirectionLoad,
        ReportKind::TripLoad,
        ReportKind::Money,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::PassengerFlow => "passenger-flow",
            ReportKind::DirectionLoad => "directions",
            ReportKind::TripLoad => "trips-load",
            ReportKind::Money => "money",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::PassengerFlow => "PASSENGER FLOW BY DESTINATION",
            ReportKind::DirectionLoad => "LOAD BY DIRECTION",
            ReportKind::TripLoad => "TRIP LOAD",
            ReportKind::Money => "FINANCIAL REPORT",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown report: {}", s))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and sort selections of the reports page
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub period: Period,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
    /// `None` selects every direction
    pub direction: Option<String>,
    /// Case-insensitive match on route number or destination
    pub trip_filter: Option<String>,
    pub money_sort: MoneySort,
}

/// Label/value pairs handed to a chart renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn from_rows<T>(name: &str, rows: &[T], label: impl Fn(&T) -> String, value: impl Fn(&T) -> f64) -> Self {
        Self {
            name: name.to_string(),
            labels: rows.iter().map(&label).collect(),
            values: rows.iter().map(&value).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRow {
    pub destination: String,
    pub passengers: u64,
    pub revenue: f64,
    pub share_percent: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassengerFlowReport {
    pub rows: Vec<FlowRow>,
    pub total_passengers: u64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionRow {
    pub destination: String,
    pub trips: u32,
    pub avg_passengers: u32,
    pub seats: u64,
    pub load_percent: u32,
    pub avg_revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionLoadReport {
    pub rows: Vec<DirectionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripLoadRow {
    pub route_number: String,
    pub destination: String,
    pub date: NaiveDate,
    pub departure_time: String,
    pub passengers: u32,
    pub seats: u32,
    pub load_percent: u32,
    pub driver: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripLoadReport {
    pub rows: Vec<TripLoadRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyRow {
    pub route_number: String,
    pub destination: String,
    pub date: NaiveDate,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub avg_check: f64,
    pub profitability: u32,
}

/// Money totals for one trip across the period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripMoneyRow {
    pub trip_id: String,
    pub route_number: String,
    pub destination: String,
    pub runs: u32,
    pub passengers: u64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub profitability: u32,
    pub avg_check: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoneyReport {
    pub rows: Vec<MoneyRow>,
    pub by_trip: Vec<TripMoneyRow>,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_passengers: u64,
    pub avg_check: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    PassengerFlow(PassengerFlowReport),
    DirectionLoad(DirectionLoadReport),
    TripLoad(TripLoadReport),
    Money(MoneyReport),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::PassengerFlow(_) => ReportKind::PassengerFlow,
            Report::DirectionLoad(_) => ReportKind::DirectionLoad,
            Report::TripLoad(_) => ReportKind::TripLoad,
            Report::Money(_) => ReportKind::Money,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Report::PassengerFlow(r) => r.rows.is_empty(),
            Report::DirectionLoad(r) => r.rows.is_empty(),
            Report::TripLoad(r) => r.rows.is_empty(),
            Report::Money(r) => r.rows.is_empty(),
        }
    }

    /// Series for the report's chart
    pub fn charts(&self) -> Vec<ChartSeries> {
        match self {
            Report::PassengerFlow(r) => vec![
                ChartSeries::from_rows("passengers", &r.rows, |row| row.destination.clone(), |row| {
                    row.passengers as f64
                }),
                ChartSeries::from_rows(
                    "revenue, thousands",
                    &r.rows,
                    |row| row.destination.clone(),
                    |row| (row.revenue / 1000.0).round(),
                ),
            ],
            Report::DirectionLoad(r) => vec![ChartSeries::from_rows(
                "load percent",
                &r.rows,
                |row| row.destination.clone(),
                |row| f64::from(row.load_percent),
            )],
            Report::TripLoad(_) => Vec::new(),
            Report::Money(r) => {
                let shown = &r.rows[..r.rows.len().min(MONEY_CHART_ROWS)];
                let label = |row: &MoneyRow| format!("Trip {}", row.route_number);
                vec![
                    ChartSeries::from_rows("revenue", shown, label, |row| row.revenue),
                    ChartSeries::from_rows("profit", shown, label, |row| row.profit),
                ]
            }
        }
    }
}

/// Run one report over the full collections
pub fn build_report(
    kind: ReportKind,
    query: &ReportQuery,
    trips: &[Trip],
    waybills: &[Waybill],
    now: NaiveDateTime,
) -> Report {
    let window = resolve_window(query.period, now, query.custom_start, query.custom_end);
    let in_period = filter_by_window(waybills, &window);

    match kind {
        ReportKind::PassengerFlow => Report::PassengerFlow(passenger_flow(&in_period, trips)),
        ReportKind::DirectionLoad => {
            Report::DirectionLoad(direction_load(&in_period, trips, query.direction.as_deref()))
        }
        ReportKind::TripLoad => {
            Report::TripLoad(trip_load(&in_period, trips, query.trip_filter.as_deref()))
        }
        ReportKind::Money => Report::Money(money(&in_period, trips, query.money_sort)),
    }
}

pub fn passenger_flow(waybills: &[&Waybill], trips: &[Trip]) -> PassengerFlowReport {
    let grouped = aggregate_by_key(waybills.iter().copied(), trips, aggregate::by_destination);

    let total_passengers: u64 = grouped.iter().map(|(_, t)| t.passengers).sum();
    let total_revenue: f64 = grouped.iter().map(|(_, t)| t.revenue).sum();

    let mut rows: Vec<FlowRow> = grouped
        .into_vec()
        .into_iter()
        .map(|(destination, totals)| FlowRow {
            destination,
            passengers: totals.passengers,
            revenue: totals.revenue,
            share_percent: share_percent(totals.passengers, total_passengers),
        })
        .collect();
    rank_by(&mut rows, |r| r.passengers as f64, Direction::Descending);

    PassengerFlowReport {
        rows,
        total_passengers,
        total_revenue,
    }
}

pub fn direction_load(
    waybills: &[&Waybill],
    trips: &[Trip],
    direction: Option<&str>,
) -> DirectionLoadReport {
    let index = TripIndex::new(trips);
    let selected = waybills.iter().copied().filter(|w| match (direction, index.get(&w.trip_id)) {
        (Some(wanted), Some(trip)) => trip.destination == wanted,
        _ => true,
    });
    let grouped = aggregate_by_key(selected, trips, aggregate::by_destination);

    let mut rows: Vec<DirectionRow> = grouped
        .into_vec()
        .into_iter()
        .map(|(destination, totals)| DirectionRow {
            destination,
            trips: totals.occurrences,
            avg_passengers: totals.avg_passengers(),
            seats: totals.seats,
            load_percent: totals.load_percent(),
            avg_revenue: totals.avg_revenue(),
        })
        .collect();
    rank_by(&mut rows, |r| f64::from(r.load_percent), Direction::Descending);

    DirectionLoadReport { rows }
}

pub fn trip_load(waybills: &[&Waybill], trips: &[Trip], filter: Option<&str>) -> TripLoadReport {
    let needle = filter.map(|f| f.trim().to_lowercase()).filter(|f| !f.is_empty());
    let index = TripIndex::new(trips);

    let mut rows: Vec<TripLoadRow> = index
        .resolve(waybills.iter().copied())
        .into_iter()
        .filter(|(trip, _)| match &needle {
            Some(needle) => {
                trip.route_number.to_lowercase().contains(needle)
                    || trip.destination.to_lowercase().contains(needle)
            }
            None => true,
        })
        .map(|(trip, waybill)| TripLoadRow {
            route_number: trip.route_number.clone(),
            destination: trip.destination.clone(),
            date: waybill.date,
            departure_time: trip.departure_time.clone(),
            passengers: waybill.passengers,
            seats: trip.seats,
            load_percent: load_percent(waybill.passengers, trip.seats),
            driver: trip.driver.clone(),
        })
        .collect();
    // newest first
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    TripLoadReport { rows }
}

pub fn money(waybills: &[&Waybill], trips: &[Trip], sort: MoneySort) -> MoneyReport {
    let index = TripIndex::new(trips);
    let resolved = index.resolve(waybills.iter().copied());

    let mut rows = Vec::with_capacity(resolved.len());
    let mut total_revenue = 0.0;
    let mut total_cost = 0.0;
    let mut total_passengers = 0u64;

    for (trip, waybill) in &resolved {
        let cost = aggregate::estimated_cost(waybill.revenue);
        rows.push(MoneyRow {
            route_number: trip.route_number.clone(),
            destination: trip.destination.clone(),
            date: waybill.date,
            revenue: waybill.revenue,
            cost,
            profit: waybill.revenue - cost,
            avg_check: aggregate::average_check(waybill.revenue, u64::from(waybill.passengers)),
            profitability: aggregate::profitability(waybill.revenue),
        });
        total_revenue += waybill.revenue;
        total_cost += cost;
        total_passengers += u64::from(waybill.passengers);
    }

    match sort {
        MoneySort::Revenue => rank_by(&mut rows, |r| r.revenue, Direction::Descending),
        MoneySort::Profit => rank_by(&mut rows, |r| r.profit, Direction::Descending),
        MoneySort::TripNumber => {
            rows.sort_by(|a, b| compare_labels(&a.route_number, &b.route_number))
        }
    }

    let grouped = aggregate_by_key(resolved.iter().map(|(_, w)| *w), trips, aggregate::by_trip);
    let mut by_trip: Vec<TripMoneyRow> = grouped
        .into_vec()
        .into_iter()
        .filter_map(|(trip_id, totals)| {
            let trip = index.get(&trip_id)?;
            Some(TripMoneyRow {
                route_number: trip.route_number.clone(),
                destination: trip.destination.clone(),
                trip_id,
                runs: totals.occurrences,
                passengers: totals.passengers,
                revenue: totals.revenue,
                cost: totals.cost(),
                profit: totals.profit(),
                profitability: totals.profitability(),
                avg_check: totals.average_check(),
            })
        })
        .collect();
    rank_by(&mut by_trip, |r| r.revenue, Direction::Descending);

    MoneyReport {
        rows,
        by_trip,
        total_revenue,
        total_cost,
        total_profit: total_revenue - total_cost,
        total_passengers,
        avg_check: aggregate::average_check(total_revenue, total_passengers),
    }
}

/// Destinations offered by the direction selector, in trip order
pub fn directions(trips: &[Trip]) -> Vec<String> {
    let mut seen = Vec::new();
    for trip in trips {
        if !seen.contains(&trip.destination) {
            seen.push(trip.destination.clone());
        }
    }
    seen
}
