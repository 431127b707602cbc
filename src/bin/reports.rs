//! Analytics reports
//! Run: ./target/release/reports money --period quarter --sort profit
//!
//! Reports:
//!   passenger-flow   Passengers and revenue by destination
//!   directions       Seat load by destination
//!   trips-load       Load of every trip run
//!   money            Revenue, estimated costs and profit

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use fleet_waybills::cli::{self, parse_date, StoreArgs};
use fleet_waybills::export::write_csv;
use fleet_waybills::format::{format_date, format_money, group_thousands, percent_bar, LoadClass, ProfitClass};
use fleet_waybills::period::Period;
use fleet_waybills::rank::MoneySort;
use fleet_waybills::report::{self, build_report, Report, ReportKind, ReportQuery};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "reports")]
#[command(about = "Passenger flow, direction load, trip load and financial reports")]
struct Args {
    /// passenger-flow, directions, trips-load or money
    kind: ReportKind,

    #[command(flatten)]
    store: StoreArgs,

    /// today, week, month, quarter, year, custom or all
    #[arg(long, default_value = "month")]
    period: Period,

    /// First day of a custom period (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last day of a custom period (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Only this destination (directions report)
    #[arg(long)]
    direction: Option<String>,

    /// Route number or destination substring (trips-load report)
    #[arg(long)]
    filter: Option<String>,

    /// revenue, profit or trip (money report)
    #[arg(long, default_value = "revenue")]
    sort: MoneySort,

    /// Also write the table as CSV
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the chart series as JSON
    #[arg(long)]
    chart: bool,
}

fn print_passenger_flow(r: &report::PassengerFlowReport) {
    println!("  {:28} {:>12} {:>18} {:>8}", "Destination", "Passengers", "Revenue", "Share");
    println!("  {}", "-".repeat(70));
    for row in &r.rows {
        println!("  {:28} {:>12} {:>18} {:>7}%",
                 row.destination, group_thousands(row.passengers as i64),
                 format_money(row.revenue), row.share_percent);
    }
    println!("  {}", "-".repeat(70));
    println!("  {:28} {:>12} {:>18}",
             "Total", group_thousands(r.total_passengers as i64), format_money(r.total_revenue));
}

fn print_direction_load(r: &report::DirectionLoadReport) {
    println!("  {:24} {:>6} {:>9} {:>7} {:>7} {:>16}  {}",
             "Destination", "Trips", "Avg pass", "Seats", "Load", "Avg revenue", "Visual");
    println!("  {}", "-".repeat(90));
    for row in &r.rows {
        println!("  {:24} {:>6} {:>9} {:>7} {:>6}% {:>16}  {}",
                 row.destination, row.trips, row.avg_passengers, row.seats,
                 row.load_percent, format_money(row.avg_revenue), percent_bar(row.load_percent, '#'));
    }
}

fn print_trip_load(r: &report::TripLoadReport) {
    println!("  {:6} {:20} {:>10} {:>6} {:>6} {:>6} {:>6} {:8} {}",
             "Trip", "Destination", "Date", "Dep.", "Pass.", "Seats", "Load", "Band", "Driver");
    println!("  {}", "-".repeat(90));
    for row in &r.rows {
        println!("  {:6} {:20} {:>10} {:>6} {:>6} {:>6} {:>5}% {:8} {}",
                 row.route_number, row.destination, format_date(row.date), row.departure_time,
                 row.passengers, row.seats, row.load_percent,
                 LoadClass::of(row.load_percent).as_str(), row.driver);
    }
}

fn print_money(r: &report::MoneyReport) {
    println!("  {:6} {:20} {:>10} {:>14} {:>14} {:>14} {:>10} {:>6}",
             "Trip", "Destination", "Date", "Revenue", "Costs", "Profit", "Avg check", "Margin");
    println!("  {}", "-".repeat(104));
    for row in &r.rows {
        println!("  {:6} {:20} {:>10} {:>14} {:>14} {:>14} {:>10} {:>5}% {}",
                 row.route_number, row.destination, format_date(row.date),
                 format_money(row.revenue), format_money(row.cost), format_money(row.profit),
                 format_money(row.avg_check), row.profitability,
                 ProfitClass::of(row.profitability).as_str());
    }
    println!("  {}", "-".repeat(104));
    println!("  {:39} {:>14} {:>14} {:>14}",
             "Total", format_money(r.total_revenue), format_money(r.total_cost), format_money(r.total_profit));

    println!("\n\nBY TRIP");
    println!("{}", "-".repeat(104));
    for trip in &r.by_trip {
        println!("  {:6} {:20} {:>4} runs {:>8} pass. {:>14} {:>14} {:>14} {:>5}%",
                 trip.route_number, trip.destination, trip.runs, trip.passengers,
                 format_money(trip.revenue), format_money(trip.cost), format_money(trip.profit),
                 trip.profitability);
    }

    println!("\n\nSUMMARY");
    println!("{}", "-".repeat(60));
    println!("  {:24} {:>20}", "Revenue", format_money(r.total_revenue));
    println!("  {:24} {:>20}", "Average check", format_money(r.avg_check));
    println!("  {:24} {:>20}", "Profit", format_money(r.total_profit));
}

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing("warn");
    let args = Args::parse();

    let store = args.store.open().await?;
    let trips = store.load_trips().await?;
    let waybills = store.load_waybills().await?;

    let query = ReportQuery {
        period: args.period,
        custom_start: args.from,
        custom_end: args.to,
        direction: args.direction.clone().filter(|d| d != "all"),
        trip_filter: args.filter.clone(),
        money_sort: args.sort,
    };
    let report = build_report(args.kind, &query, &trips, &waybills, args.store.now());

    println!("\n{}", "=".repeat(90));
    println!("  {} ({})", report.kind().title(), query.period);
    println!("{}\n", "=".repeat(90));

    if report.is_empty() {
        println!("  No data for the selected period");
    } else {
        match &report {
            Report::PassengerFlow(r) => print_passenger_flow(r),
            Report::DirectionLoad(r) => print_direction_load(r),
            Report::TripLoad(r) => print_trip_load(r),
            Report::Money(r) => print_money(r),
        }
    }

    if args.chart {
        println!("\n{}", serde_json::to_string_pretty(&report.charts())?);
    }

    if let Some(path) = &args.export {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_csv(&report, file)?;
        info!("Exported {} to {}", report.kind(), path.display());
    }

    println!("\n{}", "=".repeat(90));
    println!();

    Ok(())
}
