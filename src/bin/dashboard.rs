//! Fleet dashboard
//! Run: ./target/release/dashboard --period week

use anyhow::Result;
use clap::Parser;
use fleet_waybills::cli::{self, StoreArgs};
use fleet_waybills::dashboard::dashboard_summary;
use fleet_waybills::format::{format_date, format_money, group_thousands};
use fleet_waybills::period::Period;

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Passenger and revenue summary for a period")]
struct Args {
    #[command(flatten)]
    store: StoreArgs,

    /// today, week, month, quarter, year or all
    #[arg(long, default_value = "month")]
    period: Period,
}

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing("warn");
    let args = Args::parse();

    let store = args.store.open().await?;
    let trips = store.load_trips().await?;
    let waybills = store.load_waybills().await?;
    let now = args.store.now();

    let summary = dashboard_summary(&trips, &waybills, args.period, now);

    println!("\n{}", "=".repeat(60));
    println!("                    FLEET DASHBOARD");
    println!("{}\n", "=".repeat(60));
    println!("  {} | period: {}", format_date(now.date()), summary.period);
    println!();

    println!("  {:24} {:>20}", "Passengers", group_thousands(summary.total_passengers as i64));
    println!("  {:24} {:>20}", "Revenue", format_money(summary.total_revenue));
    println!("  {:24} {:>20}", "Trips run", summary.distinct_trips);
    println!("  {:24} {:>19}%", "Average load", summary.avg_load_percent);

    println!("\n\nTODAY");
    println!("{}", "-".repeat(60));
    println!("  {:24} {:>20}", "Passengers", summary.today_passengers);
    println!("  {:24} {:>20}", "Revenue", format_money(summary.today_revenue));

    println!("\n\nTOP DIRECTIONS");
    println!("{}", "-".repeat(60));
    if summary.top_directions.is_empty() {
        println!("  No data for the selected period");
    }
    for dir in &summary.top_directions {
        println!("  {:30} {:>10} pass. {:>16}",
                 dir.destination, dir.passengers, format_money(dir.revenue));
    }

    println!("\n{}", "=".repeat(60));
    println!();

    Ok(())
}
