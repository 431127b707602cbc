//! Trips and waybill journal
//!
//! Usage:
//!   waybills trips
//!   waybills trip <ID>
//!   waybills list [--date YYYY-MM-DD | --all]
//!   waybills show <ID>
//!   waybills add --trip trip-1 --date 2024-06-10 --passengers 32 [--fare 800] [--revenue 25600] [--notes TEXT]
//!   waybills edit <ID> --trip ... (same fields as add)
//!   waybills delete <ID>

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use fleet_waybills::cli::{self, parse_date, StoreArgs};
use fleet_waybills::format::{format_date, format_money, LoadClass};
use fleet_waybills::journal::{
    active_trips, trip_details, waybill_details, waybill_history, WaybillDraft, ACTIVE_TRIP_CARDS,
};
use fleet_waybills::report::directions;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "waybills")]
#[command(about = "Browse trips and record, edit or delete waybills")]
struct Args {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Active trips and the known directions
    Trips,
    /// One trip of any status
    Trip { id: String },
    /// Waybill history, newest first (defaults to today)
    List {
        #[arg(long, value_parser = parse_date, conflicts_with = "all")]
        date: Option<NaiveDate>,
        /// Every date
        #[arg(long)]
        all: bool,
    },
    /// One waybill with its trip
    Show { id: String },
    /// Record a new waybill
    Add(DraftArgs),
    /// Replace an existing waybill
    Edit {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete a waybill
    Delete { id: String },
}

#[derive(ClapArgs, Debug)]
struct DraftArgs {
    #[arg(long, default_value = "")]
    trip: String,
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    passengers: String,
    /// Defaults to the trip's base fare
    #[arg(long)]
    fare: Option<String>,
    /// Defaults to passengers x fare
    #[arg(long)]
    revenue: Option<String>,
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<DraftArgs> for WaybillDraft {
    fn from(a: DraftArgs) -> Self {
        WaybillDraft {
            trip_id: a.trip,
            date: a.date,
            passengers: a.passengers,
            fare: a.fare,
            revenue: a.revenue,
            notes: a.notes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing("info");
    let args = Args::parse();

    let store = args.store.open().await?;
    let trips = store.load_trips().await?;
    let now = args.store.now();

    match args.command {
        Command::Trips => {
            println!("\nACTIVE TRIPS");
            println!("{}", "-".repeat(90));
            let active = active_trips(&trips, ACTIVE_TRIP_CARDS);
            if active.is_empty() {
                println!("  No active trips today");
            }
            for trip in active {
                println!("  {:8} {:6} {:20} {:>6} {:12} {:10} {:16} {:>4} seats {:>12}",
                         trip.id, trip.route_number, trip.destination, trip.departure_time,
                         trip.vehicle_model, trip.vehicle_plate, trip.driver, trip.seats,
                         format_money(trip.fare));
            }
            println!("\nDirections: {}", directions(&trips).join(", "));
        }
        Command::Trip { id } => {
            let Some(trip) = trip_details(&trips, &id) else {
                bail!("trip {} not found", id);
            };
            println!("\nTRIP {}", trip.route_number);
            println!("{}", "-".repeat(50));
            println!("  {:16} {}", "Destination", trip.destination);
            println!("  {:16} {}", "Departure", trip.departure_time);
            println!("  {:16} {}", "Bus", trip.vehicle_model);
            println!("  {:16} {}", "Plate", trip.vehicle_plate);
            println!("  {:16} {}", "Driver", trip.driver);
            println!("  {:16} {}", "Seats", trip.seats);
            println!("  {:16} {}", "Fare", format_money(trip.fare));
            println!("  {:16} {}", "Status", trip.status.as_str());
        }
        Command::List { date, all } => {
            let waybills = store.load_waybills().await?;
            let date = if all { None } else { Some(date.unwrap_or(now.date())) };
            let history = waybill_history(&trips, &waybills, date);

            println!("\nWAYBILLS ({})", history.total);
            println!("{}", "-".repeat(90));
            if history.total == 0 {
                println!("  No waybills for the selected date");
            }
            for entry in &history.entries {
                println!("  {:24} {:>10} {:6} {:20} {:>4}/{:<4} {:>4}% {:8} {:>14}",
                         entry.waybill.id, format_date(entry.waybill.date),
                         entry.trip.route_number, entry.trip.destination,
                         entry.waybill.passengers, entry.trip.seats, entry.load_percent,
                         LoadClass::of(entry.load_percent).as_str(),
                         format_money(entry.waybill.revenue));
            }
        }
        Command::Show { id } => {
            let waybills = store.load_waybills().await?;
            let Some(entry) = waybill_details(&trips, &waybills, &id) else {
                bail!("waybill {} not found", id);
            };
            println!("\nWAYBILL OF {}", format_date(entry.waybill.date));
            println!("{}", "-".repeat(50));
            println!("  {:16} {} ({})", "Trip", entry.trip.route_number, entry.trip.destination);
            println!("  {:16} {}", "Departure", entry.trip.departure_time);
            println!("  {:16} {} {}", "Bus", entry.trip.vehicle_model, entry.trip.vehicle_plate);
            println!("  {:16} {}", "Driver", entry.trip.driver);
            println!("  {:16} {} of {} ({}%)", "Passengers",
                     entry.waybill.passengers, entry.trip.seats, entry.load_percent);
            println!("  {:16} {}", "Fare", format_money(entry.waybill.fare));
            println!("  {:16} {}", "Revenue", format_money(entry.waybill.revenue));
            if !entry.waybill.notes.is_empty() {
                println!("  {:16} {}", "Notes", entry.waybill.notes);
            }
            println!("  {:16} {}", "Created", entry.waybill.created_at);
        }
        Command::Add(draft) => {
            let waybill = WaybillDraft::from(draft).into_waybill(
                &trips,
                Utc::now(),
                &mut rand::thread_rng(),
            )?;
            let id = waybill.id.clone();
            store.upsert_waybill(waybill).await?;
            info!("Waybill {} created", id);
        }
        Command::Edit { id, draft } => {
            let waybills = store.load_waybills().await?;
            let Some(existing) = waybills.iter().find(|w| w.id == id) else {
                bail!("waybill {} not found", id);
            };
            let waybill = WaybillDraft::from(draft).into_replacement(&trips, existing)?;
            store.upsert_waybill(waybill).await?;
            info!("Waybill {} updated", id);
        }
        Command::Delete { id } => {
            if !store.delete_waybill(&id).await? {
                bail!("waybill {} not found", id);
            }
            info!("Waybill {} deleted", id);
        }
    }

    Ok(())
}
