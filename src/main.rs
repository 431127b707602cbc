use anyhow::Result;
use clap::Parser;
use fleet_waybills::cli::{self, StoreArgs};
use fleet_waybills::models::TripStatus;
use fleet_waybills::seed;
use tracing::info;

/// Open the fleet database, seeding it on first run
#[derive(Parser, Debug)]
#[command(name = "fleet_waybills")]
#[command(about = "Initialize the fleet database and print collection statistics")]
struct Args {
    #[command(flatten)]
    store: StoreArgs,

    /// Wipe stored trips and waybills and write the demo fleet again
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing("info");
    let args = Args::parse();

    let store = args.store.open().await?;
    info!("Connected to SurrealDB");

    if args.reset {
        store.reset().await?;
        store.seed_if_absent(&seed::mock_data(args.store.now())).await?;
    }

    let meta = store.load_meta().await?;
    let trips = store.load_trips().await?;
    let waybills = store.load_waybills().await?;

    info!("=== Store Statistics ===");
    if let Some(meta) = meta {
        info!("{} v{} (seeded {})", meta.app_name, meta.version, meta.last_updated);
    }

    let active = trips.iter().filter(|t| t.status == TripStatus::Active).count();
    info!("Trips: {} ({} active, {} completed)", trips.len(), active, trips.len() - active);
    info!("Waybills: {}", waybills.len());

    if let (Some(first), Some(last)) = (
        waybills.iter().map(|w| w.date).min(),
        waybills.iter().map(|w| w.date).max(),
    ) {
        info!("Waybill dates: {} .. {}", first, last);
    }

    let orphans = waybills
        .iter()
        .filter(|w| !trips.iter().any(|t| t.id == w.trip_id))
        .count();
    if orphans > 0 {
        info!("Waybills referencing unknown trips: {}", orphans);
    }

    Ok(())
}
