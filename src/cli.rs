//! Arguments and setup shared by the binaries

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Args;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::db::{self, SurrealBlobStore};
use crate::seed;
use crate::store::RecordStore;

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Database path
    #[arg(long, default_value = "data/fleet.db")]
    pub db: PathBuf,

    /// Reference instant as "YYYY-MM-DD HH:MM:SS" (default: local clock)
    #[arg(long, value_parser = parse_instant)]
    pub now: Option<NaiveDateTime>,
}

impl StoreArgs {
    pub fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Open the database, seeding the demo fleet on first use.
    /// Seed dates count back from the same reference instant as `now()`.
    pub async fn open(&self) -> Result<RecordStore<SurrealBlobStore>> {
        let path = self.db.to_string_lossy();
        info!("Opening database at {}", path);
        let conn = db::connect(&path)
            .await
            .with_context(|| format!("failed to open database at {}", path))?;
        let store = RecordStore::new(SurrealBlobStore::new(conn));
        store.seed_if_absent(&seed::mock_data(self.now())).await?;
        Ok(store)
    }
}

pub fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_time(chrono::NaiveTime::default()))
        })
        .map_err(|e| format!("invalid instant {:?}: {}", s, e))
}

pub fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date {:?}: {}", s, e))
}

/// Log to stderr, `RUST_LOG` overrides the default level
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant() {
        let dt = parse_instant("2024-06-10 15:30:00").unwrap();
        assert_eq!(dt.to_string(), "2024-06-10 15:30:00");
        let midnight = parse_instant("2024-06-10").unwrap();
        assert_eq!(midnight.to_string(), "2024-06-10 00:00:00");
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-01-10").is_ok());
        assert!(parse_date("10.01.2024").is_err());
    }
}
