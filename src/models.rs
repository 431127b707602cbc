use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Base fare used when a trip record carries none
pub const DEFAULT_FARE: f64 = 500.0;

/// Trip status as stored by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Completed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Active => "active",
            TripStatus::Completed => "completed",
        }
    }
}

impl From<&str> for TripStatus {
    fn from(s: &str) -> Self {
        match s {
            "completed" => TripStatus::Completed,
            _ => TripStatus::Active, // default
        }
    }
}

/// Scheduled route definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    #[serde(rename = "number")]
    pub route_number: String,
    pub destination: String,
    pub departure_time: String,
    #[serde(rename = "bus")]
    pub vehicle_model: String,
    #[serde(rename = "busNumber")]
    pub vehicle_plate: String,
    pub driver: String,
    pub seats: u32,
    #[serde(default = "default_fare")]
    pub fare: f64,
    pub status: TripStatus,
}

fn default_fare() -> f64 {
    DEFAULT_FARE
}

/// One executed trip on one date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Waybill {
    pub id: String,
    pub trip_id: String,
    pub date: NaiveDate,
    pub passengers: u32,
    pub fare: f64,
    pub revenue: f64,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Seed marker stored under `passengersData`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppMeta {
    pub app_name: String,
    pub version: String,
    pub last_updated: DateTime<Utc>,
}

/// Load percentage of a single occurrence, zero when the trip has no seats
pub fn load_percent(passengers: u32, seats: u32) -> u32 {
    if seats == 0 {
        return 0;
    }
    (f64::from(passengers) / f64::from(seats) * 100.0).round() as u32
}
