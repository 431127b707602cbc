//! Waybill journal: active trips, history, details and the entry form

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use thiserror::Error;

use crate::aggregate::TripIndex;
use crate::models::{load_percent, Trip, TripStatus, Waybill, DEFAULT_FARE};

/// Trip cards shown on the trips page
pub const ACTIVE_TRIP_CARDS: usize = 6;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Trip is required")]
    MissingTrip,
    #[error("Date is required")]
    MissingDate,
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("{field} must be a non-negative number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
}

/// First `limit` trips with status active
pub fn active_trips(trips: &[Trip], limit: usize) -> Vec<&Trip> {
    trips
        .iter()
        .filter(|t| t.status == TripStatus::Active)
        .take(limit)
        .collect()
}

/// Any trip by id, whatever its status
pub fn trip_details<'a>(trips: &'a [Trip], id: &str) -> Option<&'a Trip> {
    trips.iter().find(|t| t.id == id)
}

/// One journal line: a waybill joined with its trip
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry<'a> {
    pub trip: &'a Trip,
    pub waybill: &'a Waybill,
    pub load_percent: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaybillHistory<'a> {
    pub entries: Vec<JournalEntry<'a>>,
    /// Waybills matching the date filter, including ones whose trip is gone
    pub total: usize,
}

/// Waybills on `date` (or all of them), newest first
pub fn waybill_history<'a>(
    trips: &'a [Trip],
    waybills: &'a [Waybill],
    date: Option<NaiveDate>,
) -> WaybillHistory<'a> {
    let mut matching: Vec<&Waybill> = waybills
        .iter()
        .filter(|w| date.map_or(true, |d| w.date == d))
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));

    let index = TripIndex::new(trips);
    let entries = index
        .resolve(matching.iter().copied())
        .into_iter()
        .map(|(trip, waybill)| JournalEntry {
            trip,
            waybill,
            load_percent: load_percent(waybill.passengers, trip.seats),
        })
        .collect();

    WaybillHistory {
        entries,
        total: matching.len(),
    }
}

pub fn waybill_details<'a>(
    trips: &'a [Trip],
    waybills: &'a [Waybill],
    id: &str,
) -> Option<JournalEntry<'a>> {
    let waybill = waybills.iter().find(|w| w.id == id)?;
    let trip = TripIndex::new(trips).get(&waybill.trip_id)?;
    Some(JournalEntry {
        trip,
        waybill,
        load_percent: load_percent(waybill.passengers, trip.seats),
    })
}

/// `id-<epoch millis>-<9 base-36 chars>`
pub fn generate_id<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("id-{}-{}", now.timestamp_millis(), suffix)
}

/// Raw waybill form input
#[derive(Debug, Clone, Default)]
pub struct WaybillDraft {
    pub trip_id: String,
    pub date: String,
    pub passengers: String,
    /// Empty means the trip's base fare
    pub fare: Option<String>,
    /// Empty means passengers x fare
    pub revenue: Option<String>,
    pub notes: String,
}

fn parse_amount(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ValidationError::NotANumber {
            field,
            value: value.to_string(),
        }),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl WaybillDraft {
    fn build(
        self,
        trips: &[Trip],
        id: String,
        created_at: DateTime<Utc>,
    ) -> Result<Waybill, ValidationError> {
        let trip_id = self.trip_id.trim().to_string();
        if trip_id.is_empty() {
            return Err(ValidationError::MissingTrip);
        }

        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;

        let passengers =
            self.passengers
                .trim()
                .parse::<u32>()
                .map_err(|_| ValidationError::NotANumber {
                    field: "passengers",
                    value: self.passengers.clone(),
                })?;

        let fare = match non_empty(&self.fare) {
            Some(raw) => parse_amount("fare", raw)?,
            None => TripIndex::new(trips)
                .get(&trip_id)
                .map_or(DEFAULT_FARE, |t| t.fare),
        };

        let revenue = match non_empty(&self.revenue) {
            Some(raw) => parse_amount("revenue", raw)?,
            None => f64::from(passengers) * fare,
        };

        Ok(Waybill {
            id,
            trip_id,
            date,
            passengers,
            fare,
            revenue,
            notes: self.notes.trim().to_string(),
            created_at,
        })
    }

    /// Validate and turn the form into a new waybill with a fresh id
    pub fn into_waybill<R: Rng>(
        self,
        trips: &[Trip],
        created_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Waybill, ValidationError> {
        let id = generate_id(created_at, rng);
        self.build(trips, id, created_at)
    }

    /// Validate and turn the form into a replacement for `existing`
    pub fn into_replacement(
        self,
        trips: &[Trip],
        existing: &Waybill,
    ) -> Result<Waybill, ValidationError> {
        self.build(trips, existing.id.clone(), existing.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> seed::SeedData {
        seed::mock_data(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap().naive_utc())
    }

    fn draft(trip_id: &str, passengers: &str) -> WaybillDraft {
        WaybillDraft {
            trip_id: trip_id.to_string(),
            date: "2024-06-10".to_string(),
            passengers: passengers.to_string(),
            ..WaybillDraft::default()
        }
    }

    #[test]
    fn test_active_trips() {
        let data = seeded();
        let active = active_trips(&data.trips, ACTIVE_TRIP_CARDS);
        assert_eq!(active.len(), 6);
        assert!(active.iter().all(|t| t.status == TripStatus::Active));
        assert_eq!(active_trips(&data.trips, 2).len(), 2);
    }

    #[test]
    fn test_trip_details_include_completed_trips() {
        let data = seeded();
        let trip = trip_details(&data.trips, "trip-8").unwrap();
        assert_eq!(trip.status, TripStatus::Completed);
        assert_eq!(trip.status.as_str(), "completed");
        assert_eq!(trip.vehicle_plate, "Kh234TsCh");
        assert!(trip_details(&data.trips, "trip-99").is_none());
    }

    #[test]
    fn test_history_by_date_newest_first() {
        let data = seeded();
        let all = waybill_history(&data.trips, &data.waybills, None);
        assert_eq!(all.total, 10);
        assert_eq!(all.entries.first().unwrap().waybill.date.to_string(), "2024-06-10");
        assert_eq!(all.entries.last().unwrap().waybill.id, "wb-10");

        let day = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let one_day = waybill_history(&data.trips, &data.waybills, Some(day));
        let ids: Vec<&str> = one_day.entries.iter().map(|e| e.waybill.id.as_str()).collect();
        assert_eq!(ids, vec!["wb-4", "wb-5"]);
        assert_eq!(one_day.entries[0].load_percent, 80); // 28 / 35
    }

    #[test]
    fn test_history_counts_orphans_but_hides_them() {
        let mut data = seeded();
        data.waybills[0].trip_id = "trip-gone".to_string();
        let history = waybill_history(&data.trips, &data.waybills, None);
        assert_eq!(history.total, 10);
        assert_eq!(history.entries.len(), 9);
    }

    #[test]
    fn test_details() {
        let data = seeded();
        let entry = waybill_details(&data.trips, &data.waybills, "wb-7").unwrap();
        assert_eq!(entry.trip.destination, "Yekaterinburg");
        assert_eq!(entry.load_percent, 92); // 48 / 52
        assert!(waybill_details(&data.trips, &data.waybills, "nope").is_none());
    }

    #[test]
    fn test_generate_id_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let id = generate_id(now, &mut rng);
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts[0], "id");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_draft_defaults_fare_and_revenue() {
        let data = seeded();
        let mut rng = StdRng::seed_from_u64(1);
        let created = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        let waybill = draft("trip-2", "40")
            .into_waybill(&data.trips, created, &mut rng)
            .unwrap();
        assert_eq!(waybill.fare, 1200.0);
        assert_eq!(waybill.revenue, 48000.0);
        assert!(waybill.id.starts_with("id-"));

        let unknown = draft("trip-x", "2")
            .into_waybill(&data.trips, created, &mut rng)
            .unwrap();
        assert_eq!(unknown.fare, DEFAULT_FARE);
        assert_eq!(unknown.revenue, 1000.0);

        let overridden = WaybillDraft {
            fare: Some("700".to_string()),
            revenue: Some("12345".to_string()),
            ..draft("trip-2", "10")
        }
        .into_waybill(&data.trips, created, &mut rng)
        .unwrap();
        assert_eq!(overridden.fare, 700.0);
        assert_eq!(overridden.revenue, 12345.0);
    }

    #[test]
    fn test_draft_validation_errors() {
        let data = seeded();
        let mut rng = StdRng::seed_from_u64(1);
        let created = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        let err = draft("", "10").into_waybill(&data.trips, created, &mut rng);
        assert_eq!(err.unwrap_err(), ValidationError::MissingTrip);

        let err = WaybillDraft {
            date: " ".to_string(),
            ..draft("trip-1", "10")
        }
        .into_waybill(&data.trips, created, &mut rng);
        assert_eq!(err.unwrap_err(), ValidationError::MissingDate);

        let err = WaybillDraft {
            date: "10.06.2024".to_string(),
            ..draft("trip-1", "10")
        }
        .into_waybill(&data.trips, created, &mut rng);
        assert!(matches!(err.unwrap_err(), ValidationError::InvalidDate(_)));

        let err = draft("trip-1", "many").into_waybill(&data.trips, created, &mut rng);
        assert!(matches!(
            err.unwrap_err(),
            ValidationError::NotANumber { field: "passengers", .. }
        ));

        let err = WaybillDraft {
            fare: Some("-5".to_string()),
            ..draft("trip-1", "10")
        }
        .into_waybill(&data.trips, created, &mut rng);
        assert!(matches!(
            err.unwrap_err(),
            ValidationError::NotANumber { field: "fare", .. }
        ));
    }

    #[test]
    fn test_replacement_keeps_identity() {
        let data = seeded();
        let existing = &data.waybills[0];
        let replacement = draft("trip-1", "33")
            .into_replacement(&data.trips, existing)
            .unwrap();
        assert_eq!(replacement.id, existing.id);
        assert_eq!(replacement.created_at, existing.created_at);
        assert_eq!(replacement.passengers, 33);
        assert_eq!(replacement.revenue, 26400.0);
    }
}
