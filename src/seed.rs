//! Demo fleet written on first start

use chrono::{Duration, NaiveDateTime};

use crate::models::{AppMeta, Trip, TripStatus, Waybill};

pub const APP_NAME: &str = "Passengers";
pub const APP_VERSION: &str = "1.0.0";

/// Everything written by a first-run seed
#[derive(Debug, Clone)]
pub struct SeedData {
    pub meta: AppMeta,
    pub trips: Vec<Trip>,
    pub waybills: Vec<Waybill>,
}

// (id, number, destination, departure, bus, plate, driver, seats, fare, status)
const TRIPS: &[(&str, &str, &str, &str, &str, &str, &str, u32, f64, TripStatus)] = &[
    ("trip-1", "101", "Moscow", "08:00", "PAZ-3205", "A123BV", "Ivanov I.I.", 40, 800.0, TripStatus::Active),
    ("trip-2", "102", "Saint Petersburg", "09:30", "NefAZ-5299", "V456GD", "Petrov P.P.", 50, 1200.0, TripStatus::Active),
    ("trip-3", "103", "Kazan", "10:15", "LiAZ-5292", "E789ZhZ", "Sidorov S.S.", 45, 900.0, TripStatus::Active),
    ("trip-4", "104", "Nizhny Novgorod", "12:00", "PAZ-3204", "I012KL", "Kuznetsov K.K.", 35, 700.0, TripStatus::Active),
    ("trip-5", "105", "Rostov-on-Don", "14:45", "MAZ-206", "M345NO", "Smirnov S.S.", 55, 1500.0, TripStatus::Active),
    ("trip-6", "106", "Volgograd", "16:20", "LiAZ-5256", "P678RS", "Vasilyev V.V.", 48, 1100.0, TripStatus::Active),
    ("trip-7", "107", "Yekaterinburg", "18:00", "NefAZ-5299", "T901UF", "Nikolaev N.N.", 52, 1800.0, TripStatus::Completed),
    ("trip-8", "108", "Novosibirsk", "20:30", "PAZ-3205", "Kh234TsCh", "Alekseev A.A.", 40, 2500.0, TripStatus::Completed),
];

// (id, trip, days before seed, passengers, fare, revenue, notes)
const WAYBILLS: &[(&str, &str, i64, u32, f64, f64, &str)] = &[
    ("wb-1", "trip-1", 0, 32, 800.0, 25600.0, "Ran on schedule"),
    ("wb-2", "trip-2", 0, 45, 1200.0, 54000.0, ""),
    ("wb-3", "trip-3", 0, 38, 900.0, 34200.0, "Extra luggage: 3 seats"),
    ("wb-4", "trip-4", 1, 28, 700.0, 19600.0, ""),
    ("wb-5", "trip-5", 1, 50, 1500.0, 75000.0, "Departure delayed 15 minutes"),
    ("wb-6", "trip-6", 2, 40, 1100.0, 44000.0, ""),
    ("wb-7", "trip-7", 2, 48, 1800.0, 86400.0, "Fully loaded"),
    ("wb-8", "trip-8", 3, 35, 2500.0, 87500.0, "2 passengers with children"),
    ("wb-9", "trip-1", 3, 30, 800.0, 24000.0, ""),
    ("wb-10", "trip-2", 4, 42, 1200.0, 50400.0, "Ran on schedule"),
];

/// Mock dataset; waybill dates count back from the reference instant `now`,
/// the same wall clock that decides which day is "today"
pub fn mock_data(now: NaiveDateTime) -> SeedData {
    let trips = TRIPS
        .iter()
        .map(|&(id, number, destination, departure, bus, plate, driver, seats, fare, status)| Trip {
            id: id.to_string(),
            route_number: number.to_string(),
            destination: destination.to_string(),
            departure_time: departure.to_string(),
            vehicle_model: bus.to_string(),
            vehicle_plate: plate.to_string(),
            driver: driver.to_string(),
            seats,
            fare,
            status,
        })
        .collect();

    let waybills = WAYBILLS
        .iter()
        .map(|&(id, trip_id, days_ago, passengers, fare, revenue, notes)| {
            let recorded = now - Duration::days(days_ago);
            Waybill {
                id: id.to_string(),
                trip_id: trip_id.to_string(),
                date: recorded.date(),
                passengers,
                fare,
                revenue,
                notes: notes.to_string(),
                created_at: recorded.and_utc(),
            }
        })
        .collect();

    SeedData {
        meta: AppMeta {
            app_name: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            last_updated: now.and_utc(),
        },
        trips,
        waybills,
    }
}
