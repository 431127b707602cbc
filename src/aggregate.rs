//! Grouping of waybills and the derived per-group metrics

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::models::{Trip, Waybill};

/// Share of revenue assumed to be spent on operating a trip
pub const COST_RATIO: f64 = 0.6;

/// Estimated operating cost of a revenue amount
pub fn estimated_cost(revenue: f64) -> f64 {
    (revenue * COST_RATIO).round()
}

/// Revenue minus estimated cost
pub fn profit(revenue: f64) -> f64 {
    revenue - estimated_cost(revenue)
}

/// Profit as a rounded percentage of revenue; 0 when there is no revenue
pub fn profitability(revenue: f64) -> u32 {
    if revenue <= 0.0 {
        return 0;
    }
    (profit(revenue) / revenue * 100.0).round() as u32
}

/// Revenue per passenger, 0 when nobody travelled
pub fn average_check(revenue: f64, passengers: u64) -> f64 {
    if passengers == 0 {
        return 0.0;
    }
    (revenue / passengers as f64).round()
}

/// Trip lookup by identifier
pub struct TripIndex<'a> {
    by_id: HashMap<&'a str, &'a Trip>,
}

impl<'a> TripIndex<'a> {
    pub fn new(trips: &'a [Trip]) -> Self {
        Self {
            by_id: trips.iter().map(|t| (t.id.as_str(), t)).collect(),
        }
    }

    pub fn get(&self, trip_id: &str) -> Option<&'a Trip> {
        self.by_id.get(trip_id).copied()
    }

    /// Pair each waybill with its trip, dropping orphans
    pub fn resolve<'w, I>(&self, waybills: I) -> Vec<(&'a Trip, &'w Waybill)>
    where
        I: IntoIterator<Item = &'w Waybill>,
    {
        waybills
            .into_iter()
            .filter_map(|w| match self.get(&w.trip_id) {
                Some(trip) => Some((trip, w)),
                None => {
                    debug!(waybill = %w.id, trip = %w.trip_id, "skipping waybill with unknown trip");
                    None
                }
            })
            .collect()
    }
}

/// Running totals for one group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub passengers: u64,
    pub revenue: f64,
    pub occurrences: u32,
    pub seats: u64,
}

impl Totals {
    pub fn add(&mut self, trip: &Trip, waybill: &Waybill) {
        self.passengers += u64::from(waybill.passengers);
        self.revenue += waybill.revenue;
        self.occurrences += 1;
        self.seats += u64::from(trip.seats);
    }

    pub fn load_percent(&self) -> u32 {
        if self.seats == 0 {
            return 0;
        }
        (self.passengers as f64 / self.seats as f64 * 100.0).round() as u32
    }

    pub fn avg_passengers(&self) -> u32 {
        if self.occurrences == 0 {
            return 0;
        }
        (self.passengers as f64 / f64::from(self.occurrences)).round() as u32
    }

    pub fn avg_revenue(&self) -> f64 {
        if self.occurrences == 0 {
            return 0.0;
        }
        (self.revenue / f64::from(self.occurrences)).round()
    }

    pub fn cost(&self) -> f64 {
        estimated_cost(self.revenue)
    }

    pub fn profit(&self) -> f64 {
        profit(self.revenue)
    }

    pub fn profitability(&self) -> u32 {
        profitability(self.revenue)
    }

    pub fn average_check(&self) -> f64 {
        average_check(self.revenue, self.passengers)
    }
}

/// Groups in the order their keys were first seen
#[derive(Debug, Clone)]
pub struct Grouped<K> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Totals)>,
}

impl<K: Eq + Hash + Clone> Grouped<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut Totals {
        let existing = self.index.get(&key).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                self.groups.push((key.clone(), Totals::default()));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[slot].1
    }

    pub fn get(&self, key: &K) -> Option<&Totals> {
        self.index.get(key).map(|&slot| &self.groups[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, Totals)> {
        self.groups.iter()
    }

    pub fn into_vec(self) -> Vec<(K, Totals)> {
        self.groups
    }
}

/// Accumulate waybills into groups chosen by `key_fn`.
///
/// Waybills whose trip cannot be resolved are skipped.
pub fn aggregate_by_key<'w, K, I, F>(waybills: I, trips: &[Trip], key_fn: F) -> Grouped<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'w Waybill>,
    F: Fn(&Trip, &Waybill) -> K,
{
    let index = TripIndex::new(trips);
    let mut grouped = Grouped::new();

    for (trip, waybill) in index.resolve(waybills) {
        grouped.entry(key_fn(trip, waybill)).add(trip, waybill);
    }

    grouped
}

/// Group key: trip destination
pub fn by_destination(trip: &Trip, _: &Waybill) -> String {
    trip.destination.clone()
}

/// Group key: trip identifier
pub fn by_trip(trip: &Trip, _: &Waybill) -> String {
    trip.id.clone()
}
