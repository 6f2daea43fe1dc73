//! Merges the three per-state datasets into one table.
//!
//! The temperature rows define which states exist. Passenger and delay rows
//! are left-joined by state code; unmatched numeric fields are zero.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::loaders::{StateDelays, StatePassengers, StateTemperature};

/// One state of the combined table; field names match the snapshot CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedStateRow {
    pub state_code: String,
    pub state_name: String,
    pub avg_dec_temperature: f64,
    pub avg_nov_temperature: f64,
    pub holiday_travel_volume: u64,
    pub nov_passengers: u64,
    pub dec_passengers: u64,
    pub avg_delay_pct: f64,
    pub avg_delay_minutes: f64,
    pub total_flights: u64,
    pub delayed_flights: u64,
    pub cancelled_flights: u64,
}

impl CombinedStateRow {
    fn from_temperature(temp: StateTemperature) -> Self {
        Self {
            state_code: temp.state_code,
            state_name: temp.state_name,
            avg_dec_temperature: temp.avg_dec_temperature,
            avg_nov_temperature: temp.avg_nov_temperature,
            holiday_travel_volume: 0,
            nov_passengers: 0,
            dec_passengers: 0,
            avg_delay_pct: 0.0,
            avg_delay_minutes: 0.0,
            total_flights: 0,
            delayed_flights: 0,
            cancelled_flights: 0,
        }
    }

    fn with_passengers(mut self, p: &StatePassengers) -> Self {
        self.holiday_travel_volume = p.holiday_travel_volume;
        self.nov_passengers = p.nov_passengers;
        self.dec_passengers = p.dec_passengers;
        self
    }

    fn with_delays(mut self, d: &StateDelays) -> Self {
        self.avg_delay_pct = d.avg_delay_pct;
        self.avg_delay_minutes = d.avg_delay_minutes;
        self.total_flights = d.total_flights;
        self.delayed_flights = d.delayed_flights;
        self.cancelled_flights = d.cancelled_flights;
        self
    }
}

/// Left-joins passengers and delays onto the temperature states.
///
/// Output order follows `temps`. States that appear only in `passengers` or
/// `delays` are dropped.
pub fn combine(
    temps: Vec<StateTemperature>,
    passengers: &[StatePassengers],
    delays: &[StateDelays],
) -> Vec<CombinedStateRow> {
    let passengers_by_code: HashMap<&str, &StatePassengers> = passengers
        .iter()
        .map(|p| (p.state_code.as_str(), p))
        .collect();
    let delays_by_code: HashMap<&str, &StateDelays> = delays
        .iter()
        .map(|d| (d.state_code.as_str(), d))
        .collect();

    let mut without_passengers = 0usize;
    let mut without_delays = 0usize;

    let rows: Vec<CombinedStateRow> = temps
        .into_iter()
        .map(|temp| {
            let code = temp.state_code.clone();
            let mut row = CombinedStateRow::from_temperature(temp);

            match passengers_by_code.get(code.as_str()) {
                Some(p) => row = row.with_passengers(p),
                None => without_passengers += 1,
            }
            match delays_by_code.get(code.as_str()) {
                Some(d) => row = row.with_delays(d),
                None => without_delays += 1,
            }
            row
        })
        .collect();

    for code in unmatched_codes(&rows, passengers, delays) {
        warn!(state = code, "State has no temperature data, dropping");
    }

    info!(
        states = rows.len(),
        without_passengers, without_delays, "Combined datasets"
    );
    rows
}

/// Passenger and delay codes with no row in `rows`, each listed once.
fn unmatched_codes<'a>(
    rows: &[CombinedStateRow],
    passengers: &'a [StatePassengers],
    delays: &'a [StateDelays],
) -> BTreeSet<&'a str> {
    let known: HashSet<&str> = rows.iter().map(|r| r.state_code.as_str()).collect();
    passengers
        .iter()
        .map(|p| p.state_code.as_str())
        .chain(delays.iter().map(|d| d.state_code.as_str()))
        .filter(|code| !known.contains(code))
        .collect()
}
