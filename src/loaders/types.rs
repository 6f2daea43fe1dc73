//! Per-state rows produced by the loaders.

use serde::Serialize;

/// Five-year November/December climate averages for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTemperature {
    pub state_code: String,
    pub state_name: String,
    pub avg_dec_temperature: f64,
    pub avg_nov_temperature: f64,
}

/// Summed airport passengers for one state.
///
/// `holiday_travel_volume` is always `nov_passengers + dec_passengers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePassengers {
    pub state_code: String,
    pub holiday_travel_volume: u64,
    pub nov_passengers: u64,
    pub dec_passengers: u64,
}

impl StatePassengers {
    /// Returns `None` if the holiday volume overflows `u64`.
    pub fn new(state_code: String, nov_passengers: u64, dec_passengers: u64) -> Option<Self> {
        Some(Self {
            state_code,
            holiday_travel_volume: nov_passengers.checked_add(dec_passengers)?,
            nov_passengers,
            dec_passengers,
        })
    }
}

/// Flight-weighted delay statistics for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDelays {
    pub state_code: String,
    pub avg_delay_pct: f64,
    pub avg_delay_minutes: f64,
    pub total_flights: u64,
    pub delayed_flights: u64,
    pub cancelled_flights: u64,
}
