//! Loader for per-market flight delay statistics.
//!
//! Market rates are combined as flight-weighted averages: each market's
//! delay percentage is weighted by its total flights and its average delay
//! length by its delayed flights.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info};

use super::types::StateDelays;
use super::utility::ratio_or_zero;
use super::{deserialize_row, open_source, require_columns};
use crate::error::{PipelineError, Result};
use crate::states::normalize_state_code;

const REQUIRED_COLUMNS: &[&str] = &[
    "state_code",
    "delay_pct",
    "avg_delay_minutes",
    "total_flights",
    "delayed_flights",
    "cancelled_flights",
];

#[derive(Debug, Deserialize)]
struct DelayRecord {
    state_code: String,
    delay_pct: f64,
    avg_delay_minutes: f64,
    total_flights: u64,
    delayed_flights: u64,
    cancelled_flights: u64,
}

/// Running sums for one state.
#[derive(Debug, Default)]
struct DelayAccumulator {
    total_flights: u64,
    delayed_flights: u64,
    cancelled_flights: u64,
    weighted_delay: f64,
    weighted_minutes: f64,
}

impl DelayRecord {
    /// Name of the first rate that is NaN or infinite.
    fn non_finite_rate(&self) -> Option<&'static str> {
        if !self.delay_pct.is_finite() {
            Some("delay_pct")
        } else if !self.avg_delay_minutes.is_finite() {
            Some("avg_delay_minutes")
        } else {
            None
        }
    }
}

impl DelayAccumulator {
    /// Adds one market; `None` if a flight count total overflows.
    fn add(&mut self, record: &DelayRecord) -> Option<()> {
        self.total_flights = self.total_flights.checked_add(record.total_flights)?;
        self.delayed_flights = self.delayed_flights.checked_add(record.delayed_flights)?;
        self.cancelled_flights = self.cancelled_flights.checked_add(record.cancelled_flights)?;
        self.weighted_delay += record.delay_pct * record.total_flights as f64;
        self.weighted_minutes += record.avg_delay_minutes * record.delayed_flights as f64;
        Some(())
    }

    /// Zero flight totals resolve the corresponding average to 0.0.
    fn finish(self, state_code: String) -> StateDelays {
        if self.total_flights == 0 || self.delayed_flights == 0 {
            debug!(
                state = %state_code,
                total_flights = self.total_flights,
                delayed_flights = self.delayed_flights,
                "Zero flight total, defaulting average to 0"
            );
        }

        StateDelays {
            avg_delay_pct: ratio_or_zero(self.weighted_delay, self.total_flights),
            avg_delay_minutes: ratio_or_zero(self.weighted_minutes, self.delayed_flights),
            total_flights: self.total_flights,
            delayed_flights: self.delayed_flights,
            cancelled_flights: self.cancelled_flights,
            state_code,
        }
    }
}

/// Reads the delay CSV at `path` and computes flight-weighted rates per state.
///
/// # Errors
///
/// Fails if the file is missing, a required column is absent, a required
/// value is not numeric (NaN and infinities included), or a flight count total
/// overflows.
#[tracing::instrument(skip_all, fields(source = %path.as_ref().display()))]
pub fn load_delays(path: impl AsRef<Path>) -> Result<Vec<StateDelays>> {
    let path = path.as_ref();
    let reader = open_source(path)?;
    parse_delays(reader, path)
}

/// Parses delay CSV content; `path` is only used to label errors.
pub fn parse_delays<R: Read>(reader: R, path: &Path) -> Result<Vec<StateDelays>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(|e| PipelineError::from_csv(path, e))?.clone();
    require_columns(&headers, REQUIRED_COLUMNS, path)?;

    let mut acc: BTreeMap<String, DelayAccumulator> = BTreeMap::new();
    let mut rows = 0usize;

    for result in rdr.records() {
        let (line, record): (u64, DelayRecord) = deserialize_row(result, &headers, path)?;
        rows += 1;

        if let Some(field) = record.non_finite_rate() {
            return Err(PipelineError::malformed(path, line, format!("non-numeric {field}")));
        }

        acc.entry(normalize_state_code(&record.state_code))
            .or_default()
            .add(&record)
            .ok_or_else(|| {
                PipelineError::malformed(path, line, "flight count total overflows u64")
            })?;
    }

    let states: Vec<StateDelays> = acc
        .into_iter()
        .map(|(state_code, sums)| sums.finish(state_code))
        .collect();

    info!(rows, states = states.len(), "Loaded delay data");
    Ok(states)
}
