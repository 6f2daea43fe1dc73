//! Loader for per-market airport passenger counts.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::info;

use super::types::StatePassengers;
use super::{deserialize_row, open_source, require_columns};
use crate::error::{PipelineError, Result};
use crate::states::normalize_state_code;

const REQUIRED_COLUMNS: &[&str] = &["state_code", "nov_passengers", "dec_passengers"];

/// A single market row; columns beyond these are ignored.
#[derive(Debug, Deserialize)]
struct PassengerRecord {
    state_code: String,
    nov_passengers: u64,
    dec_passengers: u64,
}

/// Reads the passenger CSV at `path` and sums counts per state.
///
/// # Errors
///
/// Fails if the file is missing, a required column is absent, or a passenger
/// count is not a non-negative integer.
#[tracing::instrument(skip_all, fields(source = %path.as_ref().display()))]
pub fn load_passengers(path: impl AsRef<Path>) -> Result<Vec<StatePassengers>> {
    let path = path.as_ref();
    let reader = open_source(path)?;
    parse_passengers(reader, path)
}

/// Parses passenger CSV content; `path` is only used to label errors.
///
/// States are returned in code order. A state with no rows has no entry.
pub fn parse_passengers<R: Read>(reader: R, path: &Path) -> Result<Vec<StatePassengers>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(|e| PipelineError::from_csv(path, e))?.clone();
    require_columns(&headers, REQUIRED_COLUMNS, path)?;

    let mut totals: BTreeMap<String, StatePassengers> = BTreeMap::new();
    let mut rows = 0usize;

    for result in rdr.records() {
        let (line, record): (u64, PassengerRecord) = deserialize_row(result, &headers, path)?;
        rows += 1;

        let overflow = || PipelineError::malformed(path, line, "passenger total overflows u64");
        let code = normalize_state_code(&record.state_code);
        let (nov, dec) = totals
            .get(&code)
            .map_or((0, 0), |s| (s.nov_passengers, s.dec_passengers));
        let nov = nov.checked_add(record.nov_passengers).ok_or_else(overflow)?;
        let dec = dec.checked_add(record.dec_passengers).ok_or_else(overflow)?;
        let state = StatePassengers::new(code.clone(), nov, dec).ok_or_else(overflow)?;
        totals.insert(code, state);
    }

    let states: Vec<StatePassengers> = totals.into_values().collect();

    info!(rows, states = states.len(), "Loaded passenger data");
    Ok(states)
}
