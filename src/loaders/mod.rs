//! Source dataset loaders.
//!
//! Each loader reads one file, groups its records by state, and returns one
//! aggregated row per state. Loaders share only the static state table.

pub mod delays;
pub mod passengers;
pub mod temperature;
pub mod types;
pub mod utility;

pub use delays::load_delays;
pub use passengers::load_passengers;
pub use temperature::load_temperatures;
pub use types::{StateDelays, StatePassengers, StateTemperature};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::StringRecord;
use serde::de::DeserializeOwned;

use crate::error::{PipelineError, Result};

pub(crate) fn open_source(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| PipelineError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })
}

/// Fails with the first of `required` that is absent from `headers`.
fn require_columns(headers: &StringRecord, required: &[&str], path: &Path) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(PipelineError::malformed(
                path,
                1,
                format!("missing required column `{column}`"),
            ));
        }
    }
    Ok(())
}

/// Deserializes one data row against `headers`, returning it with the line it
/// started on so later value checks can report the same position.
fn deserialize_row<T: DeserializeOwned>(
    record: csv::Result<StringRecord>,
    headers: &StringRecord,
    path: &Path,
) -> Result<(u64, T)> {
    let record = record.map_err(|e| PipelineError::from_csv(path, e))?;
    let line = record.position().map_or(0, |pos| pos.line());
    let row = record
        .deserialize(Some(headers))
        .map_err(|e| PipelineError::malformed(path, line, e.to_string()))?;
    Ok((line, row))
}
