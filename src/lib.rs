pub mod combine;
pub mod config;
pub mod error;
pub mod loaders;
pub mod output;
pub mod report;
pub mod states;
pub mod stats;

use tracing::info;

use crate::combine::{CombinedStateRow, combine};
use crate::config::{DataPaths, PipelineConfig};
use crate::error::Result;
use crate::loaders::{load_delays, load_passengers, load_temperatures};

/// Loads the three sources and merges them into one row per state.
///
/// Fails fast: the first missing file or unparseable value aborts the run.
#[tracing::instrument(skip_all)]
pub fn build_state_table(
    paths: &DataPaths,
    config: &PipelineConfig,
) -> Result<Vec<CombinedStateRow>> {
    let temps = load_temperatures(&paths.temperature, config)?;
    let passengers = load_passengers(&paths.passengers)?;
    let delays = load_delays(&paths.delays)?;

    let rows = combine(temps, &passengers, &delays);
    info!(states = rows.len(), "State table ready");
    Ok(rows)
}
