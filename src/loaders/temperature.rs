//! Loader for the NOAA climate-division temperature file (`climdiv-tmpcst`).
//!
//! Each line is a 10-character `SSSDDEYYYY` code followed by twelve monthly
//! mean temperatures in °F:
//!
//! | Slice   | Field                                  |
//! |---------|----------------------------------------|
//! | `0..3`  | 3-digit state number                   |
//! | `3..5`  | division (`00` = statewide composite)  |
//! | `5..6`  | element code                           |
//! | `6..10` | year                                   |

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, info, warn};

use super::open_source;
use super::types::StateTemperature;
use super::utility::mean;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::states::{HAWAII, StateTable, normalize_fips3};

const STATEWIDE_DIVISION: &str = "00";
const FALLBACK_DIVISION: &str = "01";
const MONTHS: usize = 12;
const NOV: usize = 10;
const DEC: usize = 11;

/// The positional fields of a `SSSDDEYYYY` record code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimateCode<'a> {
    pub state_fips3: &'a str,
    pub division: &'a str,
    pub element: &'a str,
    year_digits: &'a str,
}

impl<'a> ClimateCode<'a> {
    /// Slices `code` into its fields. Returns `None` if the code is too short
    /// or a slice boundary falls inside a multi-byte character.
    pub fn parse(code: &'a str) -> Option<Self> {
        Some(Self {
            state_fips3: code.get(0..3)?,
            division: code.get(3..5)?,
            element: code.get(5..6)?,
            year_digits: code.get(6..10)?,
        })
    }

    pub fn year(&self) -> Option<i32> {
        if self.year_digits.bytes().all(|b| b.is_ascii_digit()) {
            self.year_digits.parse().ok()
        } else {
            None
        }
    }
}

/// One parsed line of the climate file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTemperatureRecord {
    pub region_code: String,
    pub state_fips3: String,
    pub division: String,
    pub year: i32,
    pub monthly_temps: [f64; MONTHS],
}

impl RawTemperatureRecord {
    pub fn nov(&self) -> f64 {
        self.monthly_temps[NOV]
    }

    pub fn dec(&self) -> f64 {
        self.monthly_temps[DEC]
    }
}

/// Parses one line. Short lines and unsliceable codes yield `Ok(None)`; a
/// present but non-numeric year or temperature (NaN and infinities included)
/// is an error.
pub fn parse_line(line: &str, path: &Path, line_no: u64) -> Result<Option<RawTemperatureRecord>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MONTHS + 1 {
        return Ok(None);
    }

    let code = tokens[0];
    let Some(parsed) = ClimateCode::parse(code) else {
        return Ok(None);
    };

    let year = parsed.year().ok_or_else(|| {
        PipelineError::malformed(path, line_no, format!("invalid year in code `{code}`"))
    })?;

    let mut monthly_temps = [0.0; MONTHS];
    for (slot, token) in monthly_temps.iter_mut().zip(&tokens[1..=MONTHS]) {
        *slot = token
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| {
                PipelineError::malformed(path, line_no, format!("non-numeric temperature `{token}`"))
            })?;
    }

    Ok(Some(RawTemperatureRecord {
        region_code: code.to_string(),
        state_fips3: parsed.state_fips3.to_string(),
        division: parsed.division.to_string(),
        year,
        monthly_temps,
    }))
}

/// Reads the climate file at `path` and returns per-state 5-year averages.
///
/// # Errors
///
/// Returns [`PipelineError::SourceNotFound`] if the file cannot be opened and
/// [`PipelineError::MalformedRecord`] for a non-numeric year or temperature
/// or a line that is not valid UTF-8.
#[tracing::instrument(skip_all, fields(source = %path.as_ref().display()))]
pub fn load_temperatures(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<Vec<StateTemperature>> {
    let path = path.as_ref();
    let reader = open_source(path)?;
    parse_temperatures(reader, path, config)
}

/// Parses climate-file content from any buffered reader; `path` is only used
/// to label errors.
pub fn parse_temperatures<R: BufRead>(
    reader: R,
    path: &Path,
    config: &PipelineConfig,
) -> Result<Vec<StateTemperature>> {
    let window = config.year_window();

    let mut statewide = Vec::new();
    let mut first_division = Vec::new();
    let mut lines_read = 0u64;
    let mut skipped = 0u64;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx as u64 + 1;
        let line = line.map_err(|e| PipelineError::malformed(path, line_no, e.to_string()))?;
        lines_read += 1;

        let Some(record) = parse_line(&line, path, line_no)? else {
            skipped += 1;
            continue;
        };

        if !window.contains(&record.year) {
            continue;
        }

        match record.division.as_str() {
            STATEWIDE_DIVISION => statewide.push(record),
            FALLBACK_DIVISION => first_division.push(record),
            _ => {}
        }
    }

    if skipped > 0 {
        debug!(skipped, "Skipped short or unparseable lines");
    }

    info!(
        lines_read,
        statewide = statewide.len(),
        first_year = window.start(),
        last_year = window.end(),
        "Statewide records in year window"
    );

    let selected = if statewide.is_empty() {
        warn!("No statewide (division 00) data found, using division 01");
        first_division
    } else {
        statewide
    };

    let mut temps = aggregate_by_state(&selected);

    if !temps.iter().any(|t| t.state_code == HAWAII) {
        let table = StateTable::global();
        temps.push(StateTemperature {
            state_code: HAWAII.to_string(),
            state_name: table.name_for(HAWAII).unwrap_or("Hawaii").to_string(),
            avg_dec_temperature: config.hawaii.avg_dec_temperature,
            avg_nov_temperature: config.hawaii.avg_nov_temperature,
        });
        info!("Added Hawaii with estimated temperature data");
    }

    info!(states = temps.len(), "Loaded temperature data");
    Ok(temps)
}

/// Groups records by 3-digit state number, averages November and December,
/// and resolves each group through the state table. Groups without a table
/// entry are dropped.
fn aggregate_by_state(records: &[RawTemperatureRecord]) -> Vec<StateTemperature> {
    let mut series: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in records {
        let (dec, nov) = series.entry(record.state_fips3.as_str()).or_default();
        dec.push(record.dec());
        nov.push(record.nov());
    }

    let table = StateTable::global();
    series
        .into_iter()
        .filter_map(|(fips3, (dec, nov))| {
            let fips2 = normalize_fips3(fips3);
            let Some(state) = table.by_fips(&fips2) else {
                warn!(fips = fips3, "Unresolved state number, dropping");
                return None;
            };
            Some(StateTemperature {
                state_code: state.code2.to_string(),
                state_name: state.name.to_string(),
                avg_dec_temperature: mean(&dec),
                avg_nov_temperature: mean(&nov),
            })
        })
        .collect()
}
