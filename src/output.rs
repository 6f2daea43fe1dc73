//! Output formatting and persistence for the combined state table.
//!
//! Supports pretty-printing, JSON logging, and the CSV snapshot that later
//! runs can render from.

use std::path::Path;

use csv::WriterBuilder;
use tracing::{debug, info};

use crate::combine::CombinedStateRow;
use crate::error::{PipelineError, Result};
use crate::loaders::open_source;

/// Logs the combined rows using Rust's debug pretty-print format.
pub fn print_pretty(rows: &[CombinedStateRow]) {
    debug!("{:#?}", rows);
}

/// Logs the combined rows as pretty-printed JSON.
pub fn print_json(rows: &[CombinedStateRow]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

/// Logs one line per state with the fields the dashboard maps.
pub fn print_summary(rows: &[CombinedStateRow]) {
    for row in rows {
        info!(
            state_code = %row.state_code,
            state_name = %row.state_name,
            holiday_travel_volume = row.holiday_travel_volume,
            avg_delay_pct = format!("{:.2}", row.avg_delay_pct),
            avg_dec_temperature = format!("{:.2}", row.avg_dec_temperature),
            "State summary"
        );
    }
}

/// Writes the combined table to `path`, replacing any existing file.
pub fn write_snapshot(path: impl AsRef<Path>, rows: &[CombinedStateRow]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = rows.len(), "Writing snapshot");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Saved combined data");
    Ok(())
}

/// Reads a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Vec<CombinedStateRow>> {
    let path = path.as_ref();
    let reader = open_source(path)?;
    let mut rdr = csv::Reader::from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: CombinedStateRow = result.map_err(|e| PipelineError::from_csv(path, e))?;
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "Read snapshot");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_rows() -> Vec<CombinedStateRow> {
        vec![
            CombinedStateRow {
                state_code: "CA".to_string(),
                state_name: "California".to_string(),
                avg_dec_temperature: 46.42,
                avg_nov_temperature: 53.1,
                holiday_travel_volume: 425,
                nov_passengers: 300,
                dec_passengers: 125,
                avg_delay_pct: 17.5,
                avg_delay_minutes: 2700.0 / 70.0,
                total_flights: 400,
                delayed_flights: 70,
                cancelled_flights: 3,
            },
            CombinedStateRow {
                state_code: "WY".to_string(),
                state_name: "Wyoming".to_string(),
                avg_dec_temperature: 21.3,
                avg_nov_temperature: 30.02,
                holiday_travel_volume: 0,
                nov_passengers: 0,
                dec_passengers: 0,
                avg_delay_pct: 0.0,
                avg_delay_minutes: 0.0,
                total_flights: 0,
                delayed_flights: 0,
                cancelled_flights: 0,
            },
        ]
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_rows());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_rows()).unwrap();
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        print_summary(&sample_rows());
    }

    #[test]
    fn test_snapshot_header() {
        let path = temp_path("holiday_travel_test_header.csv");
        let _ = fs::remove_file(&path);

        write_snapshot(&path, &sample_rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "state_code,state_name,avg_dec_temperature,avg_nov_temperature,\
             holiday_travel_volume,nov_passengers,dec_passengers,avg_delay_pct,\
             avg_delay_minutes,total_flights,delayed_flights,cancelled_flights"
        );
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_snapshot_round_trip() {
        let path = temp_path("holiday_travel_test_round_trip.csv");
        let _ = fs::remove_file(&path);

        let rows = sample_rows();
        write_snapshot(&path, &rows).unwrap();
        let back = read_snapshot(&path).unwrap();

        assert_eq!(back.len(), rows.len());
        for (a, b) in rows.iter().zip(&back) {
            assert_eq!(a.state_code, b.state_code);
            assert_eq!(a.state_name, b.state_name);
            assert_eq!(a.holiday_travel_volume, b.holiday_travel_volume);
            assert_eq!(a.cancelled_flights, b.cancelled_flights);
            assert!((a.avg_dec_temperature - b.avg_dec_temperature).abs() < 1e-9);
            assert!((a.avg_delay_pct - b.avg_delay_pct).abs() < 1e-9);
            assert!((a.avg_delay_minutes - b.avg_delay_minutes).abs() < 1e-9);
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_snapshot_truncates() {
        let path = temp_path("holiday_travel_test_truncate.csv");
        let _ = fs::remove_file(&path);

        write_snapshot(&path, &sample_rows()).unwrap();
        write_snapshot(&path, &sample_rows()[..1]).unwrap();

        assert_eq!(read_snapshot(&path).unwrap().len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_missing_snapshot() {
        let err = read_snapshot(temp_path("holiday_travel_no_such_snapshot.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    }
}
