use serde::Serialize;

use crate::combine::CombinedStateRow;

/// A state picked out by one of the headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateHighlight {
    pub state_code: String,
    pub state_name: String,
    pub value: f64,
}

impl StateHighlight {
    fn new(row: &CombinedStateRow, value: f64) -> Self {
        Self {
            state_code: row.state_code.clone(),
            state_name: row.state_name.clone(),
            value,
        }
    }
}

/// Headline numbers shown above the dashboard maps.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_travelers: u64,

    // mean over states with a nonzero delay rate
    pub avg_delay_pct: Option<f64>,
    pub states_with_delay_data: usize,

    pub warmest: Option<StateHighlight>,
    pub coldest: Option<StateHighlight>,
    pub busiest: Option<StateHighlight>,
}

impl SummaryStats {
    pub fn from_rows(rows: &[CombinedStateRow]) -> Self {
        let mut s = SummaryStats {
            total_travelers: rows.iter().map(|r| r.holiday_travel_volume).sum(),
            ..Default::default()
        };

        let delay_rates: Vec<f64> = rows
            .iter()
            .map(|r| r.avg_delay_pct)
            .filter(|&pct| pct > 0.0)
            .collect();
        s.states_with_delay_data = delay_rates.len();
        if !delay_rates.is_empty() {
            s.avg_delay_pct = Some(delay_rates.iter().sum::<f64>() / delay_rates.len() as f64);
        }

        // Strict comparisons keep the first row on ties.
        for row in rows {
            let temp = row.avg_dec_temperature;
            if s.warmest.as_ref().is_none_or(|w| temp > w.value) {
                s.warmest = Some(StateHighlight::new(row, temp));
            }
            if s.coldest.as_ref().is_none_or(|c| temp < c.value) {
                s.coldest = Some(StateHighlight::new(row, temp));
            }

            let volume = row.holiday_travel_volume as f64;
            if s.busiest.as_ref().is_none_or(|b| volume > b.value) {
                s.busiest = Some(StateHighlight::new(row, volume));
            }
        }

        s
    }

    /// Total travelers in millions.
    pub fn total_travelers_millions(&self) -> f64 {
        self.total_travelers as f64 / 1_000_000.0
    }
}
