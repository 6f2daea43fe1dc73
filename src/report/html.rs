//! Self-contained HTML dashboard.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::ReportMeta;
use super::charts::{delay_map, temperature_map, travel_volume_map};
use crate::combine::CombinedStateRow;
use crate::error::Result;
use crate::stats::SummaryStats;

static TEMPLATE: &str = include_str!("dashboard.html");

const NOT_AVAILABLE: &str = "n/a";

/// Escapes text for use inside HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serializes a figure for a `<script>` block; `</` is escaped so embedded
/// strings cannot terminate the script element.
fn script_json(figure: &Value) -> Result<String> {
    Ok(serde_json::to_string(figure)?.replace("</", "<\\/"))
}

/// Renders the dashboard page for the combined table.
pub fn render_dashboard(rows: &[CombinedStateRow], meta: &ReportMeta) -> Result<String> {
    let stats = SummaryStats::from_rows(rows);

    let avg_delay = stats
        .avg_delay_pct
        .map(|pct| format!("{pct:.1}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let (warmest_name, warmest_temp) = match &stats.warmest {
        Some(w) => (escape_html(&w.state_name), format!("{:.0}", w.value)),
        None => (NOT_AVAILABLE.to_string(), "--".to_string()),
    };
    let busiest_name = stats
        .busiest
        .as_ref()
        .map(|b| escape_html(&b.state_name))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let travel = script_json(&travel_volume_map(rows, meta))?;
    let delays = script_json(&delay_map(rows, meta))?;
    let weather = script_json(&temperature_map(rows, meta))?;

    // Figures go in last so placeholder-like text inside data is left alone.
    let html = TEMPLATE
        .replace(
            "{{TOTAL_TRAVELERS}}",
            &format!("{:.1}", stats.total_travelers_millions()),
        )
        .replace("{{AVG_DELAY}}", &avg_delay)
        .replace("{{WARMEST_NAME}}", &warmest_name)
        .replace("{{WARMEST_TEMP}}", &warmest_temp)
        .replace("{{BUSIEST_NAME}}", &busiest_name)
        .replace("{{CURRENT_YEAR}}", &meta.current_year.to_string())
        .replace("{{FIRST_YEAR}}", &meta.first_year.to_string())
        .replace(
            "{{GENERATED_AT}}",
            &meta.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
        .replace("{{TRAVEL_JSON}}", &travel)
        .replace("{{DELAYS_JSON}}", &delays)
        .replace("{{WEATHER_JSON}}", &weather);

    Ok(html)
}

/// Writes the rendered page to `path`.
pub fn write_dashboard(path: impl AsRef<Path>, html: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    info!(path = %path.display(), bytes = html.len(), "Dashboard saved");
    Ok(())
}
