//! Plotly figure specifications for the three state maps.
//!
//! Each function returns a figure document (`{"data": [...], "layout": {...}}`)
//! ready to pass to `Plotly.newPlot`.

use serde_json::{Value, json};

use super::ReportMeta;
use crate::combine::CombinedStateRow;

const MAP_HEIGHT: u32 = 500;

/// Cold-to-warm scale for December temperatures.
static TEMPERATURE_SCALE: &[(f64, &str)] = &[
    (0.0, "#08306b"),
    (0.2, "#2171b5"),
    (0.4, "#6baed6"),
    (0.5, "#c6dbef"),
    (0.6, "#fee8c8"),
    (0.8, "#fc8d59"),
    (1.0, "#b30000"),
];

fn choropleth(
    rows: &[CombinedStateRow],
    z: Vec<f64>,
    colorscale: Value,
    colorbar_title: &str,
    hover_line: &str,
) -> Value {
    let locations: Vec<&str> = rows.iter().map(|r| r.state_code.as_str()).collect();
    let text: Vec<&str> = rows.iter().map(|r| r.state_name.as_str()).collect();

    json!({
        "type": "choropleth",
        "locations": locations,
        "z": z,
        "locationmode": "USA-states",
        "colorscale": colorscale,
        "colorbar": { "title": { "text": colorbar_title } },
        "hovertemplate": format!("<b>%{{text}}</b><br>{hover_line}<br><extra></extra>"),
        "text": text,
        "marker": { "line": { "color": "white", "width": 0.5 } },
    })
}

fn map_layout(title: &str, subtitle: &str) -> Value {
    json!({
        "title": {
            "text": format!("<b>{title}</b><br><sup>{subtitle}</sup>"),
            "x": 0.5,
            "xanchor": "center",
        },
        "geo": {
            "scope": "usa",
            "projection": { "type": "albers usa" },
            "showlakes": true,
            "lakecolor": "rgb(255, 255, 255)",
            "bgcolor": "rgba(0,0,0,0)",
        },
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "margin": { "l": 0, "r": 0, "t": 80, "b": 0 },
        "height": MAP_HEIGHT,
    })
}

/// Holiday passengers per state, in millions.
pub fn travel_volume_map(rows: &[CombinedStateRow], meta: &ReportMeta) -> Value {
    let z = rows
        .iter()
        .map(|r| r.holiday_travel_volume as f64 / 1_000_000.0)
        .collect();

    json!({
        "data": [choropleth(
            rows,
            z,
            json!("Blues"),
            "Passengers<br>(Millions)",
            "Holiday Travel Volume: %{z:.2f}M passengers",
        )],
        "layout": map_layout(
            "Holiday Travel Volume by State",
            &format!("November-December {} Airport Passengers", meta.current_year),
        ),
    })
}

/// Flight-weighted delay rate per state.
pub fn delay_map(rows: &[CombinedStateRow], meta: &ReportMeta) -> Value {
    let z = rows.iter().map(|r| r.avg_delay_pct).collect();

    json!({
        "data": [choropleth(
            rows,
            z,
            json!("Reds"),
            "Delay %",
            "Average Delay Rate: %{z:.1f}%",
        )],
        "layout": map_layout(
            "Average Flight Delay Rate by State",
            &format!("November-December {}", meta.current_year),
        ),
    })
}

/// Multi-year average December temperature per state.
pub fn temperature_map(rows: &[CombinedStateRow], meta: &ReportMeta) -> Value {
    let z = rows.iter().map(|r| r.avg_dec_temperature).collect();
    let scale: Vec<Value> = TEMPERATURE_SCALE
        .iter()
        .map(|&(stop, color)| json!([stop, color]))
        .collect();

    json!({
        "data": [choropleth(
            rows,
            z,
            Value::Array(scale),
            "Temp (°F)",
            "Avg December Temp: %{z:.1f}°F",
        )],
        "layout": map_layout(
            "Average December Temperature by State",
            &format!(
                "{}-Year Average ({}-{})",
                meta.current_year - meta.first_year + 1,
                meta.first_year,
                meta.current_year
            ),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn meta() -> ReportMeta {
        ReportMeta {
            current_year: 2024,
            first_year: 2020,
            generated_at: Utc::now(),
        }
    }

    fn rows() -> Vec<CombinedStateRow> {
        ["CA", "TX"]
            .iter()
            .enumerate()
            .map(|(i, code)| CombinedStateRow {
                state_code: code.to_string(),
                state_name: format!("State {code}"),
                avg_dec_temperature: 40.0 + i as f64,
                avg_nov_temperature: 50.0,
                holiday_travel_volume: 2_500_000 * (i as u64 + 1),
                nov_passengers: 0,
                dec_passengers: 0,
                avg_delay_pct: 12.5,
                avg_delay_minutes: 30.0,
                total_flights: 0,
                delayed_flights: 0,
                cancelled_flights: 0,
            })
            .collect()
    }

    #[test]
    fn test_travel_map_in_millions() {
        let fig = travel_volume_map(&rows(), &meta());
        let trace = &fig["data"][0];
        assert_eq!(trace["type"], "choropleth");
        assert_eq!(trace["locationmode"], "USA-states");
        assert_eq!(trace["locations"], json!(["CA", "TX"]));
        assert_eq!(trace["z"], json!([2.5, 5.0]));
        assert_eq!(trace["colorscale"], "Blues");
        assert_eq!(fig["layout"]["height"], 500);
    }

    #[test]
    fn test_delay_map_values() {
        let fig = delay_map(&rows(), &meta());
        assert_eq!(fig["data"][0]["z"], json!([12.5, 12.5]));
        assert_eq!(fig["data"][0]["text"], json!(["State CA", "State TX"]));
        assert_eq!(fig["data"][0]["colorscale"], "Reds");
    }

    #[test]
    fn test_temperature_map_scale_and_title() {
        let fig = temperature_map(&rows(), &meta());
        let scale = fig["data"][0]["colorscale"].as_array().unwrap();
        assert_eq!(scale.len(), 7);
        assert_eq!(scale[0], json!([0.0, "#08306b"]));
        let title = fig["layout"]["title"]["text"].as_str().unwrap();
        assert!(title.contains("5-Year Average (2020-2024)"));
    }

    #[test]
    fn test_hovertemplate_keeps_plotly_placeholders() {
        let fig = delay_map(&rows(), &meta());
        let hover = fig["data"][0]["hovertemplate"].as_str().unwrap();
        assert!(hover.starts_with("<b>%{text}</b><br>"));
        assert!(hover.contains("%{z:.1f}%"));
    }
}
