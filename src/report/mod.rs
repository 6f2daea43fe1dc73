//! Dashboard rendering: three choropleth figures and the HTML page that
//! embeds them.

pub mod charts;
pub mod html;

pub use html::{render_dashboard, write_dashboard};

use chrono::{DateTime, Utc};

use crate::config::PipelineConfig;

/// Labels shared by the figures and the page footer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMeta {
    pub current_year: i32,
    pub first_year: i32,
    pub generated_at: DateTime<Utc>,
}

impl ReportMeta {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let window = config.year_window();
        Self {
            current_year: *window.end(),
            first_year: *window.start(),
            generated_at: Utc::now(),
        }
    }
}
