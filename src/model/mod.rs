use chrono::NaiveDate;
use serde::Serialize;

pub mod gene;
pub mod panel;
pub mod transcript;

pub use gene::{CoverageFilter, GeneCoverage, GeneEntry, GeneId};
pub use panel::{GenePanelVersionId, LatestPanelEntry, PanelHitCount, PanelVersion};
pub use transcript::TranscriptRecord;

/// Rendered in place of a missing value.
pub const NA_SYMBOL: &str = "-";

pub fn or_na(value: &str) -> &str {
    if value.is_empty() { NA_SYMBOL } else { value }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetVersion {
    pub sha1: String,
    pub date: Option<NaiveDate>,
    pub label: String,
}

impl DatasetVersion {
    pub fn short_sha(&self) -> &str {
        self.sha1.get(..7).unwrap_or(&self.sha1)
    }

    /// File stem used for table downloads, e.g. `gpov_1a2b3c4_2023-04-01`.
    pub fn download_stem(&self) -> String {
        match self.date {
            Some(date) => format!("gpov_{}_{}", self.short_sha(), date.format("%Y-%m-%d")),
            None => format!("gpov_{}", self.short_sha()),
        }
    }
}
