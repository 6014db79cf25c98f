use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GenePanelVersionId {
    pub name: String,
    pub version: String,
}

impl GenePanelVersionId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        GenePanelVersionId {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for GenePanelVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelVersion {
    pub id: GenePanelVersionId,
    pub is_latest: bool,
    pub date_created: Option<NaiveDate>,
    pub num_transcripts: usize,
}

/// Number of candidate genes found in one panel version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelHitCount {
    pub panel: GenePanelVersionId,
    pub hit_count: usize,
    pub is_latest: bool,
    pub date_created: Option<NaiveDate>,
}

/// A latest-version panel row that contains a given gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestPanelEntry {
    pub panel: GenePanelVersionId,
    pub transcript: String,
    pub transcript_source: Option<String>,
    pub inheritance: Option<String>,
}
