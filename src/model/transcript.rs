use serde::Serialize;

use crate::model::or_na;

/// One transcript row of a panel version. `sort_key` is the refseq id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptRecord {
    pub sort_key: String,
    pub gene_id: String,
    pub gene_symbol: String,
}

impl TranscriptRecord {
    pub fn new(
        sort_key: impl Into<String>,
        gene_id: impl Into<String>,
        gene_symbol: impl Into<String>,
    ) -> Self {
        TranscriptRecord {
            sort_key: sort_key.into(),
            gene_id: gene_id.into(),
            gene_symbol: gene_symbol.into(),
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{}, {}, {}",
            self.sort_key,
            or_na(&self.gene_id),
            or_na(&self.gene_symbol)
        )
    }
}
