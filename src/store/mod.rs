use std::path::PathBuf;

use thiserror::Error;

use crate::model::{
    DatasetVersion, GeneEntry, GeneId, GenePanelVersionId, LatestPanelEntry, PanelHitCount,
    PanelVersion, TranscriptRecord,
};
use crate::overlap::GeneSet;

pub mod dataset;
pub mod tables;

pub use dataset::{Dataset, DatasetRows, GeneInfoRow, PanelRow, RefseqRow, RegionRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing table {table}.tsv(.gz) in {}", .dir.display())]
    MissingTable { table: String, dir: PathBuf },
    #[error("missing column `{column}` in table {table}")]
    MissingColumn { table: String, column: String },
    #[error("parse error in table {table} line {line}: {msg}")]
    Parse {
        table: String,
        line: usize,
        msg: String,
    },
    #[error("no data found for {0}")]
    NotFound(String),
}

/// Read-only queries over the gene panel dataset.
pub trait PanelSource {
    /// Transcripts of one panel version, ascending and unique by refseq id.
    fn panel_transcripts(
        &self,
        panel: &GenePanelVersionId,
    ) -> Result<Vec<TranscriptRecord>, StoreError>;

    /// Distinct genes of one panel version, ordered by symbol.
    fn panel_gene_ids(&self, panel: &GenePanelVersionId) -> Result<Vec<GeneId>, StoreError>;

    /// One row per panel version containing at least one candidate gene.
    fn panel_hit_counts(&self, candidates: &GeneSet) -> Vec<PanelHitCount>;

    fn list_panel_versions(&self, name: Option<&str>) -> Vec<PanelVersion>;

    fn panel_version(&self, panel: &GenePanelVersionId) -> Result<PanelVersion, StoreError>;

    fn gene_by_hgnc_id(&self, hgnc_id: &GeneId) -> Option<GeneEntry>;

    fn genes_by_symbol(&self, symbol: &str) -> Vec<GeneEntry>;

    fn genes_by_symbol_prefix(&self, prefix: &str, limit: usize) -> Vec<GeneEntry>;

    fn latest_panels_for_gene(&self, hgnc_id: &GeneId) -> Vec<LatestPanelEntry>;

    fn dataset_version(&self) -> Option<DatasetVersion>;
}

#[cfg(test)]
#[path = "../../tests/src_inline/store/tests.rs"]
mod tests;
