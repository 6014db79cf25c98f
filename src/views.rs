use serde::Serialize;

use crate::diff::{PanelDiff, diff_panels};
use crate::model::gene::sort_by_symbol;
use crate::model::{
    CoverageFilter, GeneEntry, GeneId, GenePanelVersionId, LatestPanelEntry, PanelVersion,
};
use crate::overlap::{PanelHitTree, aggregate_hits_by_panel, gene_set, partition_gene_set};
use crate::store::{PanelSource, StoreError};

#[derive(Debug, Clone, Serialize)]
pub struct GeneView {
    pub gene: GeneEntry,
    pub panels: Vec<LatestPanelEntry>,
}

pub fn gene_view(source: &dyn PanelSource, hgnc_id: &GeneId) -> Result<GeneView, StoreError> {
    let gene = source
        .gene_by_hgnc_id(hgnc_id)
        .ok_or_else(|| StoreError::NotFound(format!("gene with HGNC ID \"{hgnc_id}\"")))?;
    let panels = source.latest_panels_for_gene(hgnc_id);
    Ok(GeneView { gene, panels })
}

/// Latest version of every panel, optionally filtered by a name substring.
pub fn list_latest_panels(source: &dyn PanelSource, filter: Option<&str>) -> Vec<PanelVersion> {
    let needle = filter.map(|f| f.trim().to_uppercase()).filter(|f| !f.is_empty());
    source
        .list_panel_versions(None)
        .into_iter()
        .filter(|p| p.is_latest)
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|n| p.id.name.to_uppercase().contains(n))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelDetail {
    pub panel: PanelVersion,
    pub other_versions: Vec<PanelVersion>,
    pub genes: Vec<GeneEntry>,
    /// Panel genes left out by the coverage filter.
    pub hidden_by_filter: usize,
    pub compare: Option<(GenePanelVersionId, GenePanelVersionId)>,
}

impl PanelDetail {
    pub fn is_superseded(&self) -> bool {
        !self.panel.is_latest
    }
}

/// Panel version with its genes; genes below `filter` are left out and counted.
pub fn panel_detail(
    source: &dyn PanelSource,
    panel: &GenePanelVersionId,
    filter: &CoverageFilter,
) -> Result<PanelDetail, StoreError> {
    let current = source.panel_version(panel)?;
    let other_versions: Vec<PanelVersion> = source
        .list_panel_versions(Some(&panel.name))
        .into_iter()
        .filter(|p| p.id.version != panel.version)
        .collect();
    let all_genes = expand_genes(source, &source.panel_gene_ids(panel)?);
    let total = all_genes.len();
    let genes: Vec<GeneEntry> = all_genes
        .into_iter()
        .filter(|g| filter.accepts(&g.coverage))
        .collect();
    if filter.is_active() {
        tracing::debug!(
            panel = %panel,
            kept = genes.len(),
            total,
            "applied coverage filter"
        );
    }
    let compare = other_versions
        .first()
        .map(|other| (other.id.clone(), current.id.clone()));
    Ok(PanelDetail {
        panel: current,
        other_versions,
        hidden_by_filter: total - genes.len(),
        genes,
        compare,
    })
}

/// Resolves a panel by name, defaulting to its latest version.
pub fn resolve_panel(
    source: &dyn PanelSource,
    name: &str,
    version: Option<&str>,
) -> Result<GenePanelVersionId, StoreError> {
    if let Some(version) = version {
        let id = GenePanelVersionId::new(name, version);
        source.panel_version(&id)?;
        return Ok(id);
    }
    source
        .list_panel_versions(Some(name))
        .into_iter()
        .rfind(|p| p.is_latest)
        .map(|p| p.id)
        .ok_or_else(|| StoreError::NotFound(format!("gene panel {name}")))
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffView {
    pub left: GenePanelVersionId,
    pub right: GenePanelVersionId,
    pub diff: PanelDiff,
}

pub fn diff_view(
    source: &dyn PanelSource,
    left: &GenePanelVersionId,
    right: &GenePanelVersionId,
) -> Result<DiffView, StoreError> {
    let seq_a = source.panel_transcripts(left)?;
    let seq_b = source.panel_transcripts(right)?;
    let diff = diff_panels(&seq_a, &seq_b);
    tracing::info!(
        left = %left,
        right = %right,
        deletions = diff.deletions,
        insertions = diff.insertions,
        "compared gene panels"
    );
    Ok(DiffView {
        left: left.clone(),
        right: right.clone(),
        diff,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlapView {
    pub panel: PanelVersion,
    pub selected: Vec<GeneEntry>,
    pub included_in_panel: Vec<GeneEntry>,
    pub not_included_in_panel: Vec<GeneEntry>,
    pub panel_only_others: Vec<GeneEntry>,
}

pub fn overlap_view(
    source: &dyn PanelSource,
    panel: &GenePanelVersionId,
    candidates: &[GeneId],
) -> Result<OverlapView, StoreError> {
    let panel_version = source.panel_version(panel)?;
    let panel_genes = source.panel_gene_ids(panel)?;
    let partition = partition_gene_set(candidates, &panel_genes);
    Ok(OverlapView {
        panel: panel_version,
        selected: expand_genes(source, candidates),
        included_in_panel: expand_genes(source, &partition.included_in_panel),
        not_included_in_panel: expand_genes(source, &partition.not_included_in_panel),
        panel_only_others: expand_genes(source, &partition.panel_only_others),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct GenesView {
    pub candidates: Vec<GeneId>,
    pub panels: Vec<PanelHitTree>,
}

pub fn genes_view(source: &dyn PanelSource, candidates: &[GeneId]) -> GenesView {
    let set = gene_set(candidates.iter().cloned());
    let rows = source.panel_hit_counts(&set);
    let panels = aggregate_hits_by_panel(&set, &rows);
    GenesView {
        candidates: set.into_iter().collect(),
        panels,
    }
}

/// Gene entries for `ids`, sorted by symbol. Unknown ids are kept as placeholders.
pub fn expand_genes(source: &dyn PanelSource, ids: &[GeneId]) -> Vec<GeneEntry> {
    let mut seen = std::collections::BTreeSet::new();
    let mut out: Vec<GeneEntry> = ids
        .iter()
        .filter(|id| seen.insert(*id))
        .map(|id| {
            source
                .gene_by_hgnc_id(id)
                .unwrap_or_else(|| GeneEntry::unknown(id.clone()))
        })
        .collect();
    sort_by_symbol(&mut out);
    out
}

#[cfg(test)]
#[path = "../tests/src_inline/views.rs"]
mod tests;
