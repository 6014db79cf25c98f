use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::GeneId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneSetPartition {
    pub included_in_panel: Vec<GeneId>,
    pub not_included_in_panel: Vec<GeneId>,
    pub panel_only_others: Vec<GeneId>,
}

/// Splits a candidate selection against the genes of one panel version.
///
/// Duplicates collapse; each list keeps first-appearance order of its source.
pub fn partition_gene_set(candidates: &[GeneId], panel_genes: &[GeneId]) -> GeneSetPartition {
    let candidate_set: BTreeSet<&GeneId> = candidates.iter().collect();
    let panel_set: BTreeSet<&GeneId> = panel_genes.iter().collect();

    let mut out = GeneSetPartition::default();
    let mut seen = BTreeSet::new();

    for gene in candidates {
        if !seen.insert(gene) {
            continue;
        }
        if panel_set.contains(gene) {
            out.included_in_panel.push(gene.clone());
        } else {
            out.not_included_in_panel.push(gene.clone());
        }
    }

    seen.clear();
    for gene in panel_genes {
        if !seen.insert(gene) {
            continue;
        }
        if !candidate_set.contains(gene) {
            out.panel_only_others.push(gene.clone());
        }
    }

    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/overlap/partition.rs"]
mod tests;
