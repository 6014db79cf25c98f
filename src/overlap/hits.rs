use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{GenePanelVersionId, PanelHitCount};
use crate::overlap::GeneSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelHitNode {
    #[serde(flatten)]
    pub hit: PanelHitCount,
    pub hit_ratio: f64,
}

impl PanelHitNode {
    fn new(hit: &PanelHitCount, total: usize) -> Self {
        PanelHitNode {
            hit: hit.clone(),
            hit_ratio: hit.hit_count as f64 / total as f64,
        }
    }

    pub fn panel(&self) -> &GenePanelVersionId {
        &self.hit.panel
    }
}

/// Latest version of a panel with the older versions of the same name below it.
///
/// Children do not store their parent; `parent_of` derives it from the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelHitTree {
    #[serde(flatten)]
    pub latest: PanelHitNode,
    pub children: Vec<PanelHitNode>,
}

impl PanelHitTree {
    pub fn name(&self) -> &str {
        &self.latest.hit.panel.name
    }

    pub fn parent_of(&self, child: &GenePanelVersionId) -> Option<&GenePanelVersionId> {
        self.children
            .iter()
            .any(|c| c.panel() == child)
            .then(|| self.latest.panel())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PanelHitNode> {
        std::iter::once(&self.latest).chain(self.children.iter())
    }
}

/// Groups unaggregated hit rows into one tree per panel name.
///
/// Rows with no hits, or with more hits than there are candidates, are dropped.
/// A panel name without a latest row among the hits yields no tree.
pub fn aggregate_hits_by_panel(candidates: &GeneSet, hit_rows: &[PanelHitCount]) -> Vec<PanelHitTree> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let total = candidates.len();

    let mut by_name: BTreeMap<&str, Vec<&PanelHitCount>> = BTreeMap::new();
    for row in hit_rows {
        if row.hit_count == 0 {
            continue;
        }
        if row.hit_count > total {
            tracing::warn!(
                panel = %row.panel,
                hit_count = row.hit_count,
                candidates = total,
                "hit count exceeds candidate set size; skipping row"
            );
            continue;
        }
        by_name.entry(row.panel.name.as_str()).or_default().push(row);
    }

    let mut trees = Vec::with_capacity(by_name.len());
    for (name, mut rows) in by_name {
        rows.sort_by(|a, b| a.panel.version.cmp(&b.panel.version));
        rows.dedup_by(|a, b| a.panel == b.panel);

        let Some(root_idx) = rows.iter().rposition(|r| r.is_latest) else {
            tracing::debug!(
                panel = name,
                rows = rows.len(),
                "latest version has no hits; dropping older versions"
            );
            continue;
        };
        let root = rows.remove(root_idx);
        let children = rows.into_iter().map(|r| PanelHitNode::new(r, total)).collect();

        trees.push(PanelHitTree {
            latest: PanelHitNode::new(root, total),
            children,
        });
    }

    trees
}

#[cfg(test)]
#[path = "../../tests/src_inline/overlap/hits.rs"]
mod tests;
