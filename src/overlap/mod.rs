use std::collections::BTreeSet;

use crate::model::GeneId;

pub mod hits;
pub mod partition;

pub use hits::{PanelHitNode, PanelHitTree, aggregate_hits_by_panel};
pub use partition::{GeneSetPartition, partition_gene_set};

pub type GeneSet = BTreeSet<GeneId>;

pub fn gene_set<I>(genes: I) -> GeneSet
where
    I: IntoIterator,
    I::Item: Into<GeneId>,
{
    genes.into_iter().map(Into::into).collect()
}
