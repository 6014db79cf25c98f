pub mod diff;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod overlap;
pub mod report;
pub mod routes;
pub mod store;
pub mod views;

pub use diff::{DiffEntry, PanelDiff, diff_panels};
pub use error::{Error, Result};
pub use overlap::{GeneSetPartition, PanelHitTree, aggregate_hits_by_panel, partition_gene_set};
