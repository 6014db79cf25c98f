use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// HGNC gene identifier, compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneId(String);

impl GeneId {
    pub fn new(id: impl Into<String>) -> Self {
        GeneId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GeneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for GeneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GeneId {
    fn from(value: &str) -> Self {
        GeneId(value.to_string())
    }
}

impl From<String> for GeneId {
    fn from(value: String) -> Self {
        GeneId(value)
    }
}

/// Fraction of a gene covered by whole-genome and whole-exome sequencing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GeneCoverage {
    pub wgs: Option<f64>,
    pub wes: Option<f64>,
}

/// Minimum coverage a gene must reach. Unknown coverage always passes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoverageFilter {
    pub min_wgs: f64,
    pub min_wes: f64,
}

impl CoverageFilter {
    pub fn is_active(&self) -> bool {
        self.min_wgs > 0.0 || self.min_wes > 0.0
    }

    pub fn accepts(&self, coverage: &GeneCoverage) -> bool {
        coverage.wgs.is_none_or(|c| c >= self.min_wgs)
            && coverage.wes.is_none_or(|c| c >= self.min_wes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneEntry {
    pub hgnc_id: GeneId,
    pub symbol: String,
    pub name: String,
    pub coverage: GeneCoverage,
}

impl GeneEntry {
    pub fn new(hgnc_id: GeneId, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        GeneEntry {
            hgnc_id,
            symbol: symbol.into(),
            name: name.into(),
            coverage: GeneCoverage::default(),
        }
    }

    /// Placeholder for an id that has no row in the gene name table.
    pub fn unknown(hgnc_id: GeneId) -> Self {
        GeneEntry::new(hgnc_id, "", "")
    }

    pub fn is_known(&self) -> bool {
        !self.symbol.is_empty()
    }
}

pub fn sort_by_symbol(genes: &mut [GeneEntry]) {
    genes.sort_by(|a, b| {
        a.symbol
            .cmp(&b.symbol)
            .then_with(|| a.hgnc_id.cmp(&b.hgnc_id))
    });
}
