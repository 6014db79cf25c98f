use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{GeneEntry, GeneId};
use crate::store::PanelSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    HgncId,
    Symbol,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneLookup {
    pub query: String,
    pub kind: QueryKind,
    pub hits: Vec<GeneEntry>,
}

impl GeneLookup {
    pub fn is_found(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Splits free-text gene input on commas and whitespace, dropping repeats.
pub fn split_terms(input: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.to_string()))
        .map(str::to_string)
        .collect()
}

pub fn classify_term(term: &str) -> (QueryKind, String) {
    if let Some(id) = strip_hgnc_prefix(term) {
        return (QueryKind::HgncId, id.to_string());
    }
    if term.starts_with(|c: char| c.is_ascii_digit()) {
        return (QueryKind::HgncId, term.to_string());
    }
    (QueryKind::Symbol, term.to_ascii_uppercase())
}

fn strip_hgnc_prefix(term: &str) -> Option<&str> {
    let head = term.get(..5)?;
    head.eq_ignore_ascii_case("HGNC:").then(|| &term[5..])
}

pub fn lookup_terms(source: &dyn PanelSource, terms: &[String]) -> Vec<GeneLookup> {
    let mut out = Vec::with_capacity(terms.len());
    for term in terms {
        let (kind, key) = classify_term(term);
        let hits = match kind {
            QueryKind::HgncId => source
                .gene_by_hgnc_id(&GeneId::from(key.as_str()))
                .into_iter()
                .collect(),
            QueryKind::Symbol => source.genes_by_symbol(&key),
        };
        if hits.is_empty() {
            tracing::warn!(query = %term, "no gene found");
        }
        out.push(GeneLookup {
            query: term.clone(),
            kind,
            hits,
        });
    }
    out
}

/// Distinct HGNC ids of all lookup hits, in input order.
pub fn resolve_gene_ids(lookups: &[GeneLookup]) -> Vec<GeneId> {
    let mut seen = BTreeSet::new();
    lookups
        .iter()
        .flat_map(|l| l.hits.iter())
        .filter(|g| seen.insert(g.hgnc_id.clone()))
        .map(|g| g.hgnc_id.clone())
        .collect()
}

#[cfg(test)]
#[path = "../tests/src_inline/lookup.rs"]
mod tests;
