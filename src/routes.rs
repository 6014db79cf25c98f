use url::form_urlencoded;

use crate::model::{GeneId, GenePanelVersionId};
use crate::overlap::PanelHitTree;

const GENE: &str = "./gene.html";
const GENES: &str = "./genes.html";
const GENEPANEL: &str = "./genepanel.html";
const GENEPANEL_DIFF: &str = "./genepanel_diff.html";
const GENEPANEL_OVERLAP: &str = "./genepanel_ol.html";

fn page(base: &str, params: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{base}?{query}")
}

fn join_ids(ids: &[GeneId]) -> String {
    ids.iter().map(GeneId::as_str).collect::<Vec<_>>().join(",")
}

pub fn gene(hgnc_id: &GeneId) -> String {
    page(GENE, &[("hgncId", hgnc_id.as_str())])
}

pub fn genes(hgnc_ids: &[GeneId]) -> String {
    page(GENES, &[("hgnc_ids", join_ids(hgnc_ids).as_str())])
}

pub fn genepanel(panel: &GenePanelVersionId) -> String {
    page(GENEPANEL, &[("name", panel.name.as_str()), ("version", panel.version.as_str())])
}

pub fn genepanel_diff(a: &GenePanelVersionId, b: &GenePanelVersionId) -> String {
    page(
        GENEPANEL_DIFF,
        &[
            ("a_name", a.name.as_str()),
            ("a_version", a.version.as_str()),
            ("b_name", b.name.as_str()),
            ("b_version", b.version.as_str()),
        ],
    )
}

pub fn genepanel_overlap(panel: &GenePanelVersionId, hgnc_ids: &[GeneId]) -> String {
    page(
        GENEPANEL_OVERLAP,
        &[
            ("name", panel.name.as_str()),
            ("version", panel.version.as_str()),
            ("hgnc_ids", join_ids(hgnc_ids).as_str()),
        ],
    )
}

/// Diff link from an older version in `tree` to its latest version.
pub fn compare_to_latest(tree: &PanelHitTree, child: &GenePanelVersionId) -> Option<String> {
    tree.parent_of(child)
        .map(|parent| genepanel_diff(child, parent))
}

#[cfg(test)]
#[path = "../tests/src_inline/routes.rs"]
mod tests;
