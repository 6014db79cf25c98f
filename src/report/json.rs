use serde::Serialize;
use serde_json::{Value, json};

use crate::routes;
use crate::views::GenesView;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Genes view with page links; older versions also link to the diff against latest.
pub fn render_genes_json(view: &GenesView) -> Result<String, serde_json::Error> {
    let panels: Vec<Value> = view
        .panels
        .iter()
        .map(|tree| {
            let children: Vec<Value> = tree
                .children
                .iter()
                .map(|child| {
                    json!({
                        "node": child,
                        "link": routes::genepanel(child.panel()),
                        "compare_to_latest": routes::compare_to_latest(tree, child.panel()),
                    })
                })
                .collect();
            json!({
                "node": tree.latest,
                "link": routes::genepanel(tree.latest.panel()),
                "children": children,
            })
        })
        .collect();

    render_json(&json!({
        "candidates": view.candidates,
        "link": routes::genes(&view.candidates),
        "panels": panels,
    }))
}
