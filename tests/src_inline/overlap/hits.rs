use super::*;
use crate::overlap::gene_set;

fn row(name: &str, version: &str, hits: usize, latest: bool) -> PanelHitCount {
    PanelHitCount {
        panel: GenePanelVersionId::new(name, version),
        hit_count: hits,
        is_latest: latest,
        date_created: None,
    }
}

#[test]
fn test_empty_candidates_returns_nothing() {
    let rows = vec![row("HBOC", "v1", 1, true)];
    let trees = aggregate_hits_by_panel(&GeneSet::new(), &rows);
    assert!(trees.is_empty());
}

#[test]
fn test_latest_is_parent_of_older_versions() {
    let candidates = gene_set(["G1"]);
    let rows = vec![row("HBOC", "v1", 1, false), row("HBOC", "v2", 1, true)];
    let trees = aggregate_hits_by_panel(&candidates, &rows);

    assert_eq!(trees.len(), 1);
    let tree = &trees[0];
    assert_eq!(tree.latest.panel(), &GenePanelVersionId::new("HBOC", "v2"));
    assert_eq!(tree.children.len(), 1);
    let child = tree.children[0].panel();
    assert_eq!(child, &GenePanelVersionId::new("HBOC", "v1"));
    assert_eq!(tree.parent_of(child), Some(tree.latest.panel()));
    assert_eq!(tree.parent_of(tree.latest.panel()), None);
}

#[test]
fn test_ratio_and_ordering() {
    let candidates = gene_set(["G1", "G2", "G3", "G4"]);
    let rows = vec![
        row("Cardio", "v3", 2, true),
        row("Ataxia", "v1", 1, true),
        row("Cardio", "v1", 1, false),
        row("Cardio", "v2", 3, false),
    ];
    let trees = aggregate_hits_by_panel(&candidates, &rows);
    let names: Vec<&str> = trees.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["Ataxia", "Cardio"]);

    let cardio = &trees[1];
    assert_eq!(cardio.latest.hit_ratio, 0.5);
    let versions: Vec<&str> = cardio
        .children
        .iter()
        .map(|c| c.panel().version.as_str())
        .collect();
    assert_eq!(versions, vec!["v1", "v2"]);
    assert_eq!(cardio.children[1].hit_ratio, 0.75);
}

#[test]
fn test_hit_count_bounds() {
    let candidates = gene_set(["G1", "G2"]);
    let rows = vec![
        row("A", "v1", 0, true),
        row("B", "v1", 3, true),
        row("C", "v1", 2, true),
    ];
    let trees = aggregate_hits_by_panel(&candidates, &rows);
    assert_eq!(trees.len(), 1);
    for node in trees.iter().flat_map(|t| t.nodes()) {
        assert!(node.hit.hit_count > 0);
        assert!(node.hit.hit_count <= candidates.len());
    }
}

#[test]
fn test_one_latest_per_name() {
    let candidates = gene_set(["G1"]);
    let rows = vec![
        row("X", "v1", 1, false),
        row("X", "v2", 1, false),
        row("X", "v3", 1, true),
        row("Y", "v1", 1, true),
        row("Y", "v1", 1, true),
    ];
    let trees = aggregate_hits_by_panel(&candidates, &rows);
    assert_eq!(trees.len(), 2);
    for tree in &trees {
        let latest = tree.nodes().filter(|n| n.hit.is_latest).count();
        assert_eq!(latest, 1);
        assert!(tree.nodes().all(|n| n.panel().name == tree.name()));
    }
    assert!(trees[1].children.is_empty());
}

#[test]
fn test_orphaned_old_versions_dropped() {
    let candidates = gene_set(["G1"]);
    let rows = vec![row("Old", "v1", 1, false)];
    assert!(aggregate_hits_by_panel(&candidates, &rows).is_empty());
}

#[test]
fn test_deterministic() {
    let candidates = gene_set(["G1", "G2"]);
    let rows = vec![
        row("B", "v2", 1, true),
        row("A", "v1", 2, true),
        row("B", "v1", 1, false),
    ];
    let mut reversed = rows.clone();
    reversed.reverse();
    assert_eq!(
        aggregate_hits_by_panel(&candidates, &rows),
        aggregate_hits_by_panel(&candidates, &reversed)
    );
}

#[test]
fn test_serialized_tree_has_no_parent_field() {
    let candidates = gene_set(["G1"]);
    let rows = vec![row("HBOC", "v1", 1, false), row("HBOC", "v2", 1, true)];
    let trees = aggregate_hits_by_panel(&candidates, &rows);
    let json = serde_json::to_value(&trees).unwrap();
    let tree = &json[0];
    assert_eq!(tree["panel"]["version"], "v2");
    assert_eq!(tree["hit_ratio"], 1.0);
    assert_eq!(tree["children"][0]["panel"]["version"], "v1");
    assert!(tree["children"][0].get("parent").is_none());
}
