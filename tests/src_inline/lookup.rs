use super::*;
use crate::store::{Dataset, DatasetRows, RefseqRow};

fn gene(id: &str, symbol: &str, name: &str) -> GeneEntry {
    GeneEntry::new(GeneId::from(id), symbol, name)
}

fn dataset() -> Dataset {
    Dataset::from_rows(DatasetRows {
        genes: vec![
            gene("1101", "BRCA2", "BRCA2 DNA repair associated"),
            gene("7881", "NOTCH1", "notch receptor 1"),
            gene("3808", "FH", "fumarate hydratase"),
        ],
        refseq: vec![RefseqRow {
            id: "NM_000059.4".to_string(),
            hgnc_id: GeneId::from("1101"),
        }],
        ..DatasetRows::default()
    })
}

#[test]
fn test_split_terms() {
    assert_eq!(
        split_terms("BRCA2, NOTCH1,3808\n  brca2 BRCA2"),
        vec!["BRCA2", "NOTCH1", "3808", "brca2"]
    );
    assert!(split_terms(" , ,").is_empty());
}

#[test]
fn test_classify_terms() {
    assert_eq!(classify_term("3808"), (QueryKind::HgncId, "3808".to_string()));
    assert_eq!(classify_term("hgnc:3808"), (QueryKind::HgncId, "3808".to_string()));
    assert_eq!(classify_term("notch1"), (QueryKind::Symbol, "NOTCH1".to_string()));
    assert_eq!(classify_term("HGN"), (QueryKind::Symbol, "HGN".to_string()));
}

#[test]
fn test_lookup_and_resolve() {
    let ds = dataset();
    let terms = split_terms("brca2, 3808, NOPE, HGNC:1101");
    let lookups = lookup_terms(&ds, &terms);
    assert_eq!(lookups.len(), 4);
    assert!(lookups[0].is_found());
    assert_eq!(lookups[1].hits[0].symbol, "FH");
    assert!(!lookups[2].is_found());
    assert_eq!(lookups[3].kind, QueryKind::HgncId);

    let ids = resolve_gene_ids(&lookups);
    assert_eq!(ids, vec![GeneId::from("1101"), GeneId::from("3808")]);
}
