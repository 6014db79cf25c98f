use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::tables::{parse_date, parse_flag, parse_fraction};
use super::*;
use crate::model::GeneId;
use crate::overlap::{aggregate_hits_by_panel, gene_set};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("gpov_store_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

const GENENAMES_TSV: &str = "hgnc_id\tsymbol\tname\n\
1100\tBRCA1\tBRCA1 DNA repair associated\n\
1101\tBRCA2\tBRCA2 DNA repair associated\n\
26144\tPALB2\tpartner and localizer of BRCA2\n\
7127\tMLH1\tmutL homolog 1\n";

const REFSEQ_TSV: &str = "id\thgnc_id\n\
NM_007294.4\t1100\n\
NM_000059.4\t1101\n\
NM_024675.4\t26144\n\
NM_000249.4\t7127\n";

const GENEPANELS_TSV: &str = "name\tversion\tdate_created\n\
HBOC\tv01\t2021-03-01\n\
HBOC\tv02\t2022-06-15 10:00:00\n\
Lynch\tv01\t\n";

const REGIONS_TSV: &str = "genepanel_name\tgenepanel_version\trefseq_id\ttranscript_source\tinh_mode\n\
HBOC\tv01\tNM_007294.4\tRefSeq\tAD\n\
HBOC\tv01\tNM_000059.4\tRefSeq\tAD\n\
HBOC\tv02\tNM_000059.4\tRefSeq\tAD\n\
HBOC\tv02\tNM_007294.4\tRefSeq\tAD\n\
HBOC\tv02\tNM_024675.4\tRefSeq\tAD\n\
HBOC\tv02\tNM_999999.1\t\t\n\
Lynch\tv01\tNM_000249.4\tRefSeq\tAD\n";

fn write_fixture(dir: &Path) {
    write_file(&dir.join("genenames.tsv"), GENENAMES_TSV);
    write_gz(&dir.join("refseq.tsv.gz"), REFSEQ_TSV);
    write_file(&dir.join("genepanels.tsv"), GENEPANELS_TSV);
    write_gz(&dir.join("genepanel_regions.tsv.gz"), REGIONS_TSV);
    write_file(
        &dir.join("geneinfo.tsv"),
        "hgnc_id\tcoverage_wgs\tcoverage_wes\n1100\t0.998\t0.951\n7127\t0.97\t\n",
    );
    write_file(
        &dir.join("version.tsv"),
        "sha1\tdate\tlabel\n0123456789abcdef\t2023-04-01\trelease\n",
    );
}

fn fixture() -> Dataset {
    let dir = make_temp_dir();
    write_fixture(&dir);
    Dataset::load(&dir).unwrap()
}

fn hboc(version: &str) -> GenePanelVersionId {
    GenePanelVersionId::new("HBOC", version)
}

#[test]
fn test_load_plain_and_gz_tables() {
    let ds = fixture();
    assert_eq!(ds.n_genes(), 4);
    assert_eq!(ds.n_panel_versions(), 3);
    let version = ds.dataset_version().unwrap();
    assert_eq!(version.short_sha(), "0123456");
    assert_eq!(version.download_stem(), "gpov_0123456_2023-04-01");
}

#[test]
fn test_missing_table_reported() {
    let dir = make_temp_dir();
    write_file(&dir.join("genenames.tsv"), GENENAMES_TSV);
    let err = Dataset::load(&dir).unwrap_err();
    assert!(matches!(err, StoreError::MissingTable { ref table, .. } if table == "refseq"));
}

#[test]
fn test_missing_column_reported() {
    let dir = make_temp_dir();
    write_fixture(&dir);
    write_file(&dir.join("genenames.tsv"), "hgnc_id\tsymbol\n1100\tBRCA1\n");
    let err = Dataset::load(&dir).unwrap_err();
    assert!(matches!(err, StoreError::MissingColumn { ref column, .. } if column == "name"));
}

#[test]
fn test_bad_date_is_parse_error() {
    let dir = make_temp_dir();
    write_fixture(&dir);
    write_file(&dir.join("genepanels.tsv"), "name\tversion\tdate_created\nHBOC\tv01\tsoon\n");
    let err = Dataset::load(&dir).unwrap_err();
    assert!(matches!(err, StoreError::Parse { line: 2, .. }));
}

#[test]
fn test_latest_is_max_version_without_flag() {
    let ds = fixture();
    let versions = ds.list_panel_versions(Some("HBOC"));
    assert_eq!(versions.len(), 2);
    assert!(!versions[0].is_latest);
    assert!(versions[1].is_latest);
    assert_eq!(versions[1].id, hboc("v02"));
    assert_eq!(versions[1].num_transcripts, 4);
    assert_eq!(
        versions[1].date_created,
        chrono::NaiveDate::from_ymd_opt(2022, 6, 15)
    );
    assert!(ds.list_panel_versions(None).iter().any(|p| p.id.name == "Lynch" && p.is_latest));
}

#[test]
fn test_explicit_latest_flag_wins() {
    let rows = DatasetRows {
        panels: vec![
            PanelRow {
                id: hboc("v01"),
                date_created: None,
                is_latest: Some(true),
            },
            PanelRow {
                id: hboc("v02"),
                date_created: None,
                is_latest: Some(false),
            },
        ],
        ..DatasetRows::default()
    };
    let ds = Dataset::from_rows(rows);
    assert!(ds.panel_version(&hboc("v01")).unwrap().is_latest);
    assert!(!ds.panel_version(&hboc("v02")).unwrap().is_latest);
}

#[test]
fn test_transcripts_sorted_with_unknown_gene() {
    let ds = fixture();
    let tx = ds.panel_transcripts(&hboc("v02")).unwrap();
    let keys: Vec<&str> = tx.iter().map(|t| t.sort_key.as_str()).collect();
    assert_eq!(keys, vec!["NM_000059.4", "NM_007294.4", "NM_024675.4", "NM_999999.1"]);
    assert_eq!(tx[0].gene_symbol, "BRCA2");
    assert_eq!(tx[3].gene_id, "");
    assert_eq!(tx[3].label(), "NM_999999.1, -, -");
}

#[test]
fn test_unknown_panel_not_found() {
    let ds = fixture();
    let err = ds.panel_transcripts(&hboc("v99")).unwrap_err();
    assert_eq!(err.to_string(), "no data found for gene panel HBOC v99");
    assert!(ds.panel_gene_ids(&hboc("v99")).is_err());
}

#[test]
fn test_panel_gene_ids_by_symbol() {
    let ds = fixture();
    let ids = ds.panel_gene_ids(&hboc("v02")).unwrap();
    assert_eq!(
        ids,
        vec![GeneId::from("1100"), GeneId::from("1101"), GeneId::from("26144")]
    );
}

#[test]
fn test_hit_counts_per_version() {
    let ds = fixture();
    let hits = ds.panel_hit_counts(&gene_set(["1101", "26144", "404"]));
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].panel, hboc("v01"));
    assert_eq!(hits[0].hit_count, 1);
    assert!(!hits[0].is_latest);
    assert_eq!(hits[1].panel, hboc("v02"));
    assert_eq!(hits[1].hit_count, 2);
    assert!(hits[1].is_latest);
    assert!(ds.panel_hit_counts(&gene_set(Vec::<&str>::new())).is_empty());
}

#[test]
fn test_gene_lookups() {
    let ds = fixture();
    assert_eq!(ds.gene_by_hgnc_id(&GeneId::from("7127")).unwrap().symbol, "MLH1");
    assert!(ds.gene_by_hgnc_id(&GeneId::from("1")).is_none());
    assert_eq!(ds.genes_by_symbol("brca1").len(), 1);
    let prefixed = ds.genes_by_symbol_prefix("BRC", 10);
    assert_eq!(prefixed.len(), 2);
    assert_eq!(ds.genes_by_symbol_prefix("BRC", 1).len(), 1);
    assert!(ds.genes_by_symbol_prefix("ZZZ", 10).is_empty());
}

#[test]
fn test_latest_panels_for_gene() {
    let ds = fixture();
    let rows = ds.latest_panels_for_gene(&GeneId::from("1100"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].panel, hboc("v02"));
    assert_eq!(rows[0].transcript, "NM_007294.4");
    assert_eq!(rows[0].inheritance.as_deref(), Some("AD"));
}

#[test]
fn test_value_parsers() {
    assert_eq!(parse_date("").unwrap(), None);
    assert!(parse_date("2021-13-01").is_err());
    assert_eq!(
        parse_date("2021-01-02T03:04:05").unwrap(),
        chrono::NaiveDate::from_ymd_opt(2021, 1, 2)
    );
    assert!(parse_flag("TRUE").unwrap());
    assert!(!parse_flag("0").unwrap());
    assert!(parse_flag("maybe").is_err());
}

#[test]
fn test_gene_info_coverage() {
    let ds = fixture();
    let brca1 = ds.gene_by_hgnc_id(&GeneId::from("1100")).unwrap();
    assert_eq!(brca1.coverage.wgs, Some(0.998));
    assert_eq!(brca1.coverage.wes, Some(0.951));
    let mlh1 = ds.gene_by_hgnc_id(&GeneId::from("7127")).unwrap();
    assert_eq!(mlh1.coverage.wes, None);
    let palb2 = ds.gene_by_hgnc_id(&GeneId::from("26144")).unwrap();
    assert_eq!(palb2.coverage, crate::model::GeneCoverage::default());
}

#[test]
fn test_gene_info_is_optional_and_validated() {
    let dir = make_temp_dir();
    write_fixture(&dir);
    fs::remove_file(dir.join("geneinfo.tsv")).unwrap();
    assert!(Dataset::load(&dir).is_ok());

    write_file(&dir.join("geneinfo.tsv"), "hgnc_id\tcoverage_wgs\n1100\t1.5\n");
    let err = Dataset::load(&dir).unwrap_err();
    assert!(matches!(err, StoreError::Parse { ref table, line: 2, .. } if table == "geneinfo"));

    assert_eq!(parse_fraction("").unwrap(), None);
    assert_eq!(parse_fraction("0.25").unwrap(), Some(0.25));
    assert!(parse_fraction("high").is_err());
}

#[test]
fn test_repeated_transcripts_and_undeclared_panels() {
    let region = |version: &str| RegionRow {
        panel: GenePanelVersionId::new("X", version),
        refseq_id: "NM_1".to_string(),
        transcript_source: None,
        inheritance: None,
    };
    let ds = Dataset::from_rows(DatasetRows {
        genes: vec![crate::model::GeneEntry::new(GeneId::from("G1"), "GENE1", "gene one")],
        refseq: vec![RefseqRow {
            id: "NM_1".to_string(),
            hgnc_id: GeneId::from("G1"),
        }],
        regions: vec![region("v1"), region("v1"), region("v2")],
        ..DatasetRows::default()
    });

    let v1 = GenePanelVersionId::new("X", "v1");
    let v2 = GenePanelVersionId::new("X", "v2");
    assert_eq!(ds.panel_transcripts(&v1).unwrap().len(), 1);
    assert_eq!(ds.panel_version(&v1).unwrap().num_transcripts, 1);
    assert!(!ds.panel_version(&v1).unwrap().is_latest);
    assert!(ds.panel_version(&v2).unwrap().is_latest);

    let candidates = gene_set(["G1"]);
    let trees = aggregate_hits_by_panel(&candidates, &ds.panel_hit_counts(&candidates));
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].latest.panel(), &v2);
    assert_eq!(trees[0].children.len(), 1);
    assert_eq!(trees[0].children[0].panel(), &v1);
}
