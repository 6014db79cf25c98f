use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::model::{DatasetVersion, GeneEntry};

pub const GENES_TABLE: &str = "genes";

/// `<download stem>_<table>_<today>.csv`, e.g. `gpov_1a2b3c4_2023-04-01_genes_2024-01-31.csv`.
pub fn export_file_name(
    version: Option<&DatasetVersion>,
    table: &str,
    today: NaiveDate,
) -> String {
    let stem = version.map_or_else(|| "gpov".to_string(), DatasetVersion::download_stem);
    format!("{stem}_{table}_{}.csv", today.format("%Y-%m-%d"))
}

fn fraction(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes a `;`-delimited gene table. Coverage is the raw fraction, empty when unknown.
pub fn write_gene_table<W: Write>(writer: W, genes: &[GeneEntry]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().delimiter(b';').from_writer(writer);
    wtr.write_record(["HGNC ID", "Symbol", "Name", "WGS", "WES"])?;
    for gene in genes {
        let wgs = fraction(gene.coverage.wgs);
        let wes = fraction(gene.coverage.wes);
        wtr.write_record([
            gene.hgnc_id.as_str(),
            gene.symbol.as_str(),
            gene.name.as_str(),
            wgs.as_str(),
            wes.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_gene_table(
    dir: &Path,
    file_name: &str,
    genes: &[GeneEntry],
) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    write_gene_table(BufWriter::new(File::create(&path)?), genes)?;
    tracing::info!(path = %path.display(), rows = genes.len(), "exported gene table");
    Ok(path)
}
