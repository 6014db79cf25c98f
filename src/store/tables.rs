use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use flate2::read::MultiGzDecoder;

use crate::store::StoreError;

pub const GENENAMES: &str = "genenames";
pub const REFSEQ: &str = "refseq";
pub const GENEPANELS: &str = "genepanels";
pub const GENEPANEL_REGIONS: &str = "genepanel_regions";
pub const VERSION: &str = "version";
pub const GENEINFO: &str = "geneinfo";

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, StoreError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn find_table_path(dir: &Path, table: &str) -> Option<PathBuf> {
    [format!("{table}.tsv"), format!("{table}.tsv.gz")]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// A header-addressed tab-separated table.
#[derive(Debug, Clone)]
pub struct TsvTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<TsvRow>,
}

#[derive(Debug, Clone)]
pub struct TsvRow {
    pub line: usize,
    pub fields: Vec<String>,
}

impl TsvRow {
    pub fn get(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn get_opt(&self, idx: Option<usize>) -> Option<&str> {
        idx.map(|i| self.get(i)).filter(|v| !v.is_empty())
    }
}

impl TsvTable {
    pub fn column(&self, name: &str) -> Result<usize, StoreError> {
        self.optional_column(name)
            .ok_or_else(|| StoreError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn parse_error(&self, row: &TsvRow, msg: impl Into<String>) -> StoreError {
        StoreError::Parse {
            table: self.name.clone(),
            line: row.line,
            msg: msg.into(),
        }
    }
}

pub fn read_table(path: &Path, name: &str) -> Result<TsvTable, StoreError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(StoreError::Parse {
            table: name.to_string(),
            line: 1,
            msg: "table is empty".to_string(),
        });
    }
    let columns: Vec<String> = buf
        .trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(|c| c.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let fields = line.split('\t').map(|f| f.trim().to_string()).collect();
        rows.push(TsvRow {
            line: line_no,
            fields,
        });
    }

    tracing::debug!(table = name, rows = rows.len(), path = %path.display(), "read table");

    Ok(TsvTable {
        name: name.to_string(),
        columns,
        rows,
    })
}

/// Parses `YYYY-MM-DD`, ignoring a trailing time part. Empty input is `None`.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let day = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| format!("invalid date {raw:?}: {e}"))
}

pub fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        other => Err(format!("invalid flag {other:?}")),
    }
}

/// Parses a coverage fraction in `[0, 1]`. Empty input is `None`.
pub fn parse_fraction(raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw
        .parse()
        .map_err(|e| format!("invalid coverage {raw:?}: {e}"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("coverage {raw:?} outside 0..1"));
    }
    Ok(Some(value))
}
