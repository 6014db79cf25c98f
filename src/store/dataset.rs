use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;

use crate::model::{
    DatasetVersion, GeneCoverage, GeneEntry, GeneId, GenePanelVersionId, LatestPanelEntry, PanelHitCount,
    PanelVersion, TranscriptRecord,
};
use crate::overlap::GeneSet;
use crate::store::tables::{
    GENEINFO, GENENAMES, GENEPANEL_REGIONS, GENEPANELS, REFSEQ, TsvRow, TsvTable, VERSION,
    find_table_path, parse_date, parse_flag, parse_fraction, read_table,
};
use crate::store::{PanelSource, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefseqRow {
    pub id: String,
    pub hgnc_id: GeneId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub id: GenePanelVersionId,
    pub date_created: Option<NaiveDate>,
    pub is_latest: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    pub panel: GenePanelVersionId,
    pub refseq_id: String,
    pub transcript_source: Option<String>,
    pub inheritance: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneInfoRow {
    pub hgnc_id: GeneId,
    pub coverage: GeneCoverage,
}

/// Typed rows of every dataset table, before indexing.
#[derive(Debug, Clone, Default)]
pub struct DatasetRows {
    pub genes: Vec<GeneEntry>,
    pub refseq: Vec<RefseqRow>,
    pub panels: Vec<PanelRow>,
    pub regions: Vec<RegionRow>,
    pub gene_info: Vec<GeneInfoRow>,
    pub version: Option<DatasetVersion>,
}

/// The bundled dataset, loaded once and indexed in memory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    genes: BTreeMap<GeneId, GeneEntry>,
    symbols: BTreeMap<String, Vec<GeneId>>,
    refseq_gene: BTreeMap<String, GeneId>,
    panels: BTreeMap<GenePanelVersionId, PanelVersion>,
    regions: BTreeMap<GenePanelVersionId, Vec<RegionRow>>,
    panel_genes: BTreeMap<GenePanelVersionId, BTreeSet<GeneId>>,
    version: Option<DatasetVersion>,
}

impl Dataset {
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let rows = read_rows(dir)?;
        Ok(Self::from_rows(rows))
    }

    pub fn from_rows(rows: DatasetRows) -> Self {
        let mut genes = BTreeMap::new();
        for gene in rows.genes {
            if genes.contains_key(&gene.hgnc_id) {
                tracing::warn!(hgnc_id = %gene.hgnc_id, "duplicate gene name row; keeping first");
                continue;
            }
            genes.insert(gene.hgnc_id.clone(), gene);
        }
        for info in rows.gene_info {
            match genes.get_mut(&info.hgnc_id) {
                Some(gene) => gene.coverage = info.coverage,
                None => tracing::debug!(hgnc_id = %info.hgnc_id, "gene info for unknown gene"),
            }
        }

        let mut symbols: BTreeMap<String, Vec<GeneId>> = BTreeMap::new();
        for gene in genes.values() {
            symbols
                .entry(gene.symbol.to_ascii_uppercase())
                .or_default()
                .push(gene.hgnc_id.clone());
        }

        let mut refseq_gene = BTreeMap::new();
        for row in rows.refseq {
            refseq_gene.entry(row.id).or_insert(row.hgnc_id);
        }

        let mut regions: BTreeMap<GenePanelVersionId, Vec<RegionRow>> = BTreeMap::new();
        for region in rows.regions {
            regions.entry(region.panel.clone()).or_default().push(region);
        }
        for (panel, list) in regions.iter_mut() {
            list.sort_by(|a, b| a.refseq_id.cmp(&b.refseq_id));
            let before = list.len();
            list.dedup_by(|a, b| a.refseq_id == b.refseq_id);
            if list.len() < before {
                tracing::debug!(
                    panel = %panel,
                    dropped = before - list.len(),
                    "collapsed repeated transcripts"
                );
            }
        }

        let mut declared: BTreeMap<GenePanelVersionId, (Option<NaiveDate>, Option<bool>)> =
            BTreeMap::new();
        for row in rows.panels {
            declared
                .entry(row.id)
                .or_insert((row.date_created, row.is_latest));
        }
        for id in regions.keys() {
            if !declared.contains_key(id) {
                tracing::warn!(panel = %id, "regions reference a panel missing from genepanels");
                declared.insert(id.clone(), (None, None));
            }
        }

        // Without an explicit flag the latest version is MAX(version) per name.
        let explicit = declared.values().any(|(_, flag)| flag.is_some());
        let mut max_version: BTreeMap<&str, &str> = BTreeMap::new();
        for id in declared.keys() {
            max_version.insert(id.name.as_str(), id.version.as_str());
        }

        let mut panels = BTreeMap::new();
        for (id, (date_created, flag)) in &declared {
            let is_latest = if explicit {
                flag.unwrap_or(false)
            } else {
                max_version.get(id.name.as_str()) == Some(&id.version.as_str())
            };
            let num_transcripts = regions.get(id).map_or(0, Vec::len);
            panels.insert(
                id.clone(),
                PanelVersion {
                    id: id.clone(),
                    is_latest,
                    date_created: *date_created,
                    num_transcripts,
                },
            );
        }

        let mut panel_genes = BTreeMap::new();
        for (id, list) in &regions {
            let set: BTreeSet<GeneId> = list
                .iter()
                .filter_map(|r| refseq_gene.get(&r.refseq_id))
                .filter(|g| genes.contains_key(*g))
                .cloned()
                .collect();
            panel_genes.insert(id.clone(), set);
        }

        tracing::info!(
            genes = genes.len(),
            transcripts = refseq_gene.len(),
            panel_versions = panels.len(),
            "indexed gene panel dataset"
        );

        Dataset {
            genes,
            symbols,
            refseq_gene,
            panels,
            regions,
            panel_genes,
            version: rows.version,
        }
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_panel_versions(&self) -> usize {
        self.panels.len()
    }

    fn require_panel(&self, panel: &GenePanelVersionId) -> Result<&PanelVersion, StoreError> {
        self.panels.get(panel).ok_or_else(|| {
            StoreError::NotFound(format!("gene panel {} {}", panel.name, panel.version))
        })
    }

    fn entries_for(&self, ids: &[GeneId]) -> Vec<GeneEntry> {
        let mut out: Vec<GeneEntry> = ids
            .iter()
            .filter_map(|id| self.genes.get(id).cloned())
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.hgnc_id.cmp(&b.hgnc_id)));
        out
    }
}

impl PanelSource for Dataset {
    fn panel_transcripts(
        &self,
        panel: &GenePanelVersionId,
    ) -> Result<Vec<TranscriptRecord>, StoreError> {
        self.require_panel(panel)?;
        let Some(list) = self.regions.get(panel) else {
            return Ok(Vec::new());
        };
        Ok(list
            .iter()
            .map(|r| {
                let gene_id = self.refseq_gene.get(&r.refseq_id);
                let symbol = gene_id
                    .and_then(|g| self.genes.get(g))
                    .map(|g| g.symbol.as_str())
                    .unwrap_or("");
                TranscriptRecord::new(
                    r.refseq_id.as_str(),
                    gene_id.map(GeneId::as_str).unwrap_or(""),
                    symbol,
                )
            })
            .collect())
    }

    fn panel_gene_ids(&self, panel: &GenePanelVersionId) -> Result<Vec<GeneId>, StoreError> {
        self.require_panel(panel)?;
        let Some(set) = self.panel_genes.get(panel) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<&GeneEntry> = set.iter().filter_map(|g| self.genes.get(g)).collect();
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol).then_with(|| a.hgnc_id.cmp(&b.hgnc_id)));
        Ok(entries.into_iter().map(|g| g.hgnc_id.clone()).collect())
    }

    fn panel_hit_counts(&self, candidates: &GeneSet) -> Vec<PanelHitCount> {
        let mut out = Vec::new();
        if candidates.is_empty() {
            return out;
        }
        for (id, set) in &self.panel_genes {
            let hit_count = set.intersection(candidates).count();
            if hit_count == 0 {
                continue;
            }
            let Some(panel) = self.panels.get(id) else {
                continue;
            };
            out.push(PanelHitCount {
                panel: id.clone(),
                hit_count,
                is_latest: panel.is_latest,
                date_created: panel.date_created,
            });
        }
        out
    }

    fn list_panel_versions(&self, name: Option<&str>) -> Vec<PanelVersion> {
        self.panels
            .values()
            .filter(|p| name.is_none_or(|n| p.id.name == n))
            .cloned()
            .collect()
    }

    fn panel_version(&self, panel: &GenePanelVersionId) -> Result<PanelVersion, StoreError> {
        self.require_panel(panel).cloned()
    }

    fn gene_by_hgnc_id(&self, hgnc_id: &GeneId) -> Option<GeneEntry> {
        self.genes.get(hgnc_id).cloned()
    }

    fn genes_by_symbol(&self, symbol: &str) -> Vec<GeneEntry> {
        let key = symbol.trim().to_ascii_uppercase();
        match self.symbols.get(&key) {
            Some(ids) => self.entries_for(ids),
            None => Vec::new(),
        }
    }

    fn genes_by_symbol_prefix(&self, prefix: &str, limit: usize) -> Vec<GeneEntry> {
        let prefix = prefix.trim().to_ascii_uppercase();
        let ids: Vec<GeneId> = self
            .symbols
            .range(prefix.clone()..)
            .take_while(|(symbol, _)| symbol.starts_with(&prefix))
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect();
        let mut out = self.entries_for(&ids);
        out.truncate(limit);
        out
    }

    fn latest_panels_for_gene(&self, hgnc_id: &GeneId) -> Vec<LatestPanelEntry> {
        let mut out = Vec::new();
        for (id, list) in &self.regions {
            if !self.panels.get(id).is_some_and(|p| p.is_latest) {
                continue;
            }
            for region in list {
                if self.refseq_gene.get(&region.refseq_id) != Some(hgnc_id) {
                    continue;
                }
                out.push(LatestPanelEntry {
                    panel: id.clone(),
                    transcript: region.refseq_id.clone(),
                    transcript_source: region.transcript_source.clone(),
                    inheritance: region.inheritance.clone(),
                });
            }
        }
        out
    }

    fn dataset_version(&self) -> Option<DatasetVersion> {
        self.version.clone()
    }
}

pub fn read_rows(dir: &Path) -> Result<DatasetRows, StoreError> {
    let genes = load_genenames(&require_table(dir, GENENAMES)?)?;
    let refseq = load_refseq(&require_table(dir, REFSEQ)?)?;
    let panels = load_panels(&require_table(dir, GENEPANELS)?)?;
    let regions = load_regions(&require_table(dir, GENEPANEL_REGIONS)?)?;
    let gene_info = match find_table_path(dir, GENEINFO) {
        Some(path) => load_gene_info(&read_table(&path, GENEINFO)?)?,
        None => {
            tracing::info!(dir = %dir.display(), "no gene info table; coverage unknown");
            Vec::new()
        }
    };
    let version = match find_table_path(dir, VERSION) {
        Some(path) => load_version(&read_table(&path, VERSION)?)?,
        None => {
            tracing::warn!(dir = %dir.display(), "no version table; dataset version unknown");
            None
        }
    };
    Ok(DatasetRows {
        genes,
        refseq,
        panels,
        regions,
        gene_info,
        version,
    })
}

fn require_table(dir: &Path, table: &str) -> Result<TsvTable, StoreError> {
    let path = find_table_path(dir, table).ok_or_else(|| StoreError::MissingTable {
        table: table.to_string(),
        dir: dir.to_path_buf(),
    })?;
    tracing::info!(table, path = %path.display(), "discovered table");
    read_table(&path, table)
}

fn load_genenames(table: &TsvTable) -> Result<Vec<GeneEntry>, StoreError> {
    let hgnc_col = table.column("hgnc_id")?;
    let symbol_col = table.column("symbol")?;
    let name_col = table.column("name")?;

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let hgnc_id = row.get(hgnc_col);
        if hgnc_id.is_empty() {
            tracing::warn!(line = row.line, "gene name row without HGNC id; skipping");
            continue;
        }
        out.push(GeneEntry::new(
            GeneId::from(hgnc_id),
            row.get(symbol_col),
            row.get(name_col),
        ));
    }
    Ok(out)
}

fn load_refseq(table: &TsvTable) -> Result<Vec<RefseqRow>, StoreError> {
    let id_col = table.column("id")?;
    let hgnc_col = table.column("hgnc_id")?;

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let id = row.get(id_col);
        let hgnc_id = row.get(hgnc_col);
        if id.is_empty() || hgnc_id.is_empty() {
            tracing::warn!(line = row.line, "refseq row without id or HGNC id; skipping");
            continue;
        }
        out.push(RefseqRow {
            id: id.to_string(),
            hgnc_id: GeneId::from(hgnc_id),
        });
    }
    Ok(out)
}

fn load_panels(table: &TsvTable) -> Result<Vec<PanelRow>, StoreError> {
    let name_col = table.column("name")?;
    let version_col = table.column("version")?;
    let date_col = table.optional_column("date_created");
    let latest_col = table.optional_column("is_latest");

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let name = row.get(name_col);
        let version = row.get(version_col);
        if name.is_empty() || version.is_empty() {
            tracing::warn!(line = row.line, "gene panel row without name or version; skipping");
            continue;
        }
        let date_created = match date_col {
            Some(idx) => parse_date(row.get(idx)).map_err(|e| table.parse_error(row, e))?,
            None => None,
        };
        let is_latest = match latest_col {
            Some(idx) => Some(parse_flag(row.get(idx)).map_err(|e| table.parse_error(row, e))?),
            None => None,
        };
        out.push(PanelRow {
            id: GenePanelVersionId::new(name, version),
            date_created,
            is_latest,
        });
    }
    Ok(out)
}

fn load_regions(table: &TsvTable) -> Result<Vec<RegionRow>, StoreError> {
    let name_col = table.column("genepanel_name")?;
    let version_col = table.column("genepanel_version")?;
    let refseq_col = table.column("refseq_id")?;
    let source_col = table.optional_column("transcript_source");
    let inheritance_col = table.optional_column("inh_mode");

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let name = row.get(name_col);
        let version = row.get(version_col);
        let refseq_id = row.get(refseq_col);
        if name.is_empty() || version.is_empty() || refseq_id.is_empty() {
            tracing::warn!(line = row.line, "incomplete gene panel region row; skipping");
            continue;
        }
        out.push(RegionRow {
            panel: GenePanelVersionId::new(name, version),
            refseq_id: refseq_id.to_string(),
            transcript_source: row.get_opt(source_col).map(str::to_string),
            inheritance: row.get_opt(inheritance_col).map(str::to_string),
        });
    }
    Ok(out)
}

fn load_gene_info(table: &TsvTable) -> Result<Vec<GeneInfoRow>, StoreError> {
    let hgnc_col = table.column("hgnc_id")?;
    let wgs_col = table.optional_column("coverage_wgs");
    let wes_col = table.optional_column("coverage_wes");

    let fraction = |row: &TsvRow, idx: Option<usize>| match idx {
        Some(idx) => parse_fraction(row.get(idx)).map_err(|e| table.parse_error(row, e)),
        None => Ok(None),
    };

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let hgnc_id = row.get(hgnc_col);
        if hgnc_id.is_empty() {
            tracing::warn!(line = row.line, "gene info row without HGNC id; skipping");
            continue;
        }
        out.push(GeneInfoRow {
            hgnc_id: GeneId::from(hgnc_id),
            coverage: GeneCoverage {
                wgs: fraction(row, wgs_col)?,
                wes: fraction(row, wes_col)?,
            },
        });
    }
    Ok(out)
}

fn load_version(table: &TsvTable) -> Result<Option<DatasetVersion>, StoreError> {
    let sha_col = table.column("sha1")?;
    let date_col = table.column("date")?;
    let label_col = table.column("label")?;

    let Some(row) = table.rows.first() else {
        return Ok(None);
    };
    let date = parse_date(row.get(date_col)).map_err(|e| table.parse_error(row, e))?;
    Ok(Some(DatasetVersion {
        sha1: row.get(sha_col).to_string(),
        date,
        label: row.get(label_col).to_string(),
    }))
}
