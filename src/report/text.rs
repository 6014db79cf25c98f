use crate::lookup::GeneLookup;
use crate::model::{DatasetVersion, GeneEntry, PanelVersion};
use crate::report::{NA_SYMBOL, format_coverage, format_date, format_percent, or_na};
use crate::routes;
use crate::views::{DiffView, GeneView, GenesView, OverlapView, PanelDetail};

pub fn render_diff_text(view: &DiffView) -> String {
    let mut out = String::new();
    let left_title = view.left.to_string();
    let right_title = view.right.to_string();

    out.push_str(&format!("Comparing {} with {}\n\n", left_title, right_title));

    let width = view
        .diff
        .entries
        .iter()
        .filter_map(|e| e.left.as_ref().map(|l| l.chars().count()))
        .chain(std::iter::once(left_title.chars().count()))
        .max()
        .unwrap_or(0);
    let num_width = view.diff.entries.len().to_string().len().max(1);

    out.push_str(&format!(
        "{:>nw$}    {:<w$}  {}\n",
        "#",
        left_title,
        right_title,
        nw = num_width,
        w = width
    ));
    for (i, entry) in view.diff.entries.iter().enumerate() {
        let marker = if entry.is_deletion() {
            '-'
        } else if entry.is_insertion() {
            '+'
        } else {
            ' '
        };
        let line = format!(
            "{:>nw$}  {} {:<w$}  {}",
            i + 1,
            marker,
            entry.left.as_deref().unwrap_or(""),
            entry.right.as_deref().unwrap_or(""),
            nw = num_width,
            w = width
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "\ndeletions: {}, insertions: {}, unchanged: {}\n",
        view.diff.deletions,
        view.diff.insertions,
        view.diff.unchanged()
    ));
    out
}

pub fn render_genes_text(view: &GenesView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Gene panels containing {} selected gene(s)\n\n",
        view.candidates.len()
    ));
    if view.panels.is_empty() {
        out.push_str(NA_SYMBOL);
        out.push('\n');
        return out;
    }

    out.push_str("Gene panel\tVersion\tTotal\tRelative\tLink\n");
    for tree in &view.panels {
        let latest = &tree.latest;
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            latest.panel().name,
            latest.panel().version,
            latest.hit.hit_count,
            format_percent(latest.hit_ratio),
            routes::genepanel(latest.panel())
        ));
        for child in &tree.children {
            let link = routes::compare_to_latest(tree, child.panel())
                .unwrap_or_else(|| routes::genepanel(child.panel()));
            out.push_str(&format!(
                "  {}\t{}\t{}\t{}\t{}\n",
                child.panel().name,
                child.panel().version,
                child.hit.hit_count,
                format_percent(child.hit_ratio),
                link
            ));
        }
    }
    out
}

pub fn render_overlap_text(view: &OverlapView) -> String {
    let mut out = String::new();
    out.push_str(&render_panel_header(&view.panel));
    let ids: Vec<_> = view.selected.iter().map(|g| g.hgnc_id.clone()).collect();
    out.push_str(&format!(
        "Link: {}\n",
        routes::genepanel_overlap(&view.panel.id, &ids)
    ));
    out.push('\n');
    push_gene_section(&mut out, "Selected gene set", &view.selected);
    push_gene_section(
        &mut out,
        &format!(
            "Selected genes included in genepanel ({})",
            view.included_in_panel.len()
        ),
        &view.included_in_panel,
    );
    push_gene_section(
        &mut out,
        &format!(
            "Selected genes not included in genepanel ({})",
            view.not_included_in_panel.len()
        ),
        &view.not_included_in_panel,
    );
    push_gene_section(
        &mut out,
        &format!(
            "Gene panel genes not included in selection ({})",
            view.panel_only_others.len()
        ),
        &view.panel_only_others,
    );
    out
}

pub fn render_panel_detail_text(detail: &PanelDetail) -> String {
    let mut out = render_panel_header(&detail.panel);

    let others = if detail.other_versions.is_empty() {
        NA_SYMBOL.to_string()
    } else {
        detail
            .other_versions
            .iter()
            .map(|p| {
                if p.is_latest {
                    format!("{} (latest)", p.id.version)
                } else {
                    p.id.version.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.push_str(&format!("Other versions: {}\n", others));
    if let Some((a, b)) = &detail.compare {
        out.push_str(&format!("Compare: {}\n", routes::genepanel_diff(a, b)));
    }
    if detail.hidden_by_filter > 0 {
        out.push_str(&format!(
            "Hidden by coverage filter: {}\n",
            detail.hidden_by_filter
        ));
    }
    out.push('\n');
    push_gene_section(
        &mut out,
        &format!("Genes ({})", detail.genes.len()),
        &detail.genes,
    );
    out
}

pub fn render_panel_list_text(panels: &[PanelVersion]) -> String {
    let mut out = String::new();
    out.push_str("Gene panel\tVersion\tDate created\n");
    for panel in panels {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            panel.id.name,
            panel.id.version,
            format_date(panel.date_created)
        ));
    }
    out
}

pub fn render_gene_text(view: &GeneView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Gene symbol: {}\n", or_na(&view.gene.symbol)));
    out.push_str(&format!(
        "HGNC ID: {} (https://www.genenames.org/data/gene-symbol-report/#!/hgnc_id/HGNC:{})\n",
        view.gene.hgnc_id, view.gene.hgnc_id
    ));
    out.push_str(&format!("Name: {}\n\n", or_na(&view.gene.name)));

    out.push_str("Gene panel\tVersion\tDefault transcript\tTranscript source\tInheritance mode\n");
    for row in &view.panels {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            row.panel.name,
            row.panel.version,
            row.transcript,
            row.transcript_source.as_deref().unwrap_or(NA_SYMBOL),
            row.inheritance.as_deref().unwrap_or(NA_SYMBOL)
        ));
    }
    out
}

pub fn render_lookup_text(lookups: &[GeneLookup], suggestions: &[GeneEntry]) -> String {
    let mut out = String::new();
    for lookup in lookups {
        if !lookup.is_found() {
            out.push_str(&format!("[not found] {}\n", lookup.query));
            continue;
        }
        for hit in &lookup.hits {
            out.push_str(&format!(
                "[found] {} ({}) {}\n",
                hit.symbol, hit.hgnc_id, hit.name
            ));
        }
    }
    if !suggestions.is_empty() {
        out.push_str("\nSuggestions:\n");
        for gene in suggestions {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                gene.symbol,
                gene.hgnc_id,
                routes::gene(&gene.hgnc_id)
            ));
        }
    }
    out
}

pub fn render_version_text(version: Option<&DatasetVersion>) -> String {
    match version {
        Some(v) => format!(
            "Dataset: {} ({}), {}\nDownload stem: {}\n",
            v.label,
            v.short_sha(),
            format_date(v.date),
            v.download_stem()
        ),
        None => format!("Dataset: {}\n", NA_SYMBOL),
    }
}

fn render_panel_header(panel: &PanelVersion) -> String {
    let mut out = String::new();
    out.push_str(&format!("Gene panel name: {}\n", panel.id.name));
    out.push_str(&format!(
        "Version: {}{}\n",
        panel.id.version,
        if panel.is_latest { "" } else { " (superseded)" }
    ));
    out.push_str(&format!(
        "Date created: {}\n",
        format_date(panel.date_created)
    ));
    out.push_str(&format!("Num. transcripts: {}\n", panel.num_transcripts));
    out
}

fn push_gene_section(out: &mut String, title: &str, genes: &[GeneEntry]) {
    out.push_str(title);
    out.push('\n');
    if genes.is_empty() {
        out.push_str(NA_SYMBOL);
        out.push_str("\n\n");
        return;
    }
    out.push_str("HGNC ID\tSymbol\tName\tWGS\tWES\n");
    for gene in genes {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            gene.hgnc_id,
            or_na(&gene.symbol),
            or_na(&gene.name),
            format_coverage(gene.coverage.wgs),
            format_coverage(gene.coverage.wes)
        ));
    }
    out.push('\n');
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
