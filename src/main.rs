use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use gpov::logging::init_logging;
use gpov::lookup::{lookup_terms, resolve_gene_ids, split_terms};
use gpov::model::{CoverageFilter, GeneId, GenePanelVersionId};
use gpov::report::export::{GENES_TABLE, export_file_name, export_gene_table};
use gpov::report::json::{render_genes_json, render_json};
use gpov::report::text::{
    render_diff_text, render_gene_text, render_genes_text, render_lookup_text,
    render_overlap_text, render_panel_detail_text, render_panel_list_text, render_version_text,
};
use gpov::store::{Dataset, PanelSource};
use gpov::views::{
    diff_view, gene_view, genes_view, list_latest_panels, overlap_view, panel_detail,
    resolve_panel,
};
use gpov::{Error, Result};

#[derive(Debug, Parser)]
#[command(name = "gpov", version)]
#[command(about = "Gene panel overview: diffs, overlaps and hit counts over a bundled dataset")]
struct Cli {
    /// Directory with the dataset tables (<table>.tsv or <table>.tsv.gz)
    #[arg(long, env = "GPOV_DATA", default_value = "static/data", global = true)]
    data: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the dataset version
    Version,
    /// Show a gene and the latest gene panels containing it
    Gene { hgnc_id: String },
    /// Resolve gene symbols and HGNC ids
    Lookup {
        #[arg(required = true)]
        terms: Vec<String>,
        /// Also suggest genes whose symbol starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Count selected genes per gene panel version
    Genes {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// List the latest version of every gene panel
    Panels {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one gene panel version (latest if no version is given)
    Panel {
        name: String,
        version: Option<String>,
        /// Hide genes with WGS coverage below this percentage
        #[arg(long, default_value_t = 0.0, value_parser = parse_percent)]
        min_wgs: f64,
        /// Hide genes with WES coverage below this percentage
        #[arg(long, default_value_t = 0.0, value_parser = parse_percent)]
        min_wes: f64,
        /// Also write the gene table as `;`-separated CSV into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Compare two gene panel versions
    Diff {
        a_name: String,
        b_name: String,
        #[arg(long)]
        a_version: Option<String>,
        #[arg(long)]
        b_version: Option<String>,
    },
    /// Overlap of a gene selection with one gene panel version
    Overlap {
        name: String,
        #[arg(long)]
        version: Option<String>,
        #[arg(required = true)]
        terms: Vec<String>,
    },
}

fn parse_percent(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("{value} is not within 0..100"));
    }
    Ok(value)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(&cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let dataset = Dataset::load(&cli.data)?;
    let today = chrono::Local::now().date_naive();
    let out = execute(&cli.command, cli.format, &dataset, today)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    if !out.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn execute(
    command: &Command,
    format: OutputFormat,
    source: &dyn PanelSource,
    today: NaiveDate,
) -> Result<String> {
    let json = format == OutputFormat::Json;
    let out = match command {
        Command::Version => {
            let version = source.dataset_version();
            if json {
                render_json(&version)?
            } else {
                render_version_text(version.as_ref())
            }
        }
        Command::Gene { hgnc_id } => {
            let (_, key) = gpov::lookup::classify_term(hgnc_id);
            let view = gene_view(source, &GeneId::from(key))?;
            if json {
                render_json(&view)?
            } else {
                render_gene_text(&view)
            }
        }
        Command::Lookup {
            terms,
            prefix,
            limit,
        } => {
            let lookups = lookup_terms(source, &split_terms(&terms.join(" ")));
            let suggestions = prefix
                .as_deref()
                .map(|p| source.genes_by_symbol_prefix(p, *limit))
                .unwrap_or_default();
            if json {
                render_json(&serde_json::json!({
                    "lookups": lookups,
                    "suggestions": suggestions,
                }))?
            } else {
                render_lookup_text(&lookups, &suggestions)
            }
        }
        Command::Genes { terms } => {
            let candidates = resolve_candidates(source, terms);
            let view = genes_view(source, &candidates);
            if json {
                render_genes_json(&view)?
            } else {
                render_genes_text(&view)
            }
        }
        Command::Panels { filter } => {
            let panels = list_latest_panels(source, filter.as_deref());
            if json {
                render_json(&panels)?
            } else {
                render_panel_list_text(&panels)
            }
        }
        Command::Panel {
            name,
            version,
            min_wgs,
            min_wes,
            export,
        } => {
            let id = resolve_panel(source, name, version.as_deref())?;
            let filter = CoverageFilter {
                min_wgs: min_wgs / 100.0,
                min_wes: min_wes / 100.0,
            };
            let detail = panel_detail(source, &id, &filter)?;
            if let Some(dir) = export {
                let file_name =
                    export_file_name(source.dataset_version().as_ref(), GENES_TABLE, today);
                let path = export_gene_table(dir, &file_name, &detail.genes)?;
                eprintln!("wrote {}", path.display());
            }
            if json {
                render_json(&detail)?
            } else {
                render_panel_detail_text(&detail)
            }
        }
        Command::Diff {
            a_name,
            b_name,
            a_version,
            b_version,
        } => {
            let a = resolve_panel(source, a_name, a_version.as_deref())?;
            let b = resolve_panel(source, b_name, b_version.as_deref())?;
            let view = diff_view(source, &a, &b)?;
            if json {
                render_json(&view)?
            } else {
                render_diff_text(&view)
            }
        }
        Command::Overlap {
            name,
            version,
            terms,
        } => {
            let panel: GenePanelVersionId = resolve_panel(source, name, version.as_deref())?;
            let candidates = resolve_candidates(source, terms);
            if candidates.is_empty() {
                return Err(Error::InvalidInput("no HGNC IDs defined".to_string()));
            }
            let view = overlap_view(source, &panel, &candidates)?;
            if json {
                render_json(&view)?
            } else {
                render_overlap_text(&view)
            }
        }
    };
    Ok(out)
}

fn resolve_candidates(source: &dyn PanelSource, terms: &[String]) -> Vec<GeneId> {
    let lookups = lookup_terms(source, &split_terms(&terms.join(" ")));
    resolve_gene_ids(&lookups)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
