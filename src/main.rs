use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use medident_lib::catalog::memory::read_json_entries;
use medident_lib::catalog::{CatalogProvider, MemoryCatalog, SqliteCatalog};
use medident_lib::matching::{MatchResult, MatcherConfig, Resolver};
use medident_lib::{config, init_tracing};

/// Identify medications from noisy OCR text
#[derive(Parser, Debug)]
#[command(name = "medident", version)]
#[command(about = "Resolve OCR text to a medication catalog", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve text against a catalog
    Resolve {
        /// Catalog file: JSON array of records, or a SQLite database (.db)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Matcher configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Text to resolve; read from stdin when omitted
        text: Vec<String>,
    },

    /// Import a JSON catalog into a SQLite catalog database
    Import {
        /// JSON array of medication records
        #[arg(long)]
        from: PathBuf,

        /// Target database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();
    info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match args.command {
        Command::Resolve {
            catalog,
            config: config_path,
            json,
            text,
        } => {
            let matcher_config = match config_path {
                Some(path) => MatcherConfig::from_json_file(&path)?,
                None => MatcherConfig::default(),
            };
            let raw_text = read_text(text)?;
            let catalog_path = catalog.unwrap_or_else(config::default_catalog_path);

            if is_sqlite_path(&catalog_path) {
                let provider = SqliteCatalog::open(&catalog_path)
                    .with_context(|| format!("opening {}", catalog_path.display()))?;
                run_resolve(provider, matcher_config, &raw_text, json)
            } else {
                let provider = MemoryCatalog::from_json_file(&catalog_path)?;
                run_resolve(provider, matcher_config, &raw_text, json)
            }
        }
        Command::Import { from, db } => {
            let db_path = db.unwrap_or_else(config::default_catalog_path);
            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }

            let entries = read_json_entries(&from)?;
            let store = SqliteCatalog::open(&db_path)?;
            let imported = store
                .import(&entries)
                .with_context(|| format!("importing {} into {}", from.display(), db_path.display()))?;
            info!(imported, db = %db_path.display(), "Catalog import finished");
            println!("Imported {imported} medications into {}", db_path.display());
            Ok(())
        }
    }
}

fn run_resolve<P: CatalogProvider>(
    provider: P,
    matcher_config: MatcherConfig,
    raw_text: &str,
    json: bool,
) -> anyhow::Result<()> {
    let resolver = Resolver::new(provider, matcher_config)?;
    let result = resolver.resolve(raw_text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &MatchResult) {
    match &result.accepted {
        Some(entry) => {
            println!("{} ({})", entry.name, result.confidence_label());
            if let Some(dosage) = &entry.dosage {
                println!("  dosage: {dosage}");
            }
            if let Some(use_) = &entry.clinical_use {
                println!("  use: {use_}");
            }
        }
        None if result.suggestions.is_empty() => println!("No match"),
        None => println!("Not confident. Did you mean:"),
    }

    if result.accepted.is_none() {
        for candidate in &result.suggestions {
            println!("  {} ({:.2}%)", candidate.name, candidate.score);
        }
    }

    if let Some(verdict) = &result.advisory {
        if let Some(note) = &verdict.note {
            println!("  note: {note}");
        }
    }
}

fn read_text(args: Vec<String>) -> anyhow::Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading text from stdin")?;
    if buf.trim().is_empty() {
        bail!("no text given on the command line or stdin");
    }
    Ok(buf)
}

fn is_sqlite_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("db" | "sqlite" | "sqlite3")
    )
}
