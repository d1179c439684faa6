//! impress-cite binary
//!
//! Loads `.bib` files and prints their completion candidates as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use impress_cite::{CitationProvider, CiteConfig};
use tracing_subscriber::EnvFilter;

/// Print citation completion candidates for BibTeX files
#[derive(Parser, Debug)]
#[command(name = "impress-cite", version, about)]
struct Args {
    /// Only keep candidates matching every term
    #[arg(short, long)]
    query: Option<String>,

    /// Maximum number of candidates to print
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// TOML configuration file
    #[arg(long, env = "IMPRESS_CITE_CONFIG")]
    config: Option<PathBuf>,

    /// BibTeX files to index
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.as_deref().map(CiteConfig::from_file) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
        None => CiteConfig::default(),
    };

    let mut provider = CitationProvider::new(config);
    let mut loaded = 0;
    for file in &args.files {
        match provider.load_source(file) {
            Ok(_) => loaded += 1,
            Err(e) => tracing::error!("{}", e),
        }
    }
    if loaded == 0 {
        return ExitCode::FAILURE;
    }

    let query = args.query.as_deref().unwrap_or("");
    let candidates = provider.provide_matching(query, args.limit);
    match serde_json::to_string_pretty(&candidates) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to serialize candidates: {}", e);
            ExitCode::FAILURE
        }
    }
}
