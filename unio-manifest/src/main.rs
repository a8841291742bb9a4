//! `unio-manifest`: print the interface manifest of the runtime sources.
//!
//! By default scans the runtime's own declaration sources bundled at build
//! time. `--format lines` prints the raw directive stream (the hand-off
//! format); `--format json` prints resolved signatures.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use unio_manifest::BUNDLED_SOURCES;
use unio_manifest::directive::parse_all;
use unio_manifest::extract::{DEFAULT_MARKER, extract};
use unio_manifest::signature::resolve;

#[derive(Parser)]
#[command(
    name = "unio-manifest",
    version,
    about = "Extract the interface manifest from structured source comments"
)]
struct Cli {
    /// Source files to scan, in order. Defaults to the bundled runtime sources.
    paths: Vec<PathBuf>,

    /// Line-comment marker that introduces a directive.
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Lines)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One directive per line, marker stripped.
    Lines,
    /// Resolved signatures and constants as JSON.
    Json,
}

fn main() {
    unio_manifest::logging::init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let directives = collect_directives(&cli.paths, &cli.marker)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Lines => {
            for directive in &directives {
                writeln!(out, "{directive}").context("write stdout")?;
            }
        }
        Format::Json => {
            let manifest = resolve(&parse_all(&directives)?)?;
            serde_json::to_writer_pretty(&mut out, &manifest).context("serialize manifest")?;
            writeln!(out).context("write stdout")?;
        }
    }
    Ok(())
}

fn collect_directives(paths: &[PathBuf], marker: &str) -> Result<Vec<String>> {
    if paths.is_empty() {
        return Ok(BUNDLED_SOURCES
            .iter()
            .flat_map(|(name, source)| {
                debug!(source = name, "scanning bundled source");
                extract(source, marker)
            })
            .collect());
    }
    let mut directives = Vec::new();
    for path in paths {
        let source =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let found = extract(&source, marker);
        debug!(path = %path.display(), count = found.len(), "scanned source");
        directives.extend(found);
    }
    Ok(directives)
}
