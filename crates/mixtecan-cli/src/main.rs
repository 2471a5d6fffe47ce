//! Mixtecan subgrouping CLI
//!
//! Two commands over a dataset directory:
//! - `makecldf`: raw lingpy wordlist → CLDF Wordlist under `cldf/`
//! - `makenexus`: CLDF cognate judgments → NEXUS presence/absence matrix

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use mixtecan_cldf::CldfDataset;
use mixtecan_ingest::Dataset;
use mixtecan_nexus::{Ascertainment, CodingFilter, NexusDocument};

#[derive(Parser)]
#[command(name = "mixtecan")]
#[command(
    author,
    version,
    about = "Mixtecan subgrouping: CLDF conversion and NEXUS export"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dataset directory (holds raw/, etc/ and cldf/)
    #[arg(long, global = true, default_value = ".")]
    dataset: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the raw wordlist into a CLDF Wordlist under `cldf/`
    Makecldf {
        /// Raw wordlist to read instead of the configured one
        #[arg(long)]
        wordlist: Option<PathBuf>,
    },

    /// Write a NEXUS matrix from the CLDF dataset
    Makenexus {
        /// Output file (default: ./<dataset id>.nex)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Cognate coding to use: broad, fine or any
        #[arg(short, long, default_value = "broad")]
        cognate_coding: String,
        /// Ascertainment correction: none, overall, word, or a partition file
        #[arg(short, long, default_value = "none")]
        ascertainment: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Makecldf { wordlist } => cmd_makecldf(&cli.dataset, wordlist.as_deref()),
        Commands::Makenexus {
            output,
            cognate_coding,
            ascertainment,
        } => cmd_makenexus(
            &cli.dataset,
            output.as_deref(),
            &cognate_coding,
            &ascertainment,
        ),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_makecldf(root: &Path, wordlist: Option<&Path>) -> Result<()> {
    let dataset = Dataset::open(root)
        .with_context(|| format!("failed to open dataset at {}", root.display()))?;
    let source = wordlist
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dataset.wordlist_path());
    println!(
        "{} {} {}",
        "Converting".green().bold(),
        source.display(),
        format!("(dataset {})", dataset.id()).dimmed()
    );

    let report = dataset
        .make_cldf(wordlist)
        .with_context(|| format!("failed to convert {}", source.display()))?;

    for line in report.numbered() {
        println!("{line}");
    }
    println!(
        "  {} {} rows, {} forms, {} cognate judgments, {} empty forms",
        "→".cyan(),
        report.rows,
        report.forms,
        report.cognates,
        report.empty_forms
    );
    if !report.warnings.is_empty() {
        println!(
            "  {} {} rows skipped or flagged",
            "!".yellow().bold(),
            report.warnings.len()
        );
    }
    println!(
        "{} {}",
        "Wrote".green().bold(),
        dataset.layout.cldf_dir().display()
    );
    Ok(())
}

fn cmd_makenexus(
    root: &Path,
    output: Option<&Path>,
    cognate_coding: &str,
    ascertainment: &str,
) -> Result<()> {
    // Both options are checked before any data is read.
    let filter: CodingFilter = cognate_coding.parse()?;
    let ascertainment = Ascertainment::parse(ascertainment)?;

    let dataset = Dataset::open(root)
        .with_context(|| format!("failed to open dataset at {}", root.display()))?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".").join(format!("{}.nex", dataset.id())));

    println!(
        "{} {} {}",
        "Building".green().bold(),
        output.display(),
        format!("(coding {filter})").dimmed()
    );

    let cldf = CldfDataset::discover(&dataset.layout.cldf_dir())?;
    let document = NexusDocument::from_dataset(&cldf, filter, &ascertainment)?;
    let text = document.render();
    mixtecan_cldf::io::write_atomic(&output, text.as_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "  {} {} taxa, {} characters, {} partitions",
        "→".cyan(),
        document.matrix.ntax(),
        document.matrix.nchar(),
        document.partitions.len()
    );
    println!("{} {}", "Wrote".green().bold(), output.display());
    Ok(())
}
