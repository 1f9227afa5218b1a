// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Panelcut CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use panelcut::cli::Reporter;
use panelcut::panel::{DocumentError, EventLog, SplitEvent};
use panelcut::{MemoryDocument, PanelDocument, PanelId, PanelSplitter, SplitConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panelcut")]
#[command(about = "Panelcut - split planar panels by cutter planes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split panels of a document by the planes of other panels
    Split {
        /// Input document (JSON)
        input: PathBuf,

        /// Output document, defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Panels to split (default: all)
        #[arg(long, value_delimiter = ',')]
        targets: Vec<u64>,

        /// Panels whose planes cut (default: all)
        #[arg(long, value_delimiter = ',')]
        cutters: Vec<u64>,

        /// Configuration file (default: panelcut.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Linear tolerance, overrides config and document
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Write the batch report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Keep source panels after splitting
        #[arg(long)]
        keep_source: bool,
    },

    /// Show the panels of a document
    Inspect {
        /// Input document (JSON)
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Split {
            input,
            output,
            targets,
            cutters,
            config,
            tolerance,
            report,
            keep_source,
        } => {
            let mut config = match config {
                Some(path) => {
                    let mut config = SplitConfig::from_file(&path)?;
                    config.apply_env()?;
                    config
                }
                None => SplitConfig::load()?,
            };
            if tolerance.is_some() {
                config.tolerance = tolerance;
            }
            if keep_source {
                config.delete_source = false;
            }
            config.validate()?;

            let targets: Vec<PanelId> = targets.into_iter().map(PanelId).collect();
            let cutters: Vec<PanelId> = cutters.into_iter().map(PanelId).collect();
            let output = output.unwrap_or_else(|| input.clone());
            split_command(
                &input,
                &output,
                &targets,
                &cutters,
                config,
                report.as_deref(),
                cli.verbose,
            )?;
        }
        Commands::Inspect { input } => {
            inspect_command(&input)?;
        }
        Commands::Version => {
            println!("Panelcut v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "panelcut=debug" } else { "panelcut=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn split_command(
    input: &Path,
    output: &Path,
    targets: &[PanelId],
    cutters: &[PanelId],
    config: SplitConfig,
    report_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if !input.exists() {
        Reporter::error(&format!("Input file not found: {}", input.display()));
        std::process::exit(1);
    }

    let mut doc = MemoryDocument::load(input)?;
    let all = doc.panel_ids();
    let targets = if targets.is_empty() { all.as_slice() } else { targets };
    let cutters = if cutters.is_empty() { all.as_slice() } else { cutters };

    let mut log = EventLog::new();
    let report = match PanelSplitter::new(config).run(&mut doc, targets, cutters, &mut log) {
        Ok(report) => report,
        Err(DocumentError::Cancelled) => {
            Reporter::warning("Nothing selected, document left untouched");
            return Ok(());
        }
        Err(err) => return Err(err).context("Split failed"),
    };

    Reporter::report_batch(&report, verbose);

    let rejected = log.count(|e| matches!(e, SplitEvent::MaterializationRejected { .. }));
    if rejected > 0 {
        Reporter::warning(&format!(
            "{} fragment(s) were rejected by the document",
            rejected
        ));
    }

    doc.save(output)?;
    if let Some(path) = report_path {
        Reporter::write_json(&report, path)?;
    }
    Reporter::done(&format!(
        "{} -> {} ({} panel(s))",
        input.display(),
        output.display(),
        doc.panel_count()
    ));

    Ok(())
}

fn inspect_command(input: &Path) -> Result<()> {
    let doc = MemoryDocument::load(input)?;
    let config = SplitConfig::load()?;
    let linear = config
        .tolerance
        .or_else(|| doc.tolerance_hint())
        .unwrap_or(panelcut::tolerance::DEFAULT_LINEAR);
    Reporter::report_document(&doc, &config.tolerance_policy(linear));
    Ok(())
}
