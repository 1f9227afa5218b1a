// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::error::ErrorKind;
use crate::geometry::{Plane, Tolerance};
use crate::panel::{BatchReport, MemoryDocument, PanelDocument, PanelStatus};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Per-panel lines followed by the batch summary
    pub fn report_batch(report: &BatchReport, verbose: bool) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{}", "Panel split".bold());
        println!("{}", "━".repeat(80).bright_black());

        for panel in &report.panels {
            let status = match panel.status {
                PanelStatus::Split => "split".green().bold(),
                PanelStatus::Unchanged => "unchanged".bright_black(),
                PanelStatus::Incomplete => "incomplete".yellow().bold(),
                PanelStatus::Failed(kind) => format!("failed ({})", kind.as_str()).red().bold(),
            };
            let created: Vec<String> = panel.created.iter().map(|id| id.to_string()).collect();
            println!(
                "  {:<8} {:<28} {} {}",
                panel.panel.to_string().cyan(),
                status,
                "fragments:".bright_black(),
                if created.is_empty() {
                    "-".to_string()
                } else {
                    created.join(", ")
                }
            );

            if verbose {
                println!(
                    "  {:<8} {} {}  {} {}  {} {}",
                    "",
                    "cut lines:".bright_black(),
                    panel.cut_lines,
                    "openings moved:".bright_black(),
                    panel.openings_transferred,
                    "rejected fragments:".bright_black(),
                    panel.rejected_fragments
                );
                for rejected in &panel.rejected_cutters {
                    println!(
                        "  {:<8} {} {} ({})",
                        "",
                        "cutter".bright_black(),
                        rejected.cutter,
                        Self::describe(rejected.reason).yellow()
                    );
                }
            }
        }

        let summary = report.summary();
        println!("\n{}", "Summary:".bold());
        println!(
            "  {} {}  {} {}  {} {}  {} {}",
            "Split:".bright_black(),
            summary.split.to_string().green(),
            "Unchanged:".bright_black(),
            summary.unchanged,
            "Incomplete:".bright_black(),
            if summary.incomplete > 0 {
                summary.incomplete.to_string().yellow()
            } else {
                summary.incomplete.to_string().normal()
            },
            "Failed:".bright_black(),
            if summary.failed > 0 {
                summary.failed.to_string().red()
            } else {
                summary.failed.to_string().green()
            }
        );
        println!(
            "  {} {}  {} {}",
            "Fragments created:".bright_black(),
            summary.fragments_created.to_string().cyan(),
            "Openings transferred:".bright_black(),
            summary.openings_transferred.to_string().cyan()
        );
        println!(
            "  {} {}  {} {}",
            "Tolerance:".bright_black(),
            report.tolerance,
            "Time:".bright_black(),
            Self::format_duration(report.elapsed).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Geometry overview of every panel in a document
    pub fn report_document(doc: &MemoryDocument, tol: &Tolerance) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!(
            "{} {}  {} {}",
            "Panels:".bold(),
            doc.panel_count().to_string().cyan(),
            "Openings:".bold(),
            doc.opening_count().to_string().cyan()
        );
        println!("{}", "━".repeat(80).bright_black());

        for id in doc.panel_ids() {
            let Some(contour) = doc.outer_contour(id) else {
                println!("  {:<8} {}", id.to_string().cyan(), "no contour".red());
                continue;
            };
            let panel_type = doc.panel_type(id).unwrap_or_default();
            match Plane::fit(&contour.vertices(), tol) {
                Ok(plane) => println!(
                    "  {:<8} {:<12} {} {:<3} {} ({:.3}, {:.3}, {:.3}) {} {:.4} {} {}",
                    id.to_string().cyan(),
                    panel_type,
                    "edges:".bright_black(),
                    contour.len(),
                    "normal:".bright_black(),
                    plane.normal.x,
                    plane.normal.y,
                    plane.normal.z,
                    "area:".bright_black(),
                    contour.area_in(&plane).abs(),
                    "openings:".bright_black(),
                    doc.openings(id).len()
                ),
                Err(err) => println!(
                    "  {:<8} {:<12} {}",
                    id.to_string().cyan(),
                    panel_type,
                    err.to_string().red()
                ),
            }
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Write the batch report as pretty JSON
    pub fn write_json(report: &BatchReport, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report: {:?}", path))?;
        Ok(())
    }

    /// Fatal problem with the invocation, on stderr
    pub fn error(message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    /// Run goes on but the user should know, e.g. an empty selection
    pub fn warning(message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    /// Last line of a run that wrote its output
    pub fn done(message: &str) {
        println!("{} {}", "done:".green().bold(), message);
    }

    fn describe(kind: ErrorKind) -> &'static str {
        match kind {
            ErrorKind::DegeneratePlane => "degenerate contour",
            ErrorKind::ParallelCutter => "parallel to panel",
            ErrorKind::InsufficientIntersections => "does not cross panel",
            ErrorKind::DegenerateFragment => "degenerate fragment",
            ErrorKind::MaterializationRejected => "rejected by document",
            ErrorKind::SelectionCancelled => "selection cancelled",
        }
    }

    /// Batch time in the largest unit that keeps it at or above one
    fn format_duration(elapsed: Duration) -> String {
        match elapsed.as_micros() {
            us @ 0..=999 => format!("{}µs", us),
            us @ 1_000..=999_999 => format!("{:.2}ms", us as f64 / 1e3),
            us => format!("{:.2}s", us as f64 / 1e6),
        }
    }
}
