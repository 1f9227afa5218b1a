// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Panelcut
//!
//! Splits planar panels along the lines where other panels' planes cross
//! them, cleans every piece into a canonical counter-clockwise loop, and
//! moves openings onto the pieces that hold them.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod panel;
pub mod tolerance;
pub mod utils;

pub use config::SplitConfig;
pub use error::{ErrorKind, GeometryError};
pub use geometry::{plan_split, Fragment, Loop, Plane, Point, Segment, SplitPlan};
pub use panel::{
    BatchReport, MemoryDocument, PanelDocument, PanelId, PanelSplitter, PanelStatus, OpeningId,
};
pub use tolerance::Tolerance;

use anyhow::Result;

/// Load a document, split `targets` by `cutters` (all panels when empty) and
/// return the mutated document with the batch report
pub fn split_document(
    path: &str,
    targets: &[PanelId],
    cutters: &[PanelId],
    config: SplitConfig,
) -> Result<(MemoryDocument, BatchReport)> {
    let mut doc = MemoryDocument::load(path)?;
    let all = doc.panel_ids();
    let targets = if targets.is_empty() { all.as_slice() } else { targets };
    let cutters = if cutters.is_empty() { all.as_slice() } else { cutters };

    let report = PanelSplitter::new(config).run(
        &mut doc,
        targets,
        cutters,
        &mut panel::NullObserver,
    )?;
    Ok((doc, report))
}
