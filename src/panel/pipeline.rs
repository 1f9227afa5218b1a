// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch panel splitting
//!
//! Planning is pure geometry and runs per panel, in parallel when enabled.
//! Committing talks to the document and always runs one panel at a time, in
//! the order the targets were given.

use super::{DocumentError, OpeningId, PanelDocument, PanelId, SplitEvent, SplitObserver};
use crate::config::SplitConfig;
use crate::error::{ErrorKind, GeometryError};
use crate::geometry::{plan_split, transfer_opening, Fragment, Loop, SplitPlan, Tolerance};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Ok(Duration::from_secs_f64(secs))
}

/// What happened to one target panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelStatus {
    /// At least two fragments were materialized
    Split,
    /// The cutters did not separate the panel
    Unchanged,
    /// Planned to split, but fewer than two fragments were materialized
    Incomplete,
    Failed(ErrorKind),
}

/// Cutter that produced no cut line on a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCutter {
    pub cutter: PanelId,
    pub reason: ErrorKind,
}

/// Per-panel outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelReport {
    pub panel: PanelId,
    pub status: PanelStatus,
    pub cut_lines: usize,
    pub rejected_cutters: Vec<RejectedCutter>,
    pub fragments_planned: usize,
    pub created: Vec<PanelId>,
    pub rejected_fragments: usize,
    pub openings_transferred: usize,
    pub source_deleted: bool,
}

impl PanelReport {
    fn new(panel: PanelId, status: PanelStatus) -> Self {
        Self {
            panel,
            status,
            cut_lines: 0,
            rejected_cutters: Vec::new(),
            fragments_planned: 0,
            created: Vec::new(),
            rejected_fragments: 0,
            openings_transferred: 0,
            source_deleted: false,
        }
    }
}

/// Counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub split: usize,
    pub unchanged: usize,
    pub incomplete: usize,
    pub failed: usize,
    pub fragments_created: usize,
    pub openings_transferred: usize,
}

/// Outcome of a whole batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_duration", deserialize_with = "deserialize_duration")]
    pub elapsed: Duration,
    pub tolerance: f64,
    pub panels: Vec<PanelReport>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for report in &self.panels {
            match report.status {
                PanelStatus::Split => summary.split += 1,
                PanelStatus::Unchanged => summary.unchanged += 1,
                PanelStatus::Incomplete => summary.incomplete += 1,
                PanelStatus::Failed(_) => summary.failed += 1,
            }
            summary.fragments_created += report.created.len();
            summary.openings_transferred += report.openings_transferred;
        }
        summary
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelReport> {
        self.panels.iter().find(|r| r.panel == id)
    }
}

type Planned = Result<(Vec<PanelId>, SplitPlan), GeometryError>;

/// Splits target panels by the planes of cutter panels
#[derive(Debug, Clone, Default)]
pub struct PanelSplitter {
    config: SplitConfig,
}

impl PanelSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Configured tolerance, else the document's, else the default.
    ///
    /// The resolved value must be positive and finite.
    pub fn tolerance_for<D: PanelDocument>(&self, doc: &D) -> Result<Tolerance, DocumentError> {
        let linear = self
            .config
            .tolerance
            .or_else(|| doc.tolerance_hint())
            .unwrap_or(crate::tolerance::DEFAULT_LINEAR);
        if !(linear.is_finite() && linear > 0.0) {
            return Err(DocumentError::InvalidTolerance(linear));
        }
        Ok(self.config.tolerance_policy(linear))
    }

    /// Split every target by every cutter other than itself.
    ///
    /// An empty target selection counts as a cancelled selection and returns
    /// before touching the document.
    pub fn run<D, O>(
        &self,
        doc: &mut D,
        targets: &[PanelId],
        cutters: &[PanelId],
        observer: &mut O,
    ) -> Result<BatchReport, DocumentError>
    where
        D: PanelDocument,
        O: SplitObserver,
    {
        if targets.is_empty() {
            return Err(DocumentError::Cancelled);
        }

        let started_at = Utc::now();
        let clock = Instant::now();
        let tol = self.tolerance_for(doc)?;
        info!(
            targets = targets.len(),
            cutters = cutters.len(),
            tolerance = tol.linear,
            "splitting panels"
        );

        let cutter_contours: Vec<(PanelId, Loop)> = cutters
            .iter()
            .filter_map(|&id| match doc.outer_contour(id) {
                Some(contour) => Some((id, contour)),
                None => {
                    warn!(cutter = %id, "cutter has no outer contour");
                    None
                }
            })
            .collect();
        let inputs: Vec<(PanelId, Option<Loop>)> = targets
            .iter()
            .map(|&id| (id, doc.outer_contour(id)))
            .collect();

        let plan_one = |(target, contour): &(PanelId, Option<Loop>)| -> Planned {
            let contour = contour
                .as_ref()
                .ok_or(GeometryError::DegeneratePlane { points: 0 })?;
            let (ids, loops): (Vec<PanelId>, Vec<Loop>) = cutter_contours
                .iter()
                .filter(|(id, _)| id != target)
                .cloned()
                .unzip();
            plan_split(contour, &loops, &tol).map(|plan| (ids, plan))
        };

        let plans: Vec<Planned> = if self.config.parallel {
            inputs.par_iter().map(plan_one).collect()
        } else {
            inputs.iter().map(plan_one).collect()
        };

        let panels = inputs
            .iter()
            .zip(plans)
            .map(|((target, _), planned)| self.commit(doc, *target, planned, &tol, observer))
            .collect();

        Ok(BatchReport {
            started_at,
            elapsed: clock.elapsed(),
            tolerance: tol.linear,
            panels,
        })
    }

    fn commit<D, O>(
        &self,
        doc: &mut D,
        target: PanelId,
        planned: Planned,
        tol: &Tolerance,
        observer: &mut O,
    ) -> PanelReport
    where
        D: PanelDocument,
        O: SplitObserver,
    {
        let _span = info_span!("panel", id = %target).entered();

        let (cutter_ids, plan) = match planned {
            Ok(planned) => planned,
            Err(err) => {
                warn!(%err, "panel cannot be split");
                observer.on_event(&SplitEvent::PanelFailed {
                    panel: target,
                    reason: err.kind(),
                });
                return PanelReport::new(target, PanelStatus::Failed(err.kind()));
            }
        };

        let mut report = PanelReport::new(target, PanelStatus::Unchanged);
        report.cut_lines = plan.cut_lines.len();
        report.fragments_planned = plan.fragments.len();
        for (index, err) in &plan.rejected_cutters {
            let cutter = cutter_ids[*index];
            debug!(%cutter, %err, "cutter rejected");
            observer.on_event(&SplitEvent::CutterRejected {
                panel: target,
                cutter,
                reason: err.kind(),
            });
            report.rejected_cutters.push(RejectedCutter {
                cutter,
                reason: err.kind(),
            });
        }

        if !plan.is_split() {
            debug!("cutters do not separate the panel");
            observer.on_event(&SplitEvent::PanelUnchanged { panel: target });
            return report;
        }

        let panel_type = doc.panel_type(target).unwrap_or_default();
        let mut created: Vec<(PanelId, &Fragment)> = Vec::with_capacity(plan.fragments.len());
        for fragment in &plan.fragments {
            match self.materialize(doc, target, fragment, &panel_type) {
                Ok((id, attributes)) => {
                    observer.on_event(&SplitEvent::FragmentMaterialized {
                        panel: target,
                        fragment: id,
                        attributes,
                    });
                    created.push((id, fragment));
                }
                Err(err) => {
                    warn!(%err, "fragment dropped");
                    observer.on_event(&SplitEvent::MaterializationRejected {
                        panel: target,
                        message: err.to_string(),
                    });
                    report.rejected_fragments += 1;
                }
            }
        }
        report.created = created.iter().map(|(id, _)| *id).collect();

        if self.config.transfer_openings {
            report.openings_transferred =
                self.transfer_openings(doc, target, &created, tol, observer);
        }

        if created.len() >= 2 {
            report.status = PanelStatus::Split;
            if self.config.delete_source {
                match doc.delete_panel(target) {
                    Ok(()) => {
                        observer.on_event(&SplitEvent::PanelDeleted { panel: target });
                        report.source_deleted = true;
                    }
                    Err(err) => warn!(%err, "source panel could not be deleted"),
                }
            }
        } else {
            report.status = PanelStatus::Incomplete;
        }

        info!(
            created = report.created.len(),
            openings = report.openings_transferred,
            "panel committed"
        );
        report
    }

    fn materialize<D: PanelDocument>(
        &self,
        doc: &mut D,
        source: PanelId,
        fragment: &Fragment,
        panel_type: &str,
    ) -> Result<(PanelId, usize), GeometryError> {
        let id = doc
            .create_panel(&fragment.contour, panel_type)
            .map_err(|e| GeometryError::MaterializationRejected(e.to_string()))?;
        let attributes = doc.copy_attributes(source, id).unwrap_or_else(|err| {
            warn!(fragment = %id, %err, "attributes not copied");
            0
        });
        Ok((id, attributes))
    }

    fn transfer_openings<D, O>(
        &self,
        doc: &mut D,
        source: PanelId,
        created: &[(PanelId, &Fragment)],
        tol: &Tolerance,
        observer: &mut O,
    ) -> usize
    where
        D: PanelDocument,
        O: SplitObserver,
    {
        let mut transferred = 0;
        for opening in doc.openings(source) {
            let Some(contour) = doc.opening_contour(opening) else {
                skip(observer, opening, "opening has no contour".to_string());
                continue;
            };

            let mut placed = false;
            for (fragment_id, fragment) in created {
                let Some(projected) = transfer_opening(&contour, fragment, tol) else {
                    continue;
                };
                match doc.create_opening(&projected, *fragment_id) {
                    Ok(new_id) => {
                        observer.on_event(&SplitEvent::OpeningTransferred {
                            opening,
                            fragment: *fragment_id,
                            created: new_id,
                        });
                        transferred += 1;
                        placed = true;
                    }
                    Err(err) => {
                        warn!(%opening, %err, "opening could not be recreated");
                    }
                }
            }

            if !placed {
                skip(observer, opening, "no fragment holds the opening".to_string());
            }
        }
        transferred
    }
}

fn skip<O: SplitObserver>(observer: &mut O, opening: OpeningId, message: String) {
    debug!(%opening, %message, "opening skipped");
    observer.on_event(&SplitEvent::OpeningSkipped { opening, message });
}
