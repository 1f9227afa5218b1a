// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cut-line preparation for one target contour

use super::{cut_line, GeometryError, Loop, Plane, Segment, Tolerance};
use tracing::debug;

/// Cut lines for one target plus the cutters that produced none
#[derive(Debug, Clone, Default)]
pub struct PreparedCuts {
    /// Distinct cut segments, in cutter order
    pub lines: Vec<Segment>,
    /// `(cutter index, reason)` for every cutter that contributed no line
    pub rejected: Vec<(usize, GeometryError)>,
    /// Number of lines dropped as geometric duplicates of an earlier one
    pub duplicates: usize,
}

/// Intersect every cutter with the target contour.
///
/// Cutters are fitted to a plane by their own contour. The caller excludes
/// the target itself from `cutters`.
pub fn prepare_cut_lines(
    target_plane: &Plane,
    target: &Loop,
    cutters: &[Loop],
    tol: &Tolerance,
) -> PreparedCuts {
    let mut prepared = PreparedCuts::default();
    let mut lines = Vec::with_capacity(cutters.len());

    for (index, cutter) in cutters.iter().enumerate() {
        let result = Plane::fit(&cutter.vertices(), tol)
            .and_then(|plane| cut_line(target_plane, &plane, target, tol));
        match result {
            Ok(segment) if segment.length() > tol.linear => lines.push(segment),
            Ok(_) => prepared
                .rejected
                .push((index, GeometryError::InsufficientIntersections { hits: 1 })),
            Err(err) => {
                debug!(cutter = index, %err, "cutter contributes no cut line");
                prepared.rejected.push((index, err));
            }
        }
    }

    let found = lines.len();
    prepared.lines = dedup_segments(lines, tol);
    prepared.duplicates = found - prepared.lines.len();
    prepared
}

/// Drop segments equal to an earlier one, in either direction
pub fn dedup_segments(segments: Vec<Segment>, tol: &Tolerance) -> Vec<Segment> {
    let mut unique: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        if !unique.iter().any(|u| u.same_geometry(&seg, tol)) {
            unique.push(seg);
        }
    }
    unique
}
