// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Split orchestration: plane fit, cut lines, iterative splitting

use super::{
    canonicalize_loop, prepare_cut_lines, split_loop, GeometryError, Loop, Plane, Result, Segment,
    Tolerance,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A loop produced by splitting, with the plane it lies on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub contour: Loop,
    pub plane: Plane,
}

impl Fragment {
    pub fn area(&self) -> f64 {
        self.contour.area_in(&self.plane)
    }
}

/// Outcome of splitting one contour; pure data, no document access
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub plane: Plane,
    pub cut_lines: Vec<Segment>,
    /// `(cutter index, reason)` for cutters that produced no cut line
    pub rejected_cutters: Vec<(usize, GeometryError)>,
    pub fragments: Vec<Fragment>,
}

impl SplitPlan {
    /// At least two fragments came out; otherwise the split is a no-op
    pub fn is_split(&self) -> bool {
        self.fragments.len() >= 2
    }
}

/// Plan the split of `contour` by the planes of `cutters`.
///
/// Only a degenerate `contour` fails; everything else is reported inside the
/// plan.
pub fn plan_split(contour: &Loop, cutters: &[Loop], tol: &Tolerance) -> Result<SplitPlan> {
    let plane = Plane::fit(&contour.vertices(), tol)?;
    let prepared = prepare_cut_lines(&plane, contour, cutters, tol);
    debug!(
        cut_lines = prepared.lines.len(),
        rejected = prepared.rejected.len(),
        duplicates = prepared.duplicates,
        "prepared cut lines"
    );

    let fragments = split_by_lines(contour, &plane, &prepared.lines, tol)
        .into_iter()
        .map(|contour| Fragment { contour, plane })
        .collect();

    Ok(SplitPlan {
        plane,
        cut_lines: prepared.lines,
        rejected_cutters: prepared.rejected,
        fragments,
    })
}

/// Apply cut lines in order to an evolving set of loops.
///
/// Each line is tested against the fragments left by the previous lines; a
/// loop the line does not separate is carried over unchanged. Every survivor
/// is canonicalized once more at the end and degenerate ones are dropped.
pub fn split_by_lines(
    contour: &Loop,
    plane: &Plane,
    cut_lines: &[Segment],
    tol: &Tolerance,
) -> Vec<Loop> {
    let mut working = vec![contour.clone()];

    for (index, cut) in cut_lines.iter().enumerate() {
        let mut next = Vec::with_capacity(working.len() * 2);
        for lp in working {
            let parts = split_loop(&lp, cut, plane, tol);
            if parts.len() == 2 {
                next.extend(parts);
            } else {
                next.push(lp);
            }
        }
        trace!(cut = index, loops = next.len(), "applied cut line");
        working = next;
    }

    working
        .iter()
        .filter_map(|lp| match canonicalize_loop(lp, plane, tol) {
            Ok(clean) => Some(clean),
            Err(err) => {
                debug!(%err, "dropping degenerate fragment");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Vector};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y, 0.0)
    }

    fn square() -> Loop {
        Loop::from_vertices(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)])
    }

    #[test]
    fn test_no_lines_keeps_contour() {
        let tol = Tolerance::default();
        let plane = Plane::new(Point::origin(), Vector::z()).unwrap();
        let out = split_by_lines(&square(), &plane, &[], &tol);
        assert_eq!(out, vec![square()]);
    }

    #[test]
    fn test_non_separating_line_keeps_fragment() {
        let tol = Tolerance::default();
        let plane = Plane::new(Point::origin(), Vector::z()).unwrap();
        let lines = [
            Segment::new(p(5.0, 0.0), p(5.0, 10.0)),
            // Bounded to the left half, but split as an infinite line
            Segment::new(p(0.0, 5.0), p(5.0, 5.0)),
        ];
        let out = split_by_lines(&square(), &plane, &lines, &tol);
        assert_eq!(out.len(), 4);

        let lines = [
            Segment::new(p(5.0, 0.0), p(5.0, 10.0)),
            Segment::new(p(2.0, 0.0), p(2.0, 10.0)),
        ];
        let out = split_by_lines(&square(), &plane, &lines, &tol);
        assert_eq!(out.len(), 3);
        let total: f64 = out.iter().map(|l| l.area_in(&plane)).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_plan_split_degenerate_contour() {
        let tol = Tolerance::default();
        let line = Loop::from_vertices(&[p(0.0, 0.0), p(1.0, 0.0)]);
        assert!(matches!(
            plan_split(&line, &[], &tol),
            Err(GeometryError::DegeneratePlane { points: 2 })
        ));
    }

    #[test]
    fn test_concave_cuts_only_split_the_arm_they_cross() {
        let tol = Tolerance::default();
        let plane = Plane::new(Point::origin(), Vector::z()).unwrap();
        let l_shape = Loop::from_vertices(&[
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 4.0),
            p(4.0, 4.0),
            p(4.0, 10.0),
            p(0.0, 10.0),
        ]);
        let lines = [
            // Crosses the horizontal arm only
            Segment::new(p(7.0, -1.0), p(7.0, 11.0)),
            // Misses the right piece, crosses the vertical arm of the rest
            Segment::new(p(-1.0, 7.0), p(11.0, 7.0)),
        ];

        let first = split_by_lines(&l_shape, &plane, &lines[..1], &tol);
        let mut areas: Vec<f64> = first.iter().map(|l| l.area_in(&plane)).collect();
        areas.sort_by(f64::total_cmp);
        assert_eq!(areas.len(), 2);
        assert_relative_eq!(areas[0], 12.0, epsilon = 1e-9);
        assert_relative_eq!(areas[1], 52.0, epsilon = 1e-9);

        let out = split_by_lines(&l_shape, &plane, &lines, &tol);
        let mut areas: Vec<f64> = out.iter().map(|l| l.area_in(&plane)).collect();
        areas.sort_by(f64::total_cmp);
        assert_eq!(areas.len(), 3);
        assert_relative_eq!(areas[0], 12.0, epsilon = 1e-9);
        assert_relative_eq!(areas[1], 12.0, epsilon = 1e-9);
        assert_relative_eq!(areas[2], 40.0, epsilon = 1e-9);
    }
}
