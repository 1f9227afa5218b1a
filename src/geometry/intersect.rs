// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Plane/plane intersection clipped to a bounded contour

use super::{points_equal, GeometryError, Loop, Plane, Point, Result, Segment, Tolerance, Vector};
use std::cmp::Ordering;

/// Unbounded line with unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub origin: Point,
    pub direction: Vector,
}

impl Line {
    /// Scalar position of `point` along the line
    pub fn parameter(&self, point: &Point) -> f64 {
        (point - self.origin).dot(&self.direction)
    }
}

/// Intersection line of two planes.
///
/// Fails with `ParallelCutter` when `|n1 · n2|` exceeds the parallel limit.
pub fn intersect_planes(target: &Plane, cutting: &Plane, tol: &Tolerance) -> Result<Line> {
    let n1 = &target.normal;
    let n2 = &cutting.normal;
    let dot = n1.dot(n2);
    if dot.abs() > tol.parallel_limit {
        return Err(GeometryError::ParallelCutter { dot: dot.abs() });
    }

    let axis = n1.cross(n2);
    let d1 = target.offset();
    let d2 = cutting.offset();
    let origin = (n2 * d1 - n1 * d2).cross(&axis) / axis.norm_squared();

    Ok(Line {
        origin: Point::from(origin),
        direction: axis.normalize(),
    })
}

/// Points where `line` (lying on `plane`) meets the edges of `contour`.
///
/// Edges lying along the line contribute nothing themselves; their endpoints
/// are reported by the neighbouring edges. Duplicate hits are merged.
pub fn edge_hits(line: &Line, plane: &Plane, contour: &Loop, tol: &Tolerance) -> Vec<Point> {
    let across = plane.normal.cross(&line.direction);
    let side = |p: &Point| (p - line.origin).dot(&across);

    let mut hits: Vec<Point> = Vec::new();
    let mut push = |p: Point| {
        let p = plane.project(&p);
        if !hits.iter().any(|h| points_equal(h, &p, tol)) {
            hits.push(p);
        }
    };

    for seg in contour.segments() {
        let sa = side(&seg.start);
        let sb = side(&seg.end);
        match (tol.sign(sa), tol.sign(sb)) {
            (Ordering::Equal, Ordering::Equal) => {}
            (Ordering::Equal, _) => push(seg.start),
            (_, Ordering::Equal) => push(seg.end),
            (a, b) if a != b => {
                let t = sa / (sa - sb);
                push(seg.start + seg.vector() * t);
            }
            _ => {}
        }
    }
    hits
}

/// Bounded cut segment where `cutting` crosses `contour` on `target`.
///
/// The segment spans the first and last hit along the line, so concave
/// contours with interior hits are covered over their full depth. A line
/// that only grazes the contour (no vertex strictly on either side) is not a
/// crossing.
pub fn cut_line(
    target: &Plane,
    cutting: &Plane,
    contour: &Loop,
    tol: &Tolerance,
) -> Result<Segment> {
    let line = intersect_planes(target, cutting, tol)?;

    if !separates(&line, target, contour, tol) {
        return Err(GeometryError::InsufficientIntersections { hits: 0 });
    }

    let mut hits = edge_hits(&line, target, contour, tol);
    if hits.len() < 2 {
        return Err(GeometryError::InsufficientIntersections { hits: hits.len() });
    }
    hits.sort_by(|a, b| line.parameter(a).total_cmp(&line.parameter(b)));

    let segment = Segment::new(hits[0], hits[hits.len() - 1]);
    if segment.length() <= tol.linear {
        return Err(GeometryError::InsufficientIntersections { hits: 1 });
    }
    Ok(segment)
}

/// Contour has vertices strictly on both sides of the line
fn separates(line: &Line, plane: &Plane, contour: &Loop, tol: &Tolerance) -> bool {
    let across = plane.normal.cross(&line.direction);
    let (mut below, mut above) = (false, false);
    for p in contour.vertices() {
        match tol.sign((p - line.origin).dot(&across)) {
            Ordering::Less => below = true,
            Ordering::Greater => above = true,
            Ordering::Equal => {}
        }
    }
    below && above
}
