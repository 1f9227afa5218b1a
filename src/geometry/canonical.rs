// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Loop canonicalization
//!
//! Turns a raw closed vertex sequence into a loop that is planar, free of
//! zero-length and colinear edges, closed, and counter-clockwise about the
//! plane normal. The first surviving vertex stays first, so canonicalizing an
//! already canonical loop returns it unchanged.

use super::{points_equal, GeometryError, Loop, Plane, Point, Result, Segment, Tolerance};
use crate::utils::math::shoelace_area;
use std::cmp::Ordering;

/// Canonicalize a raw vertex sequence on `plane`
pub fn canonicalize(points: &[Point], plane: &Plane, tol: &Tolerance) -> Result<Loop> {
    let projected: Vec<Point> = points.iter().map(|p| plane.project(p)).collect();

    let mut ring = drop_near_duplicates(&projected, tol);
    close_ring(&mut ring, tol);
    ensure_usable(&ring)?;

    let ring = collapse_colinear(ring, tol);
    ensure_usable(&ring)?;

    let ring = orient_ccw(ring, plane);
    let segments = build_segments(&ring, tol);
    if segments.len() < 3 {
        return Err(GeometryError::DegenerateFragment {
            vertices: segments.len(),
        });
    }
    Ok(Loop::from_segments(segments))
}

/// Canonicalize the vertices of an existing loop
pub fn canonicalize_loop(contour: &Loop, plane: &Plane, tol: &Tolerance) -> Result<Loop> {
    canonicalize(&contour.vertices(), plane, tol)
}

/// Rotate a loop so it starts at the vertex lowest along the axis
/// perpendicular to `cut`, ties broken along the cut direction.
pub fn reorder_start(contour: &Loop, cut: &Segment, plane: &Plane, tol: &Tolerance) -> Loop {
    let Some(dir) = cut
        .direction(tol)
        .and_then(|d| plane.project_vector(&d).try_normalize(tol.linear))
    else {
        return contour.clone();
    };
    let across = plane.normal.cross(&dir);

    let ring = contour.vertices();
    let key = |p: &Point| {
        let d = p - cut.start;
        (d.dot(&across), d.dot(&dir))
    };

    let mut best = 0;
    for (i, p) in ring.iter().enumerate().skip(1) {
        if compare_keys(key(p), key(&ring[best]), tol) == Ordering::Less {
            best = i;
        }
    }

    if best == 0 {
        return contour.clone();
    }
    let mut rotated = ring;
    rotated.rotate_left(best);
    Loop::from_vertices(&rotated)
}

fn compare_keys(a: (f64, f64), b: (f64, f64), tol: &Tolerance) -> Ordering {
    match tol.sign(a.0 - b.0) {
        Ordering::Equal => tol.sign(a.1 - b.1),
        other => other,
    }
}

fn ensure_usable(ring: &[Point]) -> Result<()> {
    if ring.len() < 3 {
        return Err(GeometryError::DegenerateFragment {
            vertices: ring.len(),
        });
    }
    Ok(())
}

/// Keep a vertex only if it is farther than tolerance from the last kept one
fn drop_near_duplicates(points: &[Point], tol: &Tolerance) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if kept.last().map_or(true, |last| !points_equal(last, p, tol)) {
            kept.push(*p);
        }
    }
    kept
}

/// The ring stores each vertex once; a trailing copy of the first vertex is
/// the explicit closure and is folded into the implicit closing edge.
fn close_ring(ring: &mut Vec<Point>, tol: &Tolerance) {
    while ring.len() > 1 && points_equal(&ring[0], &ring[ring.len() - 1], tol) {
        ring.pop();
    }
}

fn is_colinear_step(a: &Point, b: &Point, c: &Point, tol: &Tolerance) -> bool {
    let e1 = b - a;
    let e2 = c - b;
    let (l1, l2) = (e1.norm(), e2.norm());
    if l1 <= tol.linear || l2 <= tol.linear {
        return false;
    }
    let d1 = e1 / l1;
    let d2 = e2 / l2;
    d1.cross(&d2).norm() <= tol.angular && d1.dot(&d2) > 0.0
}

/// Remove middle vertices of same-direction colinear triples, cyclically
fn collapse_colinear(mut ring: Vec<Point>, tol: &Tolerance) -> Vec<Point> {
    loop {
        let n = ring.len();
        if n < 3 {
            return ring;
        }
        let found = (0..n).find(|&i| {
            let prev = &ring[(i + n - 1) % n];
            let next = &ring[(i + 1) % n];
            is_colinear_step(prev, &ring[i], next, tol)
        });
        match found {
            Some(i) => {
                ring.remove(i);
            }
            None => return ring,
        }
    }
}

/// Reverse the ring (keeping its first vertex) when it winds clockwise
fn orient_ccw(ring: Vec<Point>, plane: &Plane) -> Vec<Point> {
    let (u, v) = plane.frame();
    let flat: Vec<_> = ring.iter().map(|p| plane.to_2d(p, &u, &v)).collect();
    if shoelace_area(&flat) >= 0.0 {
        return ring;
    }
    let mut reversed = Vec::with_capacity(ring.len());
    reversed.push(ring[0]);
    reversed.extend(ring[1..].iter().rev());
    reversed
}

fn build_segments(ring: &[Point], tol: &Tolerance) -> Vec<Segment> {
    let n = ring.len();
    let mut segments: Vec<Segment> = Vec::with_capacity(n);
    for i in 0..n {
        let a = segments.last().map_or(ring[i], |s| s.end);
        let b = ring[(i + 1) % n];
        if points_equal(&a, &b, tol) {
            continue;
        }
        segments.push(Segment::new(a, b));
    }

    if let (Some(first), Some(last)) = (segments.first().copied(), segments.last().copied()) {
        if !points_equal(&last.end, &first.start, tol) {
            segments.push(Segment::new(last.end, first.start));
        }
    }
    segments
}
