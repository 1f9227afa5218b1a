// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Splitting a single loop by a single cut line
//! Vertices are classified against the line in the loop's 2D frame; edges
//! crossing the line get a shared vertex inserted on both sides

use super::{canonicalize, reorder_start, Loop, Plane, Point, Segment, Tolerance};
use crate::utils::math::{lerp_point, perp};
use std::cmp::Ordering;

/// Split `contour` by the infinite line through `cut`.
///
/// Returns up to two canonical loops: the side below the line first, then
/// the side above. Fewer than two means the line does not separate this loop.
pub fn split_loop(contour: &Loop, cut: &Segment, plane: &Plane, tol: &Tolerance) -> Vec<Loop> {
    let ring = contour.ring(tol);
    if ring.len() < 3 {
        return Vec::new();
    }

    let Some((u, v)) = first_edge_frame(&ring, plane, tol) else {
        return Vec::new();
    };

    let s0 = plane.to_2d(&cut.start, &u, &v);
    let s1 = plane.to_2d(&cut.end, &u, &v);
    let Some(dir) = (s1 - s0).try_normalize(tol.linear) else {
        return Vec::new();
    };
    let across = perp(&dir);
    let signed = |p: &Point| (plane.to_2d(p, &u, &v) - s0).dot(&across);

    let mut below: Vec<Point> = Vec::new();
    let mut above: Vec<Point> = Vec::new();
    let n = ring.len();

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let sa = signed(&a);
        let sb = signed(&b);
        let side_a = tol.sign(sa);
        let side_b = tol.sign(sb);

        match side_a {
            Ordering::Equal => {
                below.push(a);
                above.push(a);
            }
            Ordering::Less => below.push(a),
            Ordering::Greater => above.push(a),
        }

        if side_a != Ordering::Equal && side_b != Ordering::Equal && side_a != side_b {
            let crossing = lerp_point(&a, &b, sa / (sa - sb));
            below.push(crossing);
            above.push(crossing);
        } else if side_b == Ordering::Equal && side_a != Ordering::Equal {
            below.push(b);
            above.push(b);
        }
    }

    [below, above]
        .iter()
        .filter_map(|side| canonicalize(side, plane, tol).ok())
        .map(|lp| reorder_start(&lp, cut, plane, tol))
        .collect()
}

/// Frame whose `u` follows the first non-degenerate edge
fn first_edge_frame(
    ring: &[Point],
    plane: &Plane,
    tol: &Tolerance,
) -> Option<(nalgebra::Vector3<f64>, nalgebra::Vector3<f64>)> {
    let n = ring.len();
    (0..n).find_map(|i| plane.frame_along(&(ring[(i + 1) % n] - ring[i]), tol))
}
