// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point and loop containment, and opening transfer onto fragments
//!
//! Loop-in-loop containment only tests the centroid of the inner loop. It is
//! an approximation, not a polygon intersection: an opening straddling a cut
//! goes wholly to the fragment holding its centroid.

use super::{Fragment, Loop, Plane, Point, Segment, Tolerance};

/// Ray-casting (odd crossings) test in the polygon's own plane
pub fn point_in_polygon(point: &Point, polygon: &Loop, tol: &Tolerance) -> bool {
    let vertices = polygon.vertices();
    let Ok(plane) = Plane::fit(&vertices, tol) else {
        return false;
    };
    let (u, v) = plane.frame();
    let q = plane.to_2d(point, &u, &v);
    let pts: Vec<_> = vertices.iter().map(|p| plane.to_2d(p, &u, &v)).collect();

    let n = pts.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&pts[i], &pts[j]);
        if (a.y > q.y) != (b.y > q.y) {
            let x = (b.x - a.x) * (q.y - a.y) / (b.y - a.y) + a.x;
            if q.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Naive containment: the centroid of `inner` lies inside `outer`
pub fn loop_fits_inside(inner: &Loop, outer: &Loop, tol: &Tolerance) -> bool {
    !inner.is_empty() && point_in_polygon(&inner.centroid(), outer, tol)
}

/// Re-project an opening onto a fragment if the fragment holds it.
///
/// Returns `None` when the opening's centroid falls outside the fragment, or
/// when the projected contour collapses.
pub fn transfer_opening(opening: &Loop, fragment: &Fragment, tol: &Tolerance) -> Option<Loop> {
    if opening.is_empty() || !point_in_polygon(&opening.centroid(), &fragment.contour, tol) {
        return None;
    }

    let segments: Vec<Segment> = opening
        .project_onto(&fragment.plane)
        .segments()
        .iter()
        .filter(|s| s.length() > tol.linear)
        .copied()
        .collect();
    if segments.len() < 3 {
        return None;
    }

    let projected = Loop::from_segments(segments);
    loop_fits_inside(&projected, &fragment.contour, tol).then_some(projected)
}
