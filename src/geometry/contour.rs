// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closed polygonal loops

use super::{points_equal, Plane, Point, Segment, Tolerance};
use crate::utils::math::shoelace_area;
use serde::{Deserialize, Serialize};

/// Ordered, closed sequence of segments lying on one plane
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Loop {
    segments: Vec<Segment>,
}

impl Loop {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Build a loop through `vertices`, adding the closing edge.
    /// A trailing vertex equal to the first is treated as explicit closure.
    pub fn from_vertices(vertices: &[Point]) -> Self {
        let mut pts = vertices.to_vec();
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        let n = pts.len();
        if n < 2 {
            return Self::default();
        }
        let segments = (0..n)
            .map(|i| Segment::new(pts[i], pts[(i + 1) % n]))
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First point of every edge
    pub fn vertices(&self) -> Vec<Point> {
        self.segments.iter().map(|s| s.start).collect()
    }

    /// Vertices with consecutive duplicates removed and closure implied
    pub fn ring(&self, tol: &Tolerance) -> Vec<Point> {
        let mut ring: Vec<Point> = Vec::with_capacity(self.segments.len());
        for p in self.vertices() {
            if ring.last().map_or(true, |last| !points_equal(last, &p, tol)) {
                ring.push(p);
            }
        }
        while ring.len() > 1 && points_equal(&ring[0], &ring[ring.len() - 1], tol) {
            ring.pop();
        }
        ring
    }

    /// Every edge ends where the next one starts
    pub fn is_closed(&self, tol: &Tolerance) -> bool {
        let n = self.segments.len();
        n > 0
            && (0..n).all(|i| {
                points_equal(&self.segments[i].end, &self.segments[(i + 1) % n].start, tol)
            })
    }

    /// Mean of the first point of every edge
    pub fn centroid(&self) -> Point {
        let n = self.segments.len().max(1) as f64;
        let sum = self
            .segments
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, s| acc + s.start.coords);
        Point::from(sum / n)
    }

    pub fn perimeter(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Signed area in the 2D frame of `plane`, positive for CCW about its normal
    pub fn area_in(&self, plane: &Plane) -> f64 {
        let (u, v) = plane.frame();
        let pts: Vec<_> = self
            .segments
            .iter()
            .map(|s| plane.to_2d(&s.start, &u, &v))
            .collect();
        shoelace_area(&pts)
    }

    /// Orthogonal projection of every segment endpoint onto `plane`
    pub fn project_onto(&self, plane: &Plane) -> Loop {
        let segments = self
            .segments
            .iter()
            .map(|s| Segment::new(plane.project(&s.start), plane.project(&s.end)))
            .collect();
        Self { segments }
    }
}
