// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounded straight segments

use super::{points_equal, Point, Tolerance, Vector};
use serde::{Deserialize, Serialize};

/// Ordered pair of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn vector(&self) -> Vector {
        self.end - self.start
    }

    /// Unit direction, `None` when the segment is shorter than the tolerance
    pub fn direction(&self, tol: &Tolerance) -> Option<Vector> {
        let v = self.vector();
        let len = v.norm();
        (len > tol.linear).then(|| v / len)
    }

    pub fn midpoint(&self) -> Point {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Orientation-insensitive comparison: endpoints match forward or reversed.
    pub fn same_geometry(&self, other: &Segment, tol: &Tolerance) -> bool {
        let forward = points_equal(&self.start, &other.start, tol)
            && points_equal(&self.end, &other.end, tol);
        let backward = points_equal(&self.start, &other.end, tol)
            && points_equal(&self.end, &other.start, tol);
        forward || backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_geometry_ignores_direction() {
        let tol = Tolerance::default();
        let a = Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(5.0, 1.0, 0.0));
        assert!(a.same_geometry(&a.reversed(), &tol));
        assert!(a.reversed().same_geometry(&a, &tol));

        let nudged = Segment::new(Point::new(0.0, 0.0, 1e-9), Point::new(5.0, 1.0, 0.0));
        assert!(a.same_geometry(&nudged, &tol));

        let other = Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(5.0, 2.0, 0.0));
        assert!(!a.same_geometry(&other, &tol));
    }

    #[test]
    fn test_direction_of_short_segment() {
        let tol = Tolerance::new(0.1);
        let short = Segment::new(Point::origin(), Point::new(0.05, 0.0, 0.0));
        assert!(short.direction(&tol).is_none());

        let long = Segment::new(Point::origin(), Point::new(0.0, 2.0, 0.0));
        assert_eq!(long.direction(&tol), Some(Vector::y()));
        assert_eq!(long.midpoint(), Point::new(0.0, 1.0, 0.0));
    }
}
