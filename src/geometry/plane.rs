// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planes and best-fit plane derivation

use super::{GeometryError, Point, Result, Tolerance, Vector};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Plane through `origin` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point,
    pub normal: Vector,
}

impl Plane {
    /// Create a plane, normalizing `normal`. Returns `None` for a zero normal.
    pub fn new(origin: Point, normal: Vector) -> Option<Self> {
        let normal = normal.try_normalize(f64::EPSILON)?;
        Some(Self { origin, normal })
    }

    /// Fit a plane to an ordered point list.
    ///
    /// Edge vectors from the first point are scanned pairwise in order and the
    /// first pair whose cross product is longer than the tolerance wins, so the
    /// result only depends on point order, never on a global best fit.
    pub fn fit(points: &[Point], tol: &Tolerance) -> Result<Self> {
        let degenerate = GeometryError::DegeneratePlane {
            points: points.len(),
        };
        let Some(first) = points.first() else {
            return Err(degenerate);
        };

        for i in 1..points.len() {
            let v1 = points[i] - first;
            if v1.norm() <= tol.linear {
                continue;
            }
            for p in &points[i + 1..] {
                let v2 = p - first;
                let cross = v1.cross(&v2);
                if cross.norm() > tol.linear {
                    return Ok(Self {
                        origin: *first,
                        normal: cross.normalize(),
                    });
                }
            }
        }

        Err(degenerate)
    }

    /// Signed distance `(p - origin) · normal`
    pub fn signed_distance(&self, point: &Point) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Signed offset of the plane from the world origin
    pub fn offset(&self) -> f64 {
        self.normal.dot(&self.origin.coords)
    }

    /// Orthogonal projection of a point onto the plane
    pub fn project(&self, point: &Point) -> Point {
        point - self.normal * self.signed_distance(point)
    }

    /// Project a vector into the plane
    pub fn project_vector(&self, vector: &Vector) -> Vector {
        vector - self.normal * vector.dot(&self.normal)
    }

    /// In-plane orthonormal frame `(u, v)` with `v = normal × u`
    pub fn frame(&self) -> (Vector, Vector) {
        let n = &self.normal;
        let axis = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
            Vector::x()
        } else if n.y.abs() <= n.z.abs() {
            Vector::y()
        } else {
            Vector::z()
        };
        let u = self.project_vector(&axis).normalize();
        (u, n.cross(&u))
    }

    /// In-plane frame whose `u` follows `hint`, if `hint` has an in-plane component
    pub fn frame_along(&self, hint: &Vector, tol: &Tolerance) -> Option<(Vector, Vector)> {
        let projected = self.project_vector(hint);
        if projected.norm() <= tol.linear {
            return None;
        }
        let u = projected.normalize();
        Some((u, self.normal.cross(&u)))
    }

    /// 2D coordinates of a point in the frame `(u, v)` anchored at `origin`
    pub fn to_2d(&self, point: &Point, u: &Vector, v: &Vector) -> Point2<f64> {
        let d = point - self.origin;
        Point2::new(d.dot(u), d.dot(v))
    }
}
