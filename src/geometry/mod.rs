// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry engine - planes, loops and the panel splitting algorithms

mod plane;
mod segment;
mod contour;
mod canonical;
mod intersect;
mod cut_lines;
mod splitter;
mod split;
mod containment;

pub use plane::Plane;
pub use segment::Segment;
pub use contour::Loop;
pub use canonical::{canonicalize, canonicalize_loop, reorder_start};
pub use intersect::{cut_line, edge_hits, intersect_planes, Line};
pub use cut_lines::{dedup_segments, prepare_cut_lines, PreparedCuts};
pub use splitter::split_loop;
pub use split::{plan_split, split_by_lines, Fragment, SplitPlan};
pub use containment::{loop_fits_inside, point_in_polygon, transfer_opening};

pub use crate::error::{GeometryError, Result};
pub use crate::tolerance::Tolerance;

/// 3D point in model units
pub type Point = nalgebra::Point3<f64>;

/// 3D vector in model units
pub type Vector = nalgebra::Vector3<f64>;

/// Almost-equal comparison of two points
pub fn points_equal(a: &Point, b: &Point, tol: &Tolerance) -> bool {
    (a - b).norm() <= tol.linear
}
