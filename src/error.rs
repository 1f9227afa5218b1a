// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error kinds reported by the geometry engine and the panel pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Failures of a single geometric operation.
///
/// None of these are fatal to a batch: callers drop the offending cutter,
/// fragment or panel and continue with the rest.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Fewer than three non-colinear points
    #[error("degenerate plane: {points} point(s), no non-colinear triple")]
    DegeneratePlane { points: usize },

    /// |n1 · n2| above the parallel limit
    #[error("cutter plane is parallel to the target plane (|dot| = {dot:.6})")]
    ParallelCutter { dot: f64 },

    /// The intersection line does not cross the contour
    #[error("intersection line crosses the contour at {hits} distinct point(s)")]
    InsufficientIntersections { hits: usize },

    /// A loop collapsed below three usable vertices
    #[error("degenerate fragment: {vertices} usable vertex(es) left")]
    DegenerateFragment { vertices: usize },

    /// The document refused to create an entity from the loop
    #[error("materialization rejected: {0}")]
    MaterializationRejected(String),
}

impl GeometryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeometryError::DegeneratePlane { .. } => ErrorKind::DegeneratePlane,
            GeometryError::ParallelCutter { .. } => ErrorKind::ParallelCutter,
            GeometryError::InsufficientIntersections { .. } => {
                ErrorKind::InsufficientIntersections
            }
            GeometryError::DegenerateFragment { .. } => ErrorKind::DegenerateFragment,
            GeometryError::MaterializationRejected(_) => ErrorKind::MaterializationRejected,
        }
    }
}

/// Payload-free error kind, recorded in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DegeneratePlane,
    ParallelCutter,
    InsufficientIntersections,
    DegenerateFragment,
    MaterializationRejected,
    SelectionCancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DegeneratePlane => "degenerate_plane",
            ErrorKind::ParallelCutter => "parallel_cutter",
            ErrorKind::InsufficientIntersections => "insufficient_intersections",
            ErrorKind::DegenerateFragment => "degenerate_fragment",
            ErrorKind::MaterializationRejected => "materialization_rejected",
            ErrorKind::SelectionCancelled => "selection_cancelled",
        }
    }
}
