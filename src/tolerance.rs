// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tolerance policy shared by every geometric comparison

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default minimum distinguishable length
pub const DEFAULT_LINEAR: f64 = 1e-6;

/// Default colinearity threshold (cross product of unit directions)
pub const DEFAULT_ANGULAR: f64 = 1e-6;

/// Planes with |n1 · n2| above this are treated as parallel
pub const DEFAULT_PARALLEL_LIMIT: f64 = 0.999;

/// Read-only tolerance values used for equality, degeneracy and crossing tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub linear: f64,
    pub angular: f64,
    pub parallel_limit: f64,
}

impl Tolerance {
    pub fn new(linear: f64) -> Self {
        Self {
            linear,
            ..Self::default()
        }
    }

    pub fn with_angular(mut self, angular: f64) -> Self {
        self.angular = angular;
        self
    }

    pub fn with_parallel_limit(mut self, limit: f64) -> Self {
        self.parallel_limit = limit;
        self
    }

    /// Three-way sign of `value` with a dead band of `linear`
    pub fn sign(&self, value: f64) -> Ordering {
        if value > self.linear {
            Ordering::Greater
        } else if value < -self.linear {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.linear
    }

    pub fn lengths_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            linear: DEFAULT_LINEAR,
            angular: DEFAULT_ANGULAR,
            parallel_limit: DEFAULT_PARALLEL_LIMIT,
        }
    }
}
