// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Document collaborator interface
//!
//! The splitter never holds live entities; it reads loops out of a
//! `PanelDocument` and hands fragments back for materialization.

use super::{OpeningId, PanelId};
use crate::geometry::Loop;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a document implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("panel {0} not found")]
    UnknownPanel(PanelId),

    #[error("opening {0} not found")]
    UnknownOpening(OpeningId),

    #[error("panel type '{0}' is not defined")]
    UnknownPanelType(String),

    #[error("geometry rejected: {0}")]
    RejectedGeometry(String),

    #[error("attribute '{0}' is read-only")]
    ReadOnlyAttribute(String),

    #[error("tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),

    #[error("selection cancelled")]
    Cancelled,
}

/// Storage kind of a panel attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Number,
    Integer,
    Text,
    Reference,
}

/// Attribute value; its kind must match the slot it is written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Reference(u64),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Number(_) => AttributeKind::Number,
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::Text(_) => AttributeKind::Text,
            AttributeValue::Reference(_) => AttributeKind::Reference,
        }
    }

    /// Zero value of a kind, used for freshly created slots
    pub fn default_for(kind: AttributeKind) -> Self {
        match kind {
            AttributeKind::Number => AttributeValue::Number(0.0),
            AttributeKind::Integer => AttributeValue::Integer(0),
            AttributeKind::Text => AttributeValue::Text(String::new()),
            AttributeKind::Reference => AttributeValue::Reference(0),
        }
    }
}

/// Operations the splitter needs from the host document
pub trait PanelDocument {
    /// Linear tolerance preferred by the host, if it has one
    fn tolerance_hint(&self) -> Option<f64> {
        None
    }

    /// Outer boundary of a panel, `None` if the panel has none
    fn outer_contour(&self, panel: PanelId) -> Option<Loop>;

    fn panel_type(&self, panel: PanelId) -> Option<String>;

    fn create_panel(&mut self, contour: &Loop, panel_type: &str) -> Result<PanelId, DocumentError>;

    /// Copy every writable attribute present on both panels with the same
    /// name and kind. Returns the number of values copied.
    fn copy_attributes(&mut self, source: PanelId, target: PanelId) -> Result<usize, DocumentError>;

    fn openings(&self, panel: PanelId) -> Vec<OpeningId>;

    fn opening_contour(&self, opening: OpeningId) -> Option<Loop>;

    fn create_opening(&mut self, contour: &Loop, host: PanelId) -> Result<OpeningId, DocumentError>;

    fn delete_panel(&mut self, panel: PanelId) -> Result<(), DocumentError>;
}
