// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Panel pipeline - document interface, batch splitting and reporting

mod document;
mod memory;
mod observer;
mod pipeline;

pub use document::{AttributeKind, AttributeValue, DocumentError, PanelDocument};
pub use memory::{AttributeSlot, MemoryDocument, OpeningRecord, PanelRecord, PanelTypeSchema};
pub use observer::{EventLog, NullObserver, SplitEvent, SplitObserver};
pub use pipeline::{
    BatchReport, BatchSummary, PanelReport, PanelSplitter, PanelStatus, RejectedCutter,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a panel in the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub u64);

/// Identifier of an opening in the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpeningId(pub u64);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for OpeningId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O{}", self.0)
    }
}
