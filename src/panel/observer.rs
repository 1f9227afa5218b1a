// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Optional diagnostic sink for the panel pipeline

use super::{OpeningId, PanelId};
use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};

/// Something worth telling the host about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SplitEvent {
    CutterRejected {
        panel: PanelId,
        cutter: PanelId,
        reason: ErrorKind,
    },
    FragmentMaterialized {
        panel: PanelId,
        fragment: PanelId,
        attributes: usize,
    },
    MaterializationRejected {
        panel: PanelId,
        message: String,
    },
    OpeningTransferred {
        opening: OpeningId,
        fragment: PanelId,
        created: OpeningId,
    },
    OpeningSkipped {
        opening: OpeningId,
        message: String,
    },
    PanelDeleted {
        panel: PanelId,
    },
    PanelUnchanged {
        panel: PanelId,
    },
    PanelFailed {
        panel: PanelId,
        reason: ErrorKind,
    },
}

/// Receives pipeline events. Implementations must not influence the result.
pub trait SplitObserver {
    fn on_event(&mut self, _event: &SplitEvent) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SplitObserver for NullObserver {}

/// Observer that keeps every event in order
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<SplitEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&SplitEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl SplitObserver for EventLog {
    fn on_event(&mut self, event: &SplitEvent) {
        self.events.push(event.clone());
    }
}
