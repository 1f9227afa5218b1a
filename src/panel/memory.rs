// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory document backed by a JSON file

use super::{AttributeKind, AttributeValue, DocumentError, OpeningId, PanelDocument, PanelId};
use crate::geometry::{Loop, Point, Tolerance};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Attribute slot declared by a panel type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeSlot {
    pub kind: AttributeKind,
    #[serde(default)]
    pub read_only: bool,
}

/// Attribute slots every panel of a type carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelTypeSchema {
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRecord {
    pub panel_type: String,
    pub contour: Vec<Point>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub openings: Vec<OpeningId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningRecord {
    pub host: PanelId,
    pub contour: Vec<Point>,
}

/// Panels, openings and panel types held in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub panel_types: BTreeMap<String, PanelTypeSchema>,
    #[serde(default)]
    pub panels: BTreeMap<PanelId, PanelRecord>,
    #[serde(default)]
    pub openings: BTreeMap<OpeningId, OpeningRecord>,
    #[serde(default)]
    next_id: u64,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Load a document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read document: {:?}", path.as_ref()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse document: {:?}", path.as_ref()))
    }

    /// Save the document as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = self.to_json()?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write document: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut doc: MemoryDocument =
            serde_json::from_str(content).context("Invalid document JSON")?;
        if let Some(tolerance) = doc.tolerance {
            if !(tolerance.is_finite() && tolerance > 0.0) {
                bail!(
                    "document tolerance must be a positive finite number, got {}",
                    tolerance
                );
            }
        }
        doc.reconcile_next_id();
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize document")
    }

    /// Declare a panel type with `(name, kind, read_only)` attribute slots
    pub fn define_type(&mut self, name: &str, slots: &[(&str, AttributeKind, bool)]) {
        let attributes = slots
            .iter()
            .map(|&(slot, kind, read_only)| (slot.to_string(), AttributeSlot { kind, read_only }))
            .collect();
        self.panel_types
            .insert(name.to_string(), PanelTypeSchema { attributes });
    }

    /// Add a panel without validation; slots of a known type get defaults
    pub fn insert_panel(&mut self, panel_type: &str, contour: &[Point]) -> PanelId {
        let id = PanelId(self.allocate());
        let attributes = self.default_attributes(panel_type);
        self.panels.insert(
            id,
            PanelRecord {
                panel_type: panel_type.to_string(),
                contour: contour.to_vec(),
                attributes,
                openings: Vec::new(),
            },
        );
        id
    }

    /// Add an opening to an existing panel without validating its contour
    pub fn insert_opening(
        &mut self,
        host: PanelId,
        contour: &[Point],
    ) -> std::result::Result<OpeningId, DocumentError> {
        if !self.panels.contains_key(&host) {
            return Err(DocumentError::UnknownPanel(host));
        }
        let id = OpeningId(self.allocate());
        self.openings.insert(
            id,
            OpeningRecord {
                host,
                contour: contour.to_vec(),
            },
        );
        if let Some(panel) = self.panels.get_mut(&host) {
            panel.openings.push(id);
        }
        Ok(id)
    }

    /// Write an attribute value, honouring the type schema
    pub fn set_attribute(
        &mut self,
        panel: PanelId,
        name: &str,
        value: AttributeValue,
    ) -> std::result::Result<(), DocumentError> {
        let record = self
            .panels
            .get(&panel)
            .ok_or(DocumentError::UnknownPanel(panel))?;
        if self.slot(&record.panel_type, name).is_some_and(|s| s.read_only) {
            return Err(DocumentError::ReadOnlyAttribute(name.to_string()));
        }
        if let Some(record) = self.panels.get_mut(&panel) {
            record.attributes.insert(name.to_string(), value);
        }
        Ok(())
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelRecord> {
        self.panels.get(&id)
    }

    pub fn opening(&self, id: OpeningId) -> Option<&OpeningRecord> {
        self.openings.get(&id)
    }

    pub fn panel_ids(&self) -> Vec<PanelId> {
        self.panels.keys().copied().collect()
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn opening_count(&self) -> usize {
        self.openings.len()
    }

    fn tol(&self) -> Tolerance {
        Tolerance::new(self.tolerance.unwrap_or(crate::tolerance::DEFAULT_LINEAR))
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Keep freshly allocated ids above every id already in the file
    fn reconcile_next_id(&mut self) {
        let highest = self
            .panels
            .keys()
            .map(|id| id.0)
            .chain(self.openings.keys().map(|id| id.0))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(highest);
    }

    fn slot(&self, panel_type: &str, name: &str) -> Option<&AttributeSlot> {
        self.panel_types.get(panel_type)?.attributes.get(name)
    }

    fn default_attributes(&self, panel_type: &str) -> BTreeMap<String, AttributeValue> {
        self.panel_types
            .get(panel_type)
            .map(|schema| {
                schema
                    .attributes
                    .iter()
                    .map(|(name, slot)| (name.clone(), AttributeValue::default_for(slot.kind)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn validate(&self, contour: &Loop) -> std::result::Result<(), DocumentError> {
        let tol = self.tol();
        if contour.len() < 3 {
            return Err(DocumentError::RejectedGeometry(format!(
                "contour has {} edge(s)",
                contour.len()
            )));
        }
        if !contour.is_closed(&tol) {
            return Err(DocumentError::RejectedGeometry(
                "contour is not closed".to_string(),
            ));
        }
        if contour.segments().iter().any(|s| s.length() <= tol.linear) {
            return Err(DocumentError::RejectedGeometry(
                "contour has a zero-length edge".to_string(),
            ));
        }
        Ok(())
    }
}

impl PanelDocument for MemoryDocument {
    fn tolerance_hint(&self) -> Option<f64> {
        self.tolerance
    }

    fn outer_contour(&self, panel: PanelId) -> Option<Loop> {
        let record = self.panels.get(&panel)?;
        (!record.contour.is_empty()).then(|| Loop::from_vertices(&record.contour))
    }

    fn panel_type(&self, panel: PanelId) -> Option<String> {
        self.panels.get(&panel).map(|r| r.panel_type.clone())
    }

    fn create_panel(
        &mut self,
        contour: &Loop,
        panel_type: &str,
    ) -> std::result::Result<PanelId, DocumentError> {
        if !self.panel_types.contains_key(panel_type) {
            return Err(DocumentError::UnknownPanelType(panel_type.to_string()));
        }
        self.validate(contour)?;
        Ok(self.insert_panel(panel_type, &contour.vertices()))
    }

    fn copy_attributes(
        &mut self,
        source: PanelId,
        target: PanelId,
    ) -> std::result::Result<usize, DocumentError> {
        let from = self
            .panels
            .get(&source)
            .ok_or(DocumentError::UnknownPanel(source))?
            .attributes
            .clone();
        let to = self
            .panels
            .get(&target)
            .ok_or(DocumentError::UnknownPanel(target))?;

        let writable: Vec<(String, AttributeValue)> = from
            .into_iter()
            .filter(|(name, value)| {
                let present = to
                    .attributes
                    .get(name)
                    .is_some_and(|current| current.kind() == value.kind());
                let read_only = self
                    .slot(&to.panel_type, name)
                    .is_some_and(|slot| slot.read_only);
                present && !read_only
            })
            .collect();

        let copied = writable.len();
        if let Some(record) = self.panels.get_mut(&target) {
            record.attributes.extend(writable);
        }
        Ok(copied)
    }

    fn openings(&self, panel: PanelId) -> Vec<OpeningId> {
        self.panels
            .get(&panel)
            .map(|r| r.openings.clone())
            .unwrap_or_default()
    }

    fn opening_contour(&self, opening: OpeningId) -> Option<Loop> {
        let record = self.openings.get(&opening)?;
        (!record.contour.is_empty()).then(|| Loop::from_vertices(&record.contour))
    }

    fn create_opening(
        &mut self,
        contour: &Loop,
        host: PanelId,
    ) -> std::result::Result<OpeningId, DocumentError> {
        self.validate(contour)?;
        self.insert_opening(host, &contour.vertices())
    }

    /// Hosted openings are removed with their panel
    fn delete_panel(&mut self, panel: PanelId) -> std::result::Result<(), DocumentError> {
        let record = self
            .panels
            .remove(&panel)
            .ok_or(DocumentError::UnknownPanel(panel))?;
        for opening in record.openings {
            self.openings.remove(&opening);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y, 0.0)
    }

    fn square(size: f64) -> Vec<Point> {
        vec![p(0.0, 0.0), p(size, 0.0), p(size, size), p(0.0, size)]
    }

    fn schema_doc() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.define_type(
            "floor",
            &[
                ("thickness", AttributeKind::Number, false),
                ("mark", AttributeKind::Text, false),
                ("area", AttributeKind::Number, true),
                ("level", AttributeKind::Reference, false),
            ],
        );
        doc.define_type("beam", &[("mark", AttributeKind::Integer, false)]);
        doc
    }

    #[test]
    fn test_create_panel_validates() {
        let mut doc = schema_doc();
        let good = Loop::from_vertices(&square(2.0));
        assert!(doc.create_panel(&good, "floor").is_ok());

        assert_eq!(
            doc.create_panel(&good, "roof"),
            Err(DocumentError::UnknownPanelType("roof".to_string()))
        );

        let open = Loop::from_segments(good.segments()[..3].to_vec());
        assert!(matches!(
            doc.create_panel(&open, "floor"),
            Err(DocumentError::RejectedGeometry(_))
        ));
    }

    #[test]
    fn test_copy_attributes_matches_name_and_kind() {
        let mut doc = schema_doc();
        let source = doc.insert_panel("floor", &square(2.0));
        doc.set_attribute(source, "thickness", AttributeValue::Number(0.25))
            .unwrap();
        doc.set_attribute(source, "mark", AttributeValue::Text("F1".into()))
            .unwrap();
        doc.set_attribute(source, "level", AttributeValue::Reference(7))
            .unwrap();
        doc.set_attribute(source, "comment", AttributeValue::Text("x".into()))
            .unwrap();

        let same_type = doc.insert_panel("floor", &square(1.0));
        // thickness, mark, level; area is read-only, comment absent
        assert_eq!(doc.copy_attributes(source, same_type).unwrap(), 3);
        let copied = &doc.panel(same_type).unwrap().attributes;
        assert_eq!(copied["thickness"], AttributeValue::Number(0.25));
        assert_eq!(copied["level"], AttributeValue::Reference(7));
        assert!(!copied.contains_key("comment"));

        // Text "mark" does not fit an integer slot
        let other_type = doc.insert_panel("beam", &square(1.0));
        assert_eq!(doc.copy_attributes(source, other_type).unwrap(), 0);
    }

    #[test]
    fn test_read_only_attribute_rejected() {
        let mut doc = schema_doc();
        let id = doc.insert_panel("floor", &square(2.0));
        assert_eq!(
            doc.set_attribute(id, "area", AttributeValue::Number(4.0)),
            Err(DocumentError::ReadOnlyAttribute("area".to_string()))
        );
    }

    #[test]
    fn test_delete_removes_hosted_openings() {
        let mut doc = schema_doc();
        let id = doc.insert_panel("floor", &square(4.0));
        let opening = doc.insert_opening(id, &square(1.0)).unwrap();
        assert_eq!(doc.openings(id), vec![opening]);

        doc.delete_panel(id).unwrap();
        assert_eq!(doc.panel_count(), 0);
        assert_eq!(doc.opening_count(), 0);
        assert_eq!(doc.delete_panel(id), Err(DocumentError::UnknownPanel(id)));
    }

    #[test]
    fn test_json_round_trip_keeps_ids_unique() {
        let mut doc = schema_doc().with_tolerance(1e-4);
        let a = doc.insert_panel("floor", &square(2.0));
        doc.insert_opening(a, &square(0.5)).unwrap();

        let json = doc.to_json().unwrap();
        let mut back = MemoryDocument::from_json(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.tolerance_hint(), Some(1e-4));

        let b = back.insert_panel("floor", &square(1.0));
        assert!(b.0 > a.0 + 1);
    }

    #[test]
    fn test_from_json_without_next_id() {
        let json = r#"{
            "panel_types": { "floor": {} },
            "panels": {
                "4": { "panel_type": "floor", "contour": [[0,0,0],[1,0,0],[1,1,0]] }
            }
        }"#;
        let mut doc = MemoryDocument::from_json(json).unwrap();
        assert!(doc.outer_contour(PanelId(4)).is_some());
        assert_eq!(doc.insert_panel("floor", &square(1.0)), PanelId(5));
    }

    #[test]
    fn test_from_json_rejects_bad_tolerance() {
        for bad in ["-0.5", "0"] {
            let json = format!(r#"{{ "tolerance": {} }}"#, bad);
            assert!(MemoryDocument::from_json(&json).is_err());
        }
        let ok = MemoryDocument::from_json(r#"{ "tolerance": 0.001 }"#).unwrap();
        assert_eq!(ok.tolerance_hint(), Some(0.001));
    }
}
