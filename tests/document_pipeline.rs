// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Panel pipeline against the in-memory document

use panelcut::panel::{
    AttributeKind, AttributeValue, DocumentError, EventLog, NullObserver, PanelId, SplitEvent,
};
use panelcut::{
    split_document, BatchReport, ErrorKind, MemoryDocument, PanelDocument, PanelSplitter,
    PanelStatus, Point, SplitConfig,
};
use tempfile::NamedTempFile;

fn p(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

fn floor_points() -> Vec<Point> {
    vec![
        p(0.0, 0.0, 0.0),
        p(10.0, 0.0, 0.0),
        p(10.0, 10.0, 0.0),
        p(0.0, 10.0, 0.0),
    ]
}

fn wall_points(x: f64) -> Vec<Point> {
    vec![
        p(x, -1.0, -1.0),
        p(x, 11.0, -1.0),
        p(x, 11.0, 1.0),
        p(x, -1.0, 1.0),
    ]
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![p(x0, y0, 0.0), p(x1, y0, 0.0), p(x1, y1, 0.0), p(x0, y1, 0.0)]
}

/// Floor with attributes, a wall at x = 5 and the two ids
fn floor_and_wall() -> (MemoryDocument, PanelId, PanelId) {
    let mut doc = MemoryDocument::new();
    doc.define_type(
        "floor",
        &[
            ("thickness", AttributeKind::Number, false),
            ("mark", AttributeKind::Text, false),
            ("area", AttributeKind::Number, true),
        ],
    );
    doc.define_type("wall", &[]);
    let floor = doc.insert_panel("floor", &floor_points());
    let wall = doc.insert_panel("wall", &wall_points(5.0));
    doc.set_attribute(floor, "thickness", AttributeValue::Number(0.25))
        .unwrap();
    doc.set_attribute(floor, "mark", AttributeValue::Text("F1".into()))
        .unwrap();
    (doc, floor, wall)
}

fn run(
    doc: &mut MemoryDocument,
    targets: &[PanelId],
    cutters: &[PanelId],
    config: SplitConfig,
) -> (BatchReport, EventLog) {
    let mut log = EventLog::new();
    let report = PanelSplitter::new(config)
        .run(doc, targets, cutters, &mut log)
        .unwrap();
    (report, log)
}

#[test]
fn test_fragments_inherit_type_and_attributes() {
    let (mut doc, floor, wall) = floor_and_wall();
    let (report, log) = run(&mut doc, &[floor], &[wall], SplitConfig::default());

    let panel = report.panel(floor).unwrap();
    assert_eq!(panel.status, PanelStatus::Split);
    assert_eq!(panel.created.len(), 2);
    assert!(panel.source_deleted);

    for id in &panel.created {
        let record = doc.panel(*id).unwrap();
        assert_eq!(record.panel_type, "floor");
        assert_eq!(
            record.attributes.get("thickness"),
            Some(&AttributeValue::Number(0.25))
        );
        assert_eq!(
            record.attributes.get("mark"),
            Some(&AttributeValue::Text("F1".into()))
        );
    }

    // thickness and mark; the read-only area slot is skipped
    let copied: Vec<usize> = log
        .events
        .iter()
        .filter_map(|e| match e {
            SplitEvent::FragmentMaterialized { attributes, .. } => Some(*attributes),
            _ => None,
        })
        .collect();
    assert_eq!(copied, vec![2, 2]);
    assert_eq!(
        log.events.last(),
        Some(&SplitEvent::PanelDeleted { panel: floor })
    );
}

#[test]
fn test_keep_source_when_configured() {
    let (mut doc, floor, wall) = floor_and_wall();
    let opening = doc.insert_opening(floor, &rect(1.0, 1.0, 2.0, 2.0)).unwrap();
    let config = SplitConfig {
        delete_source: false,
        ..SplitConfig::default()
    };
    let (report, _) = run(&mut doc, &[floor], &[wall], config);

    let panel = report.panel(floor).unwrap();
    assert_eq!(panel.status, PanelStatus::Split);
    assert!(!panel.source_deleted);
    assert!(doc.panel(floor).is_some());
    assert!(doc.opening(opening).is_some());
    assert_eq!(doc.panel_count(), 4);
    assert_eq!(doc.opening_count(), 2);
}

#[test]
fn test_source_openings_go_with_source() {
    let (mut doc, floor, wall) = floor_and_wall();
    let left = doc.insert_opening(floor, &rect(1.0, 1.0, 2.0, 2.0)).unwrap();
    let right = doc.insert_opening(floor, &rect(7.0, 7.0, 8.0, 9.0)).unwrap();
    let stray = doc
        .insert_opening(floor, &rect(20.0, 20.0, 21.0, 21.0))
        .unwrap();

    let (report, log) = run(&mut doc, &[floor], &[wall], SplitConfig::default());
    let panel = report.panel(floor).unwrap();
    assert_eq!(panel.openings_transferred, 2);

    // Originals are deleted with the source panel
    for id in [left, right, stray] {
        assert!(doc.opening(id).is_none());
    }
    assert_eq!(doc.opening_count(), 2);
    for id in &panel.created {
        assert_eq!(doc.openings(*id).len(), 1);
    }
    let skipped = log.count(|e| {
        matches!(e, SplitEvent::OpeningSkipped { opening, .. } if *opening == stray)
    });
    assert_eq!(skipped, 1);
}

#[test]
fn test_openings_left_alone_when_transfer_disabled() {
    let (mut doc, floor, wall) = floor_and_wall();
    doc.insert_opening(floor, &rect(1.0, 1.0, 2.0, 2.0)).unwrap();
    let config = SplitConfig {
        transfer_openings: false,
        ..SplitConfig::default()
    };
    let (report, _) = run(&mut doc, &[floor], &[wall], config);

    assert_eq!(report.panel(floor).unwrap().openings_transferred, 0);
    assert_eq!(doc.opening_count(), 0);
}

#[test]
fn test_rejected_materialization_keeps_source() {
    let mut doc = MemoryDocument::new();
    doc.define_type("wall", &[]);
    // Type never defined, so the document refuses every fragment
    let floor = doc.insert_panel("slab", &floor_points());
    let wall = doc.insert_panel("wall", &wall_points(5.0));

    let (report, log) = run(&mut doc, &[floor], &[wall], SplitConfig::default());
    let panel = report.panel(floor).unwrap();

    assert_eq!(panel.status, PanelStatus::Incomplete);
    assert_eq!(panel.fragments_planned, 2);
    assert_eq!(panel.rejected_fragments, 2);
    assert!(panel.created.is_empty());
    assert!(doc.panel(floor).is_some());
    assert_eq!(
        log.count(|e| matches!(e, SplitEvent::MaterializationRejected { .. })),
        2
    );
}

#[test]
fn test_every_panel_splits_every_other() {
    let (mut doc, floor, wall) = floor_and_wall();
    let all = doc.panel_ids();
    let (report, _) = run(&mut doc, &all, &all, SplitConfig::default());

    // The floor cuts the wall as well; neither cuts itself
    assert_eq!(report.summary().split, 2);
    assert_eq!(report.panel(floor).unwrap().cut_lines, 1);
    assert_eq!(report.panel(wall).unwrap().cut_lines, 1);
    assert_eq!(doc.panel_count(), 4);
}

#[test]
fn test_missing_cutter_is_ignored() {
    let (mut doc, floor, wall) = floor_and_wall();
    let (report, _) = run(
        &mut doc,
        &[floor],
        &[wall, PanelId(999)],
        SplitConfig::default(),
    );
    assert_eq!(report.panel(floor).unwrap().status, PanelStatus::Split);
}

#[test]
fn test_missing_target_fails_alone() {
    let (mut doc, floor, wall) = floor_and_wall();
    let ghost = PanelId(999);
    let (report, _) = run(&mut doc, &[ghost, floor], &[wall], SplitConfig::default());

    assert_eq!(
        report.panel(ghost).unwrap().status,
        PanelStatus::Failed(ErrorKind::DegeneratePlane)
    );
    assert_eq!(report.panel(floor).unwrap().status, PanelStatus::Split);
}

#[test]
fn test_empty_selection_is_cancelled() {
    let (mut doc, _, wall) = floor_and_wall();
    let before = doc.clone();
    let result = PanelSplitter::default().run(&mut doc, &[], &[wall], &mut NullObserver);
    assert_eq!(result.unwrap_err(), DocumentError::Cancelled);
    assert_eq!(doc, before);
}

#[test]
fn test_parallel_planning_matches_sequential() {
    let build = || {
        let mut doc = MemoryDocument::new();
        doc.define_type("floor", &[]);
        for level in 0..6 {
            let z = level as f64 * 3.0;
            doc.insert_panel(
                "floor",
                &[p(0.0, 0.0, z), p(10.0, 0.0, z), p(10.0, 10.0, z), p(0.0, 10.0, z)],
            );
        }
        doc.insert_panel(
            "floor",
            &[p(4.0, -1.0, -1.0), p(4.0, 11.0, -1.0), p(4.0, 11.0, 20.0), p(4.0, -1.0, 20.0)],
        );
        doc
    };

    let mut sequential = build();
    let mut parallel = build();
    let all = sequential.panel_ids();
    let (a, _) = run(
        &mut sequential,
        &all,
        &all,
        SplitConfig {
            parallel: false,
            ..SplitConfig::default()
        },
    );
    let (b, _) = run(&mut parallel, &all, &all, SplitConfig::default());

    assert_eq!(a.summary(), b.summary());
    assert_eq!(sequential.panels, parallel.panels);
}

#[test]
fn test_split_document_round_trip() {
    let (doc, floor, _) = floor_and_wall();
    let file = NamedTempFile::new().unwrap();
    doc.save(file.path()).unwrap();

    let (mut after, report) = split_document(
        file.path().to_str().unwrap(),
        &[floor],
        &[],
        SplitConfig::default(),
    )
    .unwrap();
    assert_eq!(report.summary().split, 1);
    assert_eq!(report.summary().fragments_created, 2);

    after.save(file.path()).unwrap();
    let reloaded = MemoryDocument::load(file.path()).unwrap();
    assert_eq!(reloaded.panels, after.panels);

    // Ids keep increasing after a reload
    let next = after.insert_panel("wall", &wall_points(7.0));
    assert!(reloaded.panel_ids().iter().all(|id| *id < next));
}
