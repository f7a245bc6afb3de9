//! Editor facade: parcel loading, plan replacement, event bus forwarding
//! and rendering.

use siteplan_core::{EventBus, EventCategory, SitePlanEvent};
use siteplan_designer::{
    EditorEvent, Effect, KeyCommand, ModeKind, Modifiers, PlanConfig, PlanError, PlanGenerator,
    PlanRequest, PlanResult, Point, PointerButton, RecordingSink, Renderer, Ring, SitePlanEditor,
    SvgRenderer, Tool,
};
use siteplan_settings::Config;
use std::sync::Arc;
use std::time::Instant;

const PARCEL: &str = r#"{
    "type": "Feature",
    "properties": {"apn": "001-002"},
    "geometry": {
        "type": "Polygon",
        "coordinates": [[
            [500000, 4000000], [500100, 4000000], [500100, 4000050],
            [500000, 4000050], [500000, 4000000]
        ]]
    }
}"#;

const PLAN: &str = r#"{
    "elements": [
        {"id": "b-1", "type": "building", "geometry": [[20,20],[80,20],[80,60],[20,60],[20,20]],
         "properties": {"stories": 3, "name": "Block A"}},
        {"id": "lot-1", "type": "parking", "geometry": [[100,20],[220,20],[220,100],[100,100],[100,20]]},
        {"id": "g-1", "type": "greenspace", "geometry": [[0,0],[300,0],[300,150],[0,150],[0,0]]}
    ],
    "metrics": {
        "achievedFar": 0.42, "siteCoveragePct": 14.0, "parkingRatio": 4.0,
        "totalBuiltAreaSqft": 7200, "openSpacePct": 55, "zoningCompliant": true
    }
}"#;

fn editor() -> SitePlanEditor {
    SitePlanEditor::new(Config::default(), Arc::new(RecordingSink::new()))
}

#[test]
fn test_load_parcel_geojson_fits_view() {
    let mut editor = editor();
    let processed = editor.load_parcel_geojson(PARCEL).expect("parcel");
    assert!((processed.bounds.width() - 328.084).abs() < 1e-6);

    let center = editor.canvas().viewport().world_to_screen(
        editor.parcel().expect("stored").bounds.center(),
    );
    assert!(center.approx_eq(&Point::new(400.0, 300.0), 1e-6));
}

#[test]
fn test_load_parcel_rejects_bad_input() {
    let mut editor = editor();
    assert!(editor.load_parcel_geojson(r#"{"type":"LineString"}"#).is_err());
    assert!(editor.parcel().is_none());

    let flat = Ring::from(vec![[0.0, 0.0], [10.0, 0.0], [20.0, 0.0], [0.0, 0.0]]);
    assert!(editor.load_parcel(&flat).is_none());
}

#[test]
fn test_apply_plan_replaces_collection() {
    let mut editor = editor();
    let now = Instant::now();
    editor.handle(EditorEvent::Key(KeyCommand::SelectAll), now);

    let plan = PlanResult::from_json(PLAN).expect("plan");
    let effects = editor.apply_plan(plan);
    assert_eq!(editor.canvas().element_count(), 3);
    assert!(editor.canvas().selection.is_empty());
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::ViewportChanged(_))));

    let building = editor.canvas().get_element("b-1").expect("building");
    assert_eq!(building.stories(), Some(3));
    assert_eq!(building.name(), Some("Block A"));
}

#[test]
fn test_apply_plan_abandons_gesture() {
    let mut editor = editor();
    let now = Instant::now();
    editor.apply_plan(PlanResult::from_json(PLAN).expect("plan"));
    editor.set_tool(Tool::Measure, now);
    let anchor = editor.canvas().viewport().world_to_screen(Point::new(10.0, 10.0));
    editor.handle(
        EditorEvent::PointerDown {
            position: anchor,
            button: PointerButton::Left,
            modifiers: Modifiers::NONE,
        },
        now,
    );
    assert_eq!(editor.controller().mode().kind(), ModeKind::Measuring);

    let effects = editor.apply_plan(PlanResult::from_json(PLAN).expect("plan"));
    assert!(effects.contains(&Effect::ModeChanged(ModeKind::Select)));
    assert_eq!(editor.tool(), Tool::Select);
}

struct FixedGenerator;

impl PlanGenerator for FixedGenerator {
    fn generate(&self, request: &PlanRequest) -> Result<PlanResult, PlanError> {
        if request.config.max_far <= 0.0 {
            return Err(PlanError::Rejected("max FAR must be positive".to_string()));
        }
        PlanResult::from_json(PLAN)
    }
}

#[test]
fn test_generate_plan_through_generator() {
    let mut editor = editor();
    let parcel = Ring::from(vec![[0.0, 0.0], [300.0, 0.0], [300.0, 150.0], [0.0, 150.0]]);

    editor
        .generate_plan(&FixedGenerator, parcel.clone(), PlanConfig::default())
        .expect("generated");
    assert_eq!(editor.canvas().element_count(), 3);

    let config = PlanConfig {
        max_far: 0.0,
        ..PlanConfig::default()
    };
    let err = editor.generate_plan(&FixedGenerator, parcel, config).unwrap_err();
    assert!(matches!(err, PlanError::Rejected(_)));
    assert_eq!(editor.canvas().element_count(), 3);
}

#[test]
fn test_bus_receives_building_and_selection_events() {
    let bus = Arc::new(EventBus::new());
    let mut rx = bus.receiver();
    let mut editor = SitePlanEditor::with_event_bus(Config::default(), bus);
    editor.apply_plan(PlanResult::from_json(PLAN).expect("plan"));

    let now = Instant::now();
    let inside = editor.canvas().viewport().world_to_screen(Point::new(50.0, 40.0));
    let target = editor.canvas().viewport().world_to_screen(Point::new(70.0, 40.0));
    editor.handle(
        EditorEvent::PointerDown {
            position: inside,
            button: PointerButton::Left,
            modifiers: Modifiers::NONE,
        },
        now,
    );
    editor.handle(
        EditorEvent::PointerMove {
            position: target,
            modifiers: Modifiers::NONE,
        },
        now,
    );
    editor.handle(
        EditorEvent::PointerUp {
            position: target,
            button: PointerButton::Left,
        },
        now,
    );

    let mut categories = Vec::new();
    let mut finals = 0;
    while let Ok(event) = rx.try_recv() {
        categories.push(event.category());
        if let SitePlanEvent::BuildingUpdated(update) = event {
            assert_eq!(update.id, "b-1");
            assert_eq!(update.floors, Some(3));
            if update.is_final {
                finals += 1;
            }
        }
    }
    assert!(categories.contains(&EventCategory::Plan));
    assert!(categories.contains(&EventCategory::Viewport));
    assert!(categories.contains(&EventCategory::Selection));
    assert_eq!(finals, 1);
}

#[test]
fn test_render_uses_viewport_transform() {
    let mut editor = editor();
    editor.load_parcel_geojson(PARCEL).expect("parcel");
    editor.apply_plan(PlanResult::from_json(PLAN).expect("plan"));
    let now = Instant::now();
    let inside = editor.canvas().viewport().world_to_screen(Point::new(50.0, 40.0));
    editor.handle(
        EditorEvent::PointerDown {
            position: inside,
            button: PointerButton::Left,
            modifiers: Modifiers::NONE,
        },
        now,
    );

    let frame = editor.frame();
    // Greenspace paints first, the building last.
    assert_eq!(frame.elements.first().map(|e| e.id.as_str()), Some("g-1"));
    assert_eq!(frame.elements.last().map(|e| e.id.as_str()), Some("b-1"));
    assert!(frame.is_selected("b-1"));
    assert!(frame.rotation_handle.is_some());

    let mut renderer = SvgRenderer::new();
    renderer.render(&frame).expect("render");
    let svg = renderer.output();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"id="b-1""#));
    assert!(svg.contains("rotation-handle"));

    let corner = frame.world_to_screen(Point::new(20.0, 20.0));
    assert!(svg.contains(&format!("M {:.2} {:.2}", corner.x, corner.y)));
}
