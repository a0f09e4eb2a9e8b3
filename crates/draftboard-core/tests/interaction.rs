//! End-to-end pointer sessions through the controller.

use draftboard_core::{
    EditorConfig, EditorError, InteractionController, InteractionEvent, ResizeHandle,
    SessionOutcome, Widget, WidgetContent, WidgetKind, WidgetPatch, WidgetTypePolicy,
};
use kurbo::{Point, Vec2};
use std::time::{Duration, Instant};

const EPS: f64 = 1e-9;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn controller() -> InteractionController {
    init();
    InteractionController::new(EditorConfig::default().with_spawn_jitter(0.0)).unwrap()
}

fn at(x: f64, y: f64) -> WidgetPatch {
    WidgetPatch::new().with_position(Point::new(x, y))
}

#[test]
fn test_committed_resizes_respect_minimums_and_canvas() {
    let mut c = controller();
    let deltas = [(-500.0, -500.0), (500.0, 500.0), (-37.0, 12.0), (300.0, -200.0), (0.0, 0.0)];

    for kind in WidgetKind::all() {
        let policy = WidgetTypePolicy::builtin(*kind);
        for handle in ResizeHandle::ALL {
            if !policy.allows(handle) {
                continue;
            }
            for (dx, dy) in deltas {
                let id = c.create(kind.name(), at(400.0, 200.0)).unwrap();
                let start = handle.position_on(c.store().get(id).unwrap().rect());
                assert!(c.begin_resize(id, handle, start), "{kind} {handle:?}");
                let end = c.pointer_up(Some(start + Vec2::new(dx, dy))).unwrap();

                if end.is_removal() {
                    assert!(!c.store().contains(id));
                    continue;
                }
                let widget = c.store().get(id).unwrap();
                assert!(widget.width >= policy.min_width - EPS, "{kind} {handle:?} ({dx}, {dy})");
                assert!(widget.height >= policy.min_height - EPS, "{kind} {handle:?} ({dx}, {dy})");

                if widget.bounds == draftboard_core::Bounds::Canvas {
                    let rect = widget.rect();
                    let label = format!("{kind} {handle:?} {rect:?}");
                    assert!(rect.x0 >= -EPS && rect.x1 <= 960.0 + EPS, "{label}");
                    assert!(rect.y0 >= -EPS && rect.y1 <= 540.0 + EPS, "{label}");
                }
            }
        }
    }
}

#[test]
fn test_canvas_clamped_drag_commits_inside() {
    let mut c = controller();
    let id = c.create("rectangle", WidgetPatch::new()).unwrap();
    c.begin_drag(id, Point::new(250.0, 250.0));
    c.pointer_move(Point::new(2000.0, 2000.0));
    c.pointer_up(Some(Point::new(2000.0, 2000.0)));

    let rect = c.store().get(id).unwrap().rect();
    assert!((rect.x1 - 960.0).abs() < EPS);
    assert!((rect.y1 - 540.0).abs() < EPS);
}

#[test]
fn test_drag_off_canvas_removes_once() {
    let mut c = controller();
    let id = c.create("circle", at(100.0, 100.0)).unwrap();
    c.poll_events();

    c.begin_drag(id, Point::new(150.0, 150.0));
    c.pointer_move(Point::new(-150.0, 150.0));
    let end = c.pointer_up(Some(Point::new(-150.0, 150.0))).unwrap();
    assert_eq!(end.outcome, SessionOutcome::Remove);

    let events = c.poll_events();
    let removals = events
        .iter()
        .filter(|e| matches!(e, InteractionEvent::WidgetRemoved { widget_id } if *widget_id == id))
        .count();
    let commits = events
        .iter()
        .filter(|e| matches!(e, InteractionEvent::WidgetCommitted { .. }))
        .count();
    assert_eq!(removals, 1);
    assert_eq!(commits, 0);
    assert!(!c.store().contains(id));
    assert_eq!(c.store().selected(), None);
}

#[test]
fn test_resize_off_canvas_removes_once() {
    let mut c = controller();
    let id = c.create("circle", at(-100.0, 100.0)).unwrap();
    c.poll_events();

    assert!(c.begin_resize(id, ResizeHandle::Right, Point::new(20.0, 160.0)));
    c.pointer_move(Point::new(-50.0, 160.0));
    let end = c.pointer_up(Some(Point::new(-50.0, 160.0))).unwrap();
    assert_eq!(end.outcome, SessionOutcome::Remove);

    let events = c.poll_events();
    let removals = events
        .iter()
        .filter(|e| matches!(e, InteractionEvent::WidgetRemoved { widget_id } if *widget_id == id))
        .count();
    let commits = events
        .iter()
        .filter(|e| matches!(e, InteractionEvent::WidgetCommitted { .. }))
        .count();
    assert_eq!(removals, 1);
    assert_eq!(commits, 0);
    assert!(!c.store().contains(id));
}

#[test]
fn test_unknown_type_widget_stays_manipulable() {
    let mut c = controller();
    let widget = Widget::new(
        WidgetContent::Unknown {
            type_name: "hexagon".to_string(),
        },
        Point::new(100.0, 150.0),
        80.0,
        50.0,
    );
    let id = widget.id();
    assert!(c.store_mut().insert(widget));

    assert!(c.begin_drag(id, Point::new(110.0, 160.0)));
    c.pointer_up(Some(Point::new(140.0, 190.0)));
    assert_eq!(c.store().get(id).unwrap().position, Point::new(130.0, 180.0));

    // Default policy: every handle, free aspect.
    assert_eq!(c.visible_handles(id).len(), 8);
    assert!(c.begin_resize(id, ResizeHandle::BottomRight, Point::new(210.0, 230.0)));
    c.pointer_up(Some(Point::new(230.0, 240.0)));
    let rect = c.store().get(id).unwrap().rect();
    assert!((rect.x0 - 130.0).abs() < EPS && (rect.y0 - 180.0).abs() < EPS);
    assert!((rect.width() - 100.0).abs() < EPS);
    assert!((rect.height() - 60.0).abs() < EPS);
}

#[test]
fn test_out_of_bounds_only_checked_on_release() {
    let mut c = controller();
    let id = c.create("circle", at(100.0, 100.0)).unwrap();
    c.begin_drag(id, Point::new(150.0, 150.0));
    // Off the canvas mid-drag, back on before release.
    c.pointer_move(Point::new(-300.0, 150.0));
    let end = c.pointer_up(Some(Point::new(160.0, 150.0))).unwrap();
    assert!(end.is_commit());
    assert!(c.store().contains(id));
}

#[test]
fn test_locked_corner_resize_keeps_ratio() {
    let mut c = controller();
    let id = c.create("image", at(100.0, 100.0)).unwrap();
    let start = c.store().get(id).unwrap().rect();
    let ratio = start.width() / start.height();

    for (handle, delta) in [
        (ResizeHandle::BottomRight, Vec2::new(130.0, 20.0)),
        (ResizeHandle::TopLeft, Vec2::new(-60.0, -10.0)),
        (ResizeHandle::BottomLeft, Vec2::new(15.0, 90.0)),
    ] {
        let grab = handle.position_on(c.store().get(id).unwrap().rect());
        assert!(c.begin_resize(id, handle, grab));
        c.pointer_up(Some(grab + delta));
        let widget = c.store().get(id).unwrap();
        assert!((widget.width / widget.height - ratio).abs() < 1e-6, "{handle:?}");
    }
}

#[test]
fn test_square_resize() {
    let mut c = controller();
    let id = c.create("star", WidgetPatch::new()).unwrap();
    assert!(!c.begin_resize(id, ResizeHandle::Right, Point::new(470.0, 410.0)));
    assert!(c.begin_resize(id, ResizeHandle::BottomRight, Point::new(470.0, 470.0)));
    c.pointer_up(Some(Point::new(550.0, 480.0)));
    let widget = c.store().get(id).unwrap();
    assert!((widget.width - widget.height).abs() < EPS);
    assert!((widget.width - 130.0).abs() < EPS);
}

#[test]
fn test_snap_to_left_edge_at_nine_not_eleven() {
    for (offset, expected_x) in [(9.0, 300.0), (11.0, 311.0)] {
        let mut c = controller();
        c.create("rectangle", at(300.0, 400.0)).unwrap();
        let id = c.create("circle", at(100.0, 20.0)).unwrap();

        let grab = Point::new(110.0, 30.0);
        let release = Point::new(grab.x + 200.0 + offset, grab.y);
        c.begin_drag(id, grab);
        c.pointer_move(release);
        c.pointer_up(Some(release));

        let position = c.store().get(id).unwrap().position;
        assert!((position.x - expected_x).abs() < EPS, "offset {offset}: x = {}", position.x);
        assert!((position.y - 20.0).abs() < EPS);
    }
}

#[test]
fn test_at_most_one_guide_per_axis() {
    let mut c = controller();
    for i in 0..12 {
        let offset = f64::from(i) * 3.0;
        c.create("circle", at(200.0 + offset, 150.0 + offset)).unwrap();
    }
    let id = c.create("circle", at(600.0, 400.0)).unwrap();

    let t0 = Instant::now();
    c.begin_drag(id, Point::new(600.0, 400.0));
    for step in 0..40u32 {
        let p = Point::new(600.0 - f64::from(step) * 10.0, 400.0 - f64::from(step) * 6.0);
        c.pointer_move_at(p, t0 + Duration::from_millis(u64::from(step) * 10));
        let guides = c.guides();
        assert!(guides.len() <= 2);
        assert!(guides.iter().all(|g| g.source_widget() != Some(id)));
    }
    c.pointer_up(Some(Point::new(210.0, 166.0)));
    assert!(c.guides().is_empty());
}

#[test]
fn test_select_while_editing_exits_edit_mode() {
    let mut c = controller();
    let a = c.create("text", WidgetPatch::new()).unwrap();
    let b = c.create("rectangle", WidgetPatch::new()).unwrap();
    assert!(c.enter_edit_mode(a));
    c.poll_events();

    assert!(c.select(Some(b)));
    assert_eq!(c.store().editing(), None);
    assert_eq!(c.store().selected(), Some(b));
    assert_eq!(
        c.poll_events(),
        vec![InteractionEvent::SelectionChanged {
            selected: Some(b),
            editing: None,
        }]
    );
}

#[test]
fn test_editing_blocks_sessions() {
    let mut c = controller();
    let id = c.create("text", WidgetPatch::new()).unwrap();
    c.enter_edit_mode(id);
    assert!(!c.begin_drag(id, Point::new(150.0, 110.0)));
    assert!(!c.begin_resize(id, ResizeHandle::Right, Point::new(300.0, 119.2)));
    assert!(c.visible_handles(id).is_empty());

    c.exit_edit_mode();
    assert!(c.begin_drag(id, Point::new(150.0, 110.0)));
}

#[test]
fn test_create_unknown_type_leaves_store_unchanged() {
    let mut c = controller();
    c.create("circle", WidgetPatch::new()).unwrap();
    c.poll_events();

    let err = c.create("unknown-type", WidgetPatch::new()).unwrap_err();
    assert!(matches!(err, EditorError::InvalidWidgetType(_)));
    assert_eq!(c.store().len(), 1);
    assert!(c.poll_events().is_empty());
}

#[test]
fn test_cancel_restores_start_geometry() {
    let mut c = controller();
    let id = c.create("rectangle", WidgetPatch::new()).unwrap();
    let before = c.store().get(id).unwrap().clone();

    c.begin_resize(id, ResizeHandle::BottomRight, Point::new(350.0, 300.0));
    c.pointer_move(Point::new(500.0, 420.0));
    assert!(c.preview_rect().is_some());
    let end = c.cancel().unwrap();
    assert_eq!(end.outcome, SessionOutcome::Cancel);
    assert_eq!(c.store().get(id).unwrap(), &before);
    assert!(c.pointer_up(Some(Point::new(500.0, 420.0))).is_none());
}

#[test]
fn test_clear_selection_cancels_and_clears_guides() {
    let mut c = controller();
    let id = c.create("circle", at(100.0, 100.0)).unwrap();
    c.begin_drag(id, Point::new(100.0, 100.0));
    // Center the circle on the canvas: both centerlines match.
    c.pointer_move(Point::new(420.0, 210.0));
    assert_eq!(c.guides().len(), 2);

    c.clear_selection();
    assert!(c.guides().is_empty());
    assert!(c.active_session().is_none());
    assert_eq!(c.store().selected(), None);
    assert_eq!(c.store().get(id).unwrap().position, Point::new(100.0, 100.0));
}

#[test]
fn test_remove_selected() {
    let mut c = controller();
    let id = c.create("star", WidgetPatch::new()).unwrap();
    assert_eq!(c.remove_selected(), Some(id));
    assert!(c.store().is_empty());
    assert_eq!(c.remove_selected(), None);
}
