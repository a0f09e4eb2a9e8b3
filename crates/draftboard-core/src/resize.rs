//! Resize sessions.
//!
//! The grabbed handle decides which sides move: corner handles keep the
//! opposite corner fixed, edge handles keep the opposite edge fixed. The
//! widget type's policy decides minimum and maximum size and whether the
//! aspect ratio is kept for that handle.

use crate::bounds::{apply_bounds, is_outside_canvas};
use crate::policy::{AspectConstraint, WidgetTypePolicy};
use crate::session::{SessionEnd, SessionKind, SessionOutcome};
use crate::widget::{Bounds, ResizeHandle, Widget, WidgetId, WidgetPatch};
use kurbo::{Point, Rect, Size, Vec2};

/// New box for a resize from `start` by the pointer `delta` at `handle`.
///
/// Bounds are not applied here. Returns the box and the aspect constraint
/// that was in effect.
pub fn compute_resize(
    start: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    policy: &WidgetTypePolicy,
) -> (Rect, AspectConstraint) {
    let start_size = start.size();
    let mut width = start_size.width;
    let mut height = start_size.height;

    if handle.touches_right() {
        width += delta.x;
    } else if handle.touches_left() {
        width -= delta.x;
    }
    if handle.touches_bottom() {
        height += delta.y;
    } else if handle.touches_top() {
        height -= delta.y;
    }

    let mut size = policy.enforce_min(Size::new(width, height));
    let constraint = policy.aspect_ratio.resolve(handle);

    match constraint {
        AspectConstraint::None => {}
        AspectConstraint::Ratio => {
            if let Some(locked) = keep_ratio(size, start_size, handle, delta, policy) {
                size = locked;
            }
        }
        AspectConstraint::Square => {
            let mut side = size.width.min(size.height).max(policy.min_width).max(policy.min_height);
            if let Some(max) = min_option(policy.max_width, policy.max_height) {
                side = side.min(max);
            }
            size = Size::new(side, side);
        }
    }

    // Handles on the top or left move the origin so the opposite side stays put.
    let x = if handle.touches_left() {
        start.x0 + (start_size.width - size.width)
    } else {
        start.x0
    };
    let y = if handle.touches_top() {
        start.y0 + (start_size.height - size.height)
    } else {
        start.y0
    };

    (Rect::from_origin_size(Point::new(x, y), size), constraint)
}

/// Recompute the dependent dimension from the start ratio.
///
/// Corners follow the dominant pointer axis. Minimums are restored by scaling
/// up and maximums by scaling down, both uniformly.
fn keep_ratio(
    size: Size,
    start: Size,
    handle: ResizeHandle,
    delta: Vec2,
    policy: &WidgetTypePolicy,
) -> Option<Size> {
    let ratio = start.width / start.height;
    if !ratio.is_finite() || ratio <= 0.0 {
        log::warn!("Cannot keep aspect ratio of {start:?}, resizing freely");
        return None;
    }

    let width_drives = if handle.is_corner() {
        delta.x.abs() > delta.y.abs()
    } else {
        handle.touches_left() || handle.touches_right()
    };
    let (mut width, mut height) = if width_drives {
        (size.width, size.width / ratio)
    } else {
        (size.height * ratio, size.height)
    };

    let grow = 1.0_f64
        .max(policy.min_width / width)
        .max(policy.min_height / height);
    width *= grow;
    height *= grow;

    let mut shrink = 1.0_f64;
    if let Some(max) = policy.max_width {
        shrink = shrink.min(max / width);
    }
    if let Some(max) = policy.max_height {
        shrink = shrink.min(max / height);
    }
    Some(Size::new(width * shrink, height * shrink))
}

/// Canvas-clamped widgets can never outgrow the canvas, so cap the maximums
/// there before the ratio and square fitting run.
fn fit_policy_to_bounds(
    policy: &WidgetTypePolicy,
    bounds: &Bounds,
    canvas: Size,
) -> WidgetTypePolicy {
    if *bounds != Bounds::Canvas {
        return *policy;
    }
    WidgetTypePolicy {
        max_width: min_option(policy.max_width, Some(canvas.width)),
        max_height: min_option(policy.max_height, Some(canvas.height)),
        ..*policy
    }
}

fn min_option(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Transient state of an active resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub widget_id: WidgetId,
    pub handle: ResizeHandle,
    /// Pointer position at session start.
    pub origin: Point,
    pub start_rect: Rect,
    pub policy: WidgetTypePolicy,
    pub bounds: Bounds,
    /// Latest preview box.
    pub current: Rect,
}

/// Resize state machine: idle or resizing one widget from one handle.
#[derive(Debug, Clone, Default)]
pub struct ResizeEngine {
    session: Option<ResizeSession>,
    clamp_locked_anchor_resizes: bool,
}

impl ResizeEngine {
    /// Create an engine. See `EditorConfig::clamp_locked_anchor_resizes`.
    pub fn new(clamp_locked_anchor_resizes: bool) -> Self {
        Self {
            session: None,
            clamp_locked_anchor_resizes,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn preview_rect(&self) -> Option<Rect> {
        self.session.as_ref().map(|s| s.current)
    }

    /// Begin resizing `widget` from `handle`. Returns false, leaving the
    /// engine idle, if the handle is not active for the widget's type.
    pub fn start(
        &mut self,
        widget: &Widget,
        handle: ResizeHandle,
        pointer: Point,
        policy: WidgetTypePolicy,
    ) -> bool {
        if !policy.allows(handle) {
            log::debug!("Handle {handle:?} is not active for {} widgets", widget.type_name());
            return false;
        }
        log::debug!("Resize start on {} from {handle:?}", widget.id());
        self.session = Some(ResizeSession {
            widget_id: widget.id(),
            handle,
            origin: pointer,
            start_rect: widget.rect(),
            policy,
            bounds: widget.bounds,
            current: widget.rect(),
        });
        true
    }

    /// Recompute the preview box for `pointer`.
    pub fn update(&mut self, pointer: Point, canvas: Size) -> Option<Rect> {
        let clamp_locked = self.clamp_locked_anchor_resizes;
        let session = self.session.as_mut()?;
        let delta = pointer - session.origin;
        let policy = fit_policy_to_bounds(&session.policy, &session.bounds, canvas);
        let (rect, constraint) =
            compute_resize(session.start_rect, session.handle, delta, &policy);

        // Locked ratios at top/left handles skip clamping unless configured:
        // the anchor shift and the bounds shift would otherwise pull against
        // each other.
        let skip_bounds = constraint == AspectConstraint::Ratio
            && session.handle.is_top_left_oriented()
            && !clamp_locked;
        session.current = if skip_bounds {
            rect
        } else {
            apply_bounds(rect, &session.bounds, canvas, policy.max_size())
        };
        Some(session.current)
    }

    /// Finish the resize with the last preview box. Off-canvas boxes are removed.
    pub fn stop(&mut self, canvas: Size) -> Option<SessionEnd> {
        let session = self.session.take()?;
        let kind = SessionKind::Resize(session.handle);

        if is_outside_canvas(session.current, canvas) {
            log::info!("Widget {} resized off the canvas", session.widget_id);
            return Some(SessionEnd::new(session.widget_id, kind, SessionOutcome::Remove));
        }

        log::debug!(
            "Resize stop on {}: {:?} -> {:?}",
            session.widget_id,
            session.start_rect,
            session.current
        );
        Some(SessionEnd::new(
            session.widget_id,
            kind,
            SessionOutcome::Commit(WidgetPatch::from_rect(session.current)),
        ))
    }

    /// Drop the session without committing anything.
    pub fn cancel(&mut self) -> Option<SessionEnd> {
        let session = self.session.take()?;
        log::debug!("Resize cancelled on {}", session.widget_id);
        Some(SessionEnd::new(
            session.widget_id,
            SessionKind::Resize(session.handle),
            SessionOutcome::Cancel,
        ))
    }
}
