//! Drag sessions.
//!
//! A drag moves one widget by the pointer delta. While the pointer moves only
//! the transient session changes; the store is written once, on stop.

use crate::bounds::{MaxSize, apply_bounds, is_outside_canvas};
use crate::session::{SessionEnd, SessionKind, SessionOutcome};
use crate::snap::SnapEngine;
use crate::widget::{Bounds, Widget, WidgetId, WidgetPatch};
use kurbo::{Point, Rect, Size};

/// Transient state of an active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub widget_id: WidgetId,
    /// Pointer position at session start.
    pub origin: Point,
    pub start_position: Point,
    pub size: Size,
    pub bounds: Bounds,
    /// Latest clamped preview position.
    pub current: Point,
}

impl DragSession {
    pub fn start_rect(&self) -> Rect {
        Rect::from_origin_size(self.start_position, self.size)
    }

    pub fn preview_rect(&self) -> Rect {
        Rect::from_origin_size(self.current, self.size)
    }
}

/// Drag state machine: idle or dragging one widget.
#[derive(Debug, Clone, Default)]
pub struct DragEngine {
    session: Option<DragSession>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn preview_rect(&self) -> Option<Rect> {
        self.session.as_ref().map(DragSession::preview_rect)
    }

    /// Begin dragging `widget` from `pointer`. Replaces any previous session.
    pub fn start(&mut self, widget: &Widget, pointer: Point) {
        log::debug!("Drag start on {} at {pointer:?}", widget.id());
        self.session = Some(DragSession {
            widget_id: widget.id(),
            origin: pointer,
            start_position: widget.position,
            size: widget.size(),
            bounds: widget.bounds,
            current: widget.position,
        });
    }

    /// Move the preview to follow `pointer`. Returns the clamped preview box.
    pub fn update(&mut self, pointer: Point, canvas: Size) -> Option<Rect> {
        let session = self.session.as_mut()?;
        let candidate = session.start_position + (pointer - session.origin);
        let clamped = apply_bounds(
            Rect::from_origin_size(candidate, session.size),
            &session.bounds,
            canvas,
            MaxSize::NONE,
        );
        session.current = clamped.origin();
        Some(session.preview_rect())
    }

    /// Finish the drag at the last preview position.
    ///
    /// A widget left with no overlap with the canvas is removed. Otherwise
    /// the snap correction is computed once, unthrottled, and the corrected
    /// position is clamped again before being committed. Without a session
    /// this is a no-op.
    pub fn stop(
        &mut self,
        canvas: Size,
        snap: &SnapEngine,
        widgets: &[Widget],
    ) -> Option<SessionEnd> {
        let session = self.session.take()?;
        let rect = session.preview_rect();

        if is_outside_canvas(rect, canvas) {
            log::info!("Widget {} dragged off the canvas", session.widget_id);
            return Some(SessionEnd::new(
                session.widget_id,
                SessionKind::Drag,
                SessionOutcome::Remove,
            ));
        }

        let snapped = snap.compute(rect, session.widget_id, widgets);
        let corrected = apply_bounds(
            rect + snapped.correction,
            &session.bounds,
            canvas,
            MaxSize::NONE,
        );
        log::debug!(
            "Drag stop on {}: {:?} -> {:?}",
            session.widget_id,
            session.start_position,
            corrected.origin()
        );

        Some(SessionEnd::new(
            session.widget_id,
            SessionKind::Drag,
            SessionOutcome::Commit(WidgetPatch::new().with_position(corrected.origin())),
        ))
    }

    /// Drop the session without committing anything.
    pub fn cancel(&mut self) -> Option<SessionEnd> {
        let session = self.session.take()?;
        log::debug!("Drag cancelled on {}", session.widget_id);
        Some(SessionEnd::new(session.widget_id, SessionKind::Drag, SessionOutcome::Cancel))
    }
}
