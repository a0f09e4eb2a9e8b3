//! Interaction controller.
//!
//! Owns the store and the engines, and runs at most one pointer session at a
//! time. The host forwards pointer input (`begin_*`, `pointer_move`,
//! `pointer_up`, `cancel`) and drains [`InteractionEvent`]s to update its
//! presentation.

use crate::config::EditorConfig;
use crate::drag::DragEngine;
use crate::error::{EditorError, EditorResult};
use crate::resize::ResizeEngine;
use crate::session::{SessionEnd, SessionKind, SessionOutcome};
use crate::snap::{SnapEngine, SnapGuides};
use crate::store::WidgetStore;
use crate::widget::{
    Handle, HandleSet, ResizeHandle, SelectionState, WidgetId, WidgetKind, WidgetPatch,
    handle_positions, hit_test_handles,
};
use kurbo::{Point, Rect, Size};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// A drag or resize began. Hosts typically switch cursor and hide handles.
    SessionStarted { widget_id: WidgetId, kind: SessionKind },
    /// The active session ended, whatever the outcome.
    SessionEnded(SessionEnd),
    /// Selection or edit mode changed.
    SelectionChanged { selected: Option<WidgetId>, editing: Option<WidgetId> },
    /// A session result was written to the store.
    WidgetCommitted { widget_id: WidgetId, patch: WidgetPatch },
    /// A widget was deleted.
    WidgetRemoved { widget_id: WidgetId },
}

fn is_finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// Drives drag and resize sessions against a [`WidgetStore`].
#[derive(Debug)]
pub struct InteractionController {
    config: EditorConfig,
    store: WidgetStore,
    drag: DragEngine,
    resize: ResizeEngine,
    snap: SnapEngine,
    events: Vec<InteractionEvent>,
}

impl InteractionController {
    /// Create a controller with an empty store.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self {
            store: WidgetStore::new(config.spawn_jitter),
            drag: DragEngine::new(),
            resize: ResizeEngine::new(config.clamp_locked_anchor_resizes),
            snap: SnapEngine::new(config.snap.clone(), config.canvas_size()),
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas_size(&self) -> Size {
        self.config.canvas_size()
    }

    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    /// Direct store access for property edits (toolbar, inspector).
    pub fn store_mut(&mut self) -> &mut WidgetStore {
        &mut self.store
    }

    /// Create a widget by type name. The new widget becomes selected, so an
    /// active session is cancelled first.
    pub fn create(&mut self, type_name: &str, overrides: WidgetPatch) -> EditorResult<WidgetId> {
        let kind = WidgetKind::from_name(type_name)
            .ok_or_else(|| EditorError::InvalidWidgetType(type_name.to_string()))?;
        self.cancel();
        let before = self.store.selection().clone();
        let id = self.store.create_kind(kind, overrides);
        self.emit_selection_change(&before);
        Ok(id)
    }

    /// Select a widget, or deselect with `None`.
    ///
    /// An active session on another widget is cancelled first.
    pub fn select(&mut self, id: Option<WidgetId>) -> bool {
        if id.is_none() {
            let changed = self.store.selected().is_some();
            self.clear_selection();
            return changed;
        }
        if self.active_session().is_some_and(|(active, _)| Some(active) != id) {
            self.cancel();
        }
        let before = self.store.selection().clone();
        let changed = self.store.select(id);
        self.emit_selection_change(&before);
        changed
    }

    /// Background click: deselect, leave edit mode and drop guides.
    pub fn clear_selection(&mut self) {
        self.cancel();
        let before = self.store.selection().clone();
        self.store.select(None);
        self.snap.clear();
        self.emit_selection_change(&before);
    }

    /// Enter edit mode on a text widget.
    pub fn enter_edit_mode(&mut self, id: WidgetId) -> bool {
        if self.active_session().is_some() {
            self.cancel();
        }
        let before = self.store.selection().clone();
        let entered = self.store.enter_edit_mode(id);
        self.emit_selection_change(&before);
        entered
    }

    pub fn exit_edit_mode(&mut self) -> Option<WidgetId> {
        let before = self.store.selection().clone();
        let exited = self.store.exit_edit_mode();
        self.emit_selection_change(&before);
        exited
    }

    /// Delete the selected widget.
    pub fn remove_selected(&mut self) -> Option<WidgetId> {
        let id = self.store.selected()?;
        if self.active_session().is_some_and(|(active, _)| active == id) {
            self.cancel();
        }
        let before = self.store.selection().clone();
        let removed = self.store.remove_selected()?;
        self.events.push(InteractionEvent::WidgetRemoved { widget_id: removed });
        self.emit_selection_change(&before);
        Some(removed)
    }

    /// Start dragging a widget. Fails if a session is already running, the
    /// widget does not exist or is in edit mode.
    pub fn begin_drag(&mut self, id: WidgetId, pointer: Point) -> bool {
        if !self.can_begin(id, pointer) {
            return false;
        }
        self.select(Some(id));
        let Some(widget) = self.store.get(id) else {
            return false;
        };
        self.drag.start(widget, pointer);
        self.snap.clear();
        self.events.push(InteractionEvent::SessionStarted {
            widget_id: id,
            kind: SessionKind::Drag,
        });
        true
    }

    /// Start resizing a widget from `handle`. Fails like [`Self::begin_drag`],
    /// and also if the handle is not active for the widget's type.
    pub fn begin_resize(&mut self, id: WidgetId, handle: ResizeHandle, pointer: Point) -> bool {
        if !self.can_begin(id, pointer) {
            return false;
        }
        let Some(policy) = self.store.policy_for(id) else {
            return false;
        };
        if !policy.allows(handle) {
            log::debug!("Handle {handle:?} is inactive for widget {id}");
            return false;
        }
        self.select(Some(id));
        let Some(widget) = self.store.get(id) else {
            return false;
        };
        if !self.resize.start(widget, handle, pointer, policy) {
            return false;
        }
        self.events.push(InteractionEvent::SessionStarted {
            widget_id: id,
            kind: SessionKind::Resize(handle),
        });
        true
    }

    fn can_begin(&self, id: WidgetId, pointer: Point) -> bool {
        if let Some((active, kind)) = self.active_session() {
            log::debug!("Session {kind:?} on {active} already running");
            return false;
        }
        if !is_finite_point(pointer) {
            log::warn!("Ignoring session start at invalid pointer {pointer:?}");
            return false;
        }
        if !self.store.contains(id) {
            log::warn!("Cannot start a session on missing widget {id}");
            return false;
        }
        if !self.store.state(id).is_manipulable() {
            log::debug!("Widget {id} is being edited; drag and resize are disabled");
            return false;
        }
        true
    }

    /// Pointer moved. Updates the preview (and throttled guides while dragging).
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Rect> {
        self.pointer_move_at(pointer, Instant::now())
    }

    /// [`Self::pointer_move`] with an explicit timestamp for the guide throttle.
    pub fn pointer_move_at(&mut self, pointer: Point, now: Instant) -> Option<Rect> {
        if !is_finite_point(pointer) {
            log::warn!("Ignoring invalid pointer {pointer:?}");
            return None;
        }
        let canvas = self.canvas_size();

        if let Some(rect) = self.drag.update(pointer, canvas) {
            if let Some(session) = self.drag.session() {
                self.snap.preview(rect, session.widget_id, self.store.widgets(), now);
            }
            return Some(rect);
        }
        self.resize.update(pointer, canvas)
    }

    /// Pointer released. Finishes the active session and applies its outcome.
    ///
    /// Without usable pointer data the session ends with nothing written.
    /// Without a session this is a no-op.
    pub fn pointer_up(&mut self, pointer: Option<Point>) -> Option<SessionEnd> {
        let (widget_id, kind) = self.active_session()?;

        let Some(pointer) = pointer.filter(|p| is_finite_point(*p)) else {
            log::warn!("Session on {widget_id} stopped without valid pointer data, discarding");
            self.drag.cancel();
            self.resize.cancel();
            let end = SessionEnd::new(widget_id, kind, SessionOutcome::Discard);
            return Some(self.finish(end));
        };

        let canvas = self.canvas_size();
        let end = match kind {
            SessionKind::Drag => {
                self.drag.update(pointer, canvas);
                self.drag.stop(canvas, &self.snap, self.store.widgets())
            }
            SessionKind::Resize(_) => {
                self.resize.update(pointer, canvas);
                self.resize.stop(canvas)
            }
        }?;
        Some(self.finish(end))
    }

    /// Abort the active session. Nothing is written.
    pub fn cancel(&mut self) -> Option<SessionEnd> {
        let end = self.drag.cancel().or_else(|| self.resize.cancel())?;
        Some(self.finish(end))
    }

    /// Apply a session outcome to the store and notify.
    fn finish(&mut self, end: SessionEnd) -> SessionEnd {
        self.snap.clear();
        let id = end.widget_id;

        match &end.outcome {
            SessionOutcome::Commit(patch) if self.store.contains(id) => {
                self.store.update(id, patch);
                let is_text = self.store.get(id).and_then(|w| w.kind()) == Some(WidgetKind::Text);
                if matches!(end.kind, SessionKind::Resize(_)) && is_text {
                    self.store.refresh_text_height(id);
                }
                self.events.push(InteractionEvent::WidgetCommitted {
                    widget_id: id,
                    patch: patch.clone(),
                });
            }
            SessionOutcome::Commit(_) => {
                log::warn!("Widget {id} was removed during the session, nothing to commit");
            }
            SessionOutcome::Remove => {
                let before = self.store.selection().clone();
                if self.store.remove(id) {
                    self.events.push(InteractionEvent::WidgetRemoved { widget_id: id });
                }
                self.emit_selection_change(&before);
            }
            SessionOutcome::Cancel | SessionOutcome::Discard => {}
        }

        self.events.push(InteractionEvent::SessionEnded(end.clone()));
        end
    }

    fn emit_selection_change(&mut self, before: &SelectionState) {
        let selection = self.store.selection();
        if selection != before {
            self.events.push(InteractionEvent::SelectionChanged {
                selected: selection.selected(),
                editing: selection.editing(),
            });
        }
    }

    /// Widget and kind of the running session.
    pub fn active_session(&self) -> Option<(WidgetId, SessionKind)> {
        if let Some(session) = self.drag.session() {
            return Some((session.widget_id, SessionKind::Drag));
        }
        self.resize
            .session()
            .map(|session| (session.widget_id, SessionKind::Resize(session.handle)))
    }

    /// Transient box of the widget under manipulation.
    pub fn preview_rect(&self) -> Option<(WidgetId, Rect)> {
        let (id, _) = self.active_session()?;
        let rect = self.drag.preview_rect().or_else(|| self.resize.preview_rect())?;
        Some((id, rect))
    }

    /// Current guides for an overlay. Empty outside drags.
    pub fn guides(&self) -> &SnapGuides {
        self.snap.guides()
    }

    /// Box the handles of `id` sit on, with its active handles.
    ///
    /// None unless the widget is selected and not being edited, and while a
    /// drag runs. Follows the live preview during a resize.
    fn handle_frame(&self, id: WidgetId) -> Option<(Rect, HandleSet)> {
        let state = self.store.state(id);
        if self.drag.is_active() || !state.is_selected() || !state.is_manipulable() {
            return None;
        }
        let widget = self.store.get(id)?;
        let policy = self.store.policy_for(id)?;
        let rect = match self.preview_rect() {
            Some((active, rect)) if active == id => rect,
            _ => widget.rect(),
        };
        Some((rect, policy.active_handles))
    }

    /// Handles to draw for a widget.
    pub fn visible_handles(&self, id: WidgetId) -> Vec<Handle> {
        self.handle_frame(id)
            .map(|(rect, active)| handle_positions(rect, active))
            .unwrap_or_default()
    }

    /// Visible handle of `id` under `point`, if any.
    pub fn hit_test_handle(
        &self,
        id: WidgetId,
        point: Point,
        tolerance: f64,
    ) -> Option<ResizeHandle> {
        let (rect, active) = self.handle_frame(id)?;
        hit_test_handles(rect, active, point, tolerance)
    }

    /// Drain pending events.
    pub fn poll_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }
}
