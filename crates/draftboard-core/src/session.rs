//! Pointer session results shared by the drag and resize engines.

use crate::widget::{ResizeHandle, WidgetId, WidgetPatch};

/// What a pointer session manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Drag,
    Resize(ResizeHandle),
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Write the patch to the store.
    Commit(WidgetPatch),
    /// The widget ended up off the canvas and must be deleted.
    Remove,
    /// Cancelled by the user. The widget keeps its start geometry.
    Cancel,
    /// Stopped without usable pointer data. Nothing is written.
    Discard,
}

/// A finished session, ready to be applied to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEnd {
    pub widget_id: WidgetId,
    pub kind: SessionKind,
    pub outcome: SessionOutcome,
}

impl SessionEnd {
    pub fn new(widget_id: WidgetId, kind: SessionKind, outcome: SessionOutcome) -> Self {
        Self {
            widget_id,
            kind,
            outcome,
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self.outcome, SessionOutcome::Commit(_))
    }

    pub fn is_removal(&self) -> bool {
        matches!(self.outcome, SessionOutcome::Remove)
    }
}
