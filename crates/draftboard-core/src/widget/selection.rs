//! Single-selection and edit-mode tracking.

use super::WidgetId;
use super::state::WidgetState;

/// At most one selected widget and at most one widget in edit mode.
///
/// The edited widget is always the selected one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<WidgetId>,
    editing: Option<WidgetId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<WidgetId> {
        self.selected
    }

    pub fn editing(&self) -> Option<WidgetId> {
        self.editing
    }

    pub fn is_selected(&self, id: WidgetId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_editing(&self, id: WidgetId) -> bool {
        self.editing == Some(id)
    }

    /// UI state of a widget.
    pub fn state(&self, id: WidgetId) -> WidgetState {
        if self.is_editing(id) {
            WidgetState::Editing
        } else if self.is_selected(id) {
            WidgetState::Selected
        } else {
            WidgetState::Normal
        }
    }

    /// Select a widget, or deselect with `None`.
    ///
    /// Selecting anything other than the edited widget ends edit mode in the
    /// same step. Returns the widget that left edit mode, if any.
    pub fn select(&mut self, id: Option<WidgetId>) -> Option<WidgetId> {
        let exited = match self.editing {
            Some(editing) if Some(editing) != id => self.editing.take(),
            _ => None,
        };
        self.selected = id;
        exited
    }

    /// Enter edit mode for `id`, selecting it. Returns the widget that left edit mode, if any.
    pub fn enter_editing(&mut self, id: WidgetId) -> Option<WidgetId> {
        let exited = self.select(Some(id));
        self.editing = Some(id);
        exited
    }

    /// Leave edit mode, keeping the selection. Returns the widget that was edited.
    pub fn exit_editing(&mut self) -> Option<WidgetId> {
        self.editing.take()
    }

    /// Drop every reference to a removed widget. Returns true if the selection changed.
    pub fn forget(&mut self, id: WidgetId) -> bool {
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
            return true;
        }
        false
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selected = None;
        self.editing = None;
    }
}
