//! Widget interaction state.

/// The UI state of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Not selected.
    #[default]
    Normal,
    /// Selected: shows handles, can be dragged and resized.
    Selected,
    /// Text editing. Implies selection; drag and resize are disabled.
    Editing,
}

impl WidgetState {
    /// Check if widget is selected (either just selected or editing).
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing)
    }

    /// Check if widget is in editing mode.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing)
    }

    /// Whether pointer sessions may start on the widget.
    pub fn is_manipulable(&self) -> bool {
        !self.is_editing()
    }
}
