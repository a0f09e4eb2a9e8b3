//! Widget data model.
//!
//! A widget is a typed, axis-aligned box on the canvas. Interaction state
//! (selection, edit mode) lives beside the widgets in [`SelectionState`],
//! so widgets themselves stay plain data.

mod handles;
mod patch;
mod selection;
mod state;

pub use handles::{Handle, HandleSet, ResizeHandle, handle_positions, hit_test_handles};
pub use patch::WidgetPatch;
pub use selection::SelectionState;
pub use state::WidgetState;

use crate::color::SerializableColor;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for widgets.
pub type WidgetId = Uuid;

/// Built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Rectangle,
    Circle,
    Star,
    Image,
    Text,
}

impl WidgetKind {
    /// All built-in kinds, in toolbar order.
    pub fn all() -> &'static [WidgetKind] {
        &[
            WidgetKind::Image,
            WidgetKind::Rectangle,
            WidgetKind::Circle,
            WidgetKind::Star,
            WidgetKind::Text,
        ]
    }

    /// Type name as used by callers (`"rectangle"`, `"text"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Rectangle => "rectangle",
            WidgetKind::Circle => "circle",
            WidgetKind::Star => "star",
            WidgetKind::Image => "image",
            WidgetKind::Text => "text",
        }
    }

    /// Look up a kind by type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text widget properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default = "TextProps::default_color")]
    pub color: SerializableColor,
}

impl TextProps {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";

    fn default_color() -> SerializableColor {
        SerializableColor::black()
    }
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            content: "Text".to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            bold: false,
            italic: false,
            align: TextAlign::Left,
            color: Self::default_color(),
        }
    }
}

/// Type-specific widget fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetContent {
    Rectangle { color: SerializableColor },
    Circle { color: SerializableColor },
    Star { color: SerializableColor },
    Image { src: String },
    Text(TextProps),
    /// A type this build does not know. Kept manipulable with the default policy.
    Unknown { type_name: String },
}

impl WidgetContent {
    /// Built-in kind, or `None` for unknown types.
    pub fn kind(&self) -> Option<WidgetKind> {
        match self {
            WidgetContent::Rectangle { .. } => Some(WidgetKind::Rectangle),
            WidgetContent::Circle { .. } => Some(WidgetKind::Circle),
            WidgetContent::Star { .. } => Some(WidgetKind::Star),
            WidgetContent::Image { .. } => Some(WidgetKind::Image),
            WidgetContent::Text(_) => Some(WidgetKind::Text),
            WidgetContent::Unknown { .. } => None,
        }
    }

    /// Type name, including the name of unknown types.
    pub fn type_name(&self) -> &str {
        match self {
            WidgetContent::Unknown { type_name } => type_name,
            other => other.kind().map(|kind| kind.name()).unwrap_or_default(),
        }
    }

    /// Fill color for shapes, text color for text.
    pub fn color(&self) -> Option<SerializableColor> {
        match self {
            WidgetContent::Rectangle { color }
            | WidgetContent::Circle { color }
            | WidgetContent::Star { color } => Some(*color),
            WidgetContent::Text(props) => Some(props.color),
            WidgetContent::Image { .. } | WidgetContent::Unknown { .. } => None,
        }
    }
}

/// Custom bounding rectangle. An absent edge leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsRect {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
}

impl BoundsRect {
    /// Bounds closed on all four sides.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            left: Some(rect.x0),
            top: Some(rect.y0),
            right: Some(rect.x1),
            bottom: Some(rect.y1),
        }
    }
}

/// Where a widget is allowed to go.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Bounds {
    /// Unconstrained.
    #[default]
    None,
    /// Kept fully inside the canvas.
    Canvas,
    /// Each edge clamped independently.
    Custom(BoundsRect),
}

/// A widget on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub(crate) id: WidgetId,
    /// Top-left corner in canvas space.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees. Purely visual: drag, resize and snapping work on the unrotated box.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub bounds: Bounds,
    pub content: WidgetContent,
}

impl Widget {
    /// Create a widget with a fresh id.
    pub fn new(content: WidgetContent, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            bounds: Bounds::None,
            content,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> Option<WidgetKind> {
        self.content.kind()
    }

    pub fn type_name(&self) -> &str {
        self.content.type_name()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Axis-aligned box in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    /// Move and resize to `rect`.
    pub fn set_rect(&mut self, rect: Rect) {
        self.position = rect.origin();
        self.width = rect.width();
        self.height = rect.height();
    }

    pub fn text(&self) -> Option<&TextProps> {
        match &self.content {
            WidgetContent::Text(props) => Some(props),
            _ => None,
        }
    }
}
