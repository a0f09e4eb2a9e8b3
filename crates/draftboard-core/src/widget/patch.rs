//! Partial widget updates.

use super::{Bounds, TextAlign, Widget, WidgetContent};
use crate::color::SerializableColor;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A partial set of widget fields. `None` fields are left untouched.
///
/// Used for creation overrides, session commits and property edits. Fields
/// that do not apply to the target's type are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

impl WidgetPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position and size taken from `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new()
            .with_position(rect.origin())
            .with_size(rect.width(), rect.height())
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.x = Some(position.x);
        self.y = Some(position.y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = Some(font_family.into());
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the patch can change the measured height of a text widget.
    pub fn touches_text_layout(&self) -> bool {
        self.width.is_some()
            || self.content.is_some()
            || self.font_size.is_some()
            || self.font_family.is_some()
            || self.bold.is_some()
    }

    /// Merge the patch into `widget`. Returns true if anything changed.
    pub fn apply(&self, widget: &mut Widget) -> bool {
        let before = widget.clone();

        if let Some(x) = self.x {
            widget.position.x = x;
        }
        if let Some(y) = self.y {
            widget.position.y = y;
        }
        if let Some(width) = self.width {
            widget.width = width;
        }
        if let Some(height) = self.height {
            widget.height = height;
        }
        if let Some(rotation) = self.rotation {
            widget.rotation = rotation;
        }
        if let Some(bounds) = self.bounds {
            widget.bounds = bounds;
        }

        match &mut widget.content {
            WidgetContent::Rectangle { color }
            | WidgetContent::Circle { color }
            | WidgetContent::Star { color } => {
                if let Some(c) = self.color {
                    *color = c;
                }
                self.ignore_text_fields();
                if self.src.is_some() {
                    log::debug!("Ignoring src for {} widget", before.type_name());
                }
            }
            WidgetContent::Image { src } => {
                if let Some(new_src) = &self.src {
                    src.clone_from(new_src);
                }
                self.ignore_text_fields();
                if self.color.is_some() {
                    log::debug!("Ignoring color for image widget");
                }
            }
            WidgetContent::Text(props) => {
                if let Some(content) = &self.content {
                    props.content.clone_from(content);
                }
                if let Some(font_size) = self.font_size {
                    props.font_size = font_size;
                }
                if let Some(font_family) = &self.font_family {
                    props.font_family.clone_from(font_family);
                }
                if let Some(bold) = self.bold {
                    props.bold = bold;
                }
                if let Some(italic) = self.italic {
                    props.italic = italic;
                }
                if let Some(align) = self.align {
                    props.align = align;
                }
                if let Some(color) = self.color {
                    props.color = color;
                }
            }
            WidgetContent::Unknown { .. } => {}
        }

        *widget != before
    }

    fn ignore_text_fields(&self) {
        if self.content.is_some()
            || self.font_size.is_some()
            || self.font_family.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.align.is_some()
        {
            log::debug!("Ignoring text fields for non-text widget");
        }
    }
}
