//! Draftboard Core Library
//!
//! Interaction engine for the Draftboard canvas editor: typed widgets on a
//! fixed-size canvas, pointer-driven drag and resize with per-type policies,
//! bounds clamping with off-canvas deletion, and alignment guides.
//!
//! Rendering, toolbars and image loading live in the host. The host feeds
//! pointer input into an [`InteractionController`] and reads back committed
//! widgets, guides and [`InteractionEvent`]s.

pub mod bounds;
pub mod color;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod image;
pub mod policy;
pub mod resize;
pub mod session;
pub mod snap;
pub mod store;
pub mod text;
pub mod widget;

pub use bounds::{MaxSize, apply_bounds, is_outside_canvas};
pub use color::SerializableColor;
pub use config::{EditorConfig, SnapConfig};
pub use controller::{InteractionController, InteractionEvent};
pub use drag::{DragEngine, DragSession};
pub use error::{EditorError, EditorResult};
pub use policy::{AspectConstraint, AspectRatioMode, PolicyRegistry, WidgetTypePolicy};
pub use resize::{ResizeEngine, ResizeSession, compute_resize};
pub use session::{SessionEnd, SessionKind, SessionOutcome};
pub use snap::{
    Axis, GuideSource, SnapAnchor, SnapEngine, SnapGuide, SnapGuides, SnapResult, WidgetEdge,
};
pub use store::WidgetStore;
pub use widget::{
    Bounds, BoundsRect, Handle, HandleSet, ResizeHandle, SelectionState, TextAlign, TextProps,
    Widget, WidgetContent, WidgetId, WidgetKind, WidgetPatch, WidgetState,
};
