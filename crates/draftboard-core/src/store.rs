//! Canonical widget collection with selection and edit-mode state.

use crate::color::SerializableColor;
use crate::config::DEFAULT_SPAWN_JITTER;
use crate::error::{EditorError, EditorResult};
use crate::image::{MAX_IMAGE_SIZE, exceeds, fit_image_dimensions};
use crate::policy::{PolicyRegistry, WidgetTypePolicy};
use crate::text::{
    measure_text_height, min_text_height, should_auto_resize, strip_trailing_newlines,
};
use crate::widget::{
    Bounds, SelectionState, TextProps, Widget, WidgetContent, WidgetId, WidgetKind, WidgetPatch,
    WidgetState,
};
use kurbo::{Point, Size};

/// Image shown until the host supplies a real source.
pub const PLACEHOLDER_IMAGE_SRC: &str = "https://picsum.photos/300/200?random=1";

/// Widget with the creation defaults of `kind`, before jitter and overrides.
pub fn default_widget(kind: WidgetKind) -> Widget {
    let (position, size, bounds, content) = match kind {
        WidgetKind::Image => (
            Point::new(150.0, 150.0),
            Size::new(250.0, 180.0),
            Bounds::None,
            WidgetContent::Image {
                src: PLACEHOLDER_IMAGE_SRC.to_string(),
            },
        ),
        WidgetKind::Rectangle => (
            Point::new(200.0, 200.0),
            Size::new(150.0, 100.0),
            Bounds::Canvas,
            WidgetContent::Rectangle {
                color: SerializableColor::from_hex("#3B82F6"),
            },
        ),
        WidgetKind::Circle => (
            Point::new(250.0, 250.0),
            Size::new(120.0, 120.0),
            Bounds::None,
            WidgetContent::Circle {
                color: SerializableColor::from_hex("#10B981"),
            },
        ),
        WidgetKind::Star => (
            Point::new(350.0, 350.0),
            Size::new(120.0, 120.0),
            Bounds::Canvas,
            WidgetContent::Star {
                color: SerializableColor::from_hex("#EF4444"),
            },
        ),
        WidgetKind::Text => {
            let props = TextProps::default();
            let height = min_text_height(props.font_size);
            (
                Point::new(100.0, 100.0),
                Size::new(200.0, height),
                Bounds::Canvas,
                WidgetContent::Text(props),
            )
        }
    };
    Widget::new(content, position, size.width, size.height).with_bounds(bounds)
}

/// Integer offset in `[0, range)`.
fn spawn_offset(range: f64) -> f64 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static JITTER_COUNTER: AtomicU32 = AtomicU32::new(1);

    if range <= 0.0 {
        return 0.0;
    }
    let counter = JITTER_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix32-style mix of the counter
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;

    let unit = f64::from(x) / (f64::from(u32::MAX) + 1.0);
    (unit * range).floor()
}

/// Normalize degrees into `[0, 360)`.
fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Ordered widget collection. Order is creation order and z-order.
#[derive(Debug, Clone)]
pub struct WidgetStore {
    widgets: Vec<Widget>,
    selection: SelectionState,
    registry: PolicyRegistry,
    spawn_jitter: f64,
}

impl Default for WidgetStore {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN_JITTER)
    }
}

impl WidgetStore {
    /// Create an empty store. New widgets are offset by up to `spawn_jitter` on each axis.
    pub fn new(spawn_jitter: f64) -> Self {
        Self {
            widgets: Vec::new(),
            selection: SelectionState::new(),
            registry: PolicyRegistry::new(),
            spawn_jitter,
        }
    }

    pub fn with_registry(mut self, registry: PolicyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id() == id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id() == id)
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PolicyRegistry {
        &mut self.registry
    }

    pub fn policy_for(&self, id: WidgetId) -> Option<WidgetTypePolicy> {
        self.get(id).map(|w| self.registry.policy_for(w))
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected(&self) -> Option<WidgetId> {
        self.selection.selected()
    }

    pub fn editing(&self) -> Option<WidgetId> {
        self.selection.editing()
    }

    pub fn state(&self, id: WidgetId) -> WidgetState {
        self.selection.state(id)
    }

    /// Create a widget by type name and select it.
    ///
    /// Fails with [`EditorError::InvalidWidgetType`] for unknown names,
    /// leaving the store untouched.
    pub fn create(&mut self, type_name: &str, overrides: WidgetPatch) -> EditorResult<WidgetId> {
        let kind = WidgetKind::from_name(type_name)
            .ok_or_else(|| EditorError::InvalidWidgetType(type_name.to_string()))?;
        Ok(self.create_kind(kind, overrides))
    }

    /// Create a built-in widget and select it.
    ///
    /// Defaults come first, then the spawn offset, then the overrides.
    pub fn create_kind(&mut self, kind: WidgetKind, overrides: WidgetPatch) -> WidgetId {
        let mut widget = default_widget(kind);
        widget.position.x += spawn_offset(self.spawn_jitter);
        widget.position.y += spawn_offset(self.spawn_jitter);
        overrides.apply(&mut widget);

        let policy = self.registry.policy(kind);
        let floored = policy.enforce_min(widget.size());
        widget.width = floored.width;
        widget.height = floored.height;

        if overrides.height.is_none() && overrides.touches_text_layout() {
            fit_text_height(&mut widget);
        }

        let id = widget.id();
        log::info!("Created {kind} widget {id} at {:?}", widget.position);
        self.widgets.push(widget);
        self.select(Some(id));
        id
    }

    /// Create an image widget sized from the image's natural size.
    pub fn create_image(&mut self, src: impl Into<String>, natural: Option<Size>) -> WidgetId {
        let size = fit_image_dimensions(natural, MAX_IMAGE_SIZE);
        self.create_kind(
            WidgetKind::Image,
            WidgetPatch::new().with_src(src).with_size(size.width, size.height),
        )
    }

    /// Add an existing widget, e.g. one restored by the host. Duplicate ids are rejected.
    pub fn insert(&mut self, widget: Widget) -> bool {
        if self.contains(widget.id()) {
            log::warn!("Widget {} already exists, not inserting", widget.id());
            return false;
        }
        self.widgets.push(widget);
        true
    }

    /// Merge `patch` into a widget. An absent id is a no-op.
    ///
    /// Sizes in the patch are floored at the type's minimums. Text widgets
    /// refit their height when the patch changes their layout without
    /// giving a height.
    pub fn update(&mut self, id: WidgetId, patch: &WidgetPatch) -> bool {
        let Some(index) = self.widgets.iter().position(|w| w.id() == id) else {
            log::debug!("Ignoring update for missing widget {id}");
            return false;
        };
        let policy = self.registry.policy_for(&self.widgets[index]);
        let widget = &mut self.widgets[index];

        let mut changed = patch.apply(widget);
        if patch.width.is_some() && widget.width < policy.min_width {
            widget.width = policy.min_width;
        }
        if patch.height.is_some() && widget.height < policy.min_height {
            widget.height = policy.min_height;
        }
        if patch.height.is_none() && patch.touches_text_layout() {
            changed |= fit_text_height(widget);
        }
        changed
    }

    /// Remove a widget. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| w.id() != id);
        let removed = self.widgets.len() != before;
        if removed {
            self.selection.forget(id);
            log::info!("Removed widget {id}");
        }
        removed
    }

    /// Remove the selected widget, if any.
    pub fn remove_selected(&mut self) -> Option<WidgetId> {
        let id = self.selection.selected()?;
        self.remove(id).then_some(id)
    }

    pub fn clear_all(&mut self) {
        log::info!("Clearing {} widgets", self.widgets.len());
        self.widgets.clear();
        self.selection.clear();
    }

    /// Select a widget or deselect with `None`. Selecting another widget
    /// ends edit mode first. Returns true if the selection changed.
    pub fn select(&mut self, id: Option<WidgetId>) -> bool {
        if let Some(missing) = id.filter(|id| !self.contains(*id)) {
            log::warn!("Cannot select missing widget {missing}");
            return false;
        }
        let previous = self.selection.clone();
        if let Some(exited) = self.selection.select(id) {
            self.finish_editing(exited);
        }
        self.selection != previous
    }

    /// Enter edit mode. Only text widgets can be edited.
    pub fn enter_edit_mode(&mut self, id: WidgetId) -> bool {
        match self.get(id) {
            Some(widget) if widget.kind() == Some(WidgetKind::Text) => {}
            Some(widget) => {
                log::debug!("{} widgets have no edit mode", widget.type_name());
                return false;
            }
            None => return false,
        }
        if let Some(exited) = self.selection.enter_editing(id) {
            self.finish_editing(exited);
        }
        true
    }

    /// Leave edit mode, keeping the selection. Returns the widget that was edited.
    pub fn exit_edit_mode(&mut self) -> Option<WidgetId> {
        let id = self.selection.exit_editing()?;
        self.finish_editing(id);
        Some(id)
    }

    /// Cleanup when a text widget leaves edit mode.
    fn finish_editing(&mut self, id: WidgetId) {
        let trimmed = match self.get(id).and_then(Widget::text) {
            Some(props) => {
                let trimmed = strip_trailing_newlines(&props.content);
                if trimmed.len() == props.content.len() {
                    return;
                }
                trimmed.to_string()
            }
            None => return,
        };
        self.update(id, &WidgetPatch::new().with_content(trimmed));
    }

    pub fn set_rotation(&mut self, id: WidgetId, degrees: f64) -> bool {
        if !degrees.is_finite() {
            log::warn!("Ignoring non-finite rotation {degrees}");
            return false;
        }
        self.update(id, &WidgetPatch::new().with_rotation(normalize_degrees(degrees)))
    }

    /// Rotate by `step` degrees.
    pub fn rotate_by(&mut self, id: WidgetId, step: f64) -> bool {
        match self.get(id) {
            Some(widget) => {
                let degrees = widget.rotation + step;
                self.set_rotation(id, degrees)
            }
            None => false,
        }
    }

    pub fn reset_rotation(&mut self, id: WidgetId) -> bool {
        self.set_rotation(id, 0.0)
    }

    /// Replace the content of a text widget, refitting its height.
    pub fn set_text_content(&mut self, id: WidgetId, content: impl Into<String>) -> bool {
        if self.get(id).and_then(Widget::text).is_none() {
            return false;
        }
        self.update(id, &WidgetPatch::new().with_content(content))
    }

    /// Refit a text widget's height to its content.
    pub fn refresh_text_height(&mut self, id: WidgetId) -> bool {
        self.get_mut(id).is_some_and(fit_text_height)
    }

    /// Shrink an image widget once its natural size is known.
    ///
    /// Only images larger than the maximum are touched.
    pub fn apply_image_natural_size(&mut self, id: WidgetId, natural: Size) -> bool {
        let is_image = self.get(id).and_then(Widget::kind) == Some(WidgetKind::Image);
        if !is_image || !exceeds(natural, MAX_IMAGE_SIZE) {
            return false;
        }
        let size = fit_image_dimensions(Some(natural), MAX_IMAGE_SIZE);
        self.update(id, &WidgetPatch::new().with_size(size.width, size.height))
    }
}

/// Refit a text widget's height. Returns true if the height changed.
fn fit_text_height(widget: &mut Widget) -> bool {
    let width = widget.width;
    let Some(props) = widget.text() else {
        return false;
    };
    let measured = measure_text_height(props, width);
    if should_auto_resize(widget.height, measured) {
        log::debug!("Text widget {} height {} -> {measured}", widget.id(), widget.height);
        widget.height = measured;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn store() -> WidgetStore {
        WidgetStore::new(0.0)
    }

    #[test]
    fn test_create_defaults() {
        let mut store = store();
        let id = store.create("rectangle", WidgetPatch::new()).unwrap();
        let widget = store.get(id).unwrap();
        assert_eq!(widget.rect(), Rect::from_origin_size((200.0, 200.0), (150.0, 100.0)));
        assert_eq!(widget.bounds, Bounds::Canvas);
        assert_eq!(widget.content.color(), Some(SerializableColor::from_hex("#3B82F6")));
        assert_eq!(store.selected(), Some(id));
    }

    #[test]
    fn test_create_text_defaults() {
        let mut store = store();
        let id = store.create_kind(WidgetKind::Text, WidgetPatch::new());
        let widget = store.get(id).unwrap();
        assert!((widget.height - 38.4).abs() < 1e-9);
        assert_eq!(widget.text().unwrap().content, "Text");
        assert_eq!(widget.text().unwrap().font_family, "Arial");
    }

    #[test]
    fn test_create_unknown_type_fails() {
        let mut store = store();
        store.create("circle", WidgetPatch::new()).unwrap();
        let selected = store.selected();
        let err = store.create("unknown-type", WidgetPatch::new()).unwrap_err();
        assert!(matches!(err, EditorError::InvalidWidgetType(ref t) if t == "unknown-type"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected(), selected);
    }

    #[test]
    fn test_overrides_win() {
        let mut store = WidgetStore::new(100.0);
        let overrides = WidgetPatch::new()
            .with_position(Point::new(10.0, 20.0))
            .with_size(10.0, 500.0);
        let id = store.create("star", overrides).unwrap();
        let widget = store.get(id).unwrap();
        assert_eq!(widget.position, Point::new(10.0, 20.0));
        // Floored at the star minimum.
        assert!((widget.width - 60.0).abs() < f64::EPSILON);
        assert!((widget.height - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jitter_range() {
        let mut store = WidgetStore::new(100.0);
        for _ in 0..50 {
            let id = store.create_kind(WidgetKind::Circle, WidgetPatch::new());
            let p = store.get(id).unwrap().position;
            for offset in [p.x - 250.0, p.y - 250.0] {
                assert!((0.0..100.0).contains(&offset), "offset {offset}");
                assert!((offset - offset.floor()).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_ids_unique() {
        let mut store = store();
        let a = store.create_kind(WidgetKind::Circle, WidgetPatch::new());
        let b = store.create_kind(WidgetKind::Circle, WidgetPatch::new());
        assert_ne!(a, b);
        let dup = store.get(a).unwrap().clone();
        assert!(!store.insert(dup));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = store();
        store.create_kind(WidgetKind::Circle, WidgetPatch::new());
        assert!(!store.update(uuid::Uuid::new_v4(), &WidgetPatch::new().with_rotation(10.0)));
    }

    #[test]
    fn test_update_floors_size() {
        let mut store = store();
        let id = store.create_kind(WidgetKind::Rectangle, WidgetPatch::new());
        store.update(id, &WidgetPatch::new().with_size(10.0, 10.0));
        assert_eq!(store.get(id).unwrap().size(), Size::new(50.0, 50.0));
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = store();
        let a = store.create_kind(WidgetKind::Circle, WidgetPatch::new());
        let b = store.create_kind(WidgetKind::Star, WidgetPatch::new());
        assert!(store.remove(a));
        assert_eq!(store.selected(), Some(b));
        assert_eq!(store.remove_selected(), Some(b));
        assert_eq!(store.selected(), None);
        assert!(store.is_empty());
        assert!(!store.remove(a));
    }

    #[test]
    fn test_clear_all() {
        let mut store = store();
        store.create_kind(WidgetKind::Circle, WidgetPatch::new());
        store.create_kind(WidgetKind::Text, WidgetPatch::new());
        store.clear_all();
        assert!(store.is_empty());
        assert_eq!(store.selection(), &SelectionState::default());
    }

    #[test]
    fn test_edit_mode_text_only() {
        let mut store = store();
        let circle = store.create_kind(WidgetKind::Circle, WidgetPatch::new());
        assert!(!store.enter_edit_mode(circle));
        let text = store.create_kind(WidgetKind::Text, WidgetPatch::new());
        assert!(store.enter_edit_mode(text));
        assert_eq!(store.state(text), WidgetState::Editing);
    }

    #[test]
    fn test_select_other_exits_edit_mode() {
        let mut store = store();
        let a = store.create_kind(WidgetKind::Text, WidgetPatch::new());
        let b = store.create_kind(WidgetKind::Rectangle, WidgetPatch::new());
        store.enter_edit_mode(a);
        store.set_text_content(a, "hello\n\n");

        assert!(store.select(Some(b)));
        assert_eq!(store.editing(), None);
        assert_eq!(store.selected(), Some(b));
        assert_eq!(store.get(a).unwrap().text().unwrap().content, "hello");
    }

    #[test]
    fn test_select_missing_is_rejected() {
        let mut store = store();
        let a = store.create_kind(WidgetKind::Circle, WidgetPatch::new());
        assert!(!store.select(Some(uuid::Uuid::new_v4())));
        assert_eq!(store.selected(), Some(a));
    }

    #[test]
    fn test_rotation() {
        let mut store = store();
        let id = store.create_kind(WidgetKind::Star, WidgetPatch::new());
        store.rotate_by(id, -15.0);
        assert!((store.get(id).unwrap().rotation - 345.0).abs() < 1e-9);
        store.rotate_by(id, 30.0);
        assert!((store.get(id).unwrap().rotation - 15.0).abs() < 1e-9);
        store.set_rotation(id, 720.0);
        assert!(store.get(id).unwrap().rotation.abs() < 1e-9);
        assert!(!store.set_rotation(id, f64::NAN));
        store.set_rotation(id, 90.0);
        store.reset_rotation(id);
        assert!(store.get(id).unwrap().rotation.abs() < 1e-9);
    }

    #[test]
    fn test_text_auto_height() {
        let mut store = store();
        let id = store.create_kind(WidgetKind::Text, WidgetPatch::new());
        assert!(store.set_text_content(id, "one\ntwo\nthree"));
        let height = store.get(id).unwrap().height;
        assert!((height - (3.0 * 16.0 * 1.4 + 16.0)).abs() < 1e-9);

        store.set_text_content(id, "one");
        assert!((store.get(id).unwrap().height - 38.4).abs() < 1e-9);
    }

    #[test]
    fn test_create_image() {
        let mut store = store();
        let id = store.create_image("photo.png", Some(Size::new(1600.0, 1200.0)));
        let widget = store.get(id).unwrap();
        assert_eq!(widget.size(), Size::new(400.0, 300.0));
        let expected = WidgetContent::Image {
            src: "photo.png".to_string(),
        };
        assert_eq!(widget.content, expected);

        let fallback = store.create_image("unknown.png", None);
        assert_eq!(store.get(fallback).unwrap().size(), Size::new(300.0, 200.0));
    }

    #[test]
    fn test_apply_image_natural_size() {
        let mut store = store();
        let id = store.create_kind(WidgetKind::Image, WidgetPatch::new());
        assert!(!store.apply_image_natural_size(id, Size::new(320.0, 240.0)));
        assert_eq!(store.get(id).unwrap().size(), Size::new(250.0, 180.0));
        assert!(store.apply_image_natural_size(id, Size::new(800.0, 400.0)));
        assert_eq!(store.get(id).unwrap().size(), Size::new(400.0, 200.0));
    }
}
