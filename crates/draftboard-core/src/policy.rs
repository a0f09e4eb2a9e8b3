//! Per-type resize behavior.
//!
//! Every widget type has a [`WidgetTypePolicy`]: which handles it shows, how
//! its aspect ratio is enforced, and its size limits. Built-in kinds have a
//! fixed table; hosts can override any type name at runtime.

use crate::bounds::MaxSize;
use crate::widget::{HandleSet, ResizeHandle, Widget, WidgetKind};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a type keeps its proportions while resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatioMode {
    #[default]
    Free,
    /// Keep the ratio captured at session start, for every handle.
    Locked,
    /// Width always equals height.
    Square,
    /// Keep the ratio only for one handle group.
    Conditional { corner_locked: bool, side_locked: bool },
}

/// Aspect constraint effective for one handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectConstraint {
    None,
    Ratio,
    Square,
}

impl AspectRatioMode {
    /// Constraint for a resize driven by `handle`.
    pub fn resolve(&self, handle: ResizeHandle) -> AspectConstraint {
        match *self {
            AspectRatioMode::Free => AspectConstraint::None,
            AspectRatioMode::Locked => AspectConstraint::Ratio,
            AspectRatioMode::Square => AspectConstraint::Square,
            AspectRatioMode::Conditional { corner_locked, side_locked } => {
                let locked = if handle.is_corner() { corner_locked } else { side_locked };
                if locked { AspectConstraint::Ratio } else { AspectConstraint::None }
            }
        }
    }
}

/// Resize behavior of a widget type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetTypePolicy {
    pub active_handles: HandleSet,
    pub aspect_ratio: AspectRatioMode,
    pub min_width: f64,
    pub min_height: f64,
    #[serde(default)]
    pub max_width: Option<f64>,
    #[serde(default)]
    pub max_height: Option<f64>,
}

/// Images and circles keep proportion from a corner and stretch from an edge.
const CORNER_LOCKED: AspectRatioMode = AspectRatioMode::Conditional {
    corner_locked: true,
    side_locked: false,
};

impl WidgetTypePolicy {
    /// Policy for types without an entry.
    pub const DEFAULT: WidgetTypePolicy = WidgetTypePolicy {
        active_handles: HandleSet::ALL,
        aspect_ratio: AspectRatioMode::Free,
        min_width: 50.0,
        min_height: 50.0,
        max_width: None,
        max_height: None,
    };

    /// Table entry for a built-in kind.
    pub const fn builtin(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Rectangle => Self::DEFAULT,
            WidgetKind::Circle => Self {
                aspect_ratio: CORNER_LOCKED,
                ..Self::DEFAULT
            },
            WidgetKind::Star => Self {
                active_handles: HandleSet::CORNERS,
                aspect_ratio: AspectRatioMode::Square,
                min_width: 60.0,
                min_height: 60.0,
                ..Self::DEFAULT
            },
            WidgetKind::Image => Self {
                aspect_ratio: CORNER_LOCKED,
                max_width: Some(800.0),
                max_height: Some(600.0),
                ..Self::DEFAULT
            },
            WidgetKind::Text => Self {
                active_handles: HandleSet::HORIZONTAL,
                min_height: 30.0,
                ..Self::DEFAULT
            },
        }
    }

    pub fn allows(&self, handle: ResizeHandle) -> bool {
        self.active_handles.contains(handle)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    pub fn max_size(&self) -> MaxSize {
        MaxSize {
            width: self.max_width,
            height: self.max_height,
        }
    }

    /// Floor a size at the minimums.
    pub fn enforce_min(&self, size: Size) -> Size {
        Size::new(size.width.max(self.min_width), size.height.max(self.min_height))
    }
}

impl Default for WidgetTypePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Type name to policy lookup. Total: every name resolves to something.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    overrides: HashMap<String, WidgetTypePolicy>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override (or define) the policy for a type name.
    pub fn register(&mut self, type_name: impl Into<String>, policy: WidgetTypePolicy) {
        let type_name = type_name.into();
        log::debug!("Registered resize policy for {type_name}");
        self.overrides.insert(type_name, policy);
    }

    /// Policy for a built-in kind.
    pub fn policy(&self, kind: WidgetKind) -> WidgetTypePolicy {
        self.overrides
            .get(kind.name())
            .copied()
            .unwrap_or_else(|| WidgetTypePolicy::builtin(kind))
    }

    /// Policy for any type name. Unknown names get [`WidgetTypePolicy::DEFAULT`].
    pub fn policy_for_type(&self, type_name: &str) -> WidgetTypePolicy {
        if let Some(policy) = self.overrides.get(type_name) {
            return *policy;
        }
        match WidgetKind::from_name(type_name) {
            Some(kind) => WidgetTypePolicy::builtin(kind),
            None => {
                log::warn!("No resize policy for widget type '{type_name}', using default");
                WidgetTypePolicy::DEFAULT
            }
        }
    }

    pub fn policy_for(&self, widget: &Widget) -> WidgetTypePolicy {
        match widget.kind() {
            Some(kind) => self.policy(kind),
            None => self.policy_for_type(widget.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let star = WidgetTypePolicy::builtin(WidgetKind::Star);
        assert_eq!(star.active_handles, HandleSet::CORNERS);
        assert_eq!(star.aspect_ratio, AspectRatioMode::Square);
        assert_eq!(star.min_size(), Size::new(60.0, 60.0));

        let text = WidgetTypePolicy::builtin(WidgetKind::Text);
        assert!(text.allows(ResizeHandle::Left));
        assert!(!text.allows(ResizeHandle::BottomRight));
        assert_eq!(text.min_size(), Size::new(50.0, 30.0));

        let image = WidgetTypePolicy::builtin(WidgetKind::Image);
        assert_eq!(image.max_size(), MaxSize::new(800.0, 600.0));
    }

    #[test]
    fn test_conditional_resolves_per_handle() {
        let mode = WidgetTypePolicy::builtin(WidgetKind::Image).aspect_ratio;
        assert_eq!(mode.resolve(ResizeHandle::BottomRight), AspectConstraint::Ratio);
        assert_eq!(mode.resolve(ResizeHandle::Right), AspectConstraint::None);

        let inverted = AspectRatioMode::Conditional {
            corner_locked: false,
            side_locked: true,
        };
        assert_eq!(inverted.resolve(ResizeHandle::TopLeft), AspectConstraint::None);
        assert_eq!(inverted.resolve(ResizeHandle::Top), AspectConstraint::Ratio);
    }

    #[test]
    fn test_unknown_type_degrades_to_default() {
        let registry = PolicyRegistry::new();
        assert_eq!(registry.policy_for_type("hexagon"), WidgetTypePolicy::DEFAULT);
        assert_eq!(
            registry.policy_for_type("star"),
            WidgetTypePolicy::builtin(WidgetKind::Star)
        );
    }

    #[test]
    fn test_register_override() {
        let mut registry = PolicyRegistry::new();
        let locked = WidgetTypePolicy {
            aspect_ratio: AspectRatioMode::Locked,
            ..WidgetTypePolicy::DEFAULT
        };
        registry.register("rectangle", locked);
        registry.register("hexagon", locked);
        assert_eq!(registry.policy(WidgetKind::Rectangle), locked);
        assert_eq!(registry.policy_for_type("hexagon"), locked);
        assert_eq!(
            registry.policy(WidgetKind::Circle),
            WidgetTypePolicy::builtin(WidgetKind::Circle)
        );
    }

    #[test]
    fn test_enforce_min() {
        let policy = WidgetTypePolicy::builtin(WidgetKind::Text);
        assert_eq!(policy.enforce_min(Size::new(10.0, 100.0)), Size::new(50.0, 100.0));
    }
}
