//! Alignment guides for dragged widgets.
//!
//! While a widget is dragged, its left edge, center and right edge are tested
//! against vertical guide targets (the canvas centerline, then the left and
//! right edges of every other widget), and its top edge, center and bottom
//! edge against the horizontal ones. The first target within the threshold
//! wins, so there is at most one guide per axis.

use crate::config::SnapConfig;
use crate::widget::{Widget, WidgetId};
use kurbo::{Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// A vertical line at some x. Corrects horizontal position.
    Vertical,
    /// A horizontal line at some y. Corrects vertical position.
    Horizontal,
}

/// Edge of another widget a guide comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Where a guide line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuideSource {
    CanvasCenter,
    WidgetEdge { widget_id: WidgetId, edge: WidgetEdge },
}

impl GuideSource {
    pub fn source_widget(&self) -> Option<WidgetId> {
        match self {
            GuideSource::CanvasCenter => None,
            GuideSource::WidgetEdge { widget_id, .. } => Some(*widget_id),
        }
    }
}

/// Which point of the dragged widget matched a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapAnchor {
    /// Left edge (vertical guides) or top edge (horizontal guides).
    Leading,
    Center,
    /// Right edge (vertical guides) or bottom edge (horizontal guides).
    Trailing,
}

impl SnapAnchor {
    const ORDER: [SnapAnchor; 3] = [SnapAnchor::Leading, SnapAnchor::Center, SnapAnchor::Trailing];

    /// Coordinate of this anchor of `rect` along `axis`.
    pub fn coordinate(&self, rect: Rect, axis: Axis) -> f64 {
        let (leading, trailing) = match axis {
            Axis::Vertical => (rect.x0, rect.x1),
            Axis::Horizontal => (rect.y0, rect.y1),
        };
        match self {
            SnapAnchor::Leading => leading,
            SnapAnchor::Center => (leading + trailing) / 2.0,
            SnapAnchor::Trailing => trailing,
        }
    }
}

/// A line that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub axis: Axis,
    pub coordinate: f64,
    pub source: GuideSource,
}

/// An active alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub axis: Axis,
    pub coordinate: f64,
    pub source: GuideSource,
    pub anchor: SnapAnchor,
    /// Offset that moves the anchor onto the guide.
    pub offset: f64,
}

impl SnapGuide {
    pub fn source_widget(&self) -> Option<WidgetId> {
        self.source.source_widget()
    }
}

/// At most one guide per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapGuides {
    pub vertical: Option<SnapGuide>,
    pub horizontal: Option<SnapGuide>,
}

impl SnapGuides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnapGuide> {
        self.vertical.iter().chain(self.horizontal.iter())
    }

    /// Positional correction implied by the guides.
    pub fn correction(&self) -> Vec2 {
        Vec2::new(
            self.vertical.map_or(0.0, |g| g.offset),
            self.horizontal.map_or(0.0, |g| g.offset),
        )
    }
}

/// Result of a snap computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapResult {
    pub correction: Vec2,
    pub guides: SnapGuides,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// Guide targets along one axis, in match priority order.
pub fn snap_targets(
    axis: Axis,
    canvas: Size,
    dragged: WidgetId,
    widgets: &[Widget],
) -> Vec<SnapTarget> {
    let center = match axis {
        Axis::Vertical => canvas.width / 2.0,
        Axis::Horizontal => canvas.height / 2.0,
    };
    let mut targets = Vec::with_capacity(1 + widgets.len() * 2);
    targets.push(SnapTarget {
        axis,
        coordinate: center,
        source: GuideSource::CanvasCenter,
    });

    for widget in widgets.iter().filter(|w| w.id() != dragged) {
        let rect = widget.rect();
        let edges = match axis {
            Axis::Vertical => [(rect.x0, WidgetEdge::Left), (rect.x1, WidgetEdge::Right)],
            Axis::Horizontal => [(rect.y0, WidgetEdge::Top), (rect.y1, WidgetEdge::Bottom)],
        };
        for (coordinate, edge) in edges {
            targets.push(SnapTarget {
                axis,
                coordinate,
                source: GuideSource::WidgetEdge {
                    widget_id: widget.id(),
                    edge,
                },
            });
        }
    }
    targets
}

/// First target within `threshold` of any anchor of `rect`.
///
/// Targets are tried in order; for each target the anchors are tried
/// leading, center, trailing. The distance test is strict.
pub fn snap_axis(rect: Rect, targets: &[SnapTarget], threshold: f64) -> Option<SnapGuide> {
    for target in targets {
        if !target.coordinate.is_finite() {
            log::warn!("Skipping snap target with non-finite coordinate: {target:?}");
            continue;
        }
        for anchor in SnapAnchor::ORDER {
            let tested = anchor.coordinate(rect, target.axis);
            let offset = target.coordinate - tested;
            if offset.abs() < threshold {
                return Some(SnapGuide {
                    axis: target.axis,
                    coordinate: target.coordinate,
                    source: target.source,
                    anchor,
                    offset,
                });
            }
        }
    }
    None
}

/// Computes guides during a drag and keeps the latest preview.
#[derive(Debug, Clone)]
pub struct SnapEngine {
    config: SnapConfig,
    canvas: Size,
    last_run: Option<Instant>,
    guides: SnapGuides,
}

impl SnapEngine {
    pub fn new(config: SnapConfig, canvas: Size) -> Self {
        Self {
            config,
            canvas,
            last_run: None,
            guides: SnapGuides::default(),
        }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Snap `rect` (the dragged widget's box) against the other widgets.
    ///
    /// Unthrottled and side-effect free.
    pub fn compute(&self, rect: Rect, dragged: WidgetId, widgets: &[Widget]) -> SnapResult {
        if !self.config.enabled {
            return SnapResult::none();
        }
        if !(rect.x0.is_finite()
            && rect.y0.is_finite()
            && rect.x1.is_finite()
            && rect.y1.is_finite())
        {
            log::warn!("Not snapping non-finite rect {rect:?}");
            return SnapResult::none();
        }

        let threshold = self.config.threshold;
        let vertical_targets = snap_targets(Axis::Vertical, self.canvas, dragged, widgets);
        let horizontal_targets = snap_targets(Axis::Horizontal, self.canvas, dragged, widgets);
        let vertical = snap_axis(rect, &vertical_targets, threshold);
        let horizontal = snap_axis(rect, &horizontal_targets, threshold);
        let guides = SnapGuides {
            vertical,
            horizontal,
        };

        SnapResult {
            correction: guides.correction(),
            guides,
        }
    }

    /// Recompute the preview guides unless the last run is too recent.
    ///
    /// Calls inside the throttle interval are dropped, not queued. Returns
    /// true if the preview was recomputed.
    pub fn preview(
        &mut self,
        rect: Rect,
        dragged: WidgetId,
        widgets: &[Widget],
        now: Instant,
    ) -> bool {
        let throttled = self
            .last_run
            .is_some_and(|last| now.saturating_duration_since(last) < self.config.min_interval());
        if throttled {
            return false;
        }
        self.last_run = Some(now);
        self.guides = self.compute(rect, dragged, widgets).guides;
        true
    }

    /// Guides from the latest preview.
    pub fn guides(&self) -> &SnapGuides {
        &self.guides
    }

    pub fn clear(&mut self) {
        self.guides = SnapGuides::default();
        self.last_run = None;
    }
}
