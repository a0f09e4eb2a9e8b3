//! Bounds clamping and out-of-canvas detection.

use crate::widget::Bounds;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Optional upper limits on widget size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaxSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl MaxSize {
    pub const NONE: MaxSize = MaxSize {
        width: None,
        height: None,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Cap `size` at the limits, each axis independently.
    pub fn cap(&self, size: Size) -> Size {
        Size::new(
            self.width.map_or(size.width, |max| size.width.min(max)),
            self.height.map_or(size.height, |max| size.height.min(max)),
        )
    }
}

/// Clamp a proposed box to its bounds. Never fails.
///
/// The size is first capped at `max`. Under [`Bounds::Canvas`] the size is
/// also capped at the canvas extent, then the origin is moved so the box
/// lies inside the canvas. Under [`Bounds::Custom`] each present edge is
/// enforced on its own, so a box wider than its custom bounds ends up
/// aligned to the right edge.
pub fn apply_bounds(rect: Rect, bounds: &Bounds, canvas: Size, max: MaxSize) -> Rect {
    let mut size = max.cap(rect.size());
    let mut x = rect.x0;
    let mut y = rect.y0;

    match bounds {
        Bounds::None => {}
        Bounds::Canvas => {
            size = MaxSize::new(canvas.width, canvas.height).cap(size);
            x = x.min(canvas.width - size.width).max(0.0);
            y = y.min(canvas.height - size.height).max(0.0);
        }
        Bounds::Custom(limits) => {
            if let Some(left) = limits.left {
                x = x.max(left);
            }
            if let Some(top) = limits.top {
                y = y.max(top);
            }
            if let Some(right) = limits.right {
                x = x.min(right - size.width);
            }
            if let Some(bottom) = limits.bottom {
                y = y.min(bottom - size.height);
            }
        }
    }

    Rect::from_origin_size(Point::new(x, y), size)
}

/// True iff `rect` has no overlap with the canvas. Touching an edge counts as outside.
pub fn is_outside_canvas(rect: Rect, canvas: Size) -> bool {
    rect.x1 <= 0.0 || rect.x0 >= canvas.width || rect.y1 <= 0.0 || rect.y0 >= canvas.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::BoundsRect;

    const CANVAS: Size = Size::new(960.0, 540.0);

    fn assert_rect_eq(a: Rect, b: Rect) {
        assert!(
            (a.x0 - b.x0).abs() < 1e-9
                && (a.y0 - b.y0).abs() < 1e-9
                && (a.x1 - b.x1).abs() < 1e-9
                && (a.y1 - b.y1).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_no_bounds_is_identity() {
        let rect = Rect::new(-50.0, -50.0, 50.0, 50.0);
        assert_rect_eq(apply_bounds(rect, &Bounds::None, CANVAS, MaxSize::NONE), rect);
    }

    #[test]
    fn test_max_size_applies_without_bounds() {
        let rect = Rect::new(0.0, 0.0, 1000.0, 700.0);
        let clamped = apply_bounds(rect, &Bounds::None, CANVAS, MaxSize::new(800.0, 600.0));
        assert_rect_eq(clamped, Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_canvas_clamp() {
        let rect = Rect::from_origin_size((900.0, -20.0), (150.0, 100.0));
        let clamped = apply_bounds(rect, &Bounds::Canvas, CANVAS, MaxSize::NONE);
        assert_rect_eq(clamped, Rect::from_origin_size((810.0, 0.0), (150.0, 100.0)));
    }

    #[test]
    fn test_canvas_clamp_caps_oversized() {
        let rect = Rect::from_origin_size((-10.0, 10.0), (1200.0, 100.0));
        let clamped = apply_bounds(rect, &Bounds::Canvas, CANVAS, MaxSize::NONE);
        assert_rect_eq(clamped, Rect::from_origin_size((0.0, 10.0), (960.0, 100.0)));
    }

    #[test]
    fn test_custom_edges_independent() {
        let bounds = Bounds::Custom(BoundsRect {
            left: Some(100.0),
            top: None,
            right: Some(400.0),
            bottom: Some(300.0),
        });
        let rect = Rect::from_origin_size((50.0, -500.0), (100.0, 100.0));
        let clamped = apply_bounds(rect, &bounds, CANVAS, MaxSize::NONE);
        assert_rect_eq(clamped, Rect::from_origin_size((100.0, -500.0), (100.0, 100.0)));

        let rect = Rect::from_origin_size((380.0, 250.0), (100.0, 100.0));
        let clamped = apply_bounds(rect, &bounds, CANVAS, MaxSize::NONE);
        assert_rect_eq(clamped, Rect::from_origin_size((300.0, 200.0), (100.0, 100.0)));
    }

    #[test]
    fn test_custom_right_wins_when_too_wide() {
        let bounds = Bounds::Custom(BoundsRect::from_rect(Rect::new(100.0, 0.0, 200.0, 540.0)));
        let rect = Rect::from_origin_size((150.0, 0.0), (300.0, 50.0));
        let clamped = apply_bounds(rect, &bounds, CANVAS, MaxSize::NONE);
        assert!((clamped.x0 - -100.0).abs() < 1e-9);
    }

    #[test]
    fn test_outside_canvas() {
        assert!(is_outside_canvas(Rect::from_origin_size((-100.0, 0.0), (100.0, 50.0)), CANVAS));
        assert!(is_outside_canvas(Rect::from_origin_size((960.0, 0.0), (100.0, 50.0)), CANVAS));
        assert!(is_outside_canvas(Rect::from_origin_size((0.0, 540.0), (100.0, 50.0)), CANVAS));
        assert!(is_outside_canvas(Rect::from_origin_size((0.0, -60.0), (100.0, 50.0)), CANVAS));
        assert!(!is_outside_canvas(Rect::from_origin_size((-99.0, 0.0), (100.0, 50.0)), CANVAS));
        assert!(!is_outside_canvas(Rect::from_origin_size((959.0, 539.0), (100.0, 50.0)), CANVAS));
    }
}
