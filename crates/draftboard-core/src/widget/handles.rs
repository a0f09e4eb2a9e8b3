//! Resize handle definitions.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The eight resize handles around a widget box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    /// All handles, clockwise from the top-left corner.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomRight | Self::BottomLeft
        )
    }

    pub fn is_edge(&self) -> bool {
        !self.is_corner()
    }

    pub fn touches_top(&self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    pub fn touches_bottom(&self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }

    pub fn touches_left(&self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    pub fn touches_right(&self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    /// Handles that move the widget origin when dragged.
    pub fn is_top_left_oriented(&self) -> bool {
        self.touches_top() || self.touches_left()
    }

    /// Grab point of this handle on `rect`.
    pub fn position_on(&self, rect: Rect) -> Point {
        let center = rect.center();
        let x = if self.touches_left() {
            rect.x0
        } else if self.touches_right() {
            rect.x1
        } else {
            center.x
        };
        let y = if self.touches_top() {
            rect.y0
        } else if self.touches_bottom() {
            rect.y1
        } else {
            center.y
        };
        Point::new(x, y)
    }
}

/// A set of resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ResizeHandle>", into = "Vec<ResizeHandle>")]
pub struct HandleSet(u8);

impl HandleSet {
    pub const EMPTY: HandleSet = HandleSet(0);
    pub const ALL: HandleSet = HandleSet(u8::MAX);
    pub const CORNERS: HandleSet = HandleSet::EMPTY
        .with(ResizeHandle::TopLeft)
        .with(ResizeHandle::TopRight)
        .with(ResizeHandle::BottomRight)
        .with(ResizeHandle::BottomLeft);
    pub const EDGES: HandleSet = HandleSet(!HandleSet::CORNERS.0);
    /// Left and right edges only.
    pub const HORIZONTAL: HandleSet = HandleSet::EMPTY
        .with(ResizeHandle::Left)
        .with(ResizeHandle::Right);

    pub const fn with(self, handle: ResizeHandle) -> Self {
        Self(self.0 | handle.bit())
    }

    pub fn contains(&self, handle: ResizeHandle) -> bool {
        self.0 & handle.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Handles in the set, in [`ResizeHandle::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = ResizeHandle> + '_ {
        ResizeHandle::ALL.into_iter().filter(|h| self.contains(*h))
    }
}

impl Default for HandleSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<ResizeHandle> for HandleSet {
    fn from_iter<I: IntoIterator<Item = ResizeHandle>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, HandleSet::with)
    }
}

impl From<Vec<ResizeHandle>> for HandleSet {
    fn from(handles: Vec<ResizeHandle>) -> Self {
        handles.into_iter().collect()
    }
}

impl From<HandleSet> for Vec<ResizeHandle> {
    fn from(set: HandleSet) -> Self {
        set.iter().collect()
    }
}

/// A resize handle placed on a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: ResizeHandle,
    /// Position in canvas coordinates.
    pub position: Point,
}

impl Handle {
    pub fn new(kind: ResizeHandle, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a point is within `tolerance` of this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Handles of the set placed on `rect`.
pub fn handle_positions(rect: Rect, active: HandleSet) -> Vec<Handle> {
    active
        .iter()
        .map(|kind| Handle::new(kind, kind.position_on(rect)))
        .collect()
}

/// First active handle within `tolerance` of `point`.
pub fn hit_test_handles(
    rect: Rect,
    active: HandleSet,
    point: Point,
    tolerance: f64,
) -> Option<ResizeHandle> {
    handle_positions(rect, active)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}
