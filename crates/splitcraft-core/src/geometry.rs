#![forbid(unsafe_code)]

//! Geometric primitives in normalized workspace coordinates.
//!
//! The workspace is the unit square `[0, 1] x [0, 1]` with the origin at the
//! top-left corner. Every coordinate is an `f64` fraction of the workspace, so
//! split midpoints such as `0.375` are exact halves of their parent pane.
//!
//! # Tolerance
//!
//! Edge coincidence is never tested with `==`. Two tolerances exist:
//!
//! - [`EPSILON`] via [`approx_eq`]: the gameplay tolerance. Coverage
//!   evaluation and the split-size guard use it.
//! - [`SNAP`] via [`coincides`]: pane-to-pane structure. Adjacency,
//!   absorption on delete and wraparound navigation use it. Pane edges are
//!   midpoints of midpoints of the unit square, so edges that should meet are
//!   bit-identical and edges a tiny split apart must stay distinct.

use serde::{Deserialize, Serialize};

/// Tolerance for boundary-coincidence comparisons.
pub const EPSILON: f64 = 0.001;

/// Tolerance for pane edge coincidence, far below any reachable pane width.
pub const SNAP: f64 = 1e-9;

/// Whether two pane edges coincide within [`SNAP`].
#[inline]
#[must_use]
pub fn coincides(a: f64, b: f64) -> bool {
    (a - b).abs() < SNAP
}

/// Whether two coordinates coincide within [`EPSILON`].
#[inline]
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Orientation of a boundary line or target segment.
///
/// A `Vertical` line sits at a constant `x`; a vertical split produces a new
/// vertical boundary at the pane's horizontal midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// The other orientation.
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// Cardinal direction used for navigation and for naming rectangle sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions in side order (left, right, top, bottom).
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Orientation of the boundary crossed when moving in this direction.
    #[must_use]
    pub const fn boundary_orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Vertical,
            Self::Up | Self::Down => Orientation::Horizontal,
        }
    }

    /// Coordinate of the unit-square boundary on this side (`0.0` or `1.0`).
    #[must_use]
    pub const fn unit_boundary(self) -> f64 {
        match self {
            Self::Left | Self::Up => 0.0,
            Self::Right | Self::Down => 1.0,
        }
    }
}

/// Closed interval `[start, end]` on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    #[inline]
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the interval (never negative).
    #[inline]
    #[must_use]
    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether the interval is shorter than [`EPSILON`].
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() < EPSILON
    }

    /// Length of the overlap with `other` (zero when disjoint).
    #[inline]
    #[must_use]
    pub fn overlap(&self, other: &Interval) -> f64 {
        (self.end.min(other.end) - self.start.max(other.start)).max(0.0)
    }

    /// Whether `other` lies within this interval, up to [`SNAP`].
    #[must_use]
    pub fn contains(&self, other: &Interval) -> bool {
        other.start >= self.start - SNAP && other.end <= self.end + SNAP
    }
}

/// Axis-aligned rectangle in normalized coordinates.
///
/// Invariant for panes: `x1 < x2` and `y1 < y2`, all within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
}

impl Rect {
    /// The whole workspace.
    pub const UNIT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Extent perpendicular to boundaries of `orientation`
    /// (width for vertical boundaries, height for horizontal ones).
    #[inline]
    #[must_use]
    pub fn extent_across(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Vertical => self.width(),
            Orientation::Horizontal => self.height(),
        }
    }

    /// Coordinate of the side facing `side`.
    #[inline]
    #[must_use]
    pub const fn edge(&self, side: Direction) -> f64 {
        match side {
            Direction::Left => self.x1,
            Direction::Right => self.x2,
            Direction::Up => self.y1,
            Direction::Down => self.y2,
        }
    }

    /// Move the side facing `side` to `value`.
    #[inline]
    pub fn set_edge(&mut self, side: Direction, value: f64) {
        match side {
            Direction::Left => self.x1 = value,
            Direction::Right => self.x2 = value,
            Direction::Up => self.y1 = value,
            Direction::Down => self.y2 = value,
        }
    }

    /// The two boundary coordinates of `orientation` (`(x1, x2)` for vertical).
    #[inline]
    #[must_use]
    pub const fn boundaries(&self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Vertical => (self.x1, self.x2),
            Orientation::Horizontal => (self.y1, self.y2),
        }
    }

    /// The span along boundaries of `orientation` (`[y1, y2]` for vertical).
    #[inline]
    #[must_use]
    pub const fn span_along(&self, orientation: Orientation) -> Interval {
        match orientation {
            Orientation::Vertical => Interval::new(self.y1, self.y2),
            Orientation::Horizontal => Interval::new(self.x1, self.x2),
        }
    }

    /// Length of the shared run between the `side` edge of `self` and the
    /// opposite edge of `other`, or `0.0` when the edges do not coincide.
    #[must_use]
    pub fn shared_edge(&self, side: Direction, other: &Rect) -> f64 {
        if !coincides(self.edge(side), other.edge(side.opposite())) {
            return 0.0;
        }
        let orientation = side.boundary_orientation();
        self.span_along(orientation)
            .overlap(&other.span_along(orientation))
    }

    /// Whether the `side` edge lies on the workspace boundary.
    #[inline]
    #[must_use]
    pub fn touches_unit_boundary(&self, side: Direction) -> bool {
        coincides(self.edge(side), side.unit_boundary())
    }

    /// Area of the intersection with `other`.
    #[must_use]
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        w * h
    }

    /// Split at the midpoint with a new boundary of `orientation`.
    ///
    /// Returns `(first, second)` where `first` is the left/top half.
    #[must_use]
    pub fn split(&self, orientation: Orientation) -> (Rect, Rect) {
        match orientation {
            Orientation::Vertical => {
                let mid = (self.x1 + self.x2) / 2.0;
                (
                    Rect::new(self.x1, self.y1, mid, self.y2),
                    Rect::new(mid, self.y1, self.x2, self.y2),
                )
            }
            Orientation::Horizontal => {
                let mid = (self.y1 + self.y2) / 2.0;
                (
                    Rect::new(self.x1, self.y1, self.x2, mid),
                    Rect::new(self.x1, mid, self.x2, self.y2),
                )
            }
        }
    }

    /// Whether all four edges coincide with `other` within tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Rect) -> bool {
        approx_eq(self.x1, other.x1)
            && approx_eq(self.y1, other.y1)
            && approx_eq(self.x2, other.x2)
            && approx_eq(self.y2, other.y2)
    }

    /// Whether the rectangle has positive extent and lies in the unit square.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.x1 < self.x2
            && self.y1 < self.y2
            && self.x1 > -EPSILON
            && self.y1 > -EPSILON
            && self.x2 < 1.0 + EPSILON
            && self.y2 < 1.0 + EPSILON
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::UNIT
    }
}

/// One horizontal or vertical piece of a target line.
///
/// A vertical segment at `position = p` covers `y in [start, end]` at `x = p`;
/// a horizontal segment is the transpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub orientation: Orientation,
    pub position: f64,
    pub start: f64,
    pub end: f64,
}

impl Segment {
    #[must_use]
    pub const fn new(orientation: Orientation, position: f64, start: f64, end: f64) -> Self {
        Self {
            orientation,
            position,
            start,
            end,
        }
    }

    #[must_use]
    pub const fn vertical(x: f64, y_start: f64, y_end: f64) -> Self {
        Self::new(Orientation::Vertical, x, y_start, y_end)
    }

    #[must_use]
    pub const fn horizontal(y: f64, x_start: f64, x_end: f64) -> Self {
        Self::new(Orientation::Horizontal, y, x_start, x_end)
    }

    /// The `[start, end]` span along the segment.
    #[inline]
    #[must_use]
    pub const fn span(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> f64 {
        self.span().len()
    }

    /// Endpoints as `((x, y), (x, y))` in workspace coordinates.
    #[must_use]
    pub const fn endpoints(&self) -> ((f64, f64), (f64, f64)) {
        match self.orientation {
            Orientation::Vertical => ((self.position, self.start), (self.position, self.end)),
            Orientation::Horizontal => ((self.start, self.position), (self.end, self.position)),
        }
    }
}
