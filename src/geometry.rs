//! # Canvas Geometry
//!
//! Pointer-driven move and resize of element rectangles.
//!
//! All rectangles live in percentage-of-canvas coordinates: `x` and `width`
//! are percentages of the canvas width, `y` and `height` of its height. The
//! canvas itself is resolution independent; pixel pointer positions are
//! converted with [`CanvasSize::to_percent`] before they reach this module.
//!
//! ## Invariants
//!
//! Every rectangle produced here satisfies:
//!
//! ```text
//! 0 <= x,  0 <= y,  x + width <= 100,  y + height <= 100
//! width >= min.width,  height >= min.height
//! ```
//!
//! provided the input rectangle already did. Nothing in this module returns
//! an error: out-of-range pointer positions are clamped.
//!
//! ## Resize handles
//!
//! ```text
//!   nw ──── n ──── ne
//!   │              │
//!   w              e
//!   │              │
//!   sw ──── s ──── se
//! ```
//!
//! West/north handles keep the opposite edge (right/bottom) fixed. Growth past
//! a canvas edge truncates the size instead of moving the anchor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LabsheetError;

/// Tolerance for bound checks on accumulated floating-point results.
pub const EPSILON: f64 = 1e-9;

/// Width / height of the letter-size page (8.5in × 11in).
pub const PAGE_ASPECT: f64 = 8.5 / 11.0;

/// Rectangle in percentage-of-canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True if the point (in percent) lies inside the rectangle.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Validate the canvas invariants.
    ///
    /// Returns [`LabsheetError::OutOfBoundsGeometry`] describing the first
    /// violated bound.
    pub fn check(&self, min: MinSize) -> Result<(), LabsheetError> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LabsheetError::OutOfBoundsGeometry(format!(
                "non-finite rectangle {:?}",
                self
            )));
        }
        if self.x < -EPSILON || self.y < -EPSILON {
            return Err(LabsheetError::OutOfBoundsGeometry(format!(
                "origin ({}, {}) is outside the canvas",
                self.x, self.y
            )));
        }
        if self.right() > 100.0 + EPSILON || self.bottom() > 100.0 + EPSILON {
            return Err(LabsheetError::OutOfBoundsGeometry(format!(
                "far edge ({}, {}) exceeds the canvas",
                self.right(),
                self.bottom()
            )));
        }
        if self.width < min.width - EPSILON || self.height < min.height - EPSILON {
            return Err(LabsheetError::OutOfBoundsGeometry(format!(
                "size {}x{} is below the minimum {}x{}",
                self.width, self.height, min.width, min.height
            )));
        }
        Ok(())
    }
}

/// Minimum element size in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinSize {
    pub width: f64,
    pub height: f64,
}

impl Default for MinSize {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 5.0,
        }
    }
}

/// A point, either in canvas pixels or in percent depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel size of the on-screen canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Aspect-locked letter page of the given pixel width.
    pub fn letter(width: f64) -> Self {
        Self {
            width,
            height: width * 11.0 / 8.5,
        }
    }

    /// Convert a canvas-relative pixel position to percentages.
    ///
    /// A degenerate canvas (zero or negative extent) maps everything to 0.
    pub fn to_percent(&self, px: Point) -> Point {
        let x = if self.width > 0.0 {
            px.x / self.width * 100.0
        } else {
            0.0
        };
        let y = if self.height > 0.0 {
            px.y / self.height * 100.0
        } else {
            0.0
        };
        Point { x, y }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::letter(850.0)
    }
}

// ============================================================================
// RESIZE HANDLES
// ============================================================================

/// One of the eight resize handles on a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::NE => "ne",
            ResizeHandle::NW => "nw",
            ResizeHandle::SE => "se",
            ResizeHandle::SW => "sw",
        }
    }

    fn horizontal(&self) -> Edge {
        match self {
            ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE => Edge::Far,
            ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW => Edge::Near,
            ResizeHandle::N | ResizeHandle::S => Edge::Fixed,
        }
    }

    fn vertical(&self) -> Edge {
        match self {
            ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW => Edge::Far,
            ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW => Edge::Near,
            ResizeHandle::E | ResizeHandle::W => Edge::Fixed,
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resize handle '{}'", s))
    }
}

/// Which edge of one axis follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Left or top edge moves, right or bottom edge is the anchor.
    Near,
    /// Right or bottom edge moves, left or top edge is the anchor.
    Far,
    /// Axis untouched.
    Fixed,
}

// ============================================================================
// MOVE / RESIZE
// ============================================================================

/// Pointer position relative to the rectangle's top-left corner, captured at
/// drag start. Both in percent.
pub fn grab_offset(rect: &Rect, pointer: Point) -> Point {
    Point {
        x: pointer.x - rect.x,
        y: pointer.y - rect.y,
    }
}

/// Move a rectangle so that `offset` stays under the pointer.
///
/// Size is unchanged; the origin is clamped into `[0, 100 - size]`.
pub fn move_rect(rect: &Rect, pointer: Point, offset: Point) -> Rect {
    Rect {
        x: clamp_origin(pointer.x - offset.x, rect.width),
        y: clamp_origin(pointer.y - offset.y, rect.height),
        ..*rect
    }
}

/// Resize a rectangle by dragging `handle` to `pointer` (percent).
pub fn resize_rect(rect: &Rect, handle: ResizeHandle, pointer: Point, min: MinSize) -> Rect {
    let (x, width) = resize_span(rect.x, rect.width, pointer.x, min.width, handle.horizontal());
    let (y, height) = resize_span(rect.y, rect.height, pointer.y, min.height, handle.vertical());
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn clamp_origin(candidate: f64, extent: f64) -> f64 {
    candidate.min(100.0 - extent).max(0.0)
}

/// Recompute `(start, extent)` on one axis.
fn resize_span(start: f64, extent: f64, pointer: f64, min: f64, edge: Edge) -> (f64, f64) {
    match edge {
        Edge::Fixed => (start, extent),
        Edge::Far => {
            let extent = (pointer - start).max(min).min(100.0 - start);
            (start, extent)
        }
        Edge::Near => {
            let end = start + extent;
            let extent = (end - pointer).max(min).min(end);
            (end - extent, extent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min() -> MinSize {
        MinSize::default()
    }

    #[test]
    fn test_move_keeps_offset_under_pointer() {
        let rect = Rect::new(10.0, 10.0, 50.0, 10.0);
        let offset = grab_offset(&rect, Point::new(15.0, 12.0));
        let moved = move_rect(&rect, Point::new(25.0, 32.0), offset);
        assert_eq!(moved, Rect::new(20.0, 30.0, 50.0, 10.0));
    }

    #[test]
    fn test_move_clamps_to_canvas() {
        let rect = Rect::new(10.0, 10.0, 50.0, 10.0);
        let offset = Point::new(0.0, 0.0);
        let moved = move_rect(&rect, Point::new(90.0, 99.0), offset);
        assert_eq!(moved.x, 50.0);
        assert_eq!(moved.y, 90.0);

        let moved = move_rect(&rect, Point::new(-40.0, -3.0), offset);
        assert_eq!(moved.x, 0.0);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn test_resize_se_truncates_at_right_edge() {
        let rect = Rect::new(30.0, 10.0, 50.0, 10.0);
        let resized = resize_rect(&rect, ResizeHandle::SE, Point::new(140.0, 30.0), min());
        assert_eq!(resized.x, 30.0);
        assert_eq!(resized.x + resized.width, 100.0);
        assert_eq!(resized.height, 20.0);
    }

    #[test]
    fn test_resize_floors_at_minimum() {
        let rect = Rect::new(30.0, 30.0, 40.0, 20.0);
        let resized = resize_rect(&rect, ResizeHandle::SE, Point::new(0.0, 0.0), min());
        assert_eq!(resized.width, 10.0);
        assert_eq!(resized.height, 5.0);
        assert_eq!((resized.x, resized.y), (30.0, 30.0));
    }

    #[test]
    fn test_resize_west_anchors_right_edge() {
        let rect = Rect::new(30.0, 10.0, 40.0, 10.0);
        let grown = resize_rect(&rect, ResizeHandle::W, Point::new(20.0, 50.0), min());
        assert_eq!(grown, Rect::new(20.0, 10.0, 50.0, 10.0));

        // Shrinking past the minimum stops at the floor, right edge unchanged.
        let shrunk = resize_rect(&rect, ResizeHandle::W, Point::new(95.0, 50.0), min());
        assert_eq!(shrunk.width, 10.0);
        assert_eq!(shrunk.right(), 70.0);

        // Growing past the left canvas edge truncates instead of moving the anchor.
        let clipped = resize_rect(&rect, ResizeHandle::W, Point::new(-25.0, 50.0), min());
        assert_eq!(clipped, Rect::new(0.0, 10.0, 70.0, 10.0));
    }

    #[test]
    fn test_resize_north_anchors_bottom_edge() {
        let rect = Rect::new(0.0, 40.0, 50.0, 20.0);
        let resized = resize_rect(&rect, ResizeHandle::N, Point::new(80.0, 30.0), min());
        assert_eq!(resized, Rect::new(0.0, 30.0, 50.0, 30.0));
    }

    #[test]
    fn test_edge_handles_touch_one_axis() {
        let rect = Rect::new(20.0, 20.0, 30.0, 30.0);
        let e = resize_rect(&rect, ResizeHandle::E, Point::new(70.0, 90.0), min());
        assert_eq!((e.y, e.height), (20.0, 30.0));
        assert_eq!(e.width, 50.0);

        let s = resize_rect(&rect, ResizeHandle::S, Point::new(90.0, 70.0), min());
        assert_eq!((s.x, s.width), (20.0, 30.0));
        assert_eq!(s.height, 50.0);
    }

    #[test]
    fn test_nw_corner_combines_axes() {
        let rect = Rect::new(40.0, 40.0, 20.0, 20.0);
        let resized = resize_rect(&rect, ResizeHandle::NW, Point::new(30.0, 35.0), min());
        assert_eq!(resized, Rect::new(30.0, 35.0, 30.0, 25.0));
    }

    #[test]
    fn test_invariants_over_pointer_sweep() {
        let start = Rect::new(10.0, 10.0, 50.0, 10.0);
        let coords = [-50.0, -1.0, 0.0, 3.5, 10.0, 33.3, 50.0, 89.9, 100.0, 101.0, 250.0];
        for handle in ResizeHandle::ALL {
            let mut rect = start;
            for &px in &coords {
                for &py in &coords {
                    rect = resize_rect(&rect, handle, Point::new(px, py), min());
                    rect.check(min()).unwrap_or_else(|e| {
                        panic!("{} at ({}, {}): {}", handle, px, py, e)
                    });
                }
            }
        }
    }

    #[test]
    fn test_handle_parse_roundtrip() {
        for handle in ResizeHandle::ALL {
            assert_eq!(handle.as_str().parse::<ResizeHandle>().unwrap(), handle);
        }
        assert!("middle".parse::<ResizeHandle>().is_err());
    }

    #[test]
    fn test_check_reports_violations() {
        assert!(Rect::new(0.0, 0.0, 100.0, 100.0).check(min()).is_ok());
        assert!(Rect::new(-1.0, 0.0, 20.0, 20.0).check(min()).is_err());
        assert!(Rect::new(95.0, 0.0, 10.0, 20.0).check(min()).is_err());
        assert!(Rect::new(0.0, 0.0, 9.0, 20.0).check(min()).is_err());
        assert!(Rect::new(0.0, 0.0, f64::NAN, 20.0).check(min()).is_err());
    }

    #[test]
    fn test_letter_canvas_to_percent() {
        let canvas = CanvasSize::letter(850.0);
        assert_eq!(canvas.height, 1100.0);
        let p = canvas.to_percent(Point::new(425.0, 110.0));
        assert_eq!(p, Point::new(50.0, 10.0));
        assert_eq!(CanvasSize::new(0.0, 0.0).to_percent(p), Point::new(0.0, 0.0));
    }
}
