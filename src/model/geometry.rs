//! Geometry primitives in stage and normalized space.

use serde::{Deserialize, Serialize};

use crate::constants::NORM_EPSILON;

/// A 2D point. Stage points are in image pixels, viewport points in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle in stage (image pixel) or viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p1.x - p2.x).abs();
        let height = (p1.y - p2.y).abs();
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle (edges included).
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether both sides are at least `min`.
    pub fn meets_min_size(&self, min: f32) -> bool {
        self.width >= min && self.height >= min
    }

    /// Overlapping region with positive area, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right - left > 0.0 && bottom - top > 0.0 {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Clamp into `[0, max_w] x [0, max_h]`, shrinking if needed.
    pub fn clamp_to(&self, max_w: f32, max_h: f32) -> Rect {
        let left = self.x.clamp(0.0, max_w);
        let top = self.y.clamp(0.0, max_h);
        let right = self.right().clamp(0.0, max_w);
        let bottom = self.bottom().clamp(0.0, max_h);
        Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }
}

/// A rectangle expressed as fractions of the image width and height.
///
/// Every constructor and mutator keeps `0 <= x`, `0 <= y`, `x + width <= 1`
/// and `y + height <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormRect {
    /// Build a rectangle, clamping it into the unit square.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
        .clamped()
    }

    /// Normalize a stage rectangle against the image size.
    pub fn from_stage(rect: &Rect, image_w: f32, image_h: f32) -> Self {
        let w = image_w.max(1.0);
        let h = image_h.max(1.0);
        Self::new(rect.x / w, rect.y / h, rect.width / w, rect.height / h)
    }

    /// Project into stage pixels for an image of the given size.
    pub fn to_stage(&self, image_w: f32, image_h: f32) -> Rect {
        Rect::new(
            self.x * image_w,
            self.y * image_h,
            self.width * image_w,
            self.height * image_h,
        )
    }

    /// Clamp size into `[0, 1]` then position so the rect stays inside.
    pub fn clamped(self) -> Self {
        let width = finite_or_zero(self.width).clamp(0.0, 1.0);
        let height = finite_or_zero(self.height).clamp(0.0, 1.0);
        let x = finite_or_zero(self.x).clamp(0.0, 1.0 - width);
        let y = finite_or_zero(self.y).clamp(0.0, 1.0 - height);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Component-wise comparison within [`NORM_EPSILON`].
    pub fn approx_eq(&self, other: &NormRect) -> bool {
        (self.x - other.x).abs() <= NORM_EPSILON
            && (self.y - other.y).abs() <= NORM_EPSILON
            && (self.width - other.width).abs() <= NORM_EPSILON
            && (self.height - other.height).abs() <= NORM_EPSILON
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
