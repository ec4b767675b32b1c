//! Axis-aligned rectangle geometry
//!
//! Screen coordinates: x grows to the right, y grows downward, so `top()`
//! is the smaller y value.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect from a top-left position and a size
    #[inline]
    pub fn from_pos_size(pos: DVec2, size: DVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict AABB overlap. Rects that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// True if both dimensions are positive and every field is finite
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite()) && self.w > 0.0 && self.h > 0.0
    }
}
