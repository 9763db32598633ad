// =============================================================================
// GEOMETRY.RS: Axis-aligned rectangles for world-space collision
//
// Everything the screen needs from geometry fits in one type:
// - Bounding boxes for the player sprite
// - Object rectangles from the map's object layers
// - Tile quads and the camera's visible area
//
// World space is y-up: (x, y) is the bottom-left corner.
// =============================================================================

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from an origin and a size vector.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Return a copy with every component multiplied by `factor`.
    /// Used to convert map pixels into world units.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.width * factor, self.height * factor)
    }

    /// Strict intersection test: the rectangles must share a region of
    /// non-zero area. Rectangles that only touch along an edge or corner do
    /// not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }
}
