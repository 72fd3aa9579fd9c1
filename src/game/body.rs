use bevy::prelude::*;

/// Axis-aligned rectangle in screen pixels (y grows downward).
///
/// Used both for drawing bounds and for hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner.
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center_y(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// True when the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Body) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}
