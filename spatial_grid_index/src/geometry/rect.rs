/// Screen-space rectangle used for drag selection.

use glam::{Vec2, Vec3};
use super::aabb::Aabb;

/// A 2D rectangle defined by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner (x, y)
    pub min: Vec2,
    /// Maximum corner (x, y)
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing both points, whatever their order.
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Thin box spanning z in [0, 1] over this rectangle.
    ///
    /// Screen-space entities are indexed with z = 0, so this box picks up
    /// every cell in the first z layer under the rectangle.
    pub fn to_selection_aabb(&self) -> Aabb {
        Aabb::from_points(
            Vec3::new(self.min.x, self.min.y, 0.0),
            Vec3::new(self.max.x, self.max.y, 1.0),
        )
    }
}
