/// Axis-Aligned Bounding Box
///
/// Entities are indexed by their world-space AABB. 2D callers supply
/// z = 0 for both corners.

use glam::Vec3;

/// Axis-aligned bounding box defined by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners (no reordering is done).
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box covering a single point.
    pub fn from_point(point: Vec3) -> Self {
        Self { min: point, max: point }
    }

    /// Smallest box containing both points, whatever their order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// True if every coordinate is finite and `min <= max` on each axis.
    ///
    /// Insertion rejects boxes that fail this check.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside or on the boundary of this AABB.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
