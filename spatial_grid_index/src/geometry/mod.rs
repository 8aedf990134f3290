//! Geometry collaborators
//!
//! Minimal AABB, screen rectangle and frustum types the grid index queries
//! against. Only the predicates the index needs are provided; this is not
//! a general geometry kernel.

mod aabb;
mod frustum;
mod rect;

pub use aabb::{Aabb, distance};
pub use frustum::{
    Frustum, Plane,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use rect::Rect;

/// A query volume that can be tested against an axis-aligned box.
///
/// The index scans cell envelopes with this predicate, so the same scan
/// serves box queries and frustum culling.
pub trait CullVolume: Sync {
    /// Returns true if `aabb` overlaps (or touches) the volume.
    fn intersects_aabb(&self, aabb: &Aabb) -> bool;
}

impl CullVolume for Aabb {
    fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.intersects(aabb)
    }
}

impl CullVolume for Frustum {
    fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        Frustum::intersects_aabb(self, aabb)
    }
}
