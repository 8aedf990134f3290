/// Frustum: six clipping planes for visibility culling.
///
/// Each plane is a unit normal plus a constant:
/// - the normal points inward (toward the visible volume)
/// - a point P is inside the frustum if `dot(normal, P) + constant >= 0`
///   for all six planes
///
/// The caller owns the camera and hands the index a frustum; the index
/// only classifies cell envelopes against it.

use glam::{Mat4, Vec3, Vec4};
use super::aabb::Aabb;

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// A plane `dot(normal, p) + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Plane normal (inward for frustum planes)
    pub normal: Vec3,
    /// Signed offset from the origin along the normal
    pub constant: f32,
}

impl Plane {
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Build from (A, B, C, D), normalizing so (A, B, C) has unit length.
    fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self { normal: normal / len, constant: coefficients.w / len }
        } else {
            Self { normal, constant: coefficients.w }
        }
    }

    /// Signed distance from the plane to a point.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Box corner farthest along the normal (the "positive vertex").
    fn positive_vertex(&self, aabb: &Aabb) -> Vec3 {
        Vec3::new(
            if self.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
            if self.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
            if self.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
        )
    }
}

/// Six frustum planes for culling.
///
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        // Gribb & Hartmann: extract planes from rows of the VP matrix
        let coefficients = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        Self { planes: coefficients.map(Plane::from_coefficients) }
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// For each plane, take the AABB corner most in the direction of the
    /// plane normal. If that corner is outside, the whole box is outside.
    ///
    /// Conservative: may return false positives near frustum edges,
    /// never false negatives.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(plane.positive_vertex(aabb)) >= 0.0)
    }

    /// Test if a point is inside the frustum.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
