//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection and
//! Gouraud-interpolated vertex normals, which lets a mesh of flat triangles
//! shade like a smooth surface.

use crate::{
    hittable::{Hit, Hittable},
    Aabb, BuildError, BuildResult, Interval, Ray, Vec3,
};

/// Determinant magnitude below which the ray is parallel to the triangle.
const PARALLEL_TOLERANCE: f32 = 1e-8;

/// Squared cross-product length below which a triangle has no area.
const AREA_TOLERANCE: f32 = 1e-12;

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Per-vertex unit normals
    normals: [Vec3; 3],
    /// Unit face normal (right-handed winding v0 -> v1 -> v2)
    face_normal: Vec3,
    bbox: Aabb,
}

impl Triangle {
    /// Create a flat-shaded triangle; every vertex uses the face normal.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> BuildResult<Self> {
        let face_normal = Self::face_normal_of(v0, v1, v2)?;
        Ok(Self::build(v0, v1, v2, [face_normal; 3], face_normal))
    }

    /// Create a smooth-shaded triangle with one normal per vertex.
    pub fn with_normals(v0: Vec3, v1: Vec3, v2: Vec3, normals: [Vec3; 3]) -> BuildResult<Self> {
        let face_normal = Self::face_normal_of(v0, v1, v2)?;

        let mut unit = [Vec3::ZERO; 3];
        for (slot, n) in unit.iter_mut().zip(normals) {
            *slot = n
                .try_normalize()
                .ok_or(BuildError::InvalidNormal(n.to_array()))?;
        }

        Ok(Self::build(v0, v1, v2, unit, face_normal))
    }

    fn face_normal_of(v0: Vec3, v1: Vec3, v2: Vec3) -> BuildResult<Vec3> {
        let cross = (v1 - v0).cross(v2 - v0);
        if !cross.is_finite() || cross.length_squared() < AREA_TOLERANCE {
            return Err(BuildError::DegenerateTriangle);
        }
        Ok(cross.normalize())
    }

    fn build(v0: Vec3, v1: Vec3, v2: Vec3, normals: [Vec3; 3], face_normal: Vec3) -> Self {
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        Self {
            v0,
            v1,
            v2,
            normals,
            face_normal,
            bbox: Aabb::from_points(min, max),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn face_normal(&self) -> Vec3 {
        self.face_normal
    }

    /// Normal interpolated with barycentric weights (u, v).
    fn shading_normal(&self, u: f32, v: f32) -> Vec3 {
        let w = 1.0 - u - v;
        (w * self.normals[0] + u * self.normals[1] + v * self.normals[2])
            .try_normalize()
            .unwrap_or(self.face_normal)
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        if ray.is_degenerate() {
            return None;
        }

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < PARALLEL_TOLERANCE {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !interval.accepts(t) {
            return None;
        }

        Some(Hit::new(ray, t, self.shading_normal(u, v)))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_triangle() -> Triangle {
        // Triangle in XY plane at z=-1, facing +Z
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = tri.test_ray(&ray, Interval::from_min(0.001)).unwrap();
        assert!((hit.t - 1.0).abs() < 0.001);
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle();

        // Ray pointing away
        let away = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.test_ray(&away, Interval::from_min(0.001)).is_none());

        // Ray passing outside the edges
        let outside = Ray::new(Vec3::new(2.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.test_ray(&outside, Interval::from_min(0.001)).is_none());

        // Ray in the triangle's plane
        let grazing = Ray::new(Vec3::new(-5.0, 0.0, -1.0), Vec3::X);
        assert!(tri.test_ray(&grazing, Interval::from_min(0.001)).is_none());
    }

    #[test]
    fn test_triangle_interpolated_normal() {
        let tri = Triangle::with_normals(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            [Vec3::Z, Vec3::new(1.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 1.0)],
        )
        .unwrap();

        // At vertex v0 the normal is exactly n0
        let at_v0 = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let hit = tri.test_ray(&at_v0, Interval::from_min(0.0)).unwrap();
        assert!((hit.normal - Vec3::Z).length() < 1e-6);

        // Halfway along the v0-v1 edge the normal blends n0 and n1
        let mid = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z);
        let hit = tri.test_ray(&mid, Interval::from_min(0.0)).unwrap();
        let expected = (0.5 * Vec3::Z + 0.5 * Vec3::new(1.0, 0.0, 1.0).normalize()).normalize();
        assert!((hit.normal - expected).length() < 1e-5);
        assert!((hit.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_interval() {
        let tri = xy_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(tri.test_ray(&ray, Interval::new(0.0, 0.5)).is_none());
        assert!(tri.test_ray(&ray, Interval::new(0.0, 1.5)).is_some());
    }

    #[test]
    fn test_triangle_degenerate() {
        let collinear = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0));
        assert!(matches!(collinear, Err(BuildError::DegenerateTriangle)));

        let zero_normal = Triangle::with_normals(Vec3::ZERO, Vec3::X, Vec3::Y, [Vec3::Z, Vec3::ZERO, Vec3::Z]);
        assert!(matches!(zero_normal, Err(BuildError::InvalidNormal(_))));

        let tri = xy_triangle();
        let zero = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(tri.test_ray(&zero, Interval::from_min(0.0)).is_none());
    }
}
