//! Infinite plane primitive.

use crate::{
    hittable::{Hit, Hittable},
    Aabb, BuildError, BuildResult, Interval, Ray, Vec3,
};

/// Rays whose direction is this close to perpendicular to the normal count
/// as parallel to the plane.
const PARALLEL_TOLERANCE: f32 = 1e-6;

/// Normals closer than this to a coordinate axis get a tight bounding box.
const AXIS_TOLERANCE: f32 = 1e-6;

/// An unbounded plane through `origin` with unit `normal`.
///
/// The normal reported on a hit always opposes the incoming ray, so shading
/// is the same from either side.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Vec3,
    normal: Vec3,
    bbox: Aabb,
}

impl Plane {
    /// Create a plane. The normal is normalized; a zero normal is rejected.
    pub fn new(origin: Vec3, normal: Vec3) -> BuildResult<Self> {
        if !origin.is_finite() || !normal.is_finite() || normal.length_squared() == 0.0 {
            return Err(BuildError::InvalidNormal(normal.to_array()));
        }
        let normal = normal.normalize();

        Ok(Self {
            origin,
            normal,
            bbox: Self::compute_bbox(origin, normal),
        })
    }

    /// Axis-aligned planes are bounded along their normal axis; anything
    /// else covers all of space.
    fn compute_bbox(origin: Vec3, normal: Vec3) -> Aabb {
        let n = normal.abs().to_array();
        let o = origin.to_array();

        let mut axes = [Interval::UNIVERSE; 3];
        for axis in 0..3 {
            let others = (0..3).filter(|&i| i != axis).all(|i| n[i] <= AXIS_TOLERANCE);
            if others {
                axes[axis] = Interval::new(o[axis], o[axis]);
            }
        }

        Aabb::new(axes[0], axes[1], axes[2])
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Plane {
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        let denominator = ray.direction.dot(self.normal);
        // Also rejects zero-length and NaN directions
        if denominator.is_nan() || denominator.abs() <= PARALLEL_TOLERANCE {
            return None;
        }

        let t = (self.origin - ray.origin).dot(self.normal) / denominator;
        if !interval.accepts(t) {
            return None;
        }

        let normal = if denominator > 0.0 {
            -self.normal
        } else {
            self.normal
        };
        Some(Hit::new(ray, t, normal))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit_from_above() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y).unwrap();
        let ray = Ray::new(Vec3::new(1.0, 4.0, 2.0), Vec3::new(0.0, -2.0, 0.0));

        let hit = floor.test_ray(&ray, Interval::from_min(0.0)).unwrap();
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.point, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_plane_normal_opposes_ray() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y).unwrap();
        let ray = Ray::new(Vec3::new(0.0, -3.0, 0.0), Vec3::Y);

        let hit = floor.test_ray(&ray, Interval::from_min(0.0)).unwrap();
        assert_eq!(hit.t, 3.0);
        assert_eq!(hit.normal, Vec3::NEG_Y);
    }

    #[test]
    fn test_plane_parallel_and_behind() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y).unwrap();

        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(floor.test_ray(&parallel, Interval::from_min(0.0)).is_none());

        let away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(floor.test_ray(&away, Interval::from_min(0.0)).is_none());

        let zero = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
        assert!(floor.test_ray(&zero, Interval::from_min(0.0)).is_none());
    }

    #[test]
    fn test_plane_bounding_box() {
        let floor = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 3.0, 0.0)).unwrap();
        let bbox = floor.bounding_box();
        assert!(bbox.y.size() > 0.0 && bbox.y.size() < 0.001);
        assert!((bbox.y.min + 1.0).abs() < 0.001);
        assert_eq!(bbox.x, Interval::UNIVERSE);

        let tilted = Plane::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(tilted.bounding_box(), Aabb::UNIVERSE);
    }

    #[test]
    fn test_plane_rejects_zero_normal() {
        assert!(matches!(
            Plane::new(Vec3::ZERO, Vec3::ZERO),
            Err(BuildError::InvalidNormal(_))
        ));
    }
}
