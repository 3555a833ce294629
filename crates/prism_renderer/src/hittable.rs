//! Hittable trait and Hit record for ray-object intersection.

use crate::{Aabb, Interval, Ray, Vec3};

/// Relative slack used when re-resolving a surface at a known parameter.
const EVALUATE_SLACK: f32 = 1e-4;

/// Record of a ray-surface intersection.
///
/// Produced fresh by every query and never stored. The meaning of `normal`
/// is defined by the primitive that produced it (see each geometry type).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection (unit length)
    pub normal: Vec3,
}

impl Hit {
    /// Create a hit at parameter `t` along `ray`.
    #[inline]
    pub fn new(ray: &Ray, t: f32, normal: Vec3) -> Self {
        Self {
            t,
            point: ray.at(t),
            normal,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object with a parameter the interval accepts.
    ///
    /// Returns the nearest such hit.
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Resolve the surface point and normal at a parameter `t` already known
    /// to lie on this object.
    fn evaluate_hit(&self, ray: &Ray, t: f32) -> Option<(Vec3, Vec3)> {
        let slack = EVALUATE_SLACK * t.abs().max(1.0);
        self.test_ray(ray, Interval::new(t - slack, t + slack))
            .map(|hit| (hit.point, hit.normal))
    }
}

/// Nearest hit over a slice by linear scan.
///
/// Used as the reference the BVH must agree with.
pub fn closest_hit_linear<'a, T: Hittable>(
    items: &'a [T],
    ray: &Ray,
    interval: Interval,
) -> Option<(&'a T, Hit)> {
    let mut closest: Option<(&T, Hit)> = None;

    for item in items {
        let window = match &closest {
            Some((_, hit)) => interval.with_max(hit.t),
            None => interval,
        };
        if let Some(hit) = item.test_ray(ray, window) {
            closest = Some((item, hit));
        }
    }

    closest
}
