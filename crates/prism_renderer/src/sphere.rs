//! Sphere primitive for ray tracing.

use crate::{
    hittable::{Hit, Hittable},
    Aabb, BuildError, BuildResult, Interval, Ray, Vec3,
};

/// A sphere primitive.
///
/// The radius is signed: the normal is `(p - center) / radius`, so a
/// negative radius yields inward-facing normals. Pairing a sphere with a
/// slightly smaller negative-radius sphere models a hollow glass shell.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> BuildResult<Self> {
        if !radius.is_finite() || radius == 0.0 || !center.is_finite() {
            return Err(BuildError::InvalidRadius(radius));
        }

        let rvec = Vec3::splat(radius.abs());
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Ok(Self {
            center,
            radius,
            bbox,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        if ray.is_degenerate() {
            return None;
        }

        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root first, then the far one, so an interval that starts
        // past the near wall still catches the far wall
        let mut root = (h - sqrtd) / a;
        if !interval.accepts(root) {
            root = (h + sqrtd) / a;
            if !interval.accepts(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let normal = (point - self.center) / self.radius;
        Some(Hit {
            t: root,
            point,
            normal,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
