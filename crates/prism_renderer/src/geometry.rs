//! Closed set of scene geometry.

use crate::{
    hittable::{Hit, Hittable},
    Aabb, Interval, Mesh, Plane, Ray, Sphere, Triangle,
};

/// Any primitive that can be placed in a scene.
pub enum Geometry {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Mesh(Mesh),
}

impl Geometry {
    /// Short kind name, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Sphere(_) => "sphere",
            Geometry::Plane(_) => "plane",
            Geometry::Triangle(_) => "triangle",
            Geometry::Mesh(_) => "mesh",
        }
    }
}

impl Hittable for Geometry {
    #[inline]
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        match self {
            Geometry::Sphere(sphere) => sphere.test_ray(ray, interval),
            Geometry::Plane(plane) => plane.test_ray(ray, interval),
            Geometry::Triangle(triangle) => triangle.test_ray(ray, interval),
            Geometry::Mesh(mesh) => mesh.test_ray(ray, interval),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Geometry::Sphere(sphere) => sphere.bounding_box(),
            Geometry::Plane(plane) => plane.bounding_box(),
            Geometry::Triangle(triangle) => triangle.bounding_box(),
            Geometry::Mesh(mesh) => mesh.bounding_box(),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(sphere: Sphere) -> Self {
        Geometry::Sphere(sphere)
    }
}

impl From<Plane> for Geometry {
    fn from(plane: Plane) -> Self {
        Geometry::Plane(plane)
    }
}

impl From<Triangle> for Geometry {
    fn from(triangle: Triangle) -> Self {
        Geometry::Triangle(triangle)
    }
}

impl From<Mesh> for Geometry {
    fn from(mesh: Mesh) -> Self {
        Geometry::Mesh(mesh)
    }
}
