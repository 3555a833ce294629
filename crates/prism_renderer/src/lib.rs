//! Prism - CPU Path Tracing
//!
//! A Monte Carlo path tracer: spheres, planes, triangles and meshes behind a
//! BVH, shaded with diffuse, mirror, glass and emissive materials, rendered
//! in parallel buckets.

mod background;
mod bucket;
mod bvh;
mod camera;
mod error;
mod geometry;
mod hittable;
mod material;
mod mesh;
mod plane;
mod random;
mod renderer;
mod scene;
mod sphere;
mod triangle;

pub use background::{Background, GradientBackground, SolidBackground};
pub use bucket::{generate_buckets, generate_columns, render_bucket, Bucket, BucketResult};
pub use bvh::Bvh;
pub use camera::{Camera, CameraSettings, MAX_IMAGE_DIMENSION};
pub use error::{BuildError, BuildResult};
pub use geometry::Geometry;
pub use hittable::{closest_hit_linear, Hit, Hittable};
pub use material::{refract, schlick, Color, Diffusive, Emissive, Material, Reflection, Reflective, Transparent};
pub use mesh::Mesh;
pub use plane::Plane;
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use renderer::{
    color_to_rgba, gamma_correct, linear_to_gamma, render, render_pixel, ImageBuffer, Partition, ProgressSink,
    RenderConfig,
};
pub use scene::{Object, Scene, Termination, Traced, DEFAULT_MAX_RAY_REFLECTIONS, DEFAULT_MIN_HIT_PARAM};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from prism_math
pub use prism_math::{Aabb, Interval, Ray, Vec3};
