//! Scene description and the recursive path-tracing integrator.

use std::collections::BTreeMap;

use crate::{
    background::Background,
    bvh::Bvh,
    hittable::{Hit, Hittable},
    material::{Material, Reflection},
    random::RandomSource,
    Aabb, BuildError, BuildResult, Color, Geometry, Interval, Ray,
};

/// Default bias epsilon; keeps bounced rays from re-hitting their origin surface.
pub const DEFAULT_MIN_HIT_PARAM: f32 = 1e-4;

/// Default bounce budget.
pub const DEFAULT_MAX_RAY_REFLECTIONS: u32 = 10;

/// One geometry paired with the material it is shaded with.
pub struct Object {
    pub geometry: Geometry,
    pub material: Material,
}

impl Object {
    pub fn new(geometry: impl Into<Geometry>, material: Material) -> Self {
        Self {
            geometry: geometry.into(),
            material,
        }
    }
}

impl Hittable for Object {
    #[inline]
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        self.geometry.test_ray(ray, interval)
    }

    fn bounding_box(&self) -> Aabb {
        self.geometry.bounding_box()
    }
}

/// How a traced path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Left the scene; colored by the background.
    EscapedToBackground,
    /// Swallowed by a material, or the ray was degenerate.
    Absorbed,
    /// Still bouncing when the reflection budget ran out.
    DepthExceeded,
    /// Reached a light source.
    Emitted,
}

/// Result of tracing one camera ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traced {
    pub color: Color,
    pub termination: Termination,
    /// Number of scattering events along the path.
    pub bounces: u32,
}

/// A renderable scene: objects in a BVH, a background and the tracing
/// tunables. Immutable once built and shared read-only between render
/// threads.
pub struct Scene {
    objects: Bvh<Object>,
    background: Box<dyn Background>,
    min_hit_param: f32,
    max_ray_reflections: u32,
}

impl Scene {
    /// Build a scene, taking ownership of the objects.
    pub fn new(
        objects: Vec<Object>,
        background: impl Background + 'static,
        rng: &mut dyn RandomSource,
    ) -> BuildResult<Self> {
        let count = objects.len();
        let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
        for object in &objects {
            *kinds.entry(object.geometry.kind()).or_default() += 1;
        }
        let objects = Bvh::build(objects, rng)?;

        log::info!(
            "Built scene: {} objects ({}), BVH depth {}",
            count,
            describe_kinds(&kinds),
            objects.depth()
        );

        Ok(Self {
            objects,
            background: Box::new(background),
            min_hit_param: DEFAULT_MIN_HIT_PARAM,
            max_ray_reflections: DEFAULT_MAX_RAY_REFLECTIONS,
        })
    }

    /// Set the minimum accepted hit parameter (bias epsilon).
    pub fn with_min_hit_param(mut self, min_hit_param: f32) -> BuildResult<Self> {
        if !min_hit_param.is_finite() || min_hit_param < 0.0 {
            return Err(BuildError::InvalidHitBias(min_hit_param));
        }
        self.min_hit_param = min_hit_param;
        Ok(self)
    }

    /// Set the bounce budget. Zero means every hit surface renders black.
    pub fn with_max_ray_reflections(mut self, max_ray_reflections: u32) -> Self {
        self.max_ray_reflections = max_ray_reflections;
        self
    }

    pub fn min_hit_param(&self) -> f32 {
        self.min_hit_param
    }

    pub fn max_ray_reflections(&self) -> u32 {
        self.max_ray_reflections
    }

    /// Number of top-level objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Nearest object hit by `ray` beyond the bias epsilon.
    pub fn closest_hit(&self, ray: &Ray) -> Option<(&Object, Hit)> {
        self.objects
            .closest_hit(ray, Interval::from_min(self.min_hit_param))
    }

    /// Compute the color seen along a ray.
    pub fn trace(&self, ray: &Ray, rng: &mut dyn RandomSource) -> Color {
        self.trace_path(ray, rng).color
    }

    /// Trace a ray and report how its path ended.
    pub fn trace_path(&self, ray: &Ray, rng: &mut dyn RandomSource) -> Traced {
        self.trace_from(ray, 0, rng)
    }

    fn trace_from(&self, ray: &Ray, depth: u32, rng: &mut dyn RandomSource) -> Traced {
        let terminal = |color, termination| Traced {
            color,
            termination,
            bounces: depth,
        };

        // Zero or NaN directions would poison the background lookup
        if ray.is_degenerate() {
            return terminal(Color::ZERO, Termination::Absorbed);
        }

        let Some((object, hit)) = self.closest_hit(ray) else {
            return terminal(self.background.color_ray(ray), Termination::EscapedToBackground);
        };

        if depth >= self.max_ray_reflections {
            return terminal(Color::ZERO, Termination::DepthExceeded);
        }

        match object
            .material
            .reflect(ray.direction, hit.point, hit.normal, rng)
        {
            Reflection::Emitted(color) => terminal(color, Termination::Emitted),
            Reflection::Absorbed => terminal(Color::ZERO, Termination::Absorbed),
            Reflection::Scattered { ray, attenuation } => {
                let mut traced = self.trace_from(&ray, depth + 1, rng);
                traced.color *= attenuation;
                traced
            }
        }
    }
}

/// "plane: 1, sphere: 4" style summary for build logs.
fn describe_kinds(kinds: &BTreeMap<&'static str, usize>) -> String {
    kinds
        .iter()
        .map(|(kind, n)| format!("{}: {}", kind, n))
        .collect::<Vec<_>>()
        .join(", ")
}
