//! Surface materials.
//!
//! A material decides what happens to a ray arriving at a surface: it
//! scatters into a new ray, terminates with emitted light, or is absorbed.

use crate::{random::RandomSource, BuildError, BuildResult, Ray, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Squared length below which a diffuse bounce direction is degenerate.
const DEGENERATE_DIRECTION: f32 = 1e-8;

/// Outcome of a ray meeting a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reflection {
    /// The ray continues as `ray`, tinted by `attenuation`.
    Scattered { ray: Ray, attenuation: Color },
    /// The surface is a light source; tracing stops with this color.
    Emitted(Color),
    /// The ray is swallowed.
    Absorbed,
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Diffusive {
    color: Color,
}

impl Diffusive {
    pub fn new(color: Color) -> BuildResult<Self> {
        Ok(Self {
            color: validate_color(color)?,
        })
    }

    fn reflect(&self, point: Vec3, normal: Vec3, rng: &mut dyn RandomSource) -> Reflection {
        let mut direction = normal + rng.vector_in_unit_sphere();

        // Catch degenerate scatter direction
        if direction.length_squared() < DEGENERATE_DIRECTION {
            direction = normal;
        }

        Reflection::Scattered {
            ray: Ray::new(point, direction),
            attenuation: self.color,
        }
    }
}

/// Specular material with optional fuzz.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflective {
    color: Color,
    fuzziness: f32,
}

impl Reflective {
    /// `fuzziness`: 0.0 = perfect mirror, 1.0 = very rough. Values outside
    /// [0, 1] are rejected.
    pub fn new(color: Color, fuzziness: f32) -> BuildResult<Self> {
        if !(0.0..=1.0).contains(&fuzziness) {
            return Err(BuildError::InvalidFuzziness(fuzziness));
        }
        Ok(Self {
            color: validate_color(color)?,
            fuzziness,
        })
    }

    fn reflect(&self, incident: Vec3, point: Vec3, normal: Vec3, rng: &mut dyn RandomSource) -> Reflection {
        let reflected = reflect(incident.normalize(), normal);
        let direction = reflected + self.fuzziness * rng.vector_in_unit_sphere();

        // Fuzz can push the ray below the surface
        if direction.dot(normal) > 0.0 {
            Reflection::Scattered {
                ray: Ray::new(point, direction),
                attenuation: self.color,
            }
        } else {
            Reflection::Absorbed
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Transparent {
    color: Color,
    refraction_index: f32,
}

impl Transparent {
    /// - `color`: attenuation applied to every bounce (white for clear glass)
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond; below 1.0
    ///   is rejected
    pub fn new(color: Color, refraction_index: f32) -> BuildResult<Self> {
        if !refraction_index.is_finite() || refraction_index < 1.0 {
            return Err(BuildError::InvalidRefractionIndex(refraction_index));
        }
        Ok(Self {
            color: validate_color(color)?,
            refraction_index,
        })
    }

    fn reflect(&self, incident: Vec3, point: Vec3, normal: Vec3, rng: &mut dyn RandomSource) -> Reflection {
        let unit_direction = incident.normalize();
        let entering = unit_direction.dot(normal) < 0.0;

        // Orient the normal against the ray
        let (ratio, normal) = if entering {
            (1.0 / self.refraction_index, normal)
        } else {
            (self.refraction_index, -normal)
        };

        let direction = match refract(unit_direction, normal, ratio) {
            // Total internal reflection
            None => reflect(unit_direction, normal),
            Some(refracted) => {
                // Schlick uses the angle on the low-index side
                let cosine = if entering {
                    -unit_direction.dot(normal)
                } else {
                    -refracted.dot(normal)
                };

                if rng.uniform_real() < schlick(cosine, self.refraction_index) {
                    reflect(unit_direction, normal)
                } else {
                    refracted
                }
            }
        };

        Reflection::Scattered {
            ray: Ray::new(point, direction),
            attenuation: self.color,
        }
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Emissive {
    color: Color,
}

impl Emissive {
    pub fn new(color: Color) -> BuildResult<Self> {
        Ok(Self {
            color: validate_color(color)?,
        })
    }
}

/// Closed set of materials an object can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Diffusive(Diffusive),
    Reflective(Reflective),
    Transparent(Transparent),
    Emissive(Emissive),
}

impl Material {
    /// Lambertian surface tinted by `color`.
    pub fn diffusive(color: Color) -> BuildResult<Self> {
        Diffusive::new(color).map(Material::Diffusive)
    }

    /// Mirror-like surface; see [`Reflective::new`].
    pub fn reflective(color: Color, fuzziness: f32) -> BuildResult<Self> {
        Reflective::new(color, fuzziness).map(Material::Reflective)
    }

    /// Refracting medium; see [`Transparent::new`].
    pub fn transparent(color: Color, refraction_index: f32) -> BuildResult<Self> {
        Transparent::new(color, refraction_index).map(Material::Transparent)
    }

    /// Light source emitting `color`.
    pub fn emissive(color: Color) -> BuildResult<Self> {
        Emissive::new(color).map(Material::Emissive)
    }

    /// Decide what happens to a ray with direction `incident` that hit the
    /// surface at `point` with surface `normal`.
    ///
    /// `incident` must be non-zero; the scene never passes degenerate rays.
    pub fn reflect(
        &self,
        incident: Vec3,
        point: Vec3,
        normal: Vec3,
        rng: &mut dyn RandomSource,
    ) -> Reflection {
        match self {
            Material::Diffusive(m) => m.reflect(point, normal, rng),
            Material::Reflective(m) => m.reflect(incident, point, normal, rng),
            Material::Transparent(m) => m.reflect(incident, point, normal, rng),
            Material::Emissive(m) => Reflection::Emitted(m.color),
        }
    }
}

impl From<Diffusive> for Material {
    fn from(m: Diffusive) -> Self {
        Material::Diffusive(m)
    }
}

impl From<Reflective> for Material {
    fn from(m: Reflective) -> Self {
        Material::Reflective(m)
    }
}

impl From<Transparent> for Material {
    fn from(m: Transparent) -> Self {
        Material::Transparent(m)
    }
}

impl From<Emissive> for Material {
    fn from(m: Emissive) -> Self {
        Material::Emissive(m)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

fn validate_color(color: Color) -> BuildResult<Color> {
    if color.is_finite() && color.cmpge(Vec3::ZERO).all() {
        Ok(color)
    } else {
        Err(BuildError::InvalidColor(color.to_array()))
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface whose unit normal opposes it.
///
/// `ratio` is the incident index over the transmitted index. Returns `None`
/// on total internal reflection.
#[inline]
pub fn refract(unit_direction: Vec3, normal: Vec3, ratio: f32) -> Option<Vec3> {
    let cos_i = (-unit_direction.dot(normal)).min(1.0);
    let discriminant = 1.0 - (1.0 - cos_i * cos_i) * ratio * ratio;
    if discriminant < 0.0 {
        return None;
    }
    Some(ratio * unit_direction + (ratio * cos_i - discriminant.sqrt()) * normal)
}

/// Schlick's approximation for Fresnel reflectance
#[inline]
pub fn schlick(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
