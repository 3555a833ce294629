//! Backgrounds seen by rays that escape the scene.

use crate::{Color, Ray};

/// Color of a ray that hit nothing.
pub trait Background: Send + Sync {
    fn color_ray(&self, ray: &Ray) -> Color;
}

/// One flat color in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBackground {
    pub color: Color,
}

impl SolidBackground {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Background for SolidBackground {
    fn color_ray(&self, _ray: &Ray) -> Color {
        self.color
    }
}

/// Vertical sky gradient blended by the Y component of the ray direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientBackground {
    /// Color looking straight down
    pub bottom: Color,
    /// Color looking straight up
    pub top: Color,
}

impl GradientBackground {
    pub fn new(bottom: Color, top: Color) -> Self {
        Self { bottom, top }
    }
}

impl Default for GradientBackground {
    /// White horizon fading to sky blue.
    fn default() -> Self {
        Self::new(Color::ONE, Color::new(0.5, 0.7, 1.0))
    }
}

impl Background for GradientBackground {
    fn color_ray(&self, ray: &Ray) -> Color {
        // Zero directions land on the midpoint instead of NaN
        let unit_direction = ray.direction.normalize_or_zero();
        let a = 0.5 * (unit_direction.y + 1.0);
        self.bottom * (1.0 - a) + self.top * a
    }
}
