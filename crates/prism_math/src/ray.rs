use crate::Vec3;

/// A ray in 3D space.
///
/// Rays represent a half-line starting at `origin` and traveling along
/// `direction`. The direction is not required to be normalized, so the
/// parameter `t` is measured in multiples of the direction's length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether the direction can be traced at all.
    ///
    /// Zero-length or non-finite directions never produce a hit and are
    /// rejected up front by every primitive.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.direction.is_finite() || self.direction.length_squared() == 0.0
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
