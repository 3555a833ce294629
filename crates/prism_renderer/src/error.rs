//! Construction errors.
//!
//! Everything that can be misconfigured is validated when it is built, so a
//! scene, camera or material never exists in an invalid state. Numeric
//! degeneracies met while tracing are not errors; they resolve to "no hit"
//! or black locally.

use thiserror::Error;

/// Errors raised while building scene components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("fuzziness must be within [0, 1], got {0}")]
    InvalidFuzziness(f32),

    #[error("refraction index must be at least 1.0, got {0}")]
    InvalidRefractionIndex(f32),

    #[error("color channels must be finite and non-negative, got {0:?}")]
    InvalidColor([f32; 3]),

    #[error("sphere radius must be finite and non-zero, got {0}")]
    InvalidRadius(f32),

    #[error("normal must be finite and non-zero, got {0:?}")]
    InvalidNormal([f32; 3]),

    #[error("triangle has zero area")]
    DegenerateTriangle,

    #[error("quad vertices are not coplanar")]
    NonPlanarQuad,

    #[error("cannot build a BVH from an empty primitive list")]
    EmptyPrimitiveList,

    #[error("vertex index {index} out of range for {count} vertices")]
    IndexOutOfRange { index: u32, count: usize },

    #[error("index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("image dimensions must be between 1 and 65536, got {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("sample count must be positive")]
    InvalidSampleCount,

    #[error("vertical field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),

    #[error("look-from, look-at and up do not define a view")]
    InvalidView,

    #[error("minimum hit parameter must be finite and non-negative, got {0}")]
    InvalidHitBias(f32),
}

/// Result type for construction operations.
pub type BuildResult<T> = Result<T, BuildError>;
