//! Camera for ray generation.

use crate::{BuildError, BuildResult, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Largest accepted image width or height in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 1 << 16;

/// User-facing camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    /// Image width divided by image height
    pub aspect_ratio: f32,
    /// Image height in pixels; the width follows from the aspect ratio
    pub pixel_height: u32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Antialiasing samples per pixel
    pub samples: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            vertical_fov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            pixel_height: 360,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            samples: 16,
        }
    }
}

impl CameraSettings {
    /// Set image resolution.
    pub fn with_resolution(mut self, pixel_height: u32, aspect_ratio: f32) -> Self {
        self.pixel_height = pixel_height;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.up = up;
        self
    }

    pub fn with_fov(mut self, vertical_fov: f32) -> Self {
        self.vertical_fov = vertical_fov;
        self
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }
}

/// Pinhole camera mapping normalized image coordinates to world rays.
///
/// `(0, 0)` is the upper-left corner of the image and `(1, 1)` the
/// lower-right. The viewport sits at the look-at distance, so `(0.5, 0.5)`
/// reaches the look-at point at `t = 1`.
#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,
    pixel_width: u32,

    origin: Vec3,
    upper_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    pub fn new(settings: CameraSettings) -> BuildResult<Self> {
        let fov = settings.vertical_fov;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(BuildError::InvalidFieldOfView(fov));
        }

        let aspect = settings.aspect_ratio;
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(BuildError::InvalidAspectRatio(aspect));
        }

        // The float to int cast saturates, so an absurd aspect lands above the cap
        let pixel_width = (settings.pixel_height as f32 * aspect).round() as u32;
        let dimensions = 1..=MAX_IMAGE_DIMENSION;
        if !dimensions.contains(&pixel_width) || !dimensions.contains(&settings.pixel_height) {
            return Err(BuildError::InvalidImageSize {
                width: pixel_width,
                height: settings.pixel_height,
            });
        }

        if settings.samples == 0 {
            return Err(BuildError::InvalidSampleCount);
        }

        // Camera basis: `back` points from the target to the eye
        let offset = settings.look_from - settings.look_at;
        let back = offset.try_normalize().ok_or(BuildError::InvalidView)?;
        let right = settings
            .up
            .cross(back)
            .try_normalize()
            .ok_or(BuildError::InvalidView)?;
        let up = back.cross(right);

        let distance = offset.length();
        let half_height = (fov.to_radians() / 2.0).tan() * distance;
        let half_width = aspect * half_height;

        let origin = settings.look_from;
        let upper_left = origin - half_width * right + half_height * up - distance * back;

        log::debug!(
            "Camera: {}x{} px, {} samples, vfov {}",
            pixel_width,
            settings.pixel_height,
            settings.samples,
            fov
        );

        Ok(Self {
            settings,
            pixel_width,
            origin,
            upper_left,
            horizontal: 2.0 * half_width * right,
            vertical: -2.0 * half_height * up,
        })
    }

    /// Ray from the eye through normalized image coordinates `(u, v)`.
    #[inline]
    pub fn generate_ray(&self, u: f32, v: f32) -> Ray {
        let target = self.upper_left + u * self.horizontal + v * self.vertical;
        Ray::new(self.origin, target - self.origin)
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.settings.pixel_height
    }

    pub fn samples(&self) -> u32 {
        self.settings.samples
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide() -> CameraSettings {
        CameraSettings::default()
            .with_resolution(100, 2.0)
            .with_fov(90.0)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
    }

    #[test]
    fn test_pixel_width_from_aspect() {
        let camera = Camera::new(wide()).unwrap();
        assert_eq!(camera.pixel_width(), 200);
        assert_eq!(camera.pixel_height(), 100);

        let camera = Camera::new(CameraSettings::default().with_resolution(9, 16.0 / 9.0)).unwrap();
        assert_eq!(camera.pixel_width(), 16);
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = Camera::new(wide()).unwrap();

        // Center ray reaches the look-at point at t = 1
        let center = camera.generate_ray(0.5, 0.5);
        assert_eq!(center.origin, Vec3::ZERO);
        assert!((center.direction - Vec3::NEG_Z).length() < 1e-5);
        assert!((center.at(1.0) - Vec3::NEG_Z).length() < 1e-5);

        let upper_left = camera.generate_ray(0.0, 0.0);
        assert!((upper_left.direction - Vec3::new(-2.0, 1.0, -1.0)).length() < 1e-5);

        let lower_right = camera.generate_ray(1.0, 1.0);
        assert!((lower_right.direction - Vec3::new(2.0, -1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera_looking_along_x() {
        let settings = wide().with_position(Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 1.0, 0.0), Vec3::Y);
        let camera = Camera::new(settings).unwrap();

        let center = camera.generate_ray(0.5, 0.5);
        assert!((center.at(1.0) - Vec3::new(4.0, 1.0, 0.0)).length() < 1e-4);

        // Top of the image is above the horizon
        assert!(camera.generate_ray(0.5, 0.0).direction.y > 0.0);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            Camera::new(wide().with_fov(0.0)),
            Err(BuildError::InvalidFieldOfView(_))
        ));
        assert!(matches!(
            Camera::new(wide().with_fov(180.0)),
            Err(BuildError::InvalidFieldOfView(_))
        ));
        assert!(matches!(
            Camera::new(wide().with_resolution(100, -1.0)),
            Err(BuildError::InvalidAspectRatio(_))
        ));
        assert!(matches!(
            Camera::new(wide().with_resolution(0, 1.0)),
            Err(BuildError::InvalidImageSize { width: 0, height: 0 })
        ));
        assert!(matches!(
            Camera::new(wide().with_resolution(1, 0.1)),
            Err(BuildError::InvalidImageSize { width: 0, height: 1 })
        ));
        assert!(matches!(
            Camera::new(wide().with_resolution(100, 1.0e6)),
            Err(BuildError::InvalidImageSize { width: 100_000_000, height: 100 })
        ));
        assert!(matches!(
            Camera::new(wide().with_resolution(100, f32::MAX)),
            Err(BuildError::InvalidImageSize { width: u32::MAX, height: 100 })
        ));
        assert!(matches!(
            Camera::new(wide().with_resolution(MAX_IMAGE_DIMENSION + 1, 1.0)),
            Err(BuildError::InvalidImageSize { .. })
        ));
        assert!(Camera::new(wide().with_resolution(MAX_IMAGE_DIMENSION / 2, 2.0)).is_ok());
        assert!(matches!(
            Camera::new(wide().with_samples(0)),
            Err(BuildError::InvalidSampleCount)
        ));
        assert!(matches!(
            Camera::new(wide().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y)),
            Err(BuildError::InvalidView)
        ));
        assert!(matches!(
            Camera::new(wide().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y)),
            Err(BuildError::InvalidView)
        ));
    }

    #[test]
    fn test_settings_from_json() {
        let settings: CameraSettings =
            serde_json::from_str(r#"{ "vertical_fov": 40.0, "samples": 4, "look_from": [1.0, 2.0, 3.0] }"#)
                .unwrap();
        assert_eq!(settings.vertical_fov, 40.0);
        assert_eq!(settings.samples, 4);
        assert_eq!(settings.look_from, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(settings.up, Vec3::Y);
    }
}
