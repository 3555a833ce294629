//! Per-pixel sampling loop and the parallel render driver.
//!
//! Implements:
//! - Jittered multi-sampling for anti-aliasing
//! - Gamma correction and 8-bit quantization
//! - Bucketed rendering across threads with rayon
//! - Progress reporting as buckets complete

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, generate_columns, render_bucket, Bucket, BucketResult};
use crate::random::RandomSource;
use crate::{Camera, Color, Scene};

/// How the image is split into independently rendered buckets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// One-pixel-wide columns
    #[default]
    Columns,
    /// Square tiles in spiral order from the center
    Tiles { size: u32 },
}

/// Render configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub partition: Partition,
    /// Seed for every random stream of the render
    pub seed: u64,
}

impl RenderConfig {
    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn buckets(&self, width: u32, height: u32) -> Vec<Bucket> {
        match self.partition {
            Partition::Columns => generate_columns(width, height),
            Partition::Tiles { size } => generate_buckets(width, height, size),
        }
    }
}

/// Receives render progress as a percentage in `0..=100`.
pub trait ProgressSink: Sync {
    fn report(&self, percent: u32);
}

impl<F> ProgressSink for F
where
    F: Fn(u32) + Sync,
{
    fn report(&self, percent: u32) {
        self(percent)
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

#[inline]
pub fn gamma_correct(color: Color) -> Color {
    Color::new(
        linear_to_gamma(color.x),
        linear_to_gamma(color.y),
        linear_to_gamma(color.z),
    )
}

/// Quantize a gamma-corrected color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let quantize = |c: f32| (255.0 * c.clamp(0.0, 1.0)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Average of the camera's sample count of jittered rays through pixel `(x, y)`.
///
/// Returns linear color.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    rng: &mut dyn RandomSource,
) -> Color {
    let width = camera.pixel_width() as f32;
    let height = camera.pixel_height() as f32;
    let samples = camera.samples();

    let mut pixel_color = Color::ZERO;
    for _ in 0..samples {
        let u = (x as f32 + rng.uniform_real()) / width;
        let v = (y as f32 + rng.uniform_real()) / height;
        let ray = camera.generate_ray(u, v);
        pixel_color += scene.trace(&ray, rng);
    }

    pixel_color / samples as f32
}

/// Gamma-corrected render output, row-major with the origin at the top left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Copy a rendered bucket into its region.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result.pixels.chunks_exact(bucket.width as usize).enumerate() {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }
    }

    /// Convert to an 8-bit RGBA image.
    pub fn to_rgba8(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y)))
        })
    }

    /// Encode as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        let path = path.as_ref();
        self.to_rgba8()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the scene through the camera.
///
/// Buckets are rendered in parallel into their own pixel vectors and copied
/// into the image afterwards. `progress` sees `0` first, then strictly
/// increasing percentages ending at `100`.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    progress: Option<&dyn ProgressSink>,
) -> ImageBuffer {
    let width = camera.pixel_width();
    let height = camera.pixel_height();
    let buckets = config.buckets(width, height);

    log::info!(
        "Rendering {}x{} at {} spp: {} buckets, seed {}",
        width,
        height,
        camera.samples(),
        buckets.len(),
        config.seed
    );
    let start = Instant::now();

    if let Some(sink) = progress {
        sink.report(0);
    }

    // Completed bucket count and the last percentage handed to the sink
    let completed = Mutex::new((0usize, 0u32));
    let total = buckets.len().max(1);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, scene, config.seed);

            if let Some(sink) = progress {
                // Reporting under the lock keeps the sink's sequence increasing
                let mut state = completed.lock().unwrap_or_else(|e| e.into_inner());
                state.0 += 1;
                let percent = (state.0 * 100 / total) as u32;
                if percent > state.1 {
                    state.1 = percent;
                    sink.report(percent);
                }
            }

            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render complete in {:.2?}", start.elapsed());

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::SolidBackground;
    use crate::random::{FixedRandom, SeededRandom};
    use crate::{CameraSettings, Material, Object, Sphere, Vec3};

    fn lit_scene() -> Scene {
        let objects = vec![
            Object::new(
                Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0).unwrap(),
                Material::diffusive(Color::new(0.7, 0.3, 0.3)).unwrap(),
            ),
            Object::new(
                Sphere::new(Vec3::new(2.5, 0.0, -3.0), 1.0).unwrap(),
                Material::emissive(Color::splat(4.0)).unwrap(),
            ),
        ];
        Scene::new(objects, SolidBackground::new(Color::new(0.25, 0.25, 0.25)), &mut SeededRandom::new(1))
            .unwrap()
    }

    fn small_camera() -> Camera {
        Camera::new(CameraSettings::default().with_resolution(12, 1.5).with_samples(3)).unwrap()
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-0.5), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::new(0.0, 1.0, 0.5)), [0, 255, 127, 255]);
        assert_eq!(color_to_rgba(Color::new(-1.0, 4.0, 1.0)), [0, 255, 255, 255]);
    }

    #[test]
    fn test_render_pixel_background() {
        let scene = lit_scene();
        let camera = small_camera();

        // Top-left pixel looks up and left, past both spheres
        let color = render_pixel(&camera, &scene, 0, 0, &mut FixedRandom::default());
        assert_eq!(color, Color::splat(0.25));
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let scene = lit_scene();
        let camera = small_camera();
        let mut rng = SeededRandom::new(42);

        let color = render_pixel(&camera, &scene, 9, 6, &mut rng);
        assert!(color.is_finite());
        assert_ne!(color, Color::splat(0.25));
    }

    #[test]
    fn test_render_reproducible() {
        let scene = lit_scene();
        let camera = small_camera();

        for partition in [Partition::Columns, Partition::Tiles { size: 5 }] {
            let config = RenderConfig::default().with_partition(partition).with_seed(7);
            let first = render(&camera, &scene, &config, None);
            let second = render(&camera, &scene, &config, None);

            assert_eq!(first.width(), 18);
            assert_eq!(first.height(), 12);
            assert_eq!(first, second);
            assert!(first.pixels().iter().all(|c| c.is_finite() && c.min_element() >= 0.0));
        }
    }

    #[test]
    fn test_render_is_gamma_corrected() {
        let scene = lit_scene();
        let camera = small_camera();
        let image = render(&camera, &scene, &RenderConfig::default(), None);

        // Background 0.25 is stored as 0.5
        assert!((image.get(0, 0) - Color::splat(0.5)).length() < 1e-6);
        assert_eq!(image.to_rgba8().get_pixel(0, 0).0, [127, 127, 127, 255]);
    }

    #[test]
    fn test_render_progress() {
        let scene = lit_scene();
        let camera = small_camera();

        for partition in [Partition::Columns, Partition::Tiles { size: 1 }] {
            let reports = Mutex::new(Vec::new());
            let sink = |percent: u32| reports.lock().unwrap().push(percent);
            let config = RenderConfig::default().with_partition(partition);

            render(&camera, &scene, &config, Some(&sink));

            let reports = reports.into_inner().unwrap();
            assert_eq!(reports.first(), Some(&0));
            assert_eq!(reports.last(), Some(&100));
            assert!(reports.windows(2).all(|w| w[0] < w[1]), "reports out of order: {:?}", reports);
        }
    }

    #[test]
    fn test_write_bucket() {
        let mut image = ImageBuffer::new(4, 3);
        let bucket = Bucket::new(1, 1, 2, 2, 0);
        let pixels = vec![Color::X, Color::Y, Color::Z, Color::ONE];
        image.write_bucket(&BucketResult::new(bucket, pixels));

        assert_eq!(image.get(1, 1), Color::X);
        assert_eq!(image.get(2, 1), Color::Y);
        assert_eq!(image.get(1, 2), Color::Z);
        assert_eq!(image.get(2, 2), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.get(3, 2), Color::ZERO);
    }

    #[test]
    fn test_render_config_from_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "partition": { "tiles": { "size": 32 } }, "seed": 5 }"#).unwrap();
        assert_eq!(config.partition, Partition::Tiles { size: 32 });
        assert_eq!(config.seed, 5);

        let config: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
    }
}
