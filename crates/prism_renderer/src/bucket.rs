//! Bucket-based image partitioning.
//!
//! Divides the image into regions (buckets) that are rendered
//! independently and in parallel. Each bucket draws from its own random
//! stream, so output depends only on the seed and the partition.

use crate::random::SeededRandom;
use crate::renderer::{gamma_correct, render_pixel};
use crate::{Camera, Color, Scene};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order; also selects the random stream
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// One-pixel-wide columns, left to right.
pub fn generate_columns(width: u32, height: u32) -> Vec<Bucket> {
    (0..width)
        .map(|x| Bucket::new(x, 0, 1, height, x as usize))
        .collect()
}

/// Square tiles, sorted in spiral order from the image center.
///
/// Tiles on the right and bottom edges are cropped to the image.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, 0));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 / 2.0 - center_x;
        let dy = b.y as f32 + b.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    // Stable sort keeps row-major order between equidistant tiles
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Rendered pixels of one bucket, gamma-corrected, row-major.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

/// Render a single bucket with the random stream selected by its index.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, scene: &Scene, seed: u64) -> BucketResult {
    let mut rng = SeededRandom::for_stream(seed, bucket.index as u64);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(camera, scene, bucket.x + local_x, bucket.y + local_y, &mut rng);
            pixels.push(gamma_correct(color));
        }
    }

    BucketResult::new(*bucket, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::SolidBackground;
    use crate::{CameraSettings, Material, Object, Sphere, Vec3};

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 70, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 70);
        assert!(buckets.iter().all(|b| b.x + b.width <= 100 && b.y + b.height <= 70));
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9);

        // Center tile first, corners last
        assert_eq!((buckets[0].x, buckets[0].y), (64, 64));
        assert!(buckets[5..].iter().all(|b| b.x != 64 && b.y != 64));

        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
        }
    }

    #[test]
    fn test_generate_columns() {
        let columns = generate_columns(5, 3);
        assert_eq!(columns.len(), 5);
        for (x, column) in columns.iter().enumerate() {
            assert_eq!(*column, Bucket::new(x as u32, 0, 1, 3, x));
        }
    }

    #[test]
    fn test_render_bucket_reproducible() {
        let mut rng = SeededRandom::new(2);
        let objects = vec![Object::new(
            Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0).unwrap(),
            Material::diffusive(Vec3::splat(0.6)).unwrap(),
        )];
        let scene = Scene::new(objects, SolidBackground::new(Vec3::ONE), &mut rng).unwrap();
        let camera = Camera::new(CameraSettings::default().with_resolution(8, 1.0).with_samples(2)).unwrap();

        let bucket = Bucket::new(2, 2, 4, 4, 3);
        let first = render_bucket(&bucket, &camera, &scene, 99);
        let second = render_bucket(&bucket, &camera, &scene, 99);

        assert_eq!(first.pixels.len(), 16);
        assert_eq!(first.pixels, second.pixels);
        assert!(first.pixels.iter().all(|c| c.is_finite()));
    }
}
