//! Sphere field example.
//!
//! Renders a ground plane with diffuse, metal and glass spheres, a hollow
//! glass shell, a mirror quad and a small light, then saves `output.png`.
//!
//! Usage: `cargo run --release --example spheres [settings.json]`

use anyhow::{Context, Result};
use prism_renderer::{
    render, Camera, CameraSettings, Color, GradientBackground, Material, Mesh, Object, Plane, RandomSource,
    RenderConfig, Scene, SeededRandom, Sphere, Vec3, DEFAULT_MAX_RAY_REFLECTIONS,
};
use serde::{Deserialize, Serialize};

/// Everything the example reads from its optional JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RenderSettings {
    camera: CameraSettings,
    render: RenderConfig,
    max_ray_reflections: u32,
    output: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default()
                .with_resolution(450, 16.0 / 9.0)
                .with_samples(64)
                .with_fov(30.0)
                .with_position(Vec3::new(13.0, 2.5, 4.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
            render: RenderConfig::default(),
            max_ray_reflections: DEFAULT_MAX_RAY_REFLECTIONS,
            output: "output.png".to_string(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?
        }
        None => RenderSettings::default(),
    };

    let mut rng = SeededRandom::new(settings.render.seed);
    let scene = build_scene(&mut rng)?.with_max_ray_reflections(settings.max_ray_reflections);
    let camera = Camera::new(settings.camera)?;

    let progress = |percent: u32| {
        if percent % 10 == 0 {
            log::info!("{}%", percent);
        }
    };
    let image = render(&camera, &scene, &settings.render, Some(&progress));

    image.save_png(&settings.output)?;

    Ok(())
}

fn build_scene(rng: &mut SeededRandom) -> Result<Scene> {
    let mut objects = vec![
        // Ground
        Object::new(
            Plane::new(Vec3::ZERO, Vec3::Y)?,
            Material::diffusive(Color::new(0.5, 0.5, 0.5))?,
        ),
        // Three main spheres
        Object::new(
            Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0)?,
            Material::transparent(Color::ONE, 1.5)?,
        ),
        Object::new(
            Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0)?,
            Material::diffusive(Color::new(0.4, 0.2, 0.1))?,
        ),
        Object::new(
            Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0)?,
            Material::reflective(Color::new(0.7, 0.6, 0.5), 0.0)?,
        ),
        // Light
        Object::new(
            Sphere::new(Vec3::new(2.0, 3.5, -2.0), 0.5)?,
            Material::emissive(Color::splat(6.0))?,
        ),
    ];

    // Hollow glass shell: the inner sphere's negative radius flips its normals
    let glass = Material::transparent(Color::ONE, 1.5)?;
    let shell_center = Vec3::new(2.0, 0.6, 2.0);
    objects.push(Object::new(Sphere::new(shell_center, 0.6)?, glass.clone()));
    objects.push(Object::new(Sphere::new(shell_center, -0.55)?, glass));

    // Mirror wall behind the spheres
    let wall = Mesh::new_quad(
        "wall",
        Vec3::new(-6.0, 0.0, -4.0),
        Vec3::new(6.0, 0.0, -4.0),
        Vec3::new(6.0, 4.0, -4.0),
        Vec3::new(-6.0, 4.0, -4.0),
        rng,
    )?;
    objects.push(Object::new(wall, Material::reflective(Color::new(0.8, 0.85, 0.9), 0.05)?));

    // Small random spheres
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.uniform_real(),
                0.2,
                b as f32 + 0.9 * rng.uniform_real(),
            );

            let landmarks = [
                Vec3::new(4.0, 0.2, 0.0),
                Vec3::new(0.0, 0.2, 0.0),
                Vec3::new(-4.0, 0.2, 0.0),
                Vec3::new(2.0, 0.2, 2.0),
            ];
            if landmarks.iter().any(|&p| (center - p).length() < 1.2) {
                continue;
            }

            let choose_mat = rng.uniform_real();
            let material = if choose_mat < 0.8 {
                Material::diffusive(rng.uniform_vec3() * rng.uniform_vec3())?
            } else if choose_mat < 0.95 {
                let albedo = Color::splat(0.5) + 0.5 * rng.uniform_vec3();
                Material::reflective(albedo, 0.5 * rng.uniform_real())?
            } else {
                Material::transparent(Color::ONE, 1.5)?
            };

            objects.push(Object::new(Sphere::new(center, 0.2)?, material));
        }
    }

    Ok(Scene::new(objects, GradientBackground::default(), rng)?)
}
