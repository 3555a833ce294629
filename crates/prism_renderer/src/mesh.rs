//! Triangle meshes.
//!
//! A mesh is a named set of triangles that always carries its own BVH, so a
//! single mesh object in the scene costs one box test when a ray misses it.

use crate::{
    bvh::Bvh,
    hittable::{Hit, Hittable},
    random::RandomSource,
    Aabb, BuildError, BuildResult, Interval, Ray, Triangle, Vec3,
};

/// Minimum dot product between the two triangle normals of a planar quad.
const PLANARITY_TOLERANCE: f32 = 1e-3;

/// A named triangle mesh.
pub struct Mesh {
    name: String,
    triangles: Bvh<Triangle>,
}

impl Mesh {
    /// Create a mesh from prebuilt triangles.
    pub fn new(
        name: impl Into<String>,
        triangles: Vec<Triangle>,
        rng: &mut dyn RandomSource,
    ) -> BuildResult<Self> {
        let name = name.into();
        let triangles = Bvh::build(triangles, rng)?;
        log::debug!("Mesh '{}': {} triangles", name, triangles.len());
        Ok(Self { name, triangles })
    }

    /// Create a flat quad from four coplanar points, wound `a -> b -> c -> d`.
    ///
    /// The quad is split into triangles `abc` and `acd`; if their normals
    /// disagree the points are not coplanar (or the winding folds over) and
    /// the quad is rejected.
    pub fn new_quad(
        name: impl Into<String>,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        d: Vec3,
        rng: &mut dyn RandomSource,
    ) -> BuildResult<Self> {
        let first = Triangle::new(a, b, c)?;
        let second = Triangle::new(a, c, d)?;

        if first.face_normal().dot(second.face_normal()) < 1.0 - PLANARITY_TOLERANCE {
            return Err(BuildError::NonPlanarQuad);
        }

        Self::new(name, vec![first, second], rng)
    }

    /// Create a mesh from an indexed triangle list.
    ///
    /// Every three indices form a triangle. Per-vertex normals are used when
    /// provided for every vertex; otherwise smooth normals are computed by
    /// averaging the face normals around each vertex. Zero-area triangles are
    /// skipped.
    pub fn from_indexed(
        name: impl Into<String>,
        positions: &[Vec3],
        normals: Option<&[Vec3]>,
        indices: &[u32],
        rng: &mut dyn RandomSource,
    ) -> BuildResult<Self> {
        let name = name.into();

        if indices.len() % 3 != 0 {
            return Err(BuildError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(BuildError::IndexOutOfRange {
                index,
                count: positions.len(),
            });
        }

        let normals = match normals {
            Some(normals) if normals.len() == positions.len() => normals.to_vec(),
            Some(normals) => {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    positions.len()
                );
                compute_smooth_normals(positions, indices)
            }
            None => compute_smooth_normals(positions, indices),
        };

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        for face in indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            match Triangle::with_normals(
                positions[i0],
                positions[i1],
                positions[i2],
                [normals[i0], normals[i1], normals[i2]],
            ) {
                Ok(triangle) => triangles.push(triangle),
                Err(BuildError::DegenerateTriangle) => {
                    log::warn!("Mesh '{}': skipping zero-area triangle [{}, {}, {}]", name, i0, i1, i2);
                }
                Err(err) => return Err(err),
            }
        }

        Self::new(name, triangles, rng)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Hittable for Mesh {
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        self.triangles.test_ray(ray, interval)
    }

    fn bounding_box(&self) -> Aabb {
        self.triangles.bounding_box()
    }
}

/// Smooth vertex normals: the normalized sum of area-weighted face normals.
///
/// Vertices that touch no valid face fall back to +Y.
fn compute_smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for face in indices.chunks_exact(3) {
        let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
        let face_normal = (positions[i1] - positions[i0]).cross(positions[i2] - positions[i0]);

        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
