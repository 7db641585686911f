//! Spatial Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::interaction::Hit;
use crate::light::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// A spatially-varying light distribution that adjusts the probability of
/// sampling a light source based on an estimate of its contribution to a
/// region of space. A fixed voxel grid is imposed over the scene bounds and a
/// sampling distribution is computed for each voxel up front; lookups are a
/// plain grid index afterwards.
pub struct SpatialLightDistribution {
    /// Bounds of the scene geometry.
    world_bound: Bounds3f,

    /// Grid resolution per axis.
    n_voxels: [usize; 3],

    /// Per-voxel distributions, laid out x-major.
    distributions: Vec<Arc<Distribution1D>>,
}

impl SpatialLightDistribution {
    /// Create a new instance of `SpatialLightDistribution`.
    ///
    /// * `scene`      - The scene.
    /// * `max_voxels` - Number of voxels along the widest scene dimension.
    pub fn new(scene: &Scene, max_voxels: usize) -> Self {
        // Compute the number of voxels so that the widest scene bounding box
        // dimension has `max_voxels` voxels and the other dimensions have a
        // number of voxels so that voxels are roughly cube shaped.
        let b = scene.world_bound;
        let diag = b.diagonal();
        let bmax = max(diag.x, max(diag.y, diag.z));
        let mut n_voxels = [1_usize; 3];
        for (i, n) in n_voxels.iter_mut().enumerate() {
            let extent = match i {
                0 => diag.x,
                1 => diag.y,
                _ => diag.z,
            };
            if bmax > 0.0 {
                *n = max(1_usize, (extent / bmax * max_voxels as Float).round() as usize);
            }
        }

        info!(
            "SpatialLightDistribution: voxel res ({}, {}, {})",
            n_voxels[0], n_voxels[1], n_voxels[2]
        );

        let voxel_count = n_voxels[0] * n_voxels[1] * n_voxels[2];
        let mut distributions = Vec::with_capacity(voxel_count);
        for z in 0..n_voxels[2] {
            for y in 0..n_voxels[1] {
                for x in 0..n_voxels[0] {
                    let dist = compute_distribution(scene, &b, &n_voxels, &Point3i::new(x as Int, y as Int, z as Int));
                    distributions.push(Arc::new(dist));
                }
            }
        }

        Self {
            world_bound: b,
            n_voxels,
            distributions,
        }
    }
}

impl LightDistribution for SpatialLightDistribution {
    /// Given a point `p` in space, returns the sampling distribution of the
    /// voxel containing it.
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>> {
        if self.distributions.is_empty() {
            return None;
        }

        // Compute integer voxel coordinates for the given point. The clamp
        // keeps points slightly outside the scene bounds (floating-point
        // roundoff on intersections) inside the grid.
        let offset = self.world_bound.offset(p);
        let mut pi = [0_usize; 3];
        for (i, v) in pi.iter_mut().enumerate() {
            let o = match i {
                0 => offset.x,
                1 => offset.y,
                _ => offset.z,
            };
            *v = clamp((o * self.n_voxels[i] as Float) as Int, 0, self.n_voxels[i] as Int - 1) as usize;
        }

        let index = (pi[2] * self.n_voxels[1] + pi[1]) * self.n_voxels[0] + pi[0];
        Some(Arc::clone(&self.distributions[index]))
    }
}

/// Compute the sampling distribution for the voxel with the given integer
/// coordinates. A number of low-discrepancy points inside the voxel are
/// sampled; at each one every light is sampled and weighted by Li/pdf
/// (ignoring visibility) as an approximation to how much the light is likely
/// to contribute to illumination in the voxel.
///
/// * `scene`       - The scene.
/// * `world_bound` - Bounds of the scene geometry.
/// * `n_voxels`    - Grid resolution per axis.
/// * `pi`          - Voxel coordinates.
fn compute_distribution(scene: &Scene, world_bound: &Bounds3f, n_voxels: &[usize; 3], pi: &Point3i) -> Distribution1D {
    // Compute the world-space bounding box of the voxel.
    let p0 = Point3f::new(
        pi.x as Float / n_voxels[0] as Float,
        pi.y as Float / n_voxels[1] as Float,
        pi.z as Float / n_voxels[2] as Float,
    );
    let p1 = Point3f::new(
        (pi.x + 1) as Float / n_voxels[0] as Float,
        (pi.y + 1) as Float / n_voxels[1] as Float,
        (pi.z + 1) as Float / n_voxels[2] as Float,
    );
    let voxel_bounds = Bounds3f::new(world_bound.lerp(&p0), world_bound.lerp(&p1));

    const N_SAMPLES: usize = 128;
    let n_lights = scene.lights.len();
    let mut light_contrib = vec![0.0 as Float; n_lights];
    for i in 0..N_SAMPLES {
        let po = voxel_bounds.lerp(&Point3f::new(
            radical_inverse(0, i as u64),
            radical_inverse(1, i as u64),
            radical_inverse(2, i as u64),
        ));
        let intr = Hit::new(po, 0.0, Vector3f::ZERO, Vector3f::new(1.0, 0.0, 0.0), Normal3f::ZERO, None);

        // Use the next two low-discrepancy dimensions to sample a point on
        // each light source.
        let u = Point2f::new(radical_inverse(3, i as u64), radical_inverse(4, i as u64));
        for (j, light) in scene.lights.iter().enumerate() {
            if let Some(li) = light.sample_li(&intr, &u) {
                if li.pdf > 0.0 {
                    light_contrib[j] += li.value.y() / li.pdf;
                }
            }
        }
    }

    // Don't leave any light with a zero probability; a light can contribute
    // to points in the voxel even though no sampled point saw it.
    let sum_contrib: Float = light_contrib.iter().sum();
    let avg_contrib = sum_contrib / (N_SAMPLES * max(1, light_contrib.len())) as Float;
    let min_contrib = if avg_contrib > 0.0 { 0.001 * avg_contrib } else { 1.0 };
    for contrib in light_contrib.iter_mut() {
        *contrib = max(*contrib, min_contrib);
    }

    Distribution1D::new(light_contrib)
}
