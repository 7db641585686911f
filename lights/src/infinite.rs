//! Infinite Area Light Source

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::scene::*;
use strata_core::spectrum::*;
use std::sync::{Arc, RwLock};

/// Implements an infinite area light source with uniform radiance in every
/// direction. The constant radiance makes the directional sampling
/// distribution uniform over the sphere.
#[derive(Clone)]
pub struct InfiniteAreaLight {
    /// Light ID.
    pub id: usize,

    /// Light source type.
    pub light_type: LightType,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// World center. Calculated in `preprocess()`.
    world_center: Arc<RwLock<Point3f>>,

    /// World radius. Calculated in `preprocess()`.
    world_radius: Arc<RwLock<Float>>,
}

impl InfiniteAreaLight {
    /// Returns a new `InfiniteAreaLight`.
    ///
    /// * `id` - Light ID.
    /// * `l`  - Emitted radiance.
    pub fn new(id: usize, l: Spectrum) -> Self {
        Self {
            id,
            light_type: LightType(INFINITE_LIGHT),
            l_emit: l,
            world_center: Arc::new(RwLock::new(Point3f::ZERO)),
            world_radius: Arc::new(RwLock::new(1.0)),
        }
    }
}

impl Light for InfiniteAreaLight {
    /// Initialize the light source before rendering begins.
    ///
    /// * `scene` - The scene.
    fn preprocess(&self, scene: &Scene) {
        let (world_center, world_radius) = scene.world_bound.bounding_sphere();
        *self.world_center.write().unwrap() = world_center;
        // Empty scenes still need a positive world radius for endpoint
        // bookkeeping.
        *self.world_radius.write().unwrap() = max(world_radius, 1.0);
    }

    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Returns the light unique id.
    fn get_id(&self) -> usize {
        self.id
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<Li> {
        let world_radius = *self.world_radius.read().unwrap();

        let wi = uniform_sample_sphere(u);
        let pdf = uniform_sphere_pdf();

        let p1 = Hit::new_minimal(hit.p + wi * (2.0 * world_radius), hit.time, None);
        let vis = VisibilityTester::new(hit.clone(), p1);
        Some(Li::new(wi, pdf, vis, self.l_emit))
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let world_radius = *self.world_radius.read().unwrap();
        self.l_emit * PI * world_radius * world_radius
    }

    /// Returns emitted radiance along a ray that escapes the scene bounds.
    ///
    /// * `ray` - The ray.
    fn le(&self, _ray: &Ray) -> Spectrum {
        self.l_emit
    }

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }

    /// Returns a sampled light-carrying ray leaving the light source.
    ///
    /// * `u1`   - Sample values for Monte Carlo.
    /// * `u2`   - Sample values for Monte Carlo.
    /// * `time` - Time to use for the ray.
    fn sample_le(&self, u1: &Point2f, u2: &Point2f, time: Float) -> Le {
        let world_center = *self.world_center.read().unwrap();
        let world_radius = *self.world_radius.read().unwrap();

        // Sample a direction towards the scene.
        let d = -uniform_sample_sphere(u1);
        let n_light = Normal3f::from(d);

        // Compute origin for infinite light sample ray.
        let (v1, v2) = coordinate_system(&(-d));
        let cd = concentric_sample_disk(u2);
        let p_disk = world_center + world_radius * (cd.x * v1 + cd.y * v2);
        let ray = Ray::new(p_disk + world_radius * (-d), d, INFINITY, time, None);

        let pdf_pos = 1.0 / (PI * world_radius * world_radius);
        let pdf_dir = uniform_sphere_pdf();
        Le::new(ray, n_light, pdf_pos, pdf_dir, self.l_emit)
    }

    /// Returns the probability density for the light's `sample_le()`.
    ///
    /// * `ray`     - The ray.
    /// * `n_light` - The normal.
    fn pdf_le(&self, _ray: &Ray, _n_light: &Normal3f) -> Pdf {
        let world_radius = *self.world_radius.read().unwrap();
        Pdf::new(1.0 / (PI * world_radius * world_radius), uniform_sphere_pdf())
    }
}

impl From<(&ParamSet, usize)> for InfiniteAreaLight {
    /// Create an `InfiniteAreaLight` from given parameter set and id.
    ///
    /// * `p` - A tuple containing the parameter set and id.
    fn from(p: (&ParamSet, usize)) -> Self {
        let (params, id) = p;

        let l = params.find_one_spectrum("L", Spectrum::ONE);
        let sc = params.find_one_spectrum("scale", Spectrum::ONE);
        Self::new(id, l * sc)
    }
}
