//! Distant Light Source

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::scene::*;
use strata_core::spectrum::*;
use std::sync::{Arc, RwLock};

/// Implements a directional light source that deposits illumination from the
/// same direction at every point in space.
#[derive(Clone)]
pub struct DistantLight {
    /// Light ID.
    pub id: usize,

    /// Light source type.
    pub light_type: LightType,

    /// Emitted radiance.
    pub l: Spectrum,

    /// Direction from which the light arrives; points from the scene towards
    /// the light.
    pub w_light: Vector3f,

    /// World center. Calculated in `preprocess()`.
    world_center: Arc<RwLock<Point3f>>,

    /// World radius. Calculated in `preprocess()`.
    world_radius: Arc<RwLock<Float>>,
}

impl DistantLight {
    /// Returns a new `DistantLight`.
    ///
    /// * `id`      - Light ID.
    /// * `l`       - Emitted radiance.
    /// * `w_light` - Direction from which the light arrives.
    pub fn new(id: usize, l: Spectrum, w_light: Vector3f) -> Self {
        Self {
            id,
            light_type: LightType(DELTA_DIRECTION_LIGHT),
            l,
            w_light: w_light.normalize(),
            world_center: Arc::new(RwLock::new(Point3f::ZERO)),
            world_radius: Arc::new(RwLock::new(1.0)),
        }
    }
}

impl Light for DistantLight {
    /// Initialize the light source before rendering begins.
    ///
    /// * `scene` - The scene.
    fn preprocess(&self, scene: &Scene) {
        let (world_center, world_radius) = scene.world_bound.bounding_sphere();
        *self.world_center.write().unwrap() = world_center;
        *self.world_radius.write().unwrap() = world_radius;
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
    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Option<Li> {
        let world_radius = *self.world_radius.read().unwrap();
        let wi = self.w_light;
        let p_outside = hit.p + wi * (2.0 * world_radius);

        let vis = VisibilityTester::new(hit.clone(), Hit::new_minimal(p_outside, hit.time, None));
        Some(Li::new(wi, 1.0, vis, self.l))
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let world_radius = *self.world_radius.read().unwrap();
        self.l * PI * world_radius * world_radius
    }

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }

    /// Returns a sampled light-carrying ray leaving the light source.
    ///
    /// * `u1`   - Sample values for Monte Carlo.
    /// * `u2`   - Sample values for Monte Carlo.
    /// * `time` - Time to use for the ray.
    fn sample_le(&self, u1: &Point2f, _u2: &Point2f, time: Float) -> Le {
        let world_center = *self.world_center.read().unwrap();
        let world_radius = *self.world_radius.read().unwrap();

        // Choose point on disk oriented toward infinite light direction.
        let (v1, v2) = coordinate_system(&self.w_light);
        let cd = concentric_sample_disk(u1);
        let p_disk = world_center + world_radius * (cd.x * v1 + cd.y * v2);

        // Set ray origin and direction for infinite light ray.
        let ray = Ray::new(p_disk + world_radius * self.w_light, -self.w_light, INFINITY, time, None);
        let n_light = Normal3f::from(ray.d);

        let pdf_pos = 1.0 / (PI * world_radius * world_radius);
        Le::new(ray, n_light, pdf_pos, 1.0, self.l)
    }

    /// Returns the probability density for the light's `sample_le()`.
    ///
    /// * `ray`     - The ray.
    /// * `n_light` - The normal.
    fn pdf_le(&self, _ray: &Ray, _n_light: &Normal3f) -> Pdf {
        let world_radius = *self.world_radius.read().unwrap();
        Pdf::new(1.0 / (PI * world_radius * world_radius), 0.0)
    }
}

impl From<(&ParamSet, usize)> for DistantLight {
    /// Create a `DistantLight` from given parameter set and id.
    ///
    /// * `p` - A tuple containing the parameter set and id.
    fn from(p: (&ParamSet, usize)) -> Self {
        let (params, id) = p;

        let l = params.find_one_spectrum("L", Spectrum::ONE);
        let sc = params.find_one_spectrum("scale", Spectrum::ONE);
        let from = params.find_one_point3f("from", Point3f::ZERO);
        let to = params.find_one_point3f("to", Point3f::new(0.0, 0.0, 1.0));
        Self::new(id, l * sc, from - to)
    }
}
