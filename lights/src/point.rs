//! Point Light Source

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::spectrum::*;
use std::sync::Arc;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone)]
pub struct PointLight {
    /// Light ID. This is usually the index of the light in the scene's light
    /// sources.
    pub id: usize,

    /// Light source type.
    pub light_type: LightType,

    /// Participating medium around the light.
    pub medium_interface: MediumInterface,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `id`               - Light ID.
    /// * `p_light`          - Position.
    /// * `medium_interface` - Participating medium around the light.
    /// * `intensity`        - Intensity.
    pub fn new(id: usize, p_light: Point3f, medium_interface: MediumInterface, intensity: Spectrum) -> Self {
        Self {
            id,
            light_type: LightType(DELTA_POSITION_LIGHT),
            medium_interface,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
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
        let wi = (self.p_light - hit.p).normalize();
        let pdf = 1.0;

        let p0 = hit.clone();
        let p1 = Hit::new_minimal(self.p_light, hit.time, Some(self.medium_interface.clone()));
        let vis = VisibilityTester::new(p0, p1);

        let value = self.intensity / self.p_light.distance_squared(hit.p);
        Some(Li::new(wi, pdf, vis, value))
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        FOUR_PI * self.intensity
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
        let dir = uniform_sample_sphere(u1);
        let ray = Ray::new(
            self.p_light,
            dir,
            INFINITY,
            time,
            self.medium_interface.inside.as_ref().map(Arc::clone),
        );
        Le::new(ray, Normal3f::from(dir), 1.0, uniform_sphere_pdf(), self.intensity)
    }

    /// Returns the probability density for the light's `sample_le()`.
    ///
    /// * `ray`     - The ray.
    /// * `n_light` - The normal.
    fn pdf_le(&self, _ray: &Ray, _n_light: &Normal3f) -> Pdf {
        Pdf::new(0.0, uniform_sphere_pdf())
    }
}

impl From<(&ParamSet, Option<ArcMedium>, usize)> for PointLight {
    /// Create a `PointLight` from given parameter set, medium and id.
    ///
    /// * `p` - A tuple containing the parameter set, medium and id.
    fn from(p: (&ParamSet, Option<ArcMedium>, usize)) -> Self {
        let (params, medium, id) = p;

        let intensity = params.find_one_spectrum("I", Spectrum::ONE);
        let sc = params.find_one_spectrum("scale", Spectrum::ONE);
        let from = params.find_one_point3f("from", Point3f::ZERO);
        Self::new(id, from, MediumInterface::from(medium), intensity * sc)
    }
}
