//! Diffuse Area Light Source

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::rng::ONE_MINUS_EPSILON;
use strata_core::sampling::*;
use strata_core::spectrum::*;

/// Implements a basic area light source with uniform spatial and directional
/// radiance distribution.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Light ID.
    pub id: usize,

    /// Light source type.
    pub light_type: LightType,

    /// Participating medium around the light.
    pub medium_interface: MediumInterface,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Shape describing the surface of the light source.
    pub shape: ArcShape,

    /// Surface area of the shape.
    pub area: Float,

    /// Indicates whether the light source is two-sided.
    pub two_sided: bool,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `id`               - Light ID.
    /// * `medium_interface` - Participating medium around the light.
    /// * `l_emit`           - Emitted radiance.
    /// * `shape`            - Shape describing the surface of the light.
    /// * `two_sided`        - Indicates whether the light source is two-sided.
    pub fn new(id: usize, medium_interface: MediumInterface, l_emit: Spectrum, shape: ArcShape, two_sided: bool) -> Self {
        let area = shape.area();
        Self {
            id,
            light_type: LightType(AREA_LIGHT),
            medium_interface,
            l_emit,
            shape,
            two_sided,
            area,
        }
    }
}

impl Light for DiffuseAreaLight {
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
        let (mut p_shape_hit, pdf) = self.shape.sample_solid_angle(hit, u);
        p_shape_hit.medium_interface = Some(self.medium_interface.clone());

        let wi = p_shape_hit.p - hit.p;
        if pdf == 0.0 || wi.length_squared() == 0.0 {
            return None;
        }

        let wi = wi.normalize();
        let value = self.l(&p_shape_hit, &(-wi));
        let visibility = VisibilityTester::new(hit.clone(), p_shape_hit);
        Some(Li::new(wi, pdf, visibility, value))
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let sides = if self.two_sided { 2.0 } else { 1.0 };
        self.l_emit * sides * self.area * PI
    }

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float {
        self.shape.pdf_solid_angle(hit, wi)
    }

    /// Returns a sampled light-carrying ray leaving the light source.
    ///
    /// * `u1`   - Sample values for Monte Carlo.
    /// * `u2`   - Sample values for Monte Carlo.
    /// * `time` - Time to use for the ray.
    fn sample_le(&self, u1: &Point2f, u2: &Point2f, time: Float) -> Le {
        let (mut p_shape_hit, pdf_pos) = self.shape.sample_area(u1);
        p_shape_hit.medium_interface = Some(self.medium_interface.clone());
        let n_light = p_shape_hit.n;

        // Sample a cosine-weighted outgoing direction `w` for the area light.
        let pdf_dir: Float;
        let mut w: Vector3f;
        if self.two_sided {
            let mut u = *u2;
            // Choose a side to sample and then remap u[0] to [0,1] before
            // applying cosine-weighted hemisphere sampling for the chosen
            // side.
            if u[0] < 0.5 {
                u.x = min(u[0] * 2.0, ONE_MINUS_EPSILON);
                w = cosine_sample_hemisphere(&u);
            } else {
                u.x = min((u[0] - 0.5) * 2.0, ONE_MINUS_EPSILON);
                w = cosine_sample_hemisphere(&u);
                w.z *= -1.0;
            }
            pdf_dir = 0.5 * cosine_hemisphere_pdf(abs(w.z));
        } else {
            w = cosine_sample_hemisphere(u2);
            pdf_dir = cosine_hemisphere_pdf(w.z);
        }

        let n = Vector3f::from(p_shape_hit.n);
        let (v1, v2) = coordinate_system(&n);
        w = w.x * v1 + w.y * v2 + w.z * n;

        let mut ray = p_shape_hit.spawn_ray(&w);
        ray.time = time;

        let value = self.l(&p_shape_hit, &w);
        Le::new(ray, n_light, pdf_pos, pdf_dir, value)
    }

    /// Returns the probability density for the light's `sample_le()`.
    ///
    /// * `ray`     - The ray.
    /// * `n_light` - The normal at the ray origin on the light.
    fn pdf_le(&self, ray: &Ray, n_light: &Normal3f) -> Pdf {
        let hit = Hit::new_minimal(ray.o, ray.time, None);
        let pdf_pos = self.shape.pdf(&hit);
        let cos = n_light.dot(&ray.d);
        let pdf_dir = if self.two_sided {
            0.5 * cosine_hemisphere_pdf(abs(cos))
        } else {
            cosine_hemisphere_pdf(cos)
        };
        Pdf::new(pdf_pos, max(pdf_dir, 0.0))
    }

    /// Returns emitted radiance in a given outgoing direction from a point on
    /// the light surface.
    ///
    /// * `hit` - Point on the light surface.
    /// * `w`   - Outgoing direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum {
        if self.two_sided || hit.n.dot(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::ZERO
        }
    }
}

impl From<(&ParamSet, Option<ArcMedium>, ArcShape, usize)> for DiffuseAreaLight {
    /// Create a `DiffuseAreaLight` from given parameter set, medium, shape
    /// and id.
    ///
    /// * `p` - A tuple containing the parameter set, medium, shape and id.
    fn from(p: (&ParamSet, Option<ArcMedium>, ArcShape, usize)) -> Self {
        let (params, medium, shape, id) = p;

        let l = params.find_one_spectrum("L", Spectrum::ONE);
        let sc = params.find_one_spectrum("scale", Spectrum::ONE);
        let two_sided = params.find_one_bool("twosided", false);

        Self::new(id, MediumInterface::from(medium), l * sc, shape, two_sided)
    }
}
