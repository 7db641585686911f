//! Specular Reflection

use super::{abs_cos_theta, BxDFSample, BxDFType, Fresnel, BSDF_REFLECTION, BSDF_SPECULAR};
use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;

/// Models physically plausible specular reflection described by a Dirac delta
/// distribution.
#[derive(Copy, Clone)]
pub struct SpecularReflection {
    /// Reflectance spectrum which gives the fraction of incident light that
    /// is scattered.
    pub r: Spectrum,

    /// Fresnel reflectance at the surface boundary.
    pub fresnel: Fresnel,
}

impl SpecularReflection {
    /// Create a new instance of `SpecularReflection`.
    ///
    /// * `r`       - Reflectance spectrum.
    /// * `fresnel` - Fresnel reflectance at the surface boundary.
    pub fn new(r: Spectrum, fresnel: Fresnel) -> Self {
        Self { r, fresnel }
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BSDF_REFLECTION | BSDF_SPECULAR
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions. Delta distributions return 0 here; all scattering goes
    /// through `sample_f()`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Samples the mirror direction for the given outgoing direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values (unused).
    pub fn sample_f(&self, wo: &Vector3f, _u: &Point2f) -> BxDFSample {
        // Compute the perfect specular reflection direction.
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let pdf = 1.0;
        let f = self.fresnel.evaluate(wi.z) * self.r / abs_cos_theta(&wi);
        BxDFSample::new(f, pdf, wi, self.get_type())
    }

    /// Evaluates the PDF for the sampling method. The delta distribution has
    /// zero probability of being sampled by any other direction pair.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0
    }
}
