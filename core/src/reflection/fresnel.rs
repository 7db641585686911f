//! Fresnel reflectance

use super::fr_dielectric;
use crate::pbrt::*;
use crate::spectrum::*;

/// Computes the amount of light reflected from a surface boundary.
#[derive(Copy, Clone)]
pub enum Fresnel {
    /// Returns 100% reflection for all incoming directions.
    NoOp,

    /// Fresnel reflectance at the boundary between two dielectric media.
    Dielectric {
        /// Index of refraction on the incident side.
        eta_i: Float,
        /// Index of refraction on the transmitted side.
        eta_t: Float,
    },
}

impl Fresnel {
    /// Returns the amount of light reflected by the surface.
    ///
    /// * `cos_theta_i` - Cosine of the incident angle.
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        match self {
            Fresnel::NoOp => Spectrum::ONE,
            Fresnel::Dielectric { eta_i, eta_t } => Spectrum::new(fr_dielectric(cos_theta_i, *eta_i, *eta_t)),
        }
    }
}
