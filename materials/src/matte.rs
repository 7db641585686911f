//! Matte Material

use strata_core::interaction::SurfaceInteraction;
use strata_core::material::*;
use strata_core::paramset::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// Implements purely diffuse surfaces.
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: Spectrum,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd` - Spectral diffuse reflection.
    pub fn new(kd: Spectrum) -> Self {
        Self { kd }
    }
}

impl Material for MatteMaterial {
    /// Initializes the light-scattering properties of the material at the
    /// intersection point on the surface.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `mode`                 - Transport mode (ignored).
    /// * `allow_multiple_lobes` - Ignored.
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, _mode: TransportMode, _allow_multiple_lobes: bool) {
        let mut bsdf = BSDF::new(si, None);

        let r = self.kd.clamp_default();
        if !r.is_black() {
            bsdf.add(BxDF::from(LambertianReflection::new(r)));
        }

        si.bsdf = Some(bsdf);
    }
}

impl From<&ParamSet> for MatteMaterial {
    /// Create a matte material from given parameter set.
    ///
    /// * `params` - The parameter set.
    fn from(params: &ParamSet) -> Self {
        let kd = params.find_one_spectrum("Kd", Spectrum::new(0.5));
        Self::new(kd)
    }
}
