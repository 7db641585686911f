//! Mirror Material

use strata_core::interaction::SurfaceInteraction;
use strata_core::material::*;
use strata_core::paramset::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// Implements a perfectly specular mirror.
pub struct MirrorMaterial {
    /// Spectral reflectivity of the mirror.
    kr: Spectrum,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr` - Spectral reflectivity of the mirror.
    pub fn new(kr: Spectrum) -> Self {
        Self { kr }
    }
}

impl Material for MirrorMaterial {
    /// Initializes the light-scattering properties of the material at the
    /// intersection point on the surface.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `mode`                 - Transport mode (ignored).
    /// * `allow_multiple_lobes` - Ignored.
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, _mode: TransportMode, _allow_multiple_lobes: bool) {
        let mut bsdf = BSDF::new(si, None);

        let r = self.kr.clamp_default();
        if !r.is_black() {
            bsdf.add(BxDF::from(SpecularReflection::new(r, Fresnel::NoOp)));
        }

        si.bsdf = Some(bsdf);
    }
}

impl From<&ParamSet> for MirrorMaterial {
    /// Create a mirror material from given parameter set.
    ///
    /// * `params` - The parameter set.
    fn from(params: &ParamSet) -> Self {
        let kr = params.find_one_spectrum("Kr", Spectrum::new(0.9));
        Self::new(kr)
    }
}
