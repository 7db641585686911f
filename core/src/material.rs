//! Material

use crate::interaction::SurfaceInteraction;
use std::sync::Arc;

/// Light transport mode enumeration.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TransportMode {
    /// Indicates the incident ray that intersected a point started at the
    /// camera.
    Radiance,

    /// Indicates the incident ray that intersected a point started at a light
    /// source.
    Importance,
}

/// Material trait provides common behavior.
pub trait Material {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface. The resulting BSDF
    /// is stored on the interaction.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Indicates whether the material should use
    ///                            BxDFs that aggregate multiple types of
    ///                            scattering into a single BxDF when such
    ///                            BxDFs are available.
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, mode: TransportMode, allow_multiple_lobes: bool);
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
