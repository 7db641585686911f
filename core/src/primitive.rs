//! Primitive

use crate::geometry::*;
use crate::interaction::SurfaceInteraction;
use crate::light::ArcLight;
use crate::material::{ArcMaterial, TransportMode};
use std::sync::Arc;

/// Primitive trait bridges geometry processing and shading.
pub trait Primitive {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns geometric details if a ray intersects the primitive. If there
    /// is no intersection, `None` is returned. On intersection, the ray's
    /// `t_max` is updated to the hit distance.
    ///
    /// * `r` - The ray.
    fn intersect<'a>(&'a self, r: &mut Ray) -> Option<SurfaceInteraction<'a>>;

    /// Returns `true` if a ray-primitive intersection succeeds; otherwise
    /// `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool;

    /// Returns a reference to the area light that describes the primitive's
    /// emission distribution, if the primitive is itself a light source.
    fn get_area_light(&self) -> Option<ArcLight>;

    /// Returns a reference to the material instance assigned to the
    /// primitive. Primitives without a material represent pure medium
    /// transitions; rays pass through them unscattered.
    fn get_material(&self) -> Option<ArcMaterial>;

    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Indicates whether the material should use
    ///                            BxDFs that aggregate multiple types of
    ///                            scattering into a single BxDF.
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, mode: TransportMode, allow_multiple_lobes: bool);
}

/// Atomic reference counted `Primitive`.
pub type ArcPrimitive = Arc<dyn Primitive + Send + Sync>;
