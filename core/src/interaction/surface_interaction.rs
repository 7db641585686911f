//! Surface Interactions

use super::Hit;
use crate::geometry::*;
use crate::material::TransportMode;
use crate::pbrt::*;
use crate::primitive::Primitive;
use crate::reflection::BSDF;
use crate::spectrum::*;
use std::sync::Arc;

/// SurfaceInteraction represents geometry of a particular point on a surface.
///
/// The lifetime specifier:
/// * `'scene` - Shared reference to the scene containing the primitive.
#[derive(Clone)]
pub struct SurfaceInteraction<'scene> {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Differential change ∂n/∂u in surface normal as we move along u.
    pub dndu: Normal3f,

    /// Differential change ∂n/∂v in surface normal as we move along v.
    pub dndv: Normal3f,

    /// Shading geometry used for perturbed values.
    pub shading: Shading,

    /// The shape data.
    pub shape_data: Option<Arc<ShapeData>>,

    /// The primitive.
    pub primitive: Option<&'scene dyn Primitive>,

    /// The BSDF at the intersection, filled in by the primitive's material
    /// via `compute_scattering_functions()`.
    pub bsdf: Option<BSDF>,
}

impl<'scene> SurfaceInteraction<'scene> {
    /// Create a new surface interaction.
    ///
    /// * `p`          - Point of interaction.
    /// * `p_error`    - Floating point error for ray intersection points.
    /// * `uv`         - The uv coordinates from surface parametrization.
    /// * `wo`         - The negative ray direction.
    /// * `dpdu`       - Parametric partial derivative of the point ∂p/∂u.
    /// * `dpdv`       - Parametric partial derivative of the point ∂p/∂v.
    /// * `dndu`       - Differential change ∂n/∂u in surface normal along u.
    /// * `dndv`       - Differential change ∂n/∂v in surface normal along v.
    /// * `time`       - Time when interaction occurred.
    /// * `shape_data` - The shape data.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: Point3f,
        p_error: Vector3f,
        uv: Point2f,
        wo: Vector3f,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Normal3f,
        dndv: Normal3f,
        time: Float,
        shape_data: Option<Arc<ShapeData>>,
    ) -> Self {
        // Calculate normal n from the partial derivatives.
        let mut n = Normal3f::from(dpdu.cross(&dpdv).normalize());

        // Adjust normal based on orientation and handedness.
        if let Some(sd) = shape_data.as_ref() {
            if sd.reverse_orientation ^ sd.transform_swaps_handedness {
                n *= -1.0;
            }
        }

        Self {
            hit: Hit::new(p, time, p_error, wo, n, None),
            uv,
            dpdu,
            dpdv,
            dndu,
            dndv,
            shading: Shading::new(n, dpdu, dpdv, dndu, dndv),
            shape_data,
            primitive: None,
            bsdf: None,
        }
    }

    /// Initializes the light-scattering properties of the material at the
    /// intersection point on the primitive's surface. The resulting BSDF is
    /// stored on the interaction.
    ///
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Indicates whether the material should use
    ///                            BxDFs that aggregate multiple types of
    ///                            scattering into a single BxDF.
    pub fn compute_scattering_functions(&mut self, mode: TransportMode, allow_multiple_lobes: bool) {
        if let Some(primitive) = self.primitive {
            primitive.compute_scattering_functions(self, mode, allow_multiple_lobes);
        }
    }

    /// Returns the emitted radiance at a surface point intersected by a ray
    /// for an area light.
    ///
    /// * `w` - The outgoing direction.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        if let Some(area_light) = self.primitive.and_then(|p| p.get_area_light()) {
            area_light.l(&self.hit, w)
        } else {
            Spectrum::ZERO
        }
    }

    /// Spawns a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        self.hit.spawn_ray(d)
    }
}

/// Shading geometry used for perturbed values.
#[derive(Clone)]
pub struct Shading {
    /// Surface normal.
    pub n: Normal3f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Differential change ∂n/∂u in surface normal as we move along u.
    pub dndu: Normal3f,

    /// Differential change ∂n/∂v in surface normal as we move along v.
    pub dndv: Normal3f,
}

impl Shading {
    /// Create a new shading struct.
    ///
    /// * `n`    - Surface normal.
    /// * `dpdu` - Parametric partial derivative of the point ∂p/∂u.
    /// * `dpdv` - Parametric partial derivative of the point ∂p/∂v.
    /// * `dndu` - Differential change ∂n/∂u in surface normal along u.
    /// * `dndv` - Differential change ∂n/∂v in surface normal along v.
    pub fn new(n: Normal3f, dpdu: Vector3f, dpdv: Vector3f, dndu: Normal3f, dndv: Normal3f) -> Self {
        Self { n, dpdu, dpdv, dndu, dndv }
    }
}
