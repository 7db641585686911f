//! Geometric Primitive

use crate::geometry::*;
use crate::interaction::SurfaceInteraction;
use crate::light::ArcLight;
use crate::material::{ArcMaterial, TransportMode};
use crate::medium::MediumInterface;
use crate::primitive::Primitive;
use std::sync::Arc;

/// GeometricPrimitive combines a shape, its material, and an optional area
/// light into a single scene object.
pub struct GeometricPrimitive {
    /// The shape.
    pub shape: ArcShape,

    /// The material. Primitives without a material mark pure medium
    /// transitions.
    pub material: Option<ArcMaterial>,

    /// The area light if the shape is emissive.
    pub area_light: Option<ArcLight>,

    /// The medium interface at the primitive's boundary.
    pub medium_interface: Option<MediumInterface>,
}

impl GeometricPrimitive {
    /// Create a new `GeometricPrimitive`.
    ///
    /// * `shape`            - The shape.
    /// * `material`         - The material.
    /// * `area_light`       - The area light if the shape is emissive.
    /// * `medium_interface` - The medium interface at the boundary.
    pub fn new(
        shape: ArcShape,
        material: Option<ArcMaterial>,
        area_light: Option<ArcLight>,
        medium_interface: Option<MediumInterface>,
    ) -> Self {
        Self {
            shape,
            material,
            area_light,
            medium_interface,
        }
    }
}

impl Primitive for GeometricPrimitive {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f {
        self.shape.world_bound()
    }

    /// Returns geometric details if a ray intersects the primitive. On
    /// intersection, the ray's `t_max` is updated to the hit distance.
    ///
    /// * `r` - The ray.
    fn intersect<'a>(&'a self, r: &mut Ray) -> Option<SurfaceInteraction<'a>> {
        self.shape.intersect(r).map(|mut intersection| {
            r.t_max = intersection.t;
            intersection.isect.primitive = Some(self);

            // Initialize the medium interface at the intersection. When the
            // primitive does not mark a medium transition, the ray's medium
            // applies on both sides.
            intersection.isect.hit.medium_interface = match self.medium_interface.as_ref() {
                Some(mi) if mi.is_medium_transition() => Some(mi.clone()),
                _ => Some(MediumInterface::from(r.medium.as_ref().map(Arc::clone))),
            };

            intersection.isect
        })
    }

    /// Returns `true` if a ray-primitive intersection succeeds.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.shape.intersect_p(r)
    }

    /// Returns the area light if the primitive is emissive.
    fn get_area_light(&self) -> Option<ArcLight> {
        self.area_light.as_ref().map(Arc::clone)
    }

    /// Returns the material instance assigned to the primitive.
    fn get_material(&self) -> Option<ArcMaterial> {
        self.material.as_ref().map(Arc::clone)
    }

    /// Initializes the light-scattering properties of the material at the
    /// intersection point.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Indicates whether the material should use
    ///                            aggregate BxDFs when available.
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, mode: TransportMode, allow_multiple_lobes: bool) {
        if let Some(material) = self.material.as_ref() {
            material.compute_scattering_functions(si, mode, allow_multiple_lobes);
        }
    }
}
