//! Primitive List

use crate::geometry::*;
use crate::interaction::SurfaceInteraction;
use crate::light::ArcLight;
use crate::material::{ArcMaterial, TransportMode};
use crate::primitive::{ArcPrimitive, Primitive};

/// A linear aggregate that tests every contained primitive in turn. Suitable
/// for the small scenes this renderer is driven with; a full acceleration
/// structure would slot in behind the same `Primitive` interface.
pub struct PrimitiveList {
    /// The primitives.
    pub primitives: Vec<ArcPrimitive>,

    /// World space bounds of all primitives.
    world_bound: Bounds3f,
}

impl PrimitiveList {
    /// Create a new `PrimitiveList`.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<ArcPrimitive>) -> Self {
        let world_bound = primitives
            .iter()
            .fold(Bounds3f::EMPTY, |b, p| b.union(&p.world_bound()));
        Self { primitives, world_bound }
    }
}

impl Primitive for PrimitiveList {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }

    /// Intersect the ray against all primitives, returning the closest
    /// intersection. The ray's `t_max` shrinks as closer hits are found.
    ///
    /// * `r` - The ray.
    fn intersect<'a>(&'a self, r: &mut Ray) -> Option<SurfaceInteraction<'a>> {
        let mut result: Option<SurfaceInteraction<'a>> = None;
        for primitive in self.primitives.iter() {
            if let Some(isect) = primitive.intersect(r) {
                result = Some(isect);
            }
        }
        result
    }

    /// Returns `true` if the ray intersects any primitive.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(r))
    }

    /// Aggregates are never emissive themselves.
    fn get_area_light(&self) -> Option<ArcLight> {
        None
    }

    /// Aggregates carry no material.
    fn get_material(&self) -> Option<ArcMaterial> {
        None
    }

    /// Aggregates never compute scattering functions; the error is a bug in
    /// the calling code.
    fn compute_scattering_functions(&self, _si: &mut SurfaceInteraction, _mode: TransportMode, _allow_multiple_lobes: bool) {
        error!("PrimitiveList::compute_scattering_functions() should not be called");
    }
}
