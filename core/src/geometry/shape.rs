//! Shapes

#![allow(dead_code)]

use super::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::transform::ArcTransform;
use std::sync::Arc;

/// Shape common functions
pub trait Shape {
    /// Returns the shape type. Usually these are behind ArcShape and harder to
    /// debug. So this will be helpful.
    fn get_type(&self) -> &'static str;

    /// Returns the underlying shape data.
    fn get_data(&self) -> Arc<ShapeData>;

    /// Returns a bounding box in the shapes object space.
    fn object_bound(&self) -> Bounds3f;

    /// Returns a bounding box in the world space.
    ///
    /// Default is to transform the object bounds with the object-to-world
    /// transformation. Override for tighter bounds implementation.
    fn world_bound(&self) -> Bounds3f {
        self.get_data().object_to_world.transform_bounds(&self.object_bound())
    }

    /// Returns geometric details if a ray intersects the shape. If there is no
    /// intersection, `None` is returned.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>>;

    /// Returns `true` if a ray-shape intersection succeeds; otherwise `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.intersect(r).is_some()
    }

    /// Returns the surface area of the shape in object space.
    fn area(&self) -> Float;

    /// Sample a point on the surface and return the PDF with respect to area on
    /// the surface.
    ///
    /// NOTE: The returned `Hit` value will have `wo` = Vector3f::ZERO.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float);

    /// Sample a point on the shape given a reference point and return the PDF
    /// with respect to the solid angle from ref.
    ///
    /// * `hit` - Reference point on shape.
    /// * `u`   - Sample value to use.
    fn sample_solid_angle(&self, hit: &Hit, u: &Point2f) -> (Hit, Float) {
        let (intr, mut pdf) = self.sample_area(u);
        let mut wi = intr.p - hit.p;

        if wi.length_squared() == 0.0 {
            pdf = 0.0;
        } else {
            wi = wi.normalize();
            // Convert from area measure, as returned by the sample_area() call
            // above, to solid angle measure.
            pdf *= hit.p.distance_squared(intr.p) / intr.n.abs_dot(&(-wi));
            if pdf.is_infinite() {
                pdf = 0.0;
            }
        }

        (intr, pdf)
    }

    /// Return the PDF with respect to surface area. By default it is 1/area.
    ///
    /// * `hit` - The interaction hit point.
    fn pdf(&self, _hit: &Hit) -> Float {
        1.0 / self.area()
    }

    /// Returns the PDF with respect to solid angle.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_solid_angle(&self, hit: &Hit, wi: &Vector3f) -> Float {
        // Intersect sample ray with area light geometry.
        let ray = hit.spawn_ray(wi);

        if let Some(Intersection { t: _t_hit, isect }) = self.intersect(&ray) {
            // Convert light sample weight to solid angle measure.
            let pdf = hit.p.distance_squared(isect.hit.p) / (isect.hit.n.abs_dot(&(-*wi)) * self.area());
            if pdf.is_infinite() {
                0.0
            } else {
                pdf
            }
        } else {
            0.0
        }
    }
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;

/// Stores geometric information about a single ray-shape intersection.
pub struct Intersection<'scene> {
    /// The parameter along the ray where intersection occurred.
    pub t: Float,

    /// The surface interaction details.
    pub isect: SurfaceInteraction<'scene>,
}

impl<'scene> Intersection<'scene> {
    /// Create a new intersection.
    ///
    /// * `t`     - The parameter along the ray where intersection occurred.
    /// * `isect` - The surface interaction details.
    pub fn new(t: Float, isect: SurfaceInteraction<'scene>) -> Self {
        Self { t, isect }
    }
}

/// Store common shape data.
#[derive(Clone)]
pub struct ShapeData {
    /// The object to world transformation.
    pub object_to_world: ArcTransform,

    /// The world to object transformation.
    pub world_to_object: ArcTransform,

    /// Indicates whether their surface normal directions should be reversed
    /// from the default.
    pub reverse_orientation: bool,

    /// Indicates if `object_to_world` transformation changes the handedness
    /// of the coordinate system.
    pub transform_swaps_handedness: bool,
}

impl ShapeData {
    /// Create a new instance of shape data.
    ///
    /// * `object_to_world`     - The object to world transformation.
    /// * `reverse_orientation` - Indicates whether their surface normal
    ///                           directions should be reversed from the default.
    pub fn new(object_to_world: ArcTransform, reverse_orientation: bool) -> Self {
        let world_to_object = Arc::new(object_to_world.inverse());
        let transform_swaps_handedness = object_to_world.swaps_handedness();
        Self {
            object_to_world,
            world_to_object,
            reverse_orientation,
            transform_swaps_handedness,
        }
    }
}
