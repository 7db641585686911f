//! Disk

use std::sync::Arc;
use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::transform::ArcTransform;

/// A disk of a given radius lying in the object-space xy-plane at a given
/// height along the z-axis.
#[derive(Clone)]
pub struct Disk {
    /// Common shape data.
    pub data: Arc<ShapeData>,

    /// Height along the z-axis.
    pub height: Float,

    /// Radius of disk.
    pub radius: Float,

    /// Inner radius of disk creating an annulus when non-zero.
    pub inner_radius: Float,
}

impl Disk {
    /// Create a new disk.
    ///
    /// * `object_to_world`     - The object to world transformation.
    /// * `reverse_orientation` - Indicates whether surface normal directions
    ///                           should be reversed from the default.
    /// * `height`              - Height along the z-axis.
    /// * `radius`              - Radius of disk.
    /// * `inner_radius`        - Inner radius of disk.
    pub fn new(
        object_to_world: ArcTransform,
        reverse_orientation: bool,
        height: Float,
        radius: Float,
        inner_radius: Float,
    ) -> Self {
        Self {
            data: Arc::new(ShapeData::new(object_to_world, reverse_orientation)),
            height,
            radius,
            inner_radius,
        }
    }
}

impl Shape for Disk {
    /// Returns the shape type.
    fn get_type(&self) -> &'static str {
        "disk"
    }

    /// Returns the underlying shape data.
    fn get_data(&self) -> Arc<ShapeData> {
        Arc::clone(&self.data)
    }

    /// Returns a bounding box in the shape's object space.
    fn object_bound(&self) -> Bounds3f {
        Bounds3f::new(
            Point3f::new(-self.radius, -self.radius, self.height - 1e-4),
            Point3f::new(self.radius, self.radius, self.height + 1e-4),
        )
    }

    /// Returns geometric details if a ray intersects the disk.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        // Transform ray to object space.
        let ray = self.data.world_to_object.transform_ray(r);

        // Reject disk intersections for rays parallel to the disk's plane.
        if ray.d.z == 0.0 {
            return None;
        }
        let t_shape_hit = (self.height - ray.o.z) / ray.d.z;
        if t_shape_hit <= 1e-4 || t_shape_hit >= ray.t_max {
            return None;
        }

        // See if hit point is inside disk radii.
        let mut p_hit = ray.at(t_shape_hit);
        let dist2 = p_hit.x * p_hit.x + p_hit.y * p_hit.y;
        if dist2 > self.radius * self.radius || dist2 < self.inner_radius * self.inner_radius {
            return None;
        }

        let mut phi = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }

        // Find parametric representation of disk hit.
        let u = phi * INV_TWO_PI;
        let r_hit = dist2.sqrt();
        let v = (self.radius - r_hit) / (self.radius - self.inner_radius);
        let dpdu = Vector3f::new(-TWO_PI * p_hit.y, TWO_PI * p_hit.x, 0.0);
        let dpdv = Vector3f::new(p_hit.x, p_hit.y, 0.0) * ((self.inner_radius - self.radius) / r_hit);

        // Refine disk intersection point.
        p_hit.z = self.height;

        let o2w = &self.data.object_to_world;
        let isect = SurfaceInteraction::new(
            o2w.transform_point(&p_hit),
            Vector3f::ZERO,
            Point2f::new(u, v),
            o2w.transform_vector(&(-ray.d)),
            o2w.transform_vector(&dpdu),
            o2w.transform_vector(&dpdv),
            Normal3f::ZERO,
            Normal3f::ZERO,
            ray.time,
            Some(Arc::clone(&self.data)),
        );

        Some(Intersection::new(t_shape_hit, isect))
    }

    /// Returns the surface area of the disk.
    fn area(&self) -> Float {
        PI * (self.radius * self.radius - self.inner_radius * self.inner_radius)
    }

    /// Sample a point on the disk surface and return the PDF with respect to
    /// area on the surface.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let pd = concentric_sample_disk(u);
        let p_obj = Point3f::new(pd.x * self.radius, pd.y * self.radius, self.height);

        let o2w = &self.data.object_to_world;
        let mut n = o2w.transform_normal(&Normal3f::new(0.0, 0.0, 1.0)).normalize();
        if self.data.reverse_orientation {
            n *= -1.0;
        }

        let hit = Hit::new(o2w.transform_point(&p_obj), 0.0, Vector3f::ZERO, Vector3f::ZERO, n, None);
        (hit, 1.0 / self.area())
    }
}

impl From<(&ParamSet, ArcTransform, bool)> for Disk {
    /// Create a `Disk` from given parameter set, object to world transform
    /// and orientation.
    ///
    /// * `p` - A tuple containing the parameter set, object to world
    ///         transform and reverse orientation flag.
    fn from(p: (&ParamSet, ArcTransform, bool)) -> Self {
        let (params, object_to_world, reverse_orientation) = p;
        let height = params.find_one_float("height", 0.0);
        let radius = params.find_one_float("radius", 1.0);
        let inner_radius = params.find_one_float("innerradius", 0.0);
        Self::new(object_to_world, reverse_orientation, height, radius, inner_radius)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::transform::Transform;

    #[test]
    fn ray_hits_disk() {
        let disk = Disk::new(Arc::new(Transform::default()), false, 2.0, 1.0, 0.0);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), 1e6, 0.0, None);
        let hit = disk.intersect(&ray).expect("expected intersection");
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!((hit.isect.hit.p.z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_annulus_hole() {
        let disk = Disk::new(Arc::new(Transform::default()), false, 2.0, 1.0, 0.5);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), 1e6, 0.0, None);
        assert!(disk.intersect(&ray).is_none());
    }

    #[test]
    fn samples_are_on_disk() {
        let disk = Disk::new(Arc::new(Transform::default()), false, 1.0, 2.0, 0.0);
        for i in 0..16 {
            let u = Point2f::new((i as Float + 0.5) / 16.0, ((5 * i) % 16) as Float / 16.0);
            let (hit, pdf) = disk.sample_area(&u);
            assert!((hit.p.z - 1.0).abs() < 1e-5);
            assert!(hit.p.x * hit.p.x + hit.p.y * hit.p.y <= 4.0 + 1e-4);
            assert!((pdf - 1.0 / disk.area()).abs() < 1e-6);
        }
    }
}
