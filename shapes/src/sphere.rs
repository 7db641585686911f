//! Sphere

use std::sync::Arc;
use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::transform::ArcTransform;

/// A full sphere of a given radius centered at the object-space origin.
#[derive(Clone)]
pub struct Sphere {
    /// Common shape data.
    pub data: Arc<ShapeData>,

    /// Radius of sphere.
    pub radius: Float,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `object_to_world`     - The object to world transformation.
    /// * `reverse_orientation` - Indicates whether surface normal directions
    ///                           should be reversed from the default.
    /// * `radius`              - Radius of sphere.
    pub fn new(object_to_world: ArcTransform, reverse_orientation: bool, radius: Float) -> Self {
        Self {
            data: Arc::new(ShapeData::new(object_to_world, reverse_orientation)),
            radius,
        }
    }

    /// Returns the sphere center in world space.
    fn center(&self) -> Point3f {
        self.data.object_to_world.transform_point(&Point3f::ZERO)
    }

    /// Solves the quadratic for a ray-sphere intersection in object space and
    /// returns the parametric hit distance inside `(0, t_max)`.
    ///
    /// * `ray` - The ray in object space.
    fn intersect_quadratic(&self, ray: &Ray) -> Option<Float> {
        // Solve in double precision to sidestep catastrophic cancellation for
        // distant or grazing rays.
        let ox = ray.o.x as f64;
        let oy = ray.o.y as f64;
        let oz = ray.o.z as f64;
        let dx = ray.d.x as f64;
        let dy = ray.d.y as f64;
        let dz = ray.d.z as f64;
        let r = self.radius as f64;

        let a = dx * dx + dy * dy + dz * dz;
        let b = 2.0 * (dx * ox + dy * oy + dz * oz);
        let c = ox * ox + oy * oy + oz * oz - r * r;

        let discrim = b * b - 4.0 * a * c;
        if discrim < 0.0 {
            return None;
        }
        let root_discrim = discrim.sqrt();

        let q = if b < 0.0 {
            -0.5 * (b - root_discrim)
        } else {
            -0.5 * (b + root_discrim)
        };
        let (mut t0, mut t1) = (q / a, c / q);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        // Pick the nearest valid hit. A small epsilon rejects self
        // intersections right at the origin.
        let t_min = 1e-4_f64;
        let t_max = ray.t_max as f64;
        if t0 > t_min && t0 < t_max {
            Some(t0 as Float)
        } else if t1 > t_min && t1 < t_max {
            Some(t1 as Float)
        } else {
            None
        }
    }
}

impl Shape for Sphere {
    /// Returns the shape type.
    fn get_type(&self) -> &'static str {
        "sphere"
    }

    /// Returns the underlying shape data.
    fn get_data(&self) -> Arc<ShapeData> {
        Arc::clone(&self.data)
    }

    /// Returns a bounding box in the shape's object space.
    fn object_bound(&self) -> Bounds3f {
        Bounds3f::new(
            Point3f::new(-self.radius, -self.radius, -self.radius),
            Point3f::new(self.radius, self.radius, self.radius),
        )
    }

    /// Returns geometric details if a ray intersects the sphere.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        // Transform ray to object space.
        let ray = self.data.world_to_object.transform_ray(r);
        let t_shape_hit = self.intersect_quadratic(&ray)?;

        // Compute sphere hit position and reproject onto the surface.
        let mut p_hit = ray.at(t_shape_hit);
        p_hit = p_hit * (self.radius / p_hit.distance(Point3f::ZERO));
        if p_hit.x == 0.0 && p_hit.y == 0.0 {
            p_hit.x = 1e-5 * self.radius;
        }
        let mut phi = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }

        // Find parametric representation of sphere hit.
        let u = phi * INV_TWO_PI;
        let theta = clamp(p_hit.z / self.radius, -1.0, 1.0).acos();
        let v = 1.0 - theta * INV_PI;

        // Compute sphere dpdu and dpdv.
        let z_radius = (p_hit.x * p_hit.x + p_hit.y * p_hit.y).sqrt();
        let inv_z_radius = 1.0 / z_radius;
        let cos_phi = p_hit.x * inv_z_radius;
        let sin_phi = p_hit.y * inv_z_radius;
        let dpdu = Vector3f::new(-TWO_PI * p_hit.y, TWO_PI * p_hit.x, 0.0);
        let dpdv = Vector3f::new(p_hit.z * cos_phi, p_hit.z * sin_phi, -self.radius * theta.sin()) * -PI;

        // Compute sphere dndu and dndv.
        let d2pduu = Vector3f::new(p_hit.x, p_hit.y, 0.0) * -TWO_PI * TWO_PI;
        let d2pduv = Vector3f::new(-sin_phi, cos_phi, 0.0) * (-PI) * p_hit.z * TWO_PI;
        let d2pdvv = Vector3f::new(p_hit.x, p_hit.y, p_hit.z) * -(PI * PI);

        // Compute coefficients for fundamental forms.
        let e1 = dpdu.dot(&dpdu);
        let f1 = dpdu.dot(&dpdv);
        let g1 = dpdv.dot(&dpdv);
        let n = dpdu.cross(&dpdv).normalize();
        let e2 = n.dot(&d2pduu);
        let f2 = n.dot(&d2pduv);
        let g2 = n.dot(&d2pdvv);

        let inv_egf2 = 1.0 / (e1 * g1 - f1 * f1);
        let dndu = Normal3f::from(dpdu * ((f2 * f1 - e2 * g1) * inv_egf2) + dpdv * ((e2 * f1 - f2 * e1) * inv_egf2));
        let dndv = Normal3f::from(dpdu * ((g2 * f1 - f2 * g1) * inv_egf2) + dpdv * ((f2 * f1 - g2 * e1) * inv_egf2));

        // Compute error bounds for sphere intersection and transform the
        // interaction to world space.
        let p_error_obj = Vector3f::new(abs(p_hit.x), abs(p_hit.y), abs(p_hit.z)) * gamma(5);
        let o2w = &self.data.object_to_world;

        let isect = SurfaceInteraction::new(
            o2w.transform_point(&p_hit),
            o2w.transform_vector(&p_error_obj).abs(),
            Point2f::new(u, v),
            o2w.transform_vector(&(-ray.d)),
            o2w.transform_vector(&dpdu),
            o2w.transform_vector(&dpdv),
            o2w.transform_normal(&dndu),
            o2w.transform_normal(&dndv),
            ray.time,
            Some(Arc::clone(&self.data)),
        );

        Some(Intersection::new(t_shape_hit, isect))
    }

    /// Returns the surface area of the sphere.
    fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    /// Sample a point on the sphere surface and return the PDF with respect
    /// to area on the surface.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let mut p_obj = Point3f::ZERO + self.radius * uniform_sample_sphere(u);

        let o2w = &self.data.object_to_world;
        let mut n = o2w.transform_normal(&Normal3f::new(p_obj.x, p_obj.y, p_obj.z)).normalize();
        if self.data.reverse_orientation {
            n *= -1.0;
        }

        // Reproject onto sphere surface and compute error bounds.
        p_obj = p_obj * (self.radius / p_obj.distance(Point3f::ZERO));
        let p_error_obj = Vector3f::new(abs(p_obj.x), abs(p_obj.y), abs(p_obj.z)) * gamma(5);

        let hit = Hit::new(
            o2w.transform_point(&p_obj),
            0.0,
            o2w.transform_vector(&p_error_obj).abs(),
            Vector3f::ZERO,
            n,
            None,
        );
        (hit, 1.0 / self.area())
    }

    /// Sample a point on the sphere visible from a reference point by
    /// uniformly sampling the cone of directions subtended by the sphere.
    ///
    /// * `hit` - Reference point.
    /// * `u`   - Sample value to use.
    fn sample_solid_angle(&self, hit: &Hit, u: &Point2f) -> (Hit, Float) {
        let p_center = self.center();

        // Sample the sphere uniformly if the reference point is inside it.
        let p_origin = Ray::offset_origin(&hit.p, &hit.p_error, &hit.n, &(p_center - hit.p));
        if p_origin.distance_squared(p_center) <= self.radius * self.radius {
            let (intr, mut pdf) = self.sample_area(u);
            let mut wi = intr.p - hit.p;
            if wi.length_squared() == 0.0 {
                pdf = 0.0;
            } else {
                // Convert from area measure to solid angle measure.
                wi = wi.normalize();
                pdf *= hit.p.distance_squared(intr.p) / intr.n.abs_dot(&(-wi));
                if pdf.is_infinite() {
                    pdf = 0.0;
                }
            }
            return (intr, pdf);
        }

        // Compute coordinate system for sphere sampling.
        let dc = hit.p.distance(p_center);
        let inv_dc = 1.0 / dc;
        let wc = (p_center - hit.p) * inv_dc;
        let (wc_x, wc_y) = coordinate_system(&wc);

        // Compute theta and phi values for the sample in the cone.
        let sin_theta_max = self.radius * inv_dc;
        let sin_theta_max2 = sin_theta_max * sin_theta_max;
        let inv_sin_theta_max = 1.0 / sin_theta_max;
        let cos_theta_max = max(0.0, 1.0 - sin_theta_max2).sqrt();

        let mut cos_theta = (cos_theta_max - 1.0) * u[0] + 1.0;
        let mut sin_theta2 = 1.0 - cos_theta * cos_theta;

        if sin_theta_max2 < 0.00068523 {
            // Fall back to a Taylor series expansion for small angles, where
            // the standard approach suffers from severe cancellation errors.
            sin_theta2 = sin_theta_max2 * u[0];
            cos_theta = (1.0 - sin_theta2).sqrt();
        }

        // Compute the angle alpha from the center of the sphere to the
        // sampled point on the surface.
        let cos_alpha = sin_theta2 * inv_sin_theta_max
            + cos_theta * max(0.0, 1.0 - sin_theta2 * inv_sin_theta_max * inv_sin_theta_max).sqrt();
        let sin_alpha = max(0.0, 1.0 - cos_alpha * cos_alpha).sqrt();
        let phi = u[1] * TWO_PI;

        // Compute surface normal and sampled point on sphere.
        let n_world = spherical_direction_in_coord_frame(sin_alpha, cos_alpha, phi, &(-wc_x), &(-wc_y), &(-wc));
        let p_world = p_center + self.radius * Vector3f::new(n_world.x, n_world.y, n_world.z);

        let mut n = Normal3f::from(n_world);
        if self.data.reverse_orientation {
            n *= -1.0;
        }

        let p_error = Vector3f::new(abs(p_world.x), abs(p_world.y), abs(p_world.z)) * gamma(5);
        let hit_sample = Hit::new(p_world, hit.time, p_error, Vector3f::ZERO, n, None);

        // Uniform cone PDF.
        (hit_sample, uniform_cone_pdf(cos_theta_max))
    }

    /// Returns the PDF with respect to solid angle for sampling the direction
    /// `wi` from the reference point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_solid_angle(&self, hit: &Hit, wi: &Vector3f) -> Float {
        let p_center = self.center();

        // Return uniform PDF if the point is inside the sphere.
        let p_origin = Ray::offset_origin(&hit.p, &hit.p_error, &hit.n, &(p_center - hit.p));
        if p_origin.distance_squared(p_center) <= self.radius * self.radius {
            // General shape PDF via re-intersection.
            let ray = hit.spawn_ray(wi);
            if let Some(Intersection { t: _t, isect }) = self.intersect(&ray) {
                let pdf = hit.p.distance_squared(isect.hit.p) / (isect.hit.n.abs_dot(&(-*wi)) * self.area());
                if pdf.is_infinite() {
                    return 0.0;
                }
                return pdf;
            }
            return 0.0;
        }

        // Compute general sphere PDF from the cone of directions.
        let sin_theta_max2 = self.radius * self.radius / hit.p.distance_squared(p_center);
        let cos_theta_max = max(0.0, 1.0 - sin_theta_max2).sqrt();
        uniform_cone_pdf(cos_theta_max)
    }
}

impl From<(&ParamSet, ArcTransform, bool)> for Sphere {
    /// Create a `Sphere` from given parameter set, object to world transform
    /// and orientation.
    ///
    /// * `p` - A tuple containing the parameter set, object to world
    ///         transform and reverse orientation flag.
    fn from(p: (&ParamSet, ArcTransform, bool)) -> Self {
        let (params, object_to_world, reverse_orientation) = p;
        let radius = params.find_one_float("radius", 1.0);
        Self::new(object_to_world, reverse_orientation, radius)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::transform::Transform;

    fn unit_sphere_at(p: Point3f) -> Sphere {
        let o2w = Arc::new(Transform::translate(&Vector3f::from(p - Point3f::ZERO)));
        Sphere::new(o2w, false, 1.0)
    }

    #[test]
    fn ray_hits_sphere_head_on() {
        let sphere = unit_sphere_at(Point3f::new(0.0, 0.0, 5.0));
        let mut ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), 1e6, 0.0, None);
        let hit = sphere.intersect(&mut ray).expect("expected intersection");
        assert!((hit.t - 4.0).abs() < 1e-3);
        assert!((hit.isect.hit.p.z - 4.0).abs() < 1e-3);
        // Normal points back towards the ray origin.
        assert!(hit.isect.hit.n.z < 0.0);
    }

    #[test]
    fn ray_misses_sphere() {
        let sphere = unit_sphere_at(Point3f::new(0.0, 0.0, 5.0));
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 1.0, 0.0), 1e6, 0.0, None);
        assert!(sphere.intersect(&ray).is_none());
        assert!(!sphere.intersect_p(&ray));
    }

    #[test]
    fn area_of_unit_sphere() {
        let sphere = unit_sphere_at(Point3f::ZERO);
        assert!((sphere.area() - FOUR_PI).abs() < 1e-4);
    }

    #[test]
    fn sampled_points_lie_on_surface() {
        let sphere = unit_sphere_at(Point3f::new(1.0, 2.0, 3.0));
        let center = Point3f::new(1.0, 2.0, 3.0);
        for i in 0..16 {
            let u = Point2f::new((i as Float + 0.5) / 16.0, ((i * 7) % 16) as Float / 16.0);
            let (hit, pdf) = sphere.sample_area(&u);
            assert!((hit.p.distance(center) - 1.0).abs() < 1e-3);
            assert!((pdf - 1.0 / sphere.area()).abs() < 1e-6);
        }
    }

    #[test]
    fn cone_sampling_sees_sphere() {
        let sphere = unit_sphere_at(Point3f::ZERO);
        let reference = Hit::new_minimal(Point3f::new(0.0, 0.0, 10.0), 0.0, None);
        let (sample, pdf) = sphere.sample_solid_angle(&reference, &Point2f::new(0.5, 0.5));
        assert!(pdf > 0.0);
        // The sampled point faces the reference point.
        let wi = (sample.p - reference.p).normalize();
        assert!(sample.n.dot(&wi) < 0.0);

        // The PDF agrees with the cone of directions subtended by the sphere.
        let sin2 = 1.0 / 100.0;
        let cos_theta_max = (1.0 - sin2 as Float).sqrt();
        assert!((pdf - uniform_cone_pdf(cos_theta_max)).abs() < 1e-4);
    }
}
