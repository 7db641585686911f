//! Perspective Camera

use std::mem::swap;
use strata_core::camera::*;
use strata_core::film::*;
use strata_core::geometry::*;
use strata_core::interaction::Hit;
use strata_core::light::VisibilityTester;
use strata_core::medium::{ArcMedium, MediumInterface};
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::spectrum::*;
use strata_core::transform::Transform;

/// Perspective camera.
pub struct PerspectiveCamera {
    /// Common camera parameters.
    pub data: CameraData,

    /// Projective camera parameters.
    pub proj_data: ProjectiveCameraData,

    /// Differential change in x-coordinate of origin for camera rays.
    pub dx_camera: Vector3f,

    /// Differential change in y-coordinate of origin for camera rays.
    pub dy_camera: Vector3f,

    /// Area covered by the image plane bounds at z=1.
    pub a: Float,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `camera_to_world` - Transformation describing the camera's placement
    ///                       in the scene.
    /// * `screen_window`   - Bounds of screen space.
    /// * `shutter_open`    - Time when shutter is open.
    /// * `shutter_close`   - Time when shutter is closed.
    /// * `lens_radius`     - Radius of camera lens.
    /// * `focal_distance`  - Focal distance.
    /// * `fov`             - The field-of-view angle in degrees.
    /// * `film`            - The film to capture the rendered image.
    /// * `medium`          - Scattering medium the camera lies in.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        camera_to_world: Transform,
        screen_window: Bounds2f,
        shutter_open: Float,
        shutter_close: Float,
        lens_radius: Float,
        focal_distance: Float,
        fov: Float,
        film: Film,
        medium: Option<ArcMedium>,
    ) -> Self {
        let res = film.full_resolution;

        let data = CameraData::new(camera_to_world, shutter_open, shutter_close, film, medium);
        let proj_data = ProjectiveCameraData::new(
            &data,
            Transform::perspective(fov, 1e-2, 1000.0),
            screen_window,
            lens_radius,
            focal_distance,
        );

        // Compute differential changes in origin for perspective camera rays.
        let dx_camera = proj_data.raster_to_camera.transform_point(&Point3f::new(1.0, 0.0, 0.0))
            - proj_data.raster_to_camera.transform_point(&Point3f::new(0.0, 0.0, 0.0));
        let dy_camera = proj_data.raster_to_camera.transform_point(&Point3f::new(0.0, 1.0, 0.0))
            - proj_data.raster_to_camera.transform_point(&Point3f::new(0.0, 0.0, 0.0));

        // Compute the image plane bounds at z=1 for the perspective camera.
        let mut p_min = proj_data.raster_to_camera.transform_point(&Point3f::new(0.0, 0.0, 0.0));
        let mut p_max = proj_data
            .raster_to_camera
            .transform_point(&Point3f::new(res.x as Float, res.y as Float, 0.0));
        p_min /= p_min.z;
        p_max /= p_max.z;
        let a = abs((p_max.x - p_min.x) * (p_max.y - p_min.y));

        Self {
            data,
            proj_data,
            dx_camera,
            dy_camera,
            a,
        }
    }

    /// Returns the area of the camera lens; pinhole cameras use a nominal
    /// unit lens area.
    fn lens_area(&self) -> Float {
        if self.proj_data.lens_radius != 0.0 {
            PI * self.proj_data.lens_radius * self.proj_data.lens_radius
        } else {
            1.0
        }
    }
}

impl Camera for PerspectiveCamera {
    /// Returns the camera data.
    fn get_data(&self) -> &CameraData {
        &self.data
    }

    /// Returns a ray corresponding to a given sample along with a weight for
    /// how much the radiance arriving at the film plane contributes to the
    /// final image.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float) {
        // Compute raster and camera sample positions.
        let p_film = Point3f::new(sample.p_film.x, sample.p_film.y, 0.0);
        let p_camera = self.proj_data.raster_to_camera.transform_point(&p_film);

        let mut ray = Ray::new(
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::from(p_camera).normalize(),
            INFINITY,
            lerp(sample.time, self.data.shutter_open, self.data.shutter_close),
            self.data.medium.clone(),
        );

        // Modify ray for depth of field.
        if self.proj_data.lens_radius > 0.0 {
            // Sample point on lens.
            let p_lens = concentric_sample_disk(&sample.p_lens) * self.proj_data.lens_radius;

            // Compute point on plane of focus.
            let ft = self.proj_data.focal_distance / ray.d.z;
            let p_focus = ray.at(ft);

            // Update ray for effect of lens.
            ray.o = Point3f::new(p_lens.x, p_lens.y, 0.0);
            ray.d = (p_focus - ray.o).normalize();
        }

        (self.data.camera_to_world.transform_ray(&ray), 1.0)
    }

    /// Returns a main ray and rays shifted one pixel in the x and y
    /// directions on the film plane.
    ///
    /// * `sample` - The sample.
    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Float) {
        let (mut ray, weight) = {
            let camera_to_world = self.data.camera_to_world;
            let p_film = Point3f::new(sample.p_film.x, sample.p_film.y, 0.0);
            let p_camera = self.proj_data.raster_to_camera.transform_point(&p_film);

            let mut ray = Ray::new(
                Point3f::new(0.0, 0.0, 0.0),
                Vector3f::from(p_camera).normalize(),
                INFINITY,
                lerp(sample.time, self.data.shutter_open, self.data.shutter_close),
                self.data.medium.clone(),
            );

            if self.proj_data.lens_radius > 0.0 {
                let p_lens = concentric_sample_disk(&sample.p_lens) * self.proj_data.lens_radius;
                let ft = self.proj_data.focal_distance / ray.d.z;
                let p_focus = ray.at(ft);
                ray.o = Point3f::new(p_lens.x, p_lens.y, 0.0);
                ray.d = (p_focus - ray.o).normalize();
            }

            // Compute ray differentials for the perspective camera.
            let rd = if self.proj_data.lens_radius > 0.0 {
                // Account for the lens in the offset rays.
                let p_lens = concentric_sample_disk(&sample.p_lens) * self.proj_data.lens_radius;

                let dx = Vector3f::from(p_camera + self.dx_camera).normalize();
                let ft = self.proj_data.focal_distance / dx.z;
                let p_focus = Point3f::new(0.0, 0.0, 0.0) + (ft * dx);
                let rx_origin = Point3f::new(p_lens.x, p_lens.y, 0.0);
                let rx_direction = (p_focus - rx_origin).normalize();

                let dy = Vector3f::from(p_camera + self.dy_camera).normalize();
                let ft = self.proj_data.focal_distance / dy.z;
                let p_focus = Point3f::new(0.0, 0.0, 0.0) + (ft * dy);
                let ry_origin = Point3f::new(p_lens.x, p_lens.y, 0.0);
                let ry_direction = (p_focus - ry_origin).normalize();

                RayDifferential::new(rx_origin, ry_origin, rx_direction, ry_direction)
            } else {
                let rx_direction = (Vector3f::from(p_camera) + self.dx_camera).normalize();
                let ry_direction = (Vector3f::from(p_camera) + self.dy_camera).normalize();
                RayDifferential::new(ray.o, ray.o, rx_direction, ry_direction)
            };
            ray.differentials = Some(rd);

            (camera_to_world.transform_ray(&ray), 1.0)
        };
        ray.t_max = INFINITY;
        (ray, weight)
    }

    /// Evaluate the importance emitted from the point on the lens in the
    /// direction of a given ray.
    ///
    /// * `ray` - The ray.
    fn we(&self, ray: &Ray) -> (Spectrum, Option<Point2f>) {
        // Check if the direction is forward-facing with respect to the
        // camera.
        let camera_z = self.data.camera_to_world.transform_vector(&Vector3f::new(0.0, 0.0, 1.0));
        let cos_theta = ray.d.dot(&camera_z);
        if cos_theta <= 0.0 {
            return (Spectrum::ZERO, None);
        }

        // Map the ray onto the raster grid.
        let focus = if self.proj_data.lens_radius > 0.0 {
            self.proj_data.focal_distance
        } else {
            1.0
        };
        let p_focus = ray.at(focus / cos_theta);
        let p_camera = self.data.camera_to_world.inverse().transform_point(&p_focus);
        let p_raster3 = self.proj_data.raster_to_camera.inverse().transform_point(&p_camera);
        let p_raster = Point2f::new(p_raster3.x, p_raster3.y);

        // Return zero importance for points outside the image extent.
        let sample_bounds = self.data.film.get_sample_bounds();
        let p_raster_i = Point2i::new(p_raster.x as Int, p_raster.y as Int);
        if !sample_bounds.contains_exclusive(&p_raster_i) {
            return (Spectrum::ZERO, Some(p_raster));
        }

        // Compute the importance for the given ray.
        let cos2_theta = cos_theta * cos_theta;
        let we = 1.0 / (self.a * self.lens_area() * cos2_theta * cos2_theta);
        (Spectrum::new(we), Some(p_raster))
    }

    /// Return the spatial and directional PDFs for sampling a particular ray
    /// leaving the camera.
    ///
    /// * `ray` - The ray.
    fn pdf_we(&self, ray: &Ray) -> PDFResult {
        let camera_z = self.data.camera_to_world.transform_vector(&Vector3f::new(0.0, 0.0, 1.0));
        let cos_theta = ray.d.dot(&camera_z);
        if cos_theta <= 0.0 {
            return PDFResult { pos: 0.0, dir: 0.0 };
        }

        // Map the ray onto the raster grid.
        let focus = if self.proj_data.lens_radius > 0.0 {
            self.proj_data.focal_distance
        } else {
            1.0
        };
        let p_focus = ray.at(focus / cos_theta);
        let p_camera = self.data.camera_to_world.inverse().transform_point(&p_focus);
        let p_raster3 = self.proj_data.raster_to_camera.inverse().transform_point(&p_camera);

        // Return zero probability for rays pointing outside the image extent.
        let sample_bounds = self.data.film.get_sample_bounds();
        let p_raster_i = Point2i::new(p_raster3.x as Int, p_raster3.y as Int);
        if !sample_bounds.contains_exclusive(&p_raster_i) {
            return PDFResult { pos: 0.0, dir: 0.0 };
        }

        PDFResult {
            pos: 1.0 / self.lens_area(),
            dir: 1.0 / (self.a * cos_theta * cos_theta * cos_theta),
        }
    }

    /// Sample a point on the camera lens from a reference point.
    ///
    /// * `hit` - The reference point.
    /// * `u`   - The random sample in [0, 1)^2.
    fn sample_wi(&self, hit: &Hit, u: &Point2f) -> SampleResult {
        // Uniformly sample a lens interaction.
        let p_lens = concentric_sample_disk(u) * self.proj_data.lens_radius;
        let p_lens_world = self
            .data
            .camera_to_world
            .transform_point(&Point3f::new(p_lens.x, p_lens.y, 0.0));
        let n = Normal3f::from(self.data.camera_to_world.transform_vector(&Vector3f::new(0.0, 0.0, 1.0)));
        let lens_hit = Hit::new(
            p_lens_world,
            hit.time,
            Vector3f::ZERO,
            Vector3f::ZERO,
            n,
            Some(MediumInterface::from(self.data.medium.clone())),
        );

        // Populate the result with the lens sample's density.
        let mut wi = p_lens_world - hit.p;
        let dist = wi.length();
        if dist == 0.0 {
            return SampleResult {
                spectrum: Spectrum::ZERO,
                wi,
                pdf: 0.0,
                p_raster: None,
                vis: VisibilityTester::new(hit.clone(), lens_hit),
            };
        }
        wi /= dist;

        let pdf = (dist * dist) / (n.abs_dot(&wi) * self.lens_area());
        let (spectrum, p_raster) = self.we(&Ray::new(p_lens_world, -wi, INFINITY, hit.time, None));

        SampleResult {
            spectrum,
            wi,
            pdf,
            p_raster,
            vis: VisibilityTester::new(hit.clone(), lens_hit),
        }
    }
}

impl From<(&ParamSet, Transform, Film, Option<ArcMedium>)> for PerspectiveCamera {
    /// Create a `PerspectiveCamera` from given parameter set, camera to world
    /// transform, film and medium.
    ///
    /// * `p` - A tuple containing parameter set, camera to world transform,
    ///         film and medium.
    fn from(p: (&ParamSet, Transform, Film, Option<ArcMedium>)) -> Self {
        let (params, cam2world, film, medium) = p;

        let mut shutter_open = params.find_one_float("shutteropen", 0.0);
        let mut shutter_close = params.find_one_float("shutterclose", 1.0);
        if shutter_close < shutter_open {
            warn!(
                "Shutter close time [{}] < shutter open [{}]. Swapping them.",
                shutter_close, shutter_open
            );
            swap(&mut shutter_close, &mut shutter_open);
        }

        let lens_radius = params.find_one_float("lensradius", 0.0);
        let focal_distance = params.find_one_float("focaldistance", 1e6);

        let frame = params.find_one_float(
            "frameaspectratio",
            film.full_resolution.x as Float / film.full_resolution.y as Float,
        );
        let screen = if frame > 1.0 {
            Bounds2f::new(Point2f::new(-frame, -1.0), Point2f::new(frame, 1.0))
        } else {
            Bounds2f::new(Point2f::new(-1.0, -1.0 / frame), Point2f::new(1.0, 1.0 / frame))
        };

        let fov = params.find_one_float("fov", 90.0);

        Self::new(
            cam2world,
            screen,
            shutter_open,
            shutter_close,
            lens_radius,
            focal_distance,
            fov,
            film,
            medium,
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strata_core::filter::{Filter, FilterData};

    struct TestFilter {
        data: FilterData,
    }

    impl Filter for TestFilter {
        fn get_data(&self) -> &FilterData {
            &self.data
        }

        fn evaluate(&self, _p: &Point2f) -> Float {
            1.0
        }
    }

    fn test_camera() -> PerspectiveCamera {
        let filter = Arc::new(TestFilter {
            data: FilterData::new(Vector2f::new(0.5, 0.5)),
        });
        let film = Film::new(
            &Point2i::new(64, 64),
            &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            filter,
            "test.exr",
            None,
        );
        PerspectiveCamera::new(
            Transform::default(),
            Bounds2f::new(Point2f::new(-1.0, -1.0), Point2f::new(1.0, 1.0)),
            0.0,
            1.0,
            0.0,
            1e6,
            60.0,
            film,
            None,
        )
    }

    #[test]
    fn center_ray_points_forward() {
        let camera = test_camera();
        let sample = CameraSample::new(Point2f::new(32.0, 32.0), Point2f::new(0.5, 0.5), 0.0);
        let (ray, weight) = camera.generate_ray(&sample);
        assert_eq!(weight, 1.0);
        assert!((ray.d.z - 1.0).abs() < 1e-3);
    }

    #[test]
    fn we_round_trips_generated_rays() {
        let camera = test_camera();
        let sample = CameraSample::new(Point2f::new(20.0, 40.0), Point2f::new(0.5, 0.5), 0.0);
        let (ray, _) = camera.generate_ray(&sample);
        let (we, p_raster) = camera.we(&ray);
        assert!(!we.is_black());
        let p_raster = p_raster.expect("ray should map to the raster grid");
        assert!((p_raster.x - 20.0).abs() < 0.5);
        assert!((p_raster.y - 40.0).abs() < 0.5);
    }

    #[test]
    fn pdf_we_zero_for_backward_rays() {
        let camera = test_camera();
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0, None);
        let pdf = camera.pdf_we(&ray);
        assert_eq!(pdf.pos, 0.0);
        assert_eq!(pdf.dir, 0.0);
    }

    #[test]
    fn sample_wi_points_at_lens() {
        let camera = test_camera();
        let reference = Hit::new_minimal(Point3f::new(0.0, 0.0, 5.0), 0.0, None);
        let result = camera.sample_wi(&reference, &Point2f::new(0.5, 0.5));
        assert!(result.pdf > 0.0);
        // The direction points from the reference back to the camera origin.
        assert!(result.wi.z < 0.0);
    }
}
