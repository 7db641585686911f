//! Camera

#![allow(dead_code)]

use crate::film::Film;
use crate::geometry::*;
use crate::interaction::Hit;
use crate::light::VisibilityTester;
use crate::medium::ArcMedium;
use crate::pbrt::*;
use crate::spectrum::*;
use crate::transform::Transform;
use std::sync::Arc;

/// Holds all the sample values needed to generate a camera ray.
#[derive(Copy, Clone, Default)]
pub struct CameraSample {
    /// The point on the film to which the generated ray carries radiance.
    pub p_film: Point2f,

    /// The point on the lens the ray passes through.
    pub p_lens: Point2f,

    /// The time at which the ray samples the scene.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - The point on the film.
    /// * `p_lens` - The point on the lens.
    /// * `time`   - The time at which the ray samples the scene.
    pub fn new(p_film: Point2f, p_lens: Point2f, time: Float) -> Self {
        Self { p_film, p_lens, time }
    }
}

/// Return value for `Camera::pdf_we()`.
#[derive(Copy, Clone, Default)]
pub struct PDFResult {
    /// The ray origin's probability density with respect to area on the lens.
    pub pos: Float,

    /// The ray direction's probability density with respect to solid angle.
    pub dir: Float,
}

/// Return value for `Camera::sample_wi()`.
#[derive(Clone)]
pub struct SampleResult {
    /// The importance arriving at the reference point.
    pub spectrum: Spectrum,

    /// Direction from the reference point to the sampled lens point.
    pub wi: Vector3f,

    /// PDF with respect to solid angle at the reference point.
    pub pdf: Float,

    /// The raster position corresponding to the sampled ray, if it lies
    /// inside the film bounds.
    pub p_raster: Option<Point2f>,

    /// Visibility tester between the reference point and the lens point.
    pub vis: VisibilityTester,
}

/// Common camera parameters.
pub struct CameraData {
    /// Transformation describing the camera's placement in the scene.
    pub camera_to_world: Transform,

    /// Time when shutter is open.
    pub shutter_open: Float,

    /// Time when shutter is closed.
    pub shutter_close: Float,

    /// The film to capture the rendered image.
    pub film: Film,

    /// Scattering medium the camera lies in.
    pub medium: Option<ArcMedium>,
}

impl CameraData {
    /// Create a new `CameraData`.
    ///
    /// * `camera_to_world` - Transformation describing the camera's placement.
    /// * `shutter_open`    - Time when shutter is open.
    /// * `shutter_close`   - Time when shutter is closed.
    /// * `film`            - The film to capture the rendered image.
    /// * `medium`          - Scattering medium the camera lies in.
    pub fn new(
        camera_to_world: Transform,
        shutter_open: Float,
        shutter_close: Float,
        film: Film,
        medium: Option<ArcMedium>,
    ) -> Self {
        Self {
            camera_to_world,
            shutter_open,
            shutter_close,
            film,
            medium,
        }
    }
}

/// Common parameters for cameras based on projective transformations.
pub struct ProjectiveCameraData {
    /// Camera space to screen space projection.
    pub camera_to_screen: Transform,

    /// Raster space to camera space transformation.
    pub raster_to_camera: Transform,

    /// Screen space to raster space transformation.
    pub screen_to_raster: Transform,

    /// Raster space to screen space transformation.
    pub raster_to_screen: Transform,

    /// Radius of camera lens.
    pub lens_radius: Float,

    /// Focal distance.
    pub focal_distance: Float,
}

impl ProjectiveCameraData {
    /// Create a new `ProjectiveCameraData`.
    ///
    /// * `camera_data`      - The common camera data.
    /// * `camera_to_screen` - Camera space to screen space projection.
    /// * `screen_window`    - Bounds of screen space.
    /// * `lens_radius`      - Radius of camera lens.
    /// * `focal_distance`   - Focal distance.
    pub fn new(
        camera_data: &CameraData,
        camera_to_screen: Transform,
        screen_window: Bounds2f,
        lens_radius: Float,
        focal_distance: Float,
    ) -> Self {
        let full_resolution = camera_data.film.full_resolution;

        // Compute projective camera screen transformations.
        let screen_to_raster = Transform::scale(full_resolution.x as Float, full_resolution.y as Float, 1.0)
            * Transform::scale(
                1.0 / (screen_window.p_max.x - screen_window.p_min.x),
                1.0 / (screen_window.p_min.y - screen_window.p_max.y),
                1.0,
            )
            * Transform::translate(&Vector3f::new(-screen_window.p_min.x, -screen_window.p_max.y, 0.0));
        let raster_to_screen = screen_to_raster.inverse();
        let raster_to_camera = camera_to_screen.inverse() * raster_to_screen;

        Self {
            camera_to_screen,
            raster_to_camera,
            screen_to_raster,
            raster_to_screen,
            lens_radius,
            focal_distance,
        }
    }
}

/// Camera interface.
pub trait Camera {
    /// Returns the camera data.
    fn get_data(&self) -> &CameraData;

    /// Returns a ray corresponding to a given sample along with a floating
    /// point value that affects how much the radiance arriving at the film
    /// plane will contribute to the final image.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float);

    /// Returns a main ray along with rays shifted one pixel in the x and y
    /// directions on the film plane.
    ///
    /// * `sample` - The sample.
    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Float);

    /// Evaluate the importance emitted from the point on the lens in the
    /// direction of a given ray. Also returns the raster position of the ray
    /// if it points into the film's extent.
    ///
    /// * `ray` - The ray.
    fn we(&self, ray: &Ray) -> (Spectrum, Option<Point2f>);

    /// Return the spatial and directional PDFs for sampling a particular ray
    /// leaving the camera.
    ///
    /// * `ray` - The ray.
    fn pdf_we(&self, ray: &Ray) -> PDFResult;

    /// Sample a point on the camera lens from a reference point and return
    /// the incident importance, direction, PDF and raster position.
    ///
    /// * `hit` - The reference point.
    /// * `u`   - The random sample in [0, 1)^2.
    fn sample_wi(&self, hit: &Hit, u: &Point2f) -> SampleResult;
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;
