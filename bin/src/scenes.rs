//! Built-in demo scenes.

use std::sync::Arc;
use strata_core::geometry::*;
use strata_core::light::ArcLight;
use strata_core::medium::{ArcMedium, MediumInterface};
use strata_core::pbrt::*;
use strata_core::primitive::ArcPrimitive;
use strata_core::primitives::{GeometricPrimitive, PrimitiveList};
use strata_core::scene::Scene;
use strata_core::spectrum::*;
use strata_core::transform::Transform;
use strata_lights::{DiffuseAreaLight, InfiniteAreaLight, PointLight};
use strata_materials::{MatteMaterial, MirrorMaterial};
use strata_media::HomogeneousMedium;
use strata_shapes::{Disk, Sphere};

/// A fully assembled scene plus the camera placement rendering it.
pub struct SceneDescription {
    /// The scene.
    pub scene: Scene,

    /// Camera to world transform.
    pub camera_to_world: Transform,

    /// The medium the camera sits in.
    pub camera_medium: Option<ArcMedium>,

    /// Vertical field of view in degrees.
    pub fov: Float,
}

/// Build a scene by name. Returns `None` for unknown names.
///
/// * `name` - The scene name.
pub fn build(name: &str) -> Option<SceneDescription> {
    match name {
        "cornell" => Some(cornell()),
        "veach-mis" => Some(veach_mis()),
        "fog" => Some(fog()),
        "env" => Some(env()),
        _ => None,
    }
}

fn sphere_at(p: Point3f, radius: Float) -> Arc<Sphere> {
    let o2w = Arc::new(Transform::translate(&Vector3f::new(p.x, p.y, p.z)));
    Arc::new(Sphere::new(o2w, false, radius))
}

fn matte(kd: Spectrum) -> Arc<MatteMaterial> {
    Arc::new(MatteMaterial::new(kd))
}

fn wall(p: Point3f, kd: Spectrum) -> ArcPrimitive {
    Arc::new(GeometricPrimitive::new(sphere_at(p, 1000.0), Some(matte(kd)), None, None))
}

/// A closed box approximated by giant spheres, a matte ball, a mirror ball
/// and a downward-facing disk light under the ceiling.
fn cornell() -> SceneDescription {
    let mut primitives: Vec<ArcPrimitive> = vec![
        wall(Point3f::new(0.0, -1001.0, 4.0), Spectrum::new(0.7)), // floor
        wall(Point3f::new(0.0, 1002.0, 4.0), Spectrum::new(0.7)),  // ceiling
        wall(Point3f::new(-1002.0, 0.0, 4.0), Spectrum::from_rgb(&[0.6, 0.1, 0.1])), // left
        wall(Point3f::new(1002.0, 0.0, 4.0), Spectrum::from_rgb(&[0.1, 0.6, 0.1])),  // right
        wall(Point3f::new(0.0, 0.0, 1006.5), Spectrum::new(0.7)),  // back
        Arc::new(GeometricPrimitive::new(
            sphere_at(Point3f::new(-0.8, -0.2, 4.8), 0.8),
            Some(matte(Spectrum::new(0.65))),
            None,
            None,
        )),
        Arc::new(GeometricPrimitive::new(
            sphere_at(Point3f::new(0.9, -0.4, 4.2), 0.6),
            Some(Arc::new(MirrorMaterial::new(Spectrum::new(0.9)))),
            None,
            None,
        )),
    ];

    // Disk light under the ceiling, facing down.
    let light_to_world = Transform::translate(&Vector3f::new(0.0, 1.95, 4.5)) * Transform::rotate_x(90.0);
    let light_shape: ArcShape = Arc::new(Disk::new(Arc::new(light_to_world), false, 0.0, 0.6, 0.0));
    let area_light: ArcLight = Arc::new(DiffuseAreaLight::new(
        0,
        MediumInterface::vacuum(),
        Spectrum::new(20.0),
        light_shape.clone(),
        false,
    ));
    primitives.push(Arc::new(GeometricPrimitive::new(
        light_shape,
        Some(matte(Spectrum::ZERO)),
        Some(Arc::clone(&area_light)),
        None,
    )));

    SceneDescription {
        scene: Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![area_light]),
        camera_to_world: Transform::default(),
        camera_medium: None,
        fov: 55.0,
    }
}

/// A diffuse floor, a mirror ball and a small bright spherical light:
/// exercises the interplay of delta vertices with the `s = 0` and `s = 1`
/// strategies.
fn veach_mis() -> SceneDescription {
    let light_shape = sphere_at(Point3f::new(0.0, 3.0, 5.0), 0.4);
    let area_light: ArcLight = Arc::new(DiffuseAreaLight::new(
        0,
        MediumInterface::vacuum(),
        Spectrum::new(40.0),
        light_shape.clone(),
        false,
    ));
    let fill_light: ArcLight = Arc::new(PointLight::new(
        1,
        Point3f::new(-2.0, 2.0, 2.0),
        MediumInterface::vacuum(),
        Spectrum::new(4.0),
    ));

    let primitives: Vec<ArcPrimitive> = vec![
        wall(Point3f::new(0.0, -1001.0, 5.0), Spectrum::new(0.6)), // floor
        Arc::new(GeometricPrimitive::new(
            sphere_at(Point3f::new(0.0, 0.0, 5.0), 1.0),
            Some(Arc::new(MirrorMaterial::new(Spectrum::new(0.95)))),
            None,
            None,
        )),
        Arc::new(GeometricPrimitive::new(
            light_shape,
            Some(matte(Spectrum::ZERO)),
            Some(Arc::clone(&area_light)),
            None,
        )),
    ];

    SceneDescription {
        scene: Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![area_light, fill_light]),
        camera_to_world: Transform::look_at(
            &Point3f::new(0.0, 1.0, 0.0),
            &Point3f::new(0.0, 0.0, 5.0),
            &Vector3f::new(0.0, 1.0, 0.0),
        ),
        camera_medium: None,
        fov: 50.0,
    }
}

/// A homogeneous medium between the camera and a one-sided disk light.
fn fog() -> SceneDescription {
    let fog: ArcMedium = Arc::new(HomogeneousMedium::new(Spectrum::new(0.1), Spectrum::new(0.4), 0.3));

    // The disk faces the camera; its reversed orientation flips the emission
    // side towards -z.
    let light_shape: ArcShape = Arc::new(Disk::new(Arc::new(Transform::default()), true, 6.0, 1.5, 0.0));
    let area_light: ArcLight = Arc::new(DiffuseAreaLight::new(
        0,
        MediumInterface::from(Some(Arc::clone(&fog))),
        Spectrum::new(10.0),
        light_shape.clone(),
        false,
    ));

    let primitives: Vec<ArcPrimitive> = vec![
        Arc::new(GeometricPrimitive::new(
            light_shape,
            Some(matte(Spectrum::ZERO)),
            Some(Arc::clone(&area_light)),
            None,
        )),
        Arc::new(GeometricPrimitive::new(
            sphere_at(Point3f::new(0.0, -0.8, 4.0), 0.5),
            Some(matte(Spectrum::new(0.5))),
            None,
            None,
        )),
    ];

    SceneDescription {
        scene: Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![area_light]),
        camera_to_world: Transform::default(),
        camera_medium: Some(fog),
        fov: 60.0,
    }
}

/// A matte ball under a uniform environment light.
fn env() -> SceneDescription {
    let env_light: ArcLight = Arc::new(InfiniteAreaLight::new(0, Spectrum::from_rgb(&[0.8, 0.9, 1.0])));

    let primitives: Vec<ArcPrimitive> = vec![Arc::new(GeometricPrimitive::new(
        sphere_at(Point3f::new(0.0, 0.0, 4.0), 1.0),
        Some(matte(Spectrum::new(0.5))),
        None,
        None,
    ))];

    SceneDescription {
        scene: Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![env_light]),
        camera_to_world: Transform::default(),
        camera_medium: None,
        fov: 60.0,
    }
}
