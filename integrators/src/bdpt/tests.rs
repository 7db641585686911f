//! BDPT integration tests over small analytic scenes.

use super::*;
use std::sync::Arc;
use strata_cameras::PerspectiveCamera;
use strata_core::film::Film;
use strata_core::light::ArcLight;
use strata_core::medium::{ArcMedium, HenyeyGreenstein, MediumInterface, PhaseFunction};
use strata_core::primitive::ArcPrimitive;
use strata_core::primitives::{GeometricPrimitive, PrimitiveList};
use strata_core::transform::Transform;
use strata_lights::{DiffuseAreaLight, InfiniteAreaLight, PointLight};
use strata_materials::{MatteMaterial, MirrorMaterial};
use strata_media::HomogeneousMedium;
use strata_samplers::RandomSampler;
use strata_shapes::{Disk, Sphere};

const MAX_DEPTH: usize = 5;

fn test_film() -> Film {
    Film::new(
        &Point2i::new(32, 32),
        &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
        Arc::new(BoxFilter::new(Vector2f::new(0.5, 0.5))),
        "test.exr",
        None,
    )
}

fn test_camera(medium: Option<ArcMedium>) -> ArcCamera {
    Arc::new(PerspectiveCamera::new(
        Transform::default(),
        Bounds2f::new(Point2f::new(-1.0, -1.0), Point2f::new(1.0, 1.0)),
        0.0,
        1.0,
        0.0,
        1e6,
        60.0,
        test_film(),
        medium,
    ))
}

fn sphere_at(p: Point3f, radius: Float) -> Arc<Sphere> {
    let o2w = Arc::new(Transform::translate(&Vector3f::new(p.x, p.y, p.z)));
    Arc::new(Sphere::new(o2w, false, radius))
}

/// A matte sphere in front of the camera lit by a spherical area light.
fn diffuse_scene() -> Scene {
    let ball = sphere_at(Point3f::new(0.0, 0.0, 5.0), 1.0);
    let light_shape = sphere_at(Point3f::new(0.0, 3.0, 5.0), 0.5);

    let area_light: ArcLight = Arc::new(DiffuseAreaLight::new(
        0,
        MediumInterface::vacuum(),
        Spectrum::new(10.0),
        light_shape.clone(),
        false,
    ));

    let primitives: Vec<ArcPrimitive> = vec![
        Arc::new(GeometricPrimitive::new(
            ball,
            Some(Arc::new(MatteMaterial::new(Spectrum::new(0.7)))),
            None,
            None,
        )),
        Arc::new(GeometricPrimitive::new(
            light_shape,
            Some(Arc::new(MatteMaterial::new(Spectrum::ZERO))),
            Some(Arc::clone(&area_light)),
            None,
        )),
    ];

    Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![area_light])
}

/// A diffuse disk facing the camera, lit by a point light between them.
fn point_light_scene() -> Scene {
    let disk: ArcShape = Arc::new(Disk::new(Arc::new(Transform::default()), false, 5.0, 2.0, 0.0));
    let light: ArcLight = Arc::new(PointLight::new(
        0,
        Point3f::new(0.0, 1.0, 3.0),
        MediumInterface::vacuum(),
        Spectrum::new(10.0),
    ));

    let primitives: Vec<ArcPrimitive> = vec![Arc::new(GeometricPrimitive::new(
        disk,
        Some(Arc::new(MatteMaterial::new(Spectrum::new(0.6)))),
        None,
        None,
    ))];

    Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![light])
}

/// A mirror sphere in front of the camera with a spherical area light above.
fn mirror_scene() -> Scene {
    let ball = sphere_at(Point3f::new(0.0, 0.0, 5.0), 1.0);
    let floor = sphere_at(Point3f::new(0.0, -102.0, 5.0), 100.0);
    let light_shape = sphere_at(Point3f::new(0.0, 4.0, 5.0), 1.0);

    let area_light: ArcLight = Arc::new(DiffuseAreaLight::new(
        0,
        MediumInterface::vacuum(),
        Spectrum::new(8.0),
        light_shape.clone(),
        false,
    ));

    let primitives: Vec<ArcPrimitive> = vec![
        Arc::new(GeometricPrimitive::new(
            ball,
            Some(Arc::new(MirrorMaterial::new(Spectrum::new(0.9)))),
            None,
            None,
        )),
        Arc::new(GeometricPrimitive::new(
            floor,
            Some(Arc::new(MatteMaterial::new(Spectrum::new(0.5)))),
            None,
            None,
        )),
        Arc::new(GeometricPrimitive::new(
            light_shape,
            Some(Arc::new(MatteMaterial::new(Spectrum::ZERO))),
            Some(Arc::clone(&area_light)),
            None,
        )),
    ];

    Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![area_light])
}

/// An enclosing matte sphere under a uniform infinite light.
fn enclosed_env_scene() -> Scene {
    let shell = sphere_at(Point3f::ZERO, 50.0);
    let env: ArcLight = Arc::new(InfiniteAreaLight::new(0, Spectrum::new(2.0)));

    let primitives: Vec<ArcPrimitive> = vec![Arc::new(GeometricPrimitive::new(
        shell,
        Some(Arc::new(MatteMaterial::new(Spectrum::new(0.4)))),
        None,
        None,
    ))];

    Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![env])
}

/// A uniform infinite light with only an out-of-view bounds anchor.
fn env_scene() -> Scene {
    // A small dark sphere far behind the camera keeps the world bounds
    // finite without ever being visible.
    let anchor = sphere_at(Point3f::new(0.0, 0.0, -50.0), 1.0);
    let env: ArcLight = Arc::new(InfiniteAreaLight::new(0, Spectrum::new(1.5)));

    let primitives: Vec<ArcPrimitive> = vec![Arc::new(GeometricPrimitive::new(
        anchor,
        Some(Arc::new(MatteMaterial::new(Spectrum::ZERO))),
        None,
        None,
    ))];

    Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![env])
}

/// An interior subpath vertex scattering inside the given medium.
fn medium_vertex<'scene>(p: Point3f, wo: Vector3f, fog: &ArcMedium) -> Vertex<'scene> {
    let phase = PhaseFunction::HenyeyGreenstein(HenyeyGreenstein::new(0.0));
    let mi = MediumInteraction::new(p, wo, 0.0, Some(Arc::clone(fog)), phase);
    Vertex {
        it: VertexInteraction::Medium { mi },
        beta: Spectrum::ONE,
        delta: false,
        pdf_fwd: 1.0,
        pdf_rev: 0.0,
    }
}

/// A scene whose only geometry is a small disk light far off the probe axis:
/// it anchors the light distribution without shadowing connection segments
/// near the origin.
fn fog_probe_scene(fog: &ArcMedium) -> Scene {
    let disk: ArcShape = Arc::new(Disk::new(Arc::new(Transform::default()), false, 100.0, 1.0, 0.0));
    let area_light: ArcLight = Arc::new(DiffuseAreaLight::new(
        0,
        MediumInterface::from(Some(Arc::clone(fog))),
        Spectrum::new(1.0),
        disk.clone(),
        false,
    ));
    let primitives: Vec<ArcPrimitive> = vec![Arc::new(GeometricPrimitive::new(
        disk,
        Some(Arc::new(MatteMaterial::new(Spectrum::ZERO))),
        Some(Arc::clone(&area_light)),
        None,
    ))];
    Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![area_light])
}

/// Trace camera and light subpaths for one pixel sample.
fn trace_subpaths<'scene>(
    scene: &'scene Scene,
    camera: &ArcCamera,
    sampler: &mut dyn Sampler,
    light_distr: &Distribution1D,
    light_to_index: &HashMap<usize, usize>,
    p_film: Point2f,
) -> (Vec<Vertex<'scene>>, usize, Vec<Vertex<'scene>>, usize) {
    let mut camera_vertices = vec![Vertex::default(); MAX_DEPTH + 2];
    let mut light_vertices = vec![Vertex::default(); MAX_DEPTH + 1];

    let n_camera = generate_camera_subpath(scene, sampler, MAX_DEPTH + 2, camera, &p_film, &mut camera_vertices);
    let time = camera_vertices[0].time();
    let n_light = generate_light_subpath(
        scene,
        sampler,
        MAX_DEPTH + 1,
        time,
        light_distr,
        light_to_index,
        &mut light_vertices,
    );

    (camera_vertices, n_camera, light_vertices, n_light)
}

fn light_setup(scene: &Scene) -> (Arc<Distribution1D>, HashMap<usize, usize>) {
    let distribution = create_light_sample_distribution(LightSampleStrategy::Power, scene);
    let distr = distribution.lookup(&Point3f::ZERO).expect("scene has lights");
    let light_to_index = scene.lights.iter().enumerate().map(|(i, l)| (l.get_id(), i)).collect();
    (distr, light_to_index)
}

#[test]
fn buffer_index_layout_is_dense_and_collision_free() {
    let mut seen = std::collections::HashSet::new();
    let mut count = 0;
    for depth in 0..=MAX_DEPTH {
        for s in 0..=depth + 1 {
            let t = depth + 2 - s;
            assert!(t >= 1);
            assert!(seen.insert(buffer_index(s, t)), "collision at ({s}, {t})");
            count += 1;
        }
    }
    let expected = (MAX_DEPTH + 1) * (MAX_DEPTH + 4) / 2;
    assert_eq!(count, expected);
    // Indices are dense in [0, count).
    assert_eq!(seen.iter().max().copied(), Some(expected - 1));
}

#[test]
fn sampler_seed_is_deterministic_and_pass_dependent() {
    assert_eq!(sampler_seed(3, 1), sampler_seed(3, 1));
    assert_ne!(sampler_seed(3, 1), sampler_seed(4, 1));
    assert_ne!(sampler_seed(3, 0), sampler_seed(3, 1));
}

#[test]
fn remap0_passes_non_zero_values_through() {
    assert_eq!(remap0(0.0), 1.0);
    assert_eq!(remap0(0.25), 0.25);
    assert_eq!(remap0(-2.0), -2.0);
}

#[test]
fn camera_subpath_respects_bounds_and_density_invariants() {
    let scene = diffuse_scene();
    let camera = test_camera(None);
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(16, Some(1));

    for i in 0..16 {
        let p_film = Point2f::new(12.0 + (i % 4) as Float, 12.0 + (i / 4) as Float);
        let (camera_vertices, n_camera, light_vertices, n_light) =
            trace_subpaths(&scene, &camera, &mut sampler, &light_distr, &light_to_index, p_film);

        assert!(n_camera <= MAX_DEPTH + 2);
        assert!(n_light <= MAX_DEPTH + 1);

        for v in camera_vertices.iter().take(n_camera) {
            assert!(v.pdf_fwd >= 0.0, "negative forward density");
            assert!(v.pdf_rev >= 0.0, "negative reverse density");
            assert!(!v.beta.has_nans());
        }
        for v in light_vertices.iter().take(n_light) {
            assert!(v.pdf_fwd >= 0.0);
            assert!(v.pdf_rev >= 0.0);
            assert!(!v.beta.has_nans());
        }
    }
}

#[test]
fn mis_weights_stay_in_unit_interval() {
    let scene = diffuse_scene();
    let camera = test_camera(None);
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(16, Some(7));

    for i in 0..8 {
        let p_film = Point2f::new(16.0, 10.0 + i as Float);
        let (mut camera_vertices, n_camera, mut light_vertices, n_light) =
            trace_subpaths(&scene, &camera, &mut sampler, &light_distr, &light_to_index, p_film);

        for t in 1..=n_camera {
            for s in 0..=n_light {
                let depth = t as isize + s as isize - 2;
                if (s == 1 && t == 1) || depth < 0 || depth > MAX_DEPTH as isize {
                    continue;
                }
                let (l, _p_raster, weight) = connect_bdpt(
                    &scene,
                    &mut light_vertices,
                    &mut camera_vertices,
                    s,
                    t,
                    &light_distr,
                    &light_to_index,
                    &camera,
                    &mut sampler,
                    &p_film,
                    None,
                    MisStrategy::Balance,
                );
                assert!(!l.has_nans(), "NaN contribution for ({s}, {t})");
                assert!(weight.is_finite());
                assert!((0.0..=1.0).contains(&weight), "weight {weight} for ({s}, {t})");
            }
        }
    }
}

#[test]
fn specular_vertices_are_marked_delta_with_zero_densities() {
    let scene = mirror_scene();
    let camera = test_camera(None);
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(16, Some(3));

    let mut saw_delta = false;
    for i in 0..16 {
        let p_film = Point2f::new(14.0 + (i % 4) as Float, 14.0 + (i / 4) as Float);
        let (mut camera_vertices, n_camera, mut light_vertices, n_light) =
            trace_subpaths(&scene, &camera, &mut sampler, &light_distr, &light_to_index, p_film);

        for v in camera_vertices.iter().take(n_camera) {
            if v.delta {
                saw_delta = true;
                assert_eq!(v.pdf_fwd, 0.0);
                assert_eq!(v.pdf_rev, 0.0);
            }
        }

        // Delta vertices never break the MIS weight computation.
        for t in 1..=n_camera {
            for s in 0..=n_light {
                let depth = t as isize + s as isize - 2;
                if (s == 1 && t == 1) || depth < 0 || depth > MAX_DEPTH as isize {
                    continue;
                }
                let (l, _p, weight) = connect_bdpt(
                    &scene,
                    &mut light_vertices,
                    &mut camera_vertices,
                    s,
                    t,
                    &light_distr,
                    &light_to_index,
                    &camera,
                    &mut sampler,
                    &p_film,
                    None,
                    MisStrategy::Balance,
                );
                assert!(weight.is_finite());
                assert!((0.0..=1.0).contains(&weight));
                assert!(!l.has_nans());
            }
        }
    }
    assert!(saw_delta, "camera rays through the image center should hit the mirror");
}

#[test]
fn environment_light_is_captured_with_unit_weight() {
    let scene = env_scene();
    let camera = test_camera(None);
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(4, Some(5));

    let p_film = Point2f::new(16.0, 16.0);
    let (mut camera_vertices, n_camera, mut light_vertices, n_light) =
        trace_subpaths(&scene, &camera, &mut sampler, &light_distr, &light_to_index, p_film);

    // The camera ray escapes directly into the environment.
    assert_eq!(n_camera, 2);
    assert!(camera_vertices[1].is_infinite_light());

    let mut l = Spectrum::ZERO;
    for t in 1..=n_camera {
        for s in 0..=n_light {
            let depth = t as isize + s as isize - 2;
            if (s == 1 && t == 1) || depth < 0 || depth > MAX_DEPTH as isize {
                continue;
            }
            let (l_path, _p, weight) = connect_bdpt(
                &scene,
                &mut light_vertices,
                &mut camera_vertices,
                s,
                t,
                &light_distr,
                &light_to_index,
                &camera,
                &mut sampler,
                &p_film,
                None,
                MisStrategy::Balance,
            );
            if s == 0 && t == 2 {
                assert_eq!(weight, 1.0);
            }
            if t != 1 {
                l += l_path;
            }
        }
    }

    // The pixel estimate equals the uniform environment radiance.
    assert!((l.y() - Spectrum::new(1.5).y()).abs() < 1e-4, "pixel radiance was {l}");
}

#[test]
fn infinite_light_subpath_densities_are_positive() {
    let scene = enclosed_env_scene();
    let camera = test_camera(None);
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(64, Some(11));

    let mut saw_surface_hit = false;
    for i in 0..50 {
        let p_film = Point2f::new(16.0, 16.0 + (i % 3) as Float);
        let (_cv, _n_camera, light_vertices, n_light) =
            trace_subpaths(&scene, &camera, &mut sampler, &light_distr, &light_to_index, p_film);

        if n_light >= 1 {
            assert!(light_vertices[0].is_infinite_light());
            assert!(light_vertices[0].pdf_fwd > 0.0, "directional density must be positive");
        }
        if n_light >= 2 {
            saw_surface_hit = true;
            assert!(light_vertices[1].pdf_fwd > 0.0, "first-hit density must be positive");
        }
    }
    assert!(saw_surface_hit, "some environment ray should hit the enclosing shell");
}

#[test]
fn point_light_is_never_hit_by_s0_strategies() {
    let scene = point_light_scene();
    let camera = test_camera(None);
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(16, Some(13));

    let mut direct = Spectrum::ZERO;
    for _ in 0..16 {
        let p_film = Point2f::new(16.0, 16.0);
        let (mut camera_vertices, n_camera, mut light_vertices, n_light) =
            trace_subpaths(&scene, &camera, &mut sampler, &light_distr, &light_to_index, p_film);

        for t in 1..=n_camera {
            for s in 0..=n_light {
                let depth = t as isize + s as isize - 2;
                if (s == 1 && t == 1) || depth < 0 || depth > MAX_DEPTH as isize {
                    continue;
                }
                let (l_path, _p, weight) = connect_bdpt(
                    &scene,
                    &mut light_vertices,
                    &mut camera_vertices,
                    s,
                    t,
                    &light_distr,
                    &light_to_index,
                    &camera,
                    &mut sampler,
                    &p_film,
                    None,
                    MisStrategy::Balance,
                );
                if s == 0 {
                    // A delta light cannot be intersected by a camera path.
                    assert!(l_path.is_black());
                }
                assert!((0.0..=1.0).contains(&weight));
                if s == 1 && t != 1 {
                    direct += l_path;
                }
            }
        }
    }
    assert!(!direct.is_black(), "the point light should illuminate the disk");
}

#[test]
fn rectifier_with_none_scheme_reproduces_plain_mis() {
    let scene = diffuse_scene();
    let camera = test_camera(None);
    let (light_distr, light_to_index) = light_setup(&scene);

    // A prepared rectifier running the `none` scheme must be an exact no-op
    // on the weights.
    let mut rectifier = SAMISRectifier::new(
        camera.get_data().film.cropped_pixel_bounds,
        1,
        MAX_DEPTH,
        8,
        MisModification::None,
    );
    for i in 0..32_usize {
        rectifier.add_estimate(&Point2f::new(16.0, 16.0), 1 + (i % 3), 1, i as Float, i as Float);
    }
    rectifier.prepare(1, 16.0);

    let p_film = Point2f::new(16.0, 16.0);
    let run = |rect: Option<&SAMISRectifier>| -> Vec<(Spectrum, Float)> {
        let mut sampler = RandomSampler::new(16, Some(17));
        let (mut camera_vertices, n_camera, mut light_vertices, n_light) =
            trace_subpaths(&scene, &camera, &mut sampler, &light_distr, &light_to_index, p_film);

        let mut results = Vec::new();
        for t in 1..=n_camera {
            for s in 0..=n_light {
                let depth = t as isize + s as isize - 2;
                if (s == 1 && t == 1) || depth < 0 || depth > MAX_DEPTH as isize {
                    continue;
                }
                let (l, _p, w) = connect_bdpt(
                    &scene,
                    &mut light_vertices,
                    &mut camera_vertices,
                    s,
                    t,
                    &light_distr,
                    &light_to_index,
                    &camera,
                    &mut sampler,
                    &p_film,
                    rect,
                    MisStrategy::Balance,
                );
                results.push((l, w));
            }
        }
        results
    };

    let plain = run(None);
    let rectified = run(Some(&rectifier));
    assert_eq!(plain.len(), rectified.len());
    for ((l0, w0), (l1, w1)) in plain.iter().zip(rectified.iter()) {
        assert_eq!(w0, w1);
        assert_eq!(l0.to_rgb(), l1.to_rgb());
    }
}

#[test]
fn fog_produces_medium_vertices() {
    let fog: ArcMedium = Arc::new(HomogeneousMedium::new(Spectrum::new(0.5), Spectrum::new(2.0), 0.0));

    let disk: ArcShape = Arc::new(Disk::new(Arc::new(Transform::default()), true, 5.0, 2.0, 0.0));
    let area_light: ArcLight = Arc::new(DiffuseAreaLight::new(
        0,
        MediumInterface::from(Some(Arc::clone(&fog))),
        Spectrum::new(5.0),
        disk.clone(),
        false,
    ));
    let primitives: Vec<ArcPrimitive> = vec![Arc::new(GeometricPrimitive::new(
        disk,
        Some(Arc::new(MatteMaterial::new(Spectrum::ZERO))),
        Some(Arc::clone(&area_light)),
        None,
    ))];
    let scene = Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![area_light]);

    let camera = test_camera(Some(Arc::clone(&fog)));
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(16, Some(23));

    let mut medium_vertices = 0;
    for _ in 0..10 {
        let (camera_vertices, n_camera, _lv, _nl) = trace_subpaths(
            &scene,
            &camera,
            &mut sampler,
            &light_distr,
            &light_to_index,
            Point2f::new(16.0, 16.0),
        );
        for v in camera_vertices.iter().take(n_camera) {
            if let VertexInteraction::Medium { mi } = &v.it {
                medium_vertices += 1;
                assert!(v.pdf_fwd >= 0.0);
                assert!(!v.beta.has_nans());
                // Shadow rays spawned from the vertex must see the fog.
                assert!(mi.hit.medium_interface.is_some());
            }
        }
    }
    assert!(medium_vertices > 0, "dense fog should scatter camera paths");
}

#[test]
fn geometric_term_attenuates_through_media() {
    let fog: ArcMedium = Arc::new(HomogeneousMedium::new(Spectrum::new(0.5), Spectrum::new(1.5), 0.0));
    let scene = fog_probe_scene(&fog);
    let mut sampler = RandomSampler::new(4, Some(29));

    let v0 = medium_vertex(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), &fog);
    let v1 = medium_vertex(Point3f::new(0.0, 0.0, 4.0), Vector3f::new(0.0, 0.0, 1.0), &fog);

    let value = g(&scene, &mut sampler, &v0, &v1);

    // Medium endpoints carry no cosine terms, so G reduces to Tr / d^2 with
    // the Beer-Lambert transmittance for sigma_t = 2 over distance 3.
    let expected = (-2.0 * 3.0_f32).exp() / 9.0;
    assert!(
        (value[0] / expected - 1.0).abs() < 0.01,
        "G was {value}, expected {expected}"
    );
}

#[test]
fn connection_through_fog_matches_beer_lambert() {
    let fog: ArcMedium = Arc::new(HomogeneousMedium::new(Spectrum::new(0.5), Spectrum::new(1.5), 0.0));
    let scene = fog_probe_scene(&fog);
    let camera = test_camera(Some(Arc::clone(&fog)));
    let (light_distr, light_to_index) = light_setup(&scene);
    let mut sampler = RandomSampler::new(4, Some(31));

    // Hand-built subpaths meeting in the fog; the s = 2, t = 2 strategy
    // connects the two interior medium vertices through the medium.
    let camera_ray = Ray::new(
        Point3f::ZERO,
        Vector3f::new(0.0, 0.0, 1.0),
        INFINITY,
        0.0,
        Some(Arc::clone(&fog)),
    );
    let mut camera_vertices = vec![
        Vertex::create_camera_from_ray(Arc::clone(&camera), &camera_ray, Spectrum::ONE),
        medium_vertex(Point3f::new(0.0, 0.0, 4.0), Vector3f::new(0.0, 0.0, -1.0), &fog),
    ];
    let mut light_vertices = vec![
        Vertex::default(),
        medium_vertex(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), &fog),
    ];

    let (l, p_raster, weight) = connect_bdpt(
        &scene,
        &mut light_vertices,
        &mut camera_vertices,
        2,
        2,
        &light_distr,
        &light_to_index,
        &camera,
        &mut sampler,
        &Point2f::new(16.0, 16.0),
        None,
        MisStrategy::Balance,
    );
    assert!(p_raster.is_none());
    assert!(weight > 0.0 && weight <= 1.0);

    // Both scattering functions are isotropic, so the unweighted
    // contribution is (1/4π)^2 · Tr / d^2 with Tr = exp(-sigma_t · d).
    let expected = INV_FOUR_PI * INV_FOUR_PI * (-2.0 * 3.0_f32).exp() / 9.0;
    let unweighted = l[0] / weight;
    assert!(
        (unweighted / expected - 1.0).abs() < 0.01,
        "contribution was {unweighted}, expected {expected}"
    );
}

#[test]
fn merge_blend_is_sample_weighted_mean_without_mask() {
    let bounds = Bounds2i {
        p_min: Point2i::new(0, 0),
        p_max: Point2i::new(2, 1),
    };
    let mut prepass = vec![1.0; 6];
    let rectified = vec![3.0; 6];

    merge_frame_buffers(&mut prepass, &rectified, 0.25, 0.75, bounds, |_| false);
    for v in prepass.iter() {
        assert!((v - 2.5).abs() < 1e-6);
    }
}

#[test]
fn merge_blend_takes_main_pass_for_masked_pixels() {
    let bounds = Bounds2i {
        p_min: Point2i::new(0, 0),
        p_max: Point2i::new(2, 1),
    };
    let mut prepass = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    let rectified = vec![3.0, 3.0, 3.0, 5.0, 5.0, 5.0];

    merge_frame_buffers(&mut prepass, &rectified, 0.5, 0.5, bounds, |px| px.x == 1);
    assert!((prepass[0] - 2.0).abs() < 1e-6);
    assert!((prepass[3] - 5.0).abs() < 1e-6);
}
