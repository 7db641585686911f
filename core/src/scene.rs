//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::primitive::*;
use crate::{stat_counter, stat_inc, stat_register_fns, stats::*};
use std::collections::HashMap;
use std::sync::Arc;

stat_counter!(
    "Intersections/Regular ray intersection tests",
    N_INTERSECTION_TESTS,
    scene_stats_n_intersection_tests
);

stat_counter!(
    "Intersections/Shadow ray intersection tests",
    N_SHADOW_TESTS,
    scene_stats_n_shadow_tests
);

stat_register_fns!(scene_stats_n_intersection_tests, scene_stats_n_shadow_tests);

/// Scene.
pub struct Scene {
    /// An aggregate of all primitives in the scene.
    pub aggregate: ArcPrimitive,

    /// All light sources in the scene.
    pub lights: Vec<ArcLight>,

    /// Infinite light sources in the scene.
    pub infinite_lights: Vec<ArcLight>,

    /// The bounding box of the scene geometry.
    pub world_bound: Bounds3f,

    /// Maps light indices by the Light ID field so we can correctly index
    /// into the `lights` vector given a light ID.
    light_id_to_index: HashMap<usize, usize>,
}

impl Scene {
    /// Creates a new `Scene`.
    ///
    /// * `aggregate` - An aggregate of all primitives in the scene.
    /// * `lights`    - All light sources in the scene.
    pub fn new(aggregate: ArcPrimitive, lights: Vec<ArcLight>) -> Self {
        register_stats();

        let mut light_id_to_index = HashMap::new();
        for (i, light) in lights.iter().enumerate() {
            light_id_to_index.insert(light.get_id(), i);
        }

        let scene = Self {
            world_bound: aggregate.world_bound(),
            aggregate,
            lights: lights.iter().map(Arc::clone).collect(),
            infinite_lights: lights
                .iter()
                .filter(|l| l.get_type().matches(INFINITE_LIGHT))
                .map(Arc::clone)
                .collect(),
            light_id_to_index,
        };

        for light in lights {
            light.preprocess(&scene);
        }

        scene
    }

    /// Retrieve the index of a light in the `lights` vector by its ID.
    ///
    /// * `id` - The light ID.
    pub fn light_index_by_id(&self, id: usize) -> Option<usize> {
        self.light_id_to_index.get(&id).copied()
    }

    /// Traces the ray into the scene and returns the `SurfaceInteraction` if
    /// an intersection occurred.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        stat_inc!(N_INTERSECTION_TESTS, 1);
        self.aggregate.intersect(ray)
    }

    /// Traces the ray into the scene and returns whether or not an
    /// intersection occurred.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        stat_inc!(N_SHADOW_TESTS, 1);
        self.aggregate.intersect_p(ray)
    }
}
