//! Endpoint Interactions

#![allow(dead_code)]

use crate::camera::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::medium::MediumInterface;
use std::sync::Arc;

/// Represents an interaction point used only by the BDPT integrator.
#[derive(Clone)]
pub enum EndpointInteraction {
    /// Records the position of a path endpoint on the lens of the camera.
    Camera {
        /// The interaction point.
        hit: Hit,
        /// The camera.
        camera: ArcCamera,
    },

    /// Records the position of a path endpoint on a light source.
    Light {
        /// The interaction point.
        hit: Hit,
        /// The light source. `None` for escaped rays captured as infinite
        /// light endpoints.
        light: Option<ArcLight>,
    },
}

impl EndpointInteraction {
    /// Create a camera endpoint interaction.
    ///
    /// * `hit`    - The hit point on camera lens.
    /// * `camera` - The camera.
    pub fn camera_from_hit(hit: Hit, camera: ArcCamera) -> Self {
        Self::Camera { hit, camera }
    }

    /// Create a camera endpoint interaction from a ray.
    ///
    /// * `ray`    - The ray starting on camera lens.
    /// * `camera` - The camera.
    pub fn camera_from_ray(ray: &Ray, camera: ArcCamera) -> Self {
        Self::Camera {
            hit: Hit::new(
                ray.o,
                ray.time,
                Vector3f::ZERO,
                Vector3f::ZERO,
                Normal3f::ZERO,
                ray.medium.as_ref().map(Arc::clone).map(MediumInterface::from),
            ),
            camera,
        }
    }

    /// Create a light endpoint interaction.
    ///
    /// * `hit`   - The hit point on a light source.
    /// * `light` - The light source.
    pub fn light_from_hit(hit: Hit, light: Option<ArcLight>) -> Self {
        Self::Light { hit, light }
    }

    /// Create a light endpoint interaction for a ray that escaped the scene.
    /// The endpoint is placed along the ray with a normal facing back along
    /// it.
    ///
    /// * `ray` - The escaped ray.
    pub fn light_from_ray(ray: &Ray) -> Self {
        let hit = Hit::new(
            ray.at(1.0),
            ray.time,
            Vector3f::ZERO,
            Vector3f::ZERO,
            Normal3f::from(-ray.d),
            ray.medium.as_ref().map(Arc::clone).map(MediumInterface::from),
        );
        Self::Light { hit, light: None }
    }

    /// Create a light endpoint interaction from a ray leaving a light source.
    ///
    /// * `ray`   - The ray leaving the light source.
    /// * `nl`    - The light normal at the ray origin.
    /// * `light` - The light source.
    pub fn light_from_ray_and_normal(ray: &Ray, nl: Normal3f, light: Option<ArcLight>) -> Self {
        Self::Light {
            hit: Hit::new(
                ray.o,
                ray.time,
                Vector3f::ZERO,
                Vector3f::ZERO,
                nl,
                ray.medium.as_ref().map(Arc::clone).map(MediumInterface::from),
            ),
            light,
        }
    }

    /// Returns the hit point.
    pub fn hit(&self) -> &Hit {
        match self {
            Self::Camera { hit, .. } => hit,
            Self::Light { hit, .. } => hit,
        }
    }

    /// Spawns a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        self.hit().spawn_ray(d)
    }
}

impl Default for EndpointInteraction {
    /// Returns an empty light endpoint.
    fn default() -> Self {
        Self::Light {
            hit: Hit::default(),
            light: None,
        }
    }
}
