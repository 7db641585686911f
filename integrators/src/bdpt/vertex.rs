//! BDPT path vertices.

use super::common::*;
use std::collections::HashMap;
use std::sync::Arc;
use strata_core::camera::*;
use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::material::TransportMode;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::sampling::Distribution1D;
use strata_core::scene::*;
use strata_core::spectrum::*;

/// The interaction a path vertex sits on. Camera and light endpoints wrap an
/// `EndpointInteraction`; interior vertices are surface or medium scattering
/// events.
#[derive(Clone)]
pub enum VertexInteraction<'scene> {
    /// A camera endpoint.
    Camera { ei: EndpointInteraction },

    /// A light endpoint, or an escaped ray recorded as an infinite-light
    /// endpoint.
    Light { ei: EndpointInteraction },

    /// A scattering event on a surface. The interaction carries the BSDF
    /// computed at the hit.
    Surface { si: SurfaceInteraction<'scene> },

    /// A scattering event inside a participating medium.
    Medium { mi: MediumInteraction },
}

/// A single vertex of a camera or light subpath.
#[derive(Clone)]
pub struct Vertex<'scene> {
    /// The interaction at this vertex.
    pub it: VertexInteraction<'scene>,

    /// The accumulated transport weight from the subpath origin up to and
    /// including this vertex, divided by the sampling probability of the
    /// subpath so far.
    pub beta: Spectrum,

    /// True iff the incident scattering event (or the light, for delta
    /// lights) is described by a Dirac distribution.
    pub delta: bool,

    /// Area-measure density of reaching this vertex from its predecessor when
    /// tracing in the subpath's natural direction.
    pub pdf_fwd: Float,

    /// Area-measure density of reaching this vertex from its successor.
    /// Populated retroactively when the next vertex is sampled.
    pub pdf_rev: Float,
}

impl<'scene> Default for Vertex<'scene> {
    /// Returns an empty light endpoint vertex.
    fn default() -> Self {
        Self {
            it: VertexInteraction::Light {
                ei: EndpointInteraction::default(),
            },
            beta: Spectrum::ZERO,
            delta: false,
            pdf_fwd: 0.0,
            pdf_rev: 0.0,
        }
    }
}

impl<'scene> Vertex<'scene> {
    /// Create a camera vertex from a camera ray.
    ///
    /// * `camera` - The camera.
    /// * `ray`    - The camera ray.
    /// * `beta`   - The starting throughput.
    pub fn create_camera_from_ray(camera: ArcCamera, ray: &Ray, beta: Spectrum) -> Self {
        Self {
            it: VertexInteraction::Camera {
                ei: EndpointInteraction::camera_from_ray(ray, camera),
            },
            beta,
            delta: false,
            pdf_fwd: 0.0,
            pdf_rev: 0.0,
        }
    }

    /// Create a camera vertex from a sampled point on the lens.
    ///
    /// * `camera` - The camera.
    /// * `hit`    - The point on the lens.
    /// * `beta`   - The throughput (importance over sampling density).
    pub fn create_camera_from_hit(camera: ArcCamera, hit: Hit, beta: Spectrum) -> Self {
        Self {
            it: VertexInteraction::Camera {
                ei: EndpointInteraction::camera_from_hit(hit, camera),
            },
            beta,
            delta: false,
            pdf_fwd: 0.0,
            pdf_rev: 0.0,
        }
    }

    /// Create a light vertex from an endpoint interaction.
    ///
    /// * `ei`      - The endpoint interaction.
    /// * `beta`    - The throughput.
    /// * `pdf_fwd` - Area-measure density of the vertex.
    pub fn create_light_from_endpoint(ei: EndpointInteraction, beta: Spectrum, pdf_fwd: Float) -> Self {
        Self {
            it: VertexInteraction::Light { ei },
            beta,
            delta: false,
            pdf_fwd,
            pdf_rev: 0.0,
        }
    }

    /// Create a light vertex for a ray leaving a light source.
    ///
    /// * `light`   - The light.
    /// * `ray`     - The ray leaving the light.
    /// * `n_light` - The light normal at the ray origin.
    /// * `le`      - The emitted radiance.
    /// * `pdf`     - Area-measure density of the point on the light, combined
    ///               with the probability of picking the light.
    pub fn create_light_from_ray(light: ArcLight, ray: &Ray, n_light: Normal3f, le: Spectrum, pdf: Float) -> Self {
        Self {
            it: VertexInteraction::Light {
                ei: EndpointInteraction::light_from_ray_and_normal(ray, n_light, Some(light)),
            },
            beta: le,
            delta: false,
            pdf_fwd: pdf,
            pdf_rev: 0.0,
        }
    }

    /// Create a surface vertex. The solid-angle density `pdf_fwd` is
    /// converted to an area density using the predecessor vertex.
    ///
    /// * `si`      - The surface interaction, carrying the computed BSDF.
    /// * `beta`    - The throughput.
    /// * `pdf_fwd` - Solid-angle density of sampling this vertex from `prev`.
    /// * `prev`    - The preceding vertex in the subpath.
    pub fn create_surface(si: SurfaceInteraction<'scene>, beta: Spectrum, pdf_fwd: Float, prev: &Vertex) -> Self {
        let mut v = Self {
            it: VertexInteraction::Surface { si },
            beta,
            delta: false,
            pdf_fwd: 0.0,
            pdf_rev: 0.0,
        };
        v.pdf_fwd = prev.convert_density(pdf_fwd, &v);
        v
    }

    /// Create a medium vertex. The solid-angle density `pdf_fwd` is converted
    /// to an area density using the predecessor vertex; medium endpoints have
    /// no cosine factor.
    ///
    /// * `mi`      - The medium interaction.
    /// * `beta`    - The throughput.
    /// * `pdf_fwd` - Solid-angle density of sampling this vertex from `prev`.
    /// * `prev`    - The preceding vertex in the subpath.
    pub fn create_medium(mi: MediumInteraction, beta: Spectrum, pdf_fwd: Float, prev: &Vertex) -> Self {
        let mut v = Self {
            it: VertexInteraction::Medium { mi },
            beta,
            delta: false,
            pdf_fwd: 0.0,
            pdf_rev: 0.0,
        };
        v.pdf_fwd = prev.convert_density(pdf_fwd, &v);
        v
    }

    /// Returns the hit point of the vertex interaction.
    pub fn hit(&self) -> &Hit {
        match &self.it {
            VertexInteraction::Camera { ei } => ei.hit(),
            VertexInteraction::Light { ei } => ei.hit(),
            VertexInteraction::Surface { si } => &si.hit,
            VertexInteraction::Medium { mi } => &mi.hit,
        }
    }

    /// Returns the vertex position.
    pub fn p(&self) -> Point3f {
        self.hit().p
    }

    /// Returns the time of the vertex interaction.
    pub fn time(&self) -> Float {
        self.hit().time
    }

    /// Returns the geometric normal at the vertex.
    pub fn ng(&self) -> Normal3f {
        self.hit().n
    }

    /// Returns the shading normal at the vertex; only surface vertices have
    /// one distinct from the geometric normal.
    pub fn ns(&self) -> Normal3f {
        match &self.it {
            VertexInteraction::Surface { si } => si.shading.n,
            _ => self.hit().n,
        }
    }

    /// Returns true if the vertex sits on a surface.
    pub fn is_on_surface(&self) -> bool {
        self.ng() != Normal3f::zero()
    }

    /// Evaluates the scattering function along the direction to another
    /// vertex.
    ///
    /// * `next` - The vertex scattered towards.
    /// * `mode` - Light transport mode.
    pub fn f(&self, next: &Vertex, mode: TransportMode) -> Spectrum {
        let wi = next.p() - self.p();
        if wi.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        let wi = wi.normalize();

        match &self.it {
            VertexInteraction::Surface { si } => match si.bsdf.as_ref() {
                Some(bsdf) => {
                    bsdf.f(&si.hit.wo, &wi, BSDF_ALL) * correct_shading_normal(si, &si.hit.wo, &wi, mode)
                }
                None => Spectrum::ZERO,
            },
            VertexInteraction::Medium { mi } => Spectrum::new(mi.phase.p(&mi.hit.wo, &wi)),
            _ => Spectrum::ZERO,
        }
    }

    /// Returns true if a connection strategy can be attached to this vertex.
    /// Vertices whose scattering distribution is a Dirac delta cannot be
    /// connected to deterministically.
    pub fn is_connectible(&self) -> bool {
        match &self.it {
            VertexInteraction::Medium { .. } => true,
            VertexInteraction::Camera { .. } => true,
            VertexInteraction::Light { ei } => match ei {
                EndpointInteraction::Light { light, .. } => light
                    .as_ref()
                    .map_or(true, |l| !l.get_type().matches(DELTA_DIRECTION_LIGHT)),
                _ => true,
            },
            VertexInteraction::Surface { si } => si
                .bsdf
                .as_ref()
                .map_or(false, |b| b.num_components(BSDF_ALL & !BSDF_SPECULAR) > 0),
        }
    }

    /// Returns true if the vertex is a light source: either a light endpoint
    /// or a surface vertex on an emissive primitive.
    pub fn is_light(&self) -> bool {
        match &self.it {
            VertexInteraction::Light { .. } => true,
            VertexInteraction::Surface { si } => si.primitive.and_then(|p| p.get_area_light()).is_some(),
            _ => false,
        }
    }

    /// Returns true if the vertex is a delta light source (point or
    /// directional light).
    pub fn is_delta_light(&self) -> bool {
        match &self.it {
            VertexInteraction::Light { ei } => match ei {
                EndpointInteraction::Light { light, .. } => light.as_ref().map_or(false, |l| l.is_delta_light()),
                _ => false,
            },
            _ => false,
        }
    }

    /// Returns true if the vertex is an endpoint of an infinite-area or
    /// directional light, including escaped rays recorded as light endpoints.
    pub fn is_infinite_light(&self) -> bool {
        match &self.it {
            VertexInteraction::Light { ei } => match ei {
                EndpointInteraction::Light { light, .. } => light.as_ref().map_or(true, |l| {
                    l.get_type().matches(INFINITE_LIGHT) || l.get_type().matches(DELTA_DIRECTION_LIGHT)
                }),
                _ => false,
            },
            _ => false,
        }
    }

    /// Returns the light source backing this vertex, if any.
    fn get_light(&self) -> Option<ArcLight> {
        match &self.it {
            VertexInteraction::Light { ei } => match ei {
                EndpointInteraction::Light { light, .. } => light.as_ref().map(Arc::clone),
                _ => None,
            },
            VertexInteraction::Surface { si } => si.primitive.and_then(|p| p.get_area_light()),
            _ => None,
        }
    }

    /// Returns the emitted radiance from this vertex towards another one.
    ///
    /// * `scene` - The scene.
    /// * `v`     - The vertex the radiance leaves towards.
    pub fn le(&self, scene: &Scene, v: &Vertex) -> Spectrum {
        if !self.is_light() {
            return Spectrum::ZERO;
        }

        let w = v.p() - self.p();
        if w.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        let w = w.normalize();

        if self.is_infinite_light() {
            // Return emitted radiance for infinite light sources.
            let mut le = Spectrum::ZERO;
            for light in scene.infinite_lights.iter() {
                le += light.le(&Ray::new(self.p(), -w, INFINITY, self.time(), None));
            }
            le
        } else if let VertexInteraction::Surface { si } = &self.it {
            si.le(&w)
        } else {
            Spectrum::ZERO
        }
    }

    /// Converts a solid-angle density at this vertex into an area density at
    /// the `next` vertex. Infinite light endpoints keep their solid-angle
    /// density.
    ///
    /// * `pdf`  - Solid-angle density of sampling `next` from this vertex.
    /// * `next` - The vertex the density applies at.
    pub fn convert_density(&self, pdf: Float, next: &Vertex) -> Float {
        if next.is_infinite_light() {
            return pdf;
        }

        let w = next.p() - self.p();
        if w.length_squared() == 0.0 {
            return 0.0;
        }
        let inv_dist2 = 1.0 / w.length_squared();

        let mut pdf = pdf;
        if next.is_on_surface() {
            pdf *= next.ng().abs_dot(&(w * inv_dist2.sqrt()));
        }
        pdf * inv_dist2
    }

    /// Returns the area-measure density at `next` that this vertex would
    /// sample when tracing from `prev` through this vertex to `next`.
    ///
    /// * `scene` - The scene.
    /// * `prev`  - The preceding vertex, absent for endpoints.
    /// * `next`  - The vertex the density applies at.
    pub fn pdf(&self, scene: &Scene, prev: Option<&Vertex>, next: &Vertex) -> Float {
        if let VertexInteraction::Light { .. } = self.it {
            return self.pdf_light(scene, next);
        }

        // Compute directions to preceding and next vertex.
        let wn = next.p() - self.p();
        if wn.length_squared() == 0.0 {
            return 0.0;
        }
        let wn = wn.normalize();

        // Compute directional density depending on the vertex type.
        let pdf = match &self.it {
            VertexInteraction::Camera { ei } => match ei {
                EndpointInteraction::Camera { camera, .. } => camera.pdf_we(&ei.spawn_ray(&wn)).dir,
                _ => 0.0,
            },
            VertexInteraction::Surface { si } => {
                let prev = prev.expect("surface vertex pdf requires a predecessor");
                let wp = prev.p() - self.p();
                if wp.length_squared() == 0.0 {
                    return 0.0;
                }
                let wp = wp.normalize();
                si.bsdf.as_ref().map_or(0.0, |b| b.pdf(&wp, &wn, BSDF_ALL))
            }
            VertexInteraction::Medium { mi } => {
                let prev = prev.expect("medium vertex pdf requires a predecessor");
                let wp = prev.p() - self.p();
                if wp.length_squared() == 0.0 {
                    return 0.0;
                }
                let wp = wp.normalize();
                mi.phase.p(&wp, &wn)
            }
            VertexInteraction::Light { .. } => unreachable!(),
        };

        // Return probability per unit area at vertex `next`.
        self.convert_density(pdf, next)
    }

    /// Returns the area density of this light vertex emitting towards `v`.
    ///
    /// * `scene` - The scene.
    /// * `v`     - The vertex the light emits towards.
    pub fn pdf_light(&self, scene: &Scene, v: &Vertex) -> Float {
        let w = v.p() - self.p();
        let inv_dist2 = 1.0 / w.length_squared();
        let w = w * inv_dist2.sqrt();

        let mut pdf;
        if self.is_infinite_light() {
            // Compute planar sampling density for infinite light sources.
            let (_world_center, world_radius) = scene.world_bound.bounding_sphere();
            pdf = 1.0 / (PI * world_radius * world_radius);
        } else {
            // Get pointer light to the light source at the vertex.
            let light = self
                .get_light()
                .expect("pdf_light called on a vertex that is not a light");

            // Compute sampling density for non-infinite light sources.
            let Pdf { pdf_pos: _, pdf_dir } = light.pdf_le(&Ray::new(self.p(), w, INFINITY, self.time(), None), &self.ng());
            pdf = pdf_dir * inv_dist2;
        }

        if v.is_on_surface() {
            pdf *= v.ng().abs_dot(&w);
        }
        pdf
    }

    /// Returns the combined probability of selecting this vertex's light from
    /// the light distribution and sampling this point on it.
    ///
    /// * `scene`          - The scene.
    /// * `v`              - The vertex the light emits towards.
    /// * `light_distr`    - Distribution over the scene lights.
    /// * `light_to_index` - Map from light IDs to distribution indices.
    pub fn pdf_light_origin(
        &self,
        scene: &Scene,
        v: &Vertex,
        light_distr: &Distribution1D,
        light_to_index: &HashMap<usize, usize>,
    ) -> Float {
        let w = v.p() - self.p();
        if w.length_squared() == 0.0 {
            return 0.0;
        }
        let w = w.normalize();

        if self.is_infinite_light() {
            // Return solid angle density for infinite light sources.
            return infinite_light_density(scene, light_distr, light_to_index, &w);
        }

        // Return solid angle density for non-infinite light sources.
        let light = self
            .get_light()
            .expect("pdf_light_origin called on a vertex that is not a light");
        let index = match light_to_index.get(&light.get_id()) {
            Some(index) => *index,
            None => {
                warn!("Light not found in light-to-index map");
                return 0.0;
            }
        };
        let pdf_choice = light_distr.discrete_pdf(index);
        let Pdf { pdf_pos, pdf_dir: _ } = light.pdf_le(&Ray::new(self.p(), w, INFINITY, self.time(), None), &self.ng());
        pdf_pos * pdf_choice
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_vertex_at<'scene>(p: Point3f, n: Normal3f) -> Vertex<'scene> {
        let si = SurfaceInteraction::new(
            p,
            Vector3f::ZERO,
            Point2f::ZERO,
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0) * n.z.signum(),
            Normal3f::ZERO,
            Normal3f::ZERO,
            0.0,
            None,
        );
        Vertex {
            it: VertexInteraction::Surface { si },
            beta: Spectrum::ONE,
            delta: false,
            pdf_fwd: 0.0,
            pdf_rev: 0.0,
        }
    }

    #[test]
    fn convert_density_applies_inverse_square_falloff() {
        let a = surface_vertex_at(Point3f::ZERO, Normal3f::new(0.0, 0.0, 1.0));
        let near = surface_vertex_at(Point3f::new(0.0, 0.0, 1.0), Normal3f::new(0.0, 0.0, 1.0));
        let far = surface_vertex_at(Point3f::new(0.0, 0.0, 2.0), Normal3f::new(0.0, 0.0, 1.0));

        let pdf_near = a.convert_density(1.0, &near);
        let pdf_far = a.convert_density(1.0, &far);
        assert!(pdf_near > 0.0 && pdf_far > 0.0);
        assert!((pdf_near / pdf_far - 4.0).abs() < 1e-3);
    }

    #[test]
    fn convert_density_zero_for_coincident_points() {
        let a = surface_vertex_at(Point3f::ZERO, Normal3f::new(0.0, 0.0, 1.0));
        let b = surface_vertex_at(Point3f::ZERO, Normal3f::new(0.0, 0.0, 1.0));
        assert_eq!(a.convert_density(1.0, &b), 0.0);
    }

    #[test]
    fn default_vertex_is_unset_light_endpoint() {
        let v = Vertex::default();
        assert!(v.beta.is_black());
        assert_eq!(v.pdf_fwd, 0.0);
        assert_eq!(v.pdf_rev, 0.0);
        assert!(!v.delta);
        assert!(v.is_infinite_light());
    }

    #[test]
    fn surface_vertex_without_bsdf_is_not_connectible() {
        let v = surface_vertex_at(Point3f::ZERO, Normal3f::new(0.0, 0.0, 1.0));
        assert!(!v.is_connectible());
    }
}
