//! BDPT helpers.

use std::collections::HashMap;
use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::material::TransportMode;
use strata_core::pbrt::*;
use strata_core::sampling::Distribution1D;
use strata_core::scene::*;

/// Returns the correction term for adjoint BSDFs with shading normals.
///
/// * `isect` - The surface interaction.
/// * `wo`    - Outgoing direction.
/// * `wi`    - Incident direction.
/// * `mode`  - Light transport mode.
pub(crate) fn correct_shading_normal(isect: &SurfaceInteraction, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Float {
    match mode {
        TransportMode::Importance => {
            let num = wo.abs_dot(&isect.shading.n) * wi.abs_dot(&isect.hit.n);
            let denom = wo.abs_dot(&isect.hit.n) * wi.abs_dot(&isect.shading.n);

            // wi is occasionally perpendicular to isect.shading.n; this is
            // fine, but we don't want to return an infinite or NaN value in
            // that case.
            if denom == 0.0 {
                0.0
            } else {
                num / denom
            }
        }
        TransportMode::Radiance => 1.0,
    }
}

/// Calculates the spatial density of infinite area light endpoints expressed
/// as a probability per unit solid angle while accounting for the presence of
/// other infinite area lights. It performs a weighted sum of the directional
/// densities of all infinite area lights.
///
/// * `scene`          - The scene.
/// * `light_distr`    - Distribution over the scene lights.
/// * `light_to_index` - Map from light IDs to distribution indices.
/// * `w`              - The ray direction.
pub(crate) fn infinite_light_density(
    scene: &Scene,
    light_distr: &Distribution1D,
    light_to_index: &HashMap<usize, usize>,
    w: &Vector3f,
) -> Float {
    let mut pdf = 0.0;
    for light in scene.infinite_lights.iter() {
        if let Some(index) = light_to_index.get(&light.get_id()) {
            pdf += light.pdf_li(&Hit::default(), &-*w) * light_distr.func[*index];
        }
    }
    pdf / (light_distr.func_int * light_distr.count() as Float)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_isect<'a>(ns: Normal3f) -> SurfaceInteraction<'a> {
        let mut si = SurfaceInteraction::new(
            Point3f::ZERO,
            Vector3f::ZERO,
            Point2f::ZERO,
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::ZERO,
            Normal3f::ZERO,
            0.0,
            None,
        );
        si.shading.n = ns;
        si
    }

    #[test]
    fn radiance_mode_needs_no_correction() {
        let si = test_isect(Normal3f::new(0.0, 0.0, 1.0));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.3, 0.0, 0.95).normalize();
        assert_eq!(correct_shading_normal(&si, &wo, &wi, TransportMode::Radiance), 1.0);
    }

    #[test]
    fn matching_normals_give_unit_correction() {
        let si = test_isect(Normal3f::new(0.0, 0.0, 1.0));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.3, 0.0, 0.95).normalize();
        let c = correct_shading_normal(&si, &wo, &wi, TransportMode::Importance);
        assert!((c - 1.0).abs() < 1e-5);
    }

    #[test]
    fn perpendicular_wi_clamps_to_zero() {
        let si = test_isect(Normal3f::new(0.0, 0.0, 1.0));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(1.0, 0.0, 0.0);
        let c = correct_shading_normal(&si, &wo, &wi, TransportMode::Importance);
        assert_eq!(c, 0.0);
    }
}
