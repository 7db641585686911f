//! Common reflection helpers. All directions are in the BSDF-local shading
//! frame where the z-axis is the shading normal.

use crate::geometry::*;
use crate::pbrt::*;

/// Returns the cosine of the angle between the direction and the shading
/// normal.
///
/// * `w` - The direction.
#[inline(always)]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns the squared cosine of the angle between the direction and the
/// shading normal.
///
/// * `w` - The direction.
#[inline(always)]
pub fn cos2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

/// Returns the absolute cosine of the angle between the direction and the
/// shading normal.
///
/// * `w` - The direction.
#[inline(always)]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns true if two directions lie in the same hemisphere.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline(always)]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Reflects a direction about a normal.
///
/// * `wo` - The direction.
/// * `n`  - The normal.
#[inline(always)]
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -*wo + 2.0 * wo.dot(n) * n
}

/// Returns the Fresnel reflectance for dielectric materials and unpolarized
/// light.
///
/// * `cos_theta_i` - Cosine of the incident angle.
/// * `eta_i`       - Index of refraction on the incident side.
/// * `eta_t`       - Index of refraction on the transmitted side.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let (eta_i, eta_t) = if cos_theta_i > 0.0 {
        (eta_i, eta_t)
    } else {
        cos_theta_i = abs(cos_theta_i);
        (eta_t, eta_i)
    };

    // Compute cos_theta_t using Snell's law.
    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = max(0.0, 1.0 - sin_theta_t * sin_theta_t).sqrt();
    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t)) / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t)) / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_about_z() {
        let wo = Vector3f::new(1.0, 0.0, 1.0).normalize();
        let wi = reflect(&wo, &Vector3f::new(0.0, 0.0, 1.0));
        assert!((wi.x - -wo.x).abs() < 1e-6);
        assert!((wi.z - wo.z).abs() < 1e-6);
    }

    #[test]
    fn fresnel_normal_incidence() {
        // At normal incidence the dielectric reflectance reduces to
        // ((n1 - n2) / (n1 + n2))^2.
        let fr = fr_dielectric(1.0, 1.0, 1.5);
        let expected = ((1.0 - 1.5f32) / (1.0 + 1.5)).powi(2);
        assert!((fr - expected).abs() < 1e-5);
    }

    #[test]
    fn fresnel_total_internal_reflection() {
        let fr = fr_dielectric(-0.1, 1.0, 1.5);
        assert_eq!(fr, 1.0);
    }
}
