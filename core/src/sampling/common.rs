//! Sampling kernels

use crate::geometry::*;
use crate::pbrt::*;

/// Uniformly sample a direction on the unit sphere.
///
/// * `u` - The random sample in [0, 1)^2.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniform sphere sampling.
#[inline(always)]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Uniformly sample a direction on the unit hemisphere about the z-axis.
///
/// * `u` - The random sample in [0, 1)^2.
pub fn uniform_sample_hemisphere(u: &Point2f) -> Vector3f {
    let z = u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniform hemisphere sampling.
#[inline(always)]
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

/// Uniformly sample a point on the unit disk by mapping the unit square to
/// the disk with low distortion.
///
/// * `u` - The random sample in [0, 1)^2.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let u_offset = *u * 2.0 - Vector2f::new(1.0, 1.0);

    // Handle degeneracy at the origin.
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::ZERO;
    }

    // Apply concentric mapping to point.
    let (r, theta) = if abs(u_offset.x) > abs(u_offset.y) {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y))
    };
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Sample a direction on the unit hemisphere with a cosine-weighted
/// distribution about the z-axis.
///
/// * `u` - The random sample in [0, 1)^2.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted hemisphere sampling.
///
/// * `cos_theta` - Cosine of the sampled direction's polar angle.
#[inline(always)]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Uniformly sample a direction inside a cone of directions about the z-axis.
///
/// * `u`             - The random sample in [0, 1)^2.
/// * `cos_theta_max` - Cosine of the maximum cone angle.
pub fn uniform_sample_cone(u: &Point2f, cos_theta_max: Float) -> Vector3f {
    let cos_theta = (1.0 - u[0]) + u[0] * cos_theta_max;
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = u[1] * TWO_PI;
    Vector3f::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Returns the PDF for uniform cone sampling.
///
/// * `cos_theta_max` - Cosine of the maximum cone angle.
#[inline(always)]
pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 / (TWO_PI * (1.0 - cos_theta_max))
}

/// The prime bases available to `radical_inverse`.
const PRIMES: [u64; 6] = [2, 3, 5, 7, 11, 13];

/// Computes the radical inverse of a number in the prime base selected by
/// `base_index`. Used to generate low-discrepancy point sets.
///
/// * `base_index` - Index into the prime base table.
/// * `a`          - The number.
pub fn radical_inverse(base_index: usize, a: u64) -> Float {
    let base = PRIMES[base_index];
    let inv_base = 1.0 / base as f64;
    let mut reversed_digits: u64 = 0;
    let mut inv_base_n = 1.0;
    let mut a = a;
    while a != 0 {
        let next = a / base;
        let digit = a - next * base;
        reversed_digits = reversed_digits * base + digit;
        inv_base_n *= inv_base;
        a = next;
    }
    min((reversed_digits as f64 * inv_base_n) as Float, crate::rng::ONE_MINUS_EPSILON)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_square() -> impl Strategy<Value = Point2f> {
        (0.0..1.0f32, 0.0..1.0f32).prop_map(|(x, y)| Point2f::new(x, y))
    }

    proptest! {
        #[test]
        fn sphere_samples_are_unit(u in unit_square()) {
            let v = uniform_sample_sphere(&u);
            prop_assert!((v.length() - 1.0).abs() < 1e-4);
        }

        #[test]
        fn hemisphere_samples_point_up(u in unit_square()) {
            let v = cosine_sample_hemisphere(&u);
            prop_assert!(v.z >= 0.0);
            prop_assert!(v.length() < 1.0 + 1e-4);
        }

        #[test]
        fn disk_samples_inside_disk(u in unit_square()) {
            let p = concentric_sample_disk(&u);
            prop_assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-5);
        }

        #[test]
        fn cone_samples_inside_cone(u in unit_square(), cos_max in 0.0..0.99f32) {
            let v = uniform_sample_cone(&u, cos_max);
            prop_assert!(v.z >= cos_max - 1e-4);
        }
    }
}
