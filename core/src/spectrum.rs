//! Spectrum

#![allow(dead_code)]

use crate::pbrt::*;
use num_traits::Zero;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub};

/// Number of samples used to represent a spectral distribution.
pub const SPECTRUM_SAMPLES: usize = 3;

/// Default to using `RGBSpectrum` for rendering.
pub type Spectrum = RGBSpectrum;

/// Represents a spectral power distribution with a red, green and blue sample.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// The samples.
    c: [Float; SPECTRUM_SAMPLES],
}

impl RGBSpectrum {
    /// Black.
    pub const ZERO: Self = Self { c: [0.0; SPECTRUM_SAMPLES] };

    /// Unit spectrum.
    pub const ONE: Self = Self { c: [1.0; SPECTRUM_SAMPLES] };

    /// Create a spectrum with a constant value across all samples.
    ///
    /// * `v` - The constant value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; SPECTRUM_SAMPLES] }
    }

    /// Create a spectrum from RGB values.
    ///
    /// * `rgb` - The RGB values.
    pub fn from_rgb(rgb: &[Float; 3]) -> Self {
        Self { c: *rgb }
    }

    /// Returns the RGB values.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    /// Returns the luminance.
    pub fn y(&self) -> Float {
        const W: [Float; 3] = [0.212671, 0.715160, 0.072169];
        W[0] * self.c[0] + W[1] * self.c[1] + W[2] * self.c[2]
    }

    /// Returns true if all samples are zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns true if any sample is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns the component-wise square root.
    pub fn sqrt(&self) -> Self {
        Self {
            c: [self.c[0].sqrt(), self.c[1].sqrt(), self.c[2].sqrt()],
        }
    }

    /// Returns e raised to the power of each component.
    pub fn exp(&self) -> Self {
        Self {
            c: [self.c[0].exp(), self.c[1].exp(), self.c[2].exp()],
        }
    }

    /// Returns the largest sample value.
    pub fn max_component_value(&self) -> Float {
        max(self.c[0], max(self.c[1], self.c[2]))
    }

    /// Clamps all samples to [0, ∞).
    pub fn clamp_default(&self) -> Self {
        Self {
            c: [
                clamp(self.c[0], 0.0, INFINITY),
                clamp(self.c[1], 0.0, INFINITY),
                clamp(self.c[2], 0.0, INFINITY),
            ],
        }
    }

    /// Linearly interpolate between two spectra.
    ///
    /// * `t`  - The interpolation parameter.
    /// * `s1` - The spectrum at t=0.
    /// * `s2` - The spectrum at t=1.
    pub fn lerp(t: Float, s1: &Self, s2: &Self) -> Self {
        (1.0 - t) * *s1 + t * *s2
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    /// Component-wise addition.
    ///
    /// * `other` - The other spectrum.
    fn add(self, other: Self) -> Self::Output {
        Self {
            c: [self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2]],
        }
    }
}

impl AddAssign for RGBSpectrum {
    /// Component-wise addition.
    ///
    /// * `other` - The other spectrum.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    /// Component-wise subtraction.
    ///
    /// * `other` - The other spectrum.
    fn sub(self, other: Self) -> Self::Output {
        Self {
            c: [self.c[0] - other.c[0], self.c[1] - other.c[1], self.c[2] - other.c[2]],
        }
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    /// Component-wise multiplication.
    ///
    /// * `other` - The other spectrum.
    fn mul(self, other: Self) -> Self::Output {
        Self {
            c: [self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2]],
        }
    }
}

impl MulAssign for RGBSpectrum {
    /// Component-wise multiplication.
    ///
    /// * `other` - The other spectrum.
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    /// Scale all samples.
    ///
    /// * `f` - The scale factor.
    fn mul(self, f: Float) -> Self::Output {
        Self {
            c: [self.c[0] * f, self.c[1] * f, self.c[2] * f],
        }
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scale all samples.
    ///
    /// * `s` - The spectrum.
    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    /// Scale all samples.
    ///
    /// * `f` - The scale factor.
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div for RGBSpectrum {
    type Output = Self;

    /// Component-wise division.
    ///
    /// * `other` - The other spectrum.
    fn div(self, other: Self) -> Self::Output {
        Self {
            c: [self.c[0] / other.c[0], self.c[1] / other.c[1], self.c[2] / other.c[2]],
        }
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    /// Scale all samples by 1/f.
    ///
    /// * `f` - The scale factor.
    fn div(self, f: Float) -> Self::Output {
        debug_assert!(!f.is_zero());
        let inv = 1.0 / f;
        Self {
            c: [self.c[0] * inv, self.c[1] * inv, self.c[2] * inv],
        }
    }
}

impl DivAssign<Float> for RGBSpectrum {
    /// Scale all samples by 1/f.
    ///
    /// * `f` - The scale factor.
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Neg for RGBSpectrum {
    type Output = Self;

    /// Negate all samples.
    fn neg(self) -> Self::Output {
        Self {
            c: [-self.c[0], -self.c[1], -self.c[2]],
        }
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    /// Index the sample values.
    ///
    /// * `i` - The sample index.
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl From<Float> for RGBSpectrum {
    /// Create a constant spectrum.
    ///
    /// * `v` - The constant value.
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl fmt::Display for RGBSpectrum {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_detection() {
        assert!(RGBSpectrum::ZERO.is_black());
        assert!(!RGBSpectrum::new(0.5).is_black());
        assert!(!RGBSpectrum::from_rgb(&[0.0, 0.1, 0.0]).is_black());
    }

    #[test]
    fn luminance_weights_sum_to_one() {
        let y = RGBSpectrum::ONE.y();
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn arithmetic() {
        let a = RGBSpectrum::from_rgb(&[1.0, 2.0, 3.0]);
        let b = RGBSpectrum::from_rgb(&[2.0, 0.5, 1.0]);
        assert_eq!((a * b).to_rgb(), [2.0, 1.0, 3.0]);
        assert_eq!((a + b).to_rgb(), [3.0, 2.5, 4.0]);
        assert_eq!((a * 2.0).to_rgb(), [2.0, 4.0, 6.0]);
        assert_eq!((a / 2.0).to_rgb(), [0.5, 1.0, 1.5]);
    }

    #[test]
    fn exp_of_negated_extinction() {
        let sigma = RGBSpectrum::new(1.0);
        let tr = (-sigma * 2.0).exp();
        assert!((tr[0] - (-2.0f32).exp()).abs() < 1e-6);
    }
}
