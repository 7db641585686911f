//! Per-strategy variance estimators.

use std::sync::atomic::{AtomicU32, Ordering};
use strata_core::geometry::*;
use strata_core::image_io::write_image;
use strata_core::parallel::AtomicFloat;
use strata_core::pbrt::*;

/// Accumulates per-pixel first and second moments of unweighted strategy
/// contributions at full film resolution. Purely diagnostic; one estimator is
/// allocated per `(depth, t)` buffer when `estimatevariances` is enabled.
pub struct VarianceEstimator {
    /// Film pixel bounds.
    pixel_bounds: Bounds2i,

    /// Per-pixel sum of contributions.
    sum: Vec<AtomicFloat>,

    /// Per-pixel sum of squared contributions.
    sum_sq: Vec<AtomicFloat>,

    /// Per-pixel number of recorded estimates.
    n: Vec<AtomicU32>,
}

impl VarianceEstimator {
    /// Create a new `VarianceEstimator`.
    ///
    /// * `pixel_bounds` - Film pixel bounds.
    pub fn new(pixel_bounds: Bounds2i) -> Self {
        let count = max(0, pixel_bounds.area()) as usize;
        Self {
            pixel_bounds,
            sum: (0..count).map(|_| AtomicFloat::default()).collect(),
            sum_sq: (0..count).map(|_| AtomicFloat::default()).collect(),
            n: (0..count).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    /// Record an unweighted contribution.
    ///
    /// * `p_raster` - The raster position the contribution lands on.
    /// * `value`    - The unweighted contribution.
    pub fn add_estimate(&self, p_raster: &Point2f, value: Float) {
        let px = Point2i::from(p_raster.floor());
        if !self.pixel_bounds.contains_exclusive(&px) {
            return;
        }
        let width = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        let offset = ((px.x - self.pixel_bounds.p_min.x) + (px.y - self.pixel_bounds.p_min.y) * width) as usize;

        self.sum[offset].add(value);
        self.sum_sq[offset].add(value * value);
        self.n[offset].fetch_add(1, Ordering::Relaxed);
    }

    /// Write a diagnostic image derived from the accumulated moments.
    ///
    /// * `path`              - Output file path.
    /// * `samples_per_pixel` - Total samples per pixel of the render.
    /// * `is_splat`          - True for `t = 1` buffers whose contributions
    ///                         arrive as splats; their moments are normalized
    ///                         by the total sample count instead of the
    ///                         per-pixel estimate count.
    /// * `write_factor`      - Write `1 + mean^2 / variance` instead of the
    ///                         variance itself.
    pub fn write_to_file(&self, path: &str, samples_per_pixel: usize, is_splat: bool, write_factor: bool) -> Result<(), String> {
        let count = max(0, self.pixel_bounds.area()) as usize;
        let mut rgb = vec![0.0; count * 3];

        for i in 0..count {
            let n = if is_splat {
                samples_per_pixel as Float
            } else {
                self.n[i].load(Ordering::Relaxed) as Float
            };
            let value = if n == 0.0 {
                if write_factor {
                    1.0
                } else {
                    0.0
                }
            } else {
                let inv_n = 1.0 / n;
                let mean = self.sum[i].load() * inv_n;
                let variance = max(0.0, self.sum_sq[i].load() * inv_n - mean * mean);
                if write_factor {
                    if variance > 0.0 && mean != 0.0 {
                        1.0 + mean * mean / variance
                    } else {
                        1.0
                    }
                } else {
                    variance
                }
            };

            rgb[3 * i] = value;
            rgb[3 * i + 1] = value;
            rgb[3 * i + 2] = value;
        }

        write_image(path, &rgb, &self.pixel_bounds)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_outside_bounds_are_dropped() {
        let bounds = Bounds2i {
            p_min: Point2i::new(0, 0),
            p_max: Point2i::new(4, 4),
        };
        let estimator = VarianceEstimator::new(bounds);
        estimator.add_estimate(&Point2f::new(-1.0, 0.0), 1.0);
        estimator.add_estimate(&Point2f::new(4.5, 0.0), 1.0);
        estimator.add_estimate(&Point2f::new(2.0, 2.0), 1.0);
        assert_eq!(estimator.n[2 * 4 + 2].load(Ordering::Relaxed), 1);
        assert_eq!(estimator.n[0].load(Ordering::Relaxed), 0);
    }

    #[test]
    fn moments_accumulate() {
        let bounds = Bounds2i {
            p_min: Point2i::new(0, 0),
            p_max: Point2i::new(2, 2),
        };
        let estimator = VarianceEstimator::new(bounds);
        for v in [1.0, 3.0] {
            estimator.add_estimate(&Point2f::new(0.5, 0.5), v);
        }
        assert_eq!(estimator.sum[0].load(), 4.0);
        assert_eq!(estimator.sum_sq[0].load(), 10.0);
        assert_eq!(estimator.n[0].load(Ordering::Relaxed), 2);
    }
}
