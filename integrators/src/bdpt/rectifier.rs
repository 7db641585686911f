//! Stratification-aware MIS rectifier.

use super::MisModification;
use std::sync::atomic::{AtomicU32, Ordering};
use strata_core::geometry::*;
use strata_core::image_io::write_image;
use strata_core::parallel::AtomicFloat;
use strata_core::pbrt::*;

/// Per-cell moment accumulator. The prepass writes into these concurrently
/// from every render tile, so all sums go through atomics.
#[derive(Default)]
struct MomentCell {
    /// Sum of unweighted contributions.
    sum_u: AtomicFloat,

    /// Sum of squared unweighted contributions.
    sum_u2: AtomicFloat,

    /// Sum of weighted contributions.
    sum_w: AtomicFloat,

    /// Number of recorded estimates.
    n: AtomicU32,
}

/// One downsampled grid of moment cells for a `(depth, t)` strategy band.
struct Band {
    /// Path length in edges.
    depth: usize,

    /// Strategy index (number of camera subpath vertices).
    t: usize,

    /// The cells, laid out row-major over the downsampled grid.
    cells: Vec<MomentCell>,
}

/// Stores per-pixel, per-depth, per-strategy moment estimates from the
/// prepass and serves rectification factors to the MIS weight computation
/// during the main pass.
pub struct SAMISRectifier {
    /// Film pixel bounds covered by the grids.
    pixel_bounds: Bounds2i,

    /// Smallest path length (in edges) that is rectified.
    recti_min_depth: usize,

    /// Largest path length (in edges) that is rectified.
    recti_max_depth: usize,

    /// Edge length of the downsampling blocks in pixels.
    downsampling_factor: usize,

    /// The factor derivation scheme.
    scheme: MisModification,

    /// Downsampled grid resolution.
    grid_res: Point2i,

    /// One moment grid per active `(depth, t)` band.
    bands: Vec<Band>,

    /// Rectification factors per band and cell; present after `prepare()`.
    factors: Option<Vec<Vec<Float>>>,

    /// Cells whose factors were clamped; pixels inside them must override the
    /// prepass result rather than blend.
    mask: Vec<bool>,
}

impl SAMISRectifier {
    /// Create a new `SAMISRectifier`. All moment grids start out zeroed.
    ///
    /// * `pixel_bounds`        - Film pixel bounds.
    /// * `recti_min_depth`     - Smallest rectified path length in edges.
    /// * `recti_max_depth`     - Largest rectified path length in edges.
    /// * `downsampling_factor` - Edge length of the downsampling blocks.
    /// * `scheme`              - The factor derivation scheme.
    pub fn new(
        pixel_bounds: Bounds2i,
        recti_min_depth: usize,
        recti_max_depth: usize,
        downsampling_factor: usize,
        scheme: MisModification,
    ) -> Self {
        let downsampling_factor = max(1, downsampling_factor);
        let extent = pixel_bounds.diagonal();
        let grid_res = Point2i::new(
            (extent.x + downsampling_factor as Int - 1) / downsampling_factor as Int,
            (extent.y + downsampling_factor as Int - 1) / downsampling_factor as Int,
        );
        let cell_count = (grid_res.x * grid_res.y) as usize;

        // Allocate a band per (depth, t); at path length `depth` the valid
        // strategies are t = 1..=depth+1.
        let mut bands = Vec::new();
        for depth in recti_min_depth..=recti_max_depth {
            for t in 1..=depth + 1 {
                bands.push(Band {
                    depth,
                    t,
                    cells: (0..cell_count).map(|_| MomentCell::default()).collect(),
                });
            }
        }

        Self {
            pixel_bounds,
            recti_min_depth,
            recti_max_depth,
            downsampling_factor,
            scheme,
            grid_res,
            bands,
            factors: None,
            mask: vec![false; cell_count],
        }
    }

    /// Returns the downsampled cell index for a raster position, or `None`
    /// outside the pixel bounds.
    ///
    /// * `p_raster` - The raster position.
    fn cell_index(&self, p_raster: &Point2f) -> Option<usize> {
        let px = Point2i::from(p_raster.floor());
        if !self.pixel_bounds.contains_exclusive(&px) {
            return None;
        }
        let cx = (px.x - self.pixel_bounds.p_min.x) / self.downsampling_factor as Int;
        let cy = (px.y - self.pixel_bounds.p_min.y) / self.downsampling_factor as Int;
        Some((cy * self.grid_res.x + cx) as usize)
    }

    /// Returns the band index for a `(depth, t)` pair, or `None` outside the
    /// rectified range.
    ///
    /// * `depth` - Path length in edges.
    /// * `t`     - Strategy index.
    fn band_index(&self, depth: usize, t: usize) -> Option<usize> {
        if depth < self.recti_min_depth || depth > self.recti_max_depth || t < 1 || t > depth + 1 {
            return None;
        }
        let mut index = 0;
        for d in self.recti_min_depth..depth {
            index += d + 1;
        }
        Some(index + t - 1)
    }

    /// Record a per-strategy estimate during the prepass.
    ///
    /// * `p_raster`   - The raster position the contribution lands on.
    /// * `depth`      - Path length in edges (s + t - 1).
    /// * `t`          - Strategy index (number of camera subpath vertices).
    /// * `unweighted` - The contribution with the MIS weight divided out.
    /// * `weighted`   - The MIS-weighted contribution.
    pub fn add_estimate(&self, p_raster: &Point2f, depth: usize, t: usize, unweighted: Float, weighted: Float) {
        let band = match self.band_index(depth, t) {
            Some(band) => band,
            None => return,
        };
        let cell = match self.cell_index(p_raster) {
            Some(cell) => cell,
            None => return,
        };

        let c = &self.bands[band].cells[cell];
        c.sum_u.add(unweighted);
        c.sum_u2.add(unweighted * unweighted);
        c.sum_w.add(weighted);
        c.n.fetch_add(1, Ordering::Relaxed);
    }

    /// Derive the rectification factors from the accumulated moments. Called
    /// once between the prepass and the main pass.
    ///
    /// * `passes`          - Number of prepass iterations that accumulated
    ///                       estimates (reserved for multi-pass schedules).
    /// * `clamp_threshold` - Factors above `clamp_threshold` times the band
    ///                       median are clamped and their pixels masked.
    pub fn prepare(&mut self, _passes: usize, clamp_threshold: Float) {
        let mut factors = Vec::with_capacity(self.bands.len());

        for band in self.bands.iter() {
            let mut band_factors: Vec<Float> = band.cells.iter().map(|c| self.cell_factor(c)).collect();

            // Clamp outliers against the band median and mask their cells so
            // the driver discards the prepass there.
            let mut sorted = band_factors.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let median = sorted[sorted.len() / 2];
            let bound = clamp_threshold * median;
            if bound > 0.0 {
                for (i, f) in band_factors.iter_mut().enumerate() {
                    if *f > bound {
                        *f = bound;
                        self.mask[i] = true;
                    }
                }
            }

            debug!(
                "Rectifier band d={} t={}: median factor {}, clamp bound {}",
                band.depth, band.t, median, bound
            );
            factors.push(band_factors);
        }

        self.factors = Some(factors);
    }

    /// Compute the rectification factor for a single cell under the
    /// configured scheme.
    ///
    /// * `cell` - The moment cell.
    fn cell_factor(&self, cell: &MomentCell) -> Float {
        let n = cell.n.load(Ordering::Relaxed);
        if n == 0 {
            return 1.0;
        }
        let inv_n = 1.0 / n as Float;
        let mean_u = cell.sum_u.load() * inv_n;
        let variance = max(0.0, cell.sum_u2.load() * inv_n - mean_u * mean_u);
        let mean_w = cell.sum_w.load() * inv_n;

        match self.scheme {
            MisModification::None => 1.0,
            MisModification::ReciprocalVariance => {
                if variance > 0.0 {
                    1.0 / variance
                } else {
                    1.0
                }
            }
            MisModification::MomentOverVariance => {
                if variance > 0.0 && mean_w != 0.0 {
                    1.0 + mean_w * mean_w / variance
                } else {
                    1.0
                }
            }
        }
    }

    /// Constant-time factor lookup used inside the MIS weight computation
    /// during the main pass. Returns 1 for depths outside the rectified range
    /// and before `prepare()` has run.
    ///
    /// * `px`    - The pixel coordinates.
    /// * `depth` - Path length in edges (s + t - 1).
    /// * `t`     - Strategy index of the hypothetical strategy.
    pub fn get(&self, px: &Point2i, depth: usize, t: usize) -> Float {
        let factors = match self.factors.as_ref() {
            Some(factors) => factors,
            None => return 1.0,
        };
        let band = match self.band_index(depth, t) {
            Some(band) => band,
            None => return 1.0,
        };
        let cell = match self.cell_index(&Point2f::new(px.x as Float + 0.5, px.y as Float + 0.5)) {
            Some(cell) => cell,
            None => return 1.0,
        };
        factors[band][cell]
    }

    /// Returns true if the pixel lies in a cell whose factor was clamped; the
    /// driver takes the main-pass result alone there instead of blending.
    ///
    /// * `px` - The pixel coordinates.
    pub fn is_masked(&self, px: &Point2i) -> bool {
        match self.cell_index(&Point2f::new(px.x as Float + 0.5, px.y as Float + 0.5)) {
            Some(cell) => self.mask[cell],
            None => false,
        }
    }

    /// Write one grayscale factor image per band for inspection.
    pub fn write_images(&self) -> Result<(), String> {
        let factors = match self.factors.as_ref() {
            Some(factors) => factors,
            None => return Err(String::from("rectifier factors are not prepared")),
        };

        let bounds = Bounds2i {
            p_min: Point2i::new(0, 0),
            p_max: self.grid_res,
        };
        for (band, band_factors) in self.bands.iter().zip(factors.iter()) {
            let mut rgb = Vec::with_capacity(band_factors.len() * 3);
            for f in band_factors.iter() {
                rgb.extend_from_slice(&[*f, *f, *f]);
            }
            let filename = format!("samis-d{:02}-t{:02}.exr", band.depth, band.t);
            write_image(&filename, &rgb, &bounds)?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(w: Int, h: Int) -> Bounds2i {
        Bounds2i {
            p_min: Point2i::new(0, 0),
            p_max: Point2i::new(w, h),
        }
    }

    #[test]
    fn none_scheme_always_yields_unit_factors() {
        let mut rectifier = SAMISRectifier::new(bounds(16, 16), 1, 2, 8, MisModification::None);
        for i in 0..64 {
            rectifier.add_estimate(&Point2f::new(3.0, 3.0), 1, 1, i as Float, i as Float);
        }
        rectifier.prepare(1, 16.0);
        assert_eq!(rectifier.get(&Point2i::new(3, 3), 1, 1), 1.0);
        assert!(!rectifier.is_masked(&Point2i::new(3, 3)));
    }

    #[test]
    fn get_returns_one_before_prepare_and_outside_range() {
        let rectifier = SAMISRectifier::new(bounds(16, 16), 1, 1, 8, MisModification::MomentOverVariance);
        assert_eq!(rectifier.get(&Point2i::new(0, 0), 1, 1), 1.0);
        assert_eq!(rectifier.get(&Point2i::new(0, 0), 5, 1), 1.0);
    }

    #[test]
    fn moment_scheme_computes_expected_factor() {
        let mut rectifier = SAMISRectifier::new(bounds(8, 8), 1, 1, 8, MisModification::MomentOverVariance);
        // Alternating 0/2 contributions: mean 1, variance 1.
        for i in 0..100 {
            let u = if i % 2 == 0 { 0.0 } else { 2.0 };
            rectifier.add_estimate(&Point2f::new(1.0, 1.0), 1, 1, u, u);
        }
        // A very large clamp threshold disables masking in this test.
        rectifier.prepare(1, 1e6);
        let f = rectifier.get(&Point2i::new(1, 1), 1, 1);
        assert!((f - 2.0).abs() < 1e-3, "factor was {}", f);
    }

    #[test]
    fn reciprocal_scheme_uses_inverse_variance() {
        let mut rectifier = SAMISRectifier::new(bounds(8, 8), 1, 1, 8, MisModification::ReciprocalVariance);
        for i in 0..100 {
            let u = if i % 2 == 0 { 0.0 } else { 4.0 };
            rectifier.add_estimate(&Point2f::new(1.0, 1.0), 1, 1, u, u);
        }
        rectifier.prepare(1, 1e6);
        // Variance of the 0/4 sequence is 4.
        let f = rectifier.get(&Point2i::new(1, 1), 1, 1);
        assert!((f - 0.25).abs() < 1e-3, "factor was {}", f);
    }

    #[test]
    fn outlier_cells_are_clamped_and_masked() {
        let mut rectifier = SAMISRectifier::new(bounds(32, 32), 1, 1, 8, MisModification::MomentOverVariance);
        // One cell with a small relative variance produces a huge factor; the
        // rest of the 4x4 grid stays at the unit factor, pinning the median
        // to 1.
        for i in 0..100 {
            let u = if i % 2 == 0 { 99.0 } else { 101.0 };
            rectifier.add_estimate(&Point2f::new(1.0, 1.0), 1, 1, u, u);
        }
        rectifier.prepare(1, 2.0);
        let f = rectifier.get(&Point2i::new(1, 1), 1, 1);
        assert!(f <= 2.0 + 1e-4);
        assert!(rectifier.is_masked(&Point2i::new(1, 1)));
        assert!(!rectifier.is_masked(&Point2i::new(31, 31)));
    }

    #[test]
    fn estimates_outside_depth_range_are_ignored() {
        let mut rectifier = SAMISRectifier::new(bounds(8, 8), 2, 3, 8, MisModification::MomentOverVariance);
        for _ in 0..10 {
            rectifier.add_estimate(&Point2f::new(1.0, 1.0), 1, 1, 100.0, 100.0);
            rectifier.add_estimate(&Point2f::new(1.0, 1.0), 4, 1, 100.0, 100.0);
        }
        rectifier.prepare(1, 1e6);
        assert_eq!(rectifier.get(&Point2i::new(1, 1), 1, 1), 1.0);
        assert_eq!(rectifier.get(&Point2i::new(1, 1), 4, 1), 1.0);
    }
}
