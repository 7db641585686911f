//! Film Tile

use super::{FILTER_TABLE_SIZE, FILTER_TABLE_WIDTH};
use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Pixel data within a film tile.
#[derive(Copy, Clone, Default)]
pub struct TilePixel {
    /// Running sum of filtered sample contributions.
    pub contrib_sum: Spectrum,

    /// Sum of filter weight values for the sample contributions.
    pub filter_weight_sum: Float,
}

/// Stores the contributions for pixels in a rectangular region of the image.
/// Tiles are rendered by a single thread and merged into the film when done.
pub struct FilmTile {
    /// Bounds of the pixels the tile contributes to.
    pixel_bounds: Bounds2i,

    /// The reconstruction filter's radius.
    filter_radius: Vector2f,

    /// Reciprocal of the filter's radius.
    inv_filter_radius: Vector2f,

    /// The precomputed filter weight table.
    filter_table: Arc<[Float; FILTER_TABLE_SIZE]>,

    /// The tile pixels.
    pub pixels: Vec<TilePixel>,
}

impl FilmTile {
    /// Create a new `FilmTile`.
    ///
    /// * `pixel_bounds`  - Bounds of the pixels the tile contributes to.
    /// * `filter_radius` - The reconstruction filter's radius.
    /// * `filter_table`  - The precomputed filter weight table.
    pub fn new(pixel_bounds: Bounds2i, filter_radius: Vector2f, filter_table: Arc<[Float; FILTER_TABLE_SIZE]>) -> Self {
        let n = max(0, pixel_bounds.area()) as usize;
        Self {
            pixel_bounds,
            filter_radius,
            inv_filter_radius: Vector2f::new(1.0 / filter_radius.x, 1.0 / filter_radius.y),
            filter_table,
            pixels: vec![TilePixel::default(); n],
        }
    }

    /// Returns the bounds of the pixels the tile contributes to.
    pub fn get_pixel_bounds(&self) -> Bounds2i {
        self.pixel_bounds
    }

    /// Gets the pixel offset within the tile for the given coordinates in the
    /// overall image.
    ///
    /// * `p` - The pixel coordinates with respect to the overall image.
    pub fn get_pixel_offset(&self, p: &Point2i) -> usize {
        debug_assert!(self.pixel_bounds.contains_exclusive(p));
        let width = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        let offset = (p.x - self.pixel_bounds.p_min.x) + (p.y - self.pixel_bounds.p_min.y) * width;
        offset as usize
    }

    /// Filter a sample's contribution into the pixels it overlaps.
    ///
    /// * `p_film`        - The sample position on the film.
    /// * `l`             - The radiance carried by the sample.
    /// * `sample_weight` - The weight of the sample.
    pub fn add_sample(&mut self, p_film: Point2f, l: Spectrum, sample_weight: Float) {
        // Compute sample's raster bounds.
        let p_film_discrete = p_film - Vector2f::new(0.5, 0.5);
        let p0 = Point2i::from((p_film_discrete - self.filter_radius).ceil());
        let p1 = Point2i::from((p_film_discrete + self.filter_radius).floor()) + Vector2i::new(1, 1);
        let p0 = Point2i::new(max(p0.x, self.pixel_bounds.p_min.x), max(p0.y, self.pixel_bounds.p_min.y));
        let p1 = Point2i::new(min(p1.x, self.pixel_bounds.p_max.x), min(p1.y, self.pixel_bounds.p_max.y));

        // Precompute x and y filter table offsets.
        let mut ifx = vec![0_usize; max(0, p1.x - p0.x) as usize];
        for x in p0.x..p1.x {
            let fx = abs((x as Float - p_film_discrete.x) * self.inv_filter_radius.x * FILTER_TABLE_WIDTH as Float);
            ifx[(x - p0.x) as usize] = min(fx.floor() as usize, FILTER_TABLE_WIDTH - 1);
        }
        let mut ify = vec![0_usize; max(0, p1.y - p0.y) as usize];
        for y in p0.y..p1.y {
            let fy = abs((y as Float - p_film_discrete.y) * self.inv_filter_radius.y * FILTER_TABLE_WIDTH as Float);
            ify[(y - p0.y) as usize] = min(fy.floor() as usize, FILTER_TABLE_WIDTH - 1);
        }

        // Loop over filter support and add sample to pixel arrays.
        for y in p0.y..p1.y {
            for x in p0.x..p1.x {
                // Evaluate filter value at (x, y) pixel.
                let offset = ify[(y - p0.y) as usize] * FILTER_TABLE_WIDTH + ifx[(x - p0.x) as usize];
                let filter_weight = self.filter_table[offset];

                // Update pixel values with filtered sample contribution.
                let pixel_offset = self.get_pixel_offset(&Point2i::new(x, y));
                let pixel = &mut self.pixels[pixel_offset];
                pixel.contrib_sum += l * sample_weight * filter_weight;
                pixel.filter_weight_sum += filter_weight;
            }
        }
    }
}
