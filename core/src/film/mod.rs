//! Film

use crate::filter::*;
use crate::geometry::*;
use crate::image_io::*;
use crate::paramset::*;
use crate::pbrt::*;
use crate::spectrum::*;
use crate::{stat_counter, stat_inc, stat_register_fns, stats::*};
use std::sync::{Arc, RwLock};

mod film_tile;

// Re-export.
pub use film_tile::*;

/// Filter table width.
pub const FILTER_TABLE_WIDTH: usize = 16;

/// Filter table size.
pub const FILTER_TABLE_SIZE: usize = FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH;

/// Reciprocal of `FILTER_TABLE_WIDTH`.
pub const INV_FILTER_TABLE_WIDTH: Float = 1.0 / (FILTER_TABLE_WIDTH as Float);

stat_counter!("Film/Splats discarded", N_SPLATS_DISCARDED, film_stats_splats);

stat_register_fns!(film_stats_splats);

/// Pixel data.
#[derive(Copy, Clone, Default)]
pub struct Pixel {
    /// Stores the running weighted sums of spectral pixel contributions.
    pub rgb: [Float; 3],

    /// Holds the sum of filter weight values for the sample contributions to
    /// the pixel.
    pub filter_weight_sum: Float,

    /// Holds an unweighted sum of sample splats.
    pub splat_rgb: [Float; 3],
}

/// Models the sensing device in a simulated camera. It stores all of the
/// sample contributions that make up the final image.
pub struct Film {
    /// The overall image resolution in pixels.
    pub full_resolution: Point2i,

    /// Filter function to use for image reconstruction from samples.
    pub filter: ArcFilter,

    /// Filename of output image.
    pub filename: String,

    /// Crop window of the subset of the image to render.
    pub cropped_pixel_bounds: Bounds2i,

    /// The filter table.
    filter_table: Arc<[Float; FILTER_TABLE_SIZE]>,

    /// Scale factor for pixel values.
    scale: Float,

    /// Stores the image pixels.
    pixels: RwLock<Vec<Pixel>>,
}

impl Film {
    /// Create a new `Film` instance.
    ///
    /// * `resolution`  - The overall image resolution in pixels.
    /// * `crop_window` - Crop window of the subset of the image to render in
    ///                   NDC space.
    /// * `filter`      - Filter function to use for image reconstruction.
    /// * `filename`    - Filename of output image.
    /// * `scale`       - Optional scale factor for pixel values (default 1).
    pub fn new(resolution: &Point2i, crop_window: &Bounds2f, filter: ArcFilter, filename: &str, scale: Option<Float>) -> Self {
        register_stats();

        // Compute the film image bounds.
        let cropped_pixel_bounds = Bounds2i {
            p_min: Point2i::new(
                (resolution.x as Float * crop_window.p_min.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_min.y).ceil() as Int,
            ),
            p_max: Point2i::new(
                (resolution.x as Float * crop_window.p_max.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_max.y).ceil() as Int,
            ),
        };

        // Precompute filter weight table.
        let filter_data = filter.get_data();
        let mut filter_table = [0.0; FILTER_TABLE_SIZE];
        let mut offset = 0;
        for y in 0..FILTER_TABLE_WIDTH {
            for x in 0..FILTER_TABLE_WIDTH {
                let p = Point2f::new(
                    (x as Float + 0.5) * filter_data.radius.x * INV_FILTER_TABLE_WIDTH,
                    (y as Float + 0.5) * filter_data.radius.y * INV_FILTER_TABLE_WIDTH,
                );
                filter_table[offset] = filter.evaluate(&p);
                offset += 1;
            }
        }

        // Allocate film image storage.
        let n = cropped_pixel_bounds.area() as usize;
        let pixels = RwLock::new(vec![Pixel::default(); n]);

        Self {
            full_resolution: *resolution,
            filter,
            filter_table: Arc::new(filter_table),
            filename: String::from(filename),
            cropped_pixel_bounds,
            scale: scale.unwrap_or(1.0),
            pixels,
        }
    }

    /// Returns the sample bounds accounting for the half-pixel offsets when
    /// converting from discrete to continuous pixel coordinates.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        let filter_data = self.filter.get_data();
        let half_pixel = Vector2f::new(0.5, 0.5);

        let p0 = (Point2f::from(self.cropped_pixel_bounds.p_min) + half_pixel - filter_data.radius).floor();
        let p1 = (Point2f::from(self.cropped_pixel_bounds.p_max) - half_pixel + filter_data.radius).ceil();
        Bounds2i::from(Bounds2f { p_min: p0, p_max: p1 })
    }

    /// Gets the pixel offset given its coordinates in the overall image.
    ///
    /// * `p` - The pixel coordinates with respect to the overall image.
    pub fn get_pixel_offset(&self, p: &Point2i) -> usize {
        debug_assert!(self.cropped_pixel_bounds.contains_exclusive(p));
        let width = self.cropped_pixel_bounds.p_max.x - self.cropped_pixel_bounds.p_min.x;
        let offset = (p.x - self.cropped_pixel_bounds.p_min.x) + (p.y - self.cropped_pixel_bounds.p_min.y) * width;
        offset as usize
    }

    /// Returns a `FilmTile` that stores the contributions for pixels in the
    /// specified region of the image.
    ///
    /// * `sample_bounds` - Tile region in the overall image.
    pub fn get_film_tile(&self, sample_bounds: Bounds2i) -> FilmTile {
        let filter_data = self.filter.get_data();
        let half_pixel = Vector2f::new(0.5, 0.5);

        // Bound image pixels that samples in `sample_bounds` contribute to.
        let float_bounds = Bounds2f::from(sample_bounds);
        let p0 = Point2i::from((float_bounds.p_min - half_pixel - filter_data.radius).ceil());
        let p1 = Point2i::from((float_bounds.p_max - half_pixel + filter_data.radius).floor()) + Vector2i::new(1, 1);
        let tile_pixel_bounds = Bounds2i { p_min: p0, p_max: p1 }.intersect(&self.cropped_pixel_bounds);

        FilmTile::new(tile_pixel_bounds, filter_data.radius, Arc::clone(&self.filter_table))
    }

    /// Merge the `FilmTile`'s pixel contributions into the image.
    ///
    /// * `tile` - The `FilmTile` to merge.
    pub fn merge_film_tile(&self, tile: &FilmTile) {
        let mut pixels = self.pixels.write().unwrap();
        for pixel in tile.get_pixel_bounds() {
            let tile_pixel = tile.get_pixel_offset(&pixel);
            let merge_pixel = self.get_pixel_offset(&pixel);
            let rgb = tile.pixels[tile_pixel].contrib_sum.to_rgb();
            for (i, colour) in rgb.iter().enumerate() {
                pixels[merge_pixel].rgb[i] += *colour;
            }
            pixels[merge_pixel].filter_weight_sum += tile.pixels[tile_pixel].filter_weight_sum;
        }
    }

    /// Add a splat contribution to a pixel. Splats are summed unweighted and
    /// scaled at write-out.
    ///
    /// * `p` - The raster coordinates of the splat.
    /// * `v` - Splat contribution to add to the pixel.
    pub fn add_splat(&self, p: &Point2f, v: &Spectrum) {
        if v.has_nans() {
            warn!("Ignoring splatted spectrum with NaN values at ({}, {})", p.x, p.y);
            stat_inc!(N_SPLATS_DISCARDED, 1);
            return;
        }

        let vy = v.y();
        if vy < 0.0 {
            warn!("Ignoring splatted spectrum with negative luminance {} at ({}, {})", vy, p.x, p.y);
            stat_inc!(N_SPLATS_DISCARDED, 1);
        } else if vy.is_infinite() {
            warn!("Ignoring splatted spectrum with infinite luminance at ({}, {})", p.x, p.y);
            stat_inc!(N_SPLATS_DISCARDED, 1);
        } else {
            let pi = Point2i::from(p.floor());
            if !self.cropped_pixel_bounds.contains_exclusive(&pi) {
                return;
            }

            let rgb = v.to_rgb();
            let pixel_offset = self.get_pixel_offset(&pi);
            let mut pixels = self.pixels.write().unwrap();
            for (i, colour) in rgb.iter().enumerate() {
                pixels[pixel_offset].splat_rgb[i] += colour;
            }
        }
    }

    /// Clear all pixel sums, filter weights and splats.
    pub fn clear(&self) {
        let mut pixels = self.pixels.write().unwrap();
        for pixel in pixels.iter_mut() {
            *pixel = Pixel::default();
        }
    }

    /// Compute the final RGB values for all pixels in the cropped bounds and
    /// return them as a flat buffer of RGB triples in row-major order.
    ///
    /// * `splat_scale` - Scale factor applied to splat sums.
    pub fn write_image_to_buffer(&self, splat_scale: Float) -> Vec<Float> {
        let n = 3 * self.cropped_pixel_bounds.area() as usize;
        let mut rgb = vec![0.0; n];

        let pixels = self.pixels.read().unwrap();
        for p in self.cropped_pixel_bounds {
            let pixel_offset = self.get_pixel_offset(&p);
            let pixel_rgb = self.get_pixel_rgb(&pixels[pixel_offset], splat_scale);

            let rgb_offset = 3 * pixel_offset;
            rgb[rgb_offset] = pixel_rgb[0];
            rgb[rgb_offset + 1] = pixel_rgb[1];
            rgb[rgb_offset + 2] = pixel_rgb[2];
        }

        rgb
    }

    /// Write the image to the output file.
    ///
    /// * `splat_scale` - Scale factor applied to splat sums.
    pub fn write_image(&self, splat_scale: Float) -> Result<(), String> {
        info!("Converting image to RGB and computing final weighted pixel values");
        let rgb = self.write_image_to_buffer(splat_scale);
        write_image(&self.filename, &rgb, &self.cropped_pixel_bounds)
    }

    /// Compute the final RGB colour value for a pixel.
    ///
    /// * `pixel`       - The pixel.
    /// * `splat_scale` - Scale factor applied to splat sums.
    fn get_pixel_rgb(&self, pixel: &Pixel, splat_scale: Float) -> [Float; 3] {
        let mut rgb = pixel.rgb;

        for (v, splat) in rgb.iter_mut().zip(pixel.splat_rgb.iter()) {
            if pixel.filter_weight_sum != 0.0 {
                // Normalize pixel with weight sum.
                let inv_wt = 1.0 / pixel.filter_weight_sum;
                *v = max(0.0, *v * inv_wt);
            }

            // Add splat value at pixel and scale.
            *v += splat_scale * splat;
            *v *= self.scale;
        }

        rgb
    }
}

impl From<(&ParamSet, ArcFilter)> for Film {
    /// Create a `Film` from given parameter set and filter.
    ///
    /// * `p` - Tuple containing the parameter set and filter.
    fn from(p: (&ParamSet, ArcFilter)) -> Self {
        let (params, filter) = p;

        let filename = params.find_one_string("filename", String::from("strata.exr"));
        let xres = params.find_one_int("xresolution", 1280);
        let yres = params.find_one_int("yresolution", 720);

        let cr = params.find_float("cropwindow");
        let crop = if cr.len() == 4 {
            Bounds2f::new(
                Point2f::new(clamp(min(cr[0], cr[1]), 0.0, 1.0), clamp(min(cr[2], cr[3]), 0.0, 1.0)),
                Point2f::new(clamp(max(cr[0], cr[1]), 0.0, 1.0), clamp(max(cr[2], cr[3]), 0.0, 1.0)),
            )
        } else {
            if !cr.is_empty() {
                error!("{} values supplied for 'cropwindow'. Expected 4.", cr.len());
            }
            Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0))
        };

        let scale = params.find_one_float("scale", 1.0);
        Self::new(&Point2i::new(xres, yres), &crop, filter, &filename, Some(scale))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Filter, FilterData};

    struct UnitBoxFilter {
        data: FilterData,
    }

    impl Filter for UnitBoxFilter {
        fn get_data(&self) -> &FilterData {
            &self.data
        }

        fn evaluate(&self, _p: &Point2f) -> Float {
            1.0
        }
    }

    fn test_film(res: Int) -> Film {
        let filter = Arc::new(UnitBoxFilter {
            data: FilterData::new(Vector2f::new(0.5, 0.5)),
        });
        Film::new(
            &Point2i::new(res, res),
            &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            filter,
            "test.exr",
            None,
        )
    }

    #[test]
    fn tile_sample_lands_in_pixel() {
        let film = test_film(4);
        let mut tile = film.get_film_tile(film.get_sample_bounds());
        tile.add_sample(Point2f::new(1.5, 2.5), Spectrum::new(2.0), 1.0);
        film.merge_film_tile(&tile);

        let buffer = film.write_image_to_buffer(1.0);
        let offset = 3 * film.get_pixel_offset(&Point2i::new(1, 2));
        assert!((buffer[offset] - 2.0).abs() < 1e-5);

        // All other pixels stay black.
        let total: Float = buffer.iter().sum();
        assert!((total - 6.0).abs() < 1e-4);
    }

    #[test]
    fn splats_are_scaled_at_writeout() {
        let film = test_film(2);
        film.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(4.0));
        let buffer = film.write_image_to_buffer(0.25);
        let offset = 3 * film.get_pixel_offset(&Point2i::new(0, 0));
        assert!((buffer[offset] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn clear_resets_all_pixels() {
        let film = test_film(2);
        film.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(1.0));
        film.clear();
        let buffer = film.write_image_to_buffer(1.0);
        assert!(buffer.iter().all(|v| *v == 0.0));
    }
}
