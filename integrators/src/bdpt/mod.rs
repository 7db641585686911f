//! Bidirectional path tracer with stratification-aware MIS.
//!
//! The integrator builds one camera and one light subpath per pixel sample
//! and connects every valid `(s, t)` prefix pair, weighting each strategy by
//! multiple importance sampling. Rendering runs in two passes: a prepass
//! under the balance heuristic feeds per-strategy moment estimates into the
//! rectifier, which then reshapes the MIS weights of the main pass.

use crate::create_progress_bar;
use std::collections::HashMap;
use std::sync::Arc;
use strata_core::camera::*;
use strata_core::film::{Film, FilmTile};
use strata_core::geometry::*;
use strata_core::integrator::Integrator;
use strata_core::interaction::*;
use strata_core::light::VisibilityTester;
use strata_core::light_distrib::*;
use strata_core::material::TransportMode;
use strata_core::medium::MediumInterface;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::{BSDF_ALL, BSDF_SPECULAR};
use strata_core::sampler::Sampler;
use strata_core::sampling::Distribution1D;
use strata_core::scene::*;
use strata_core::spectrum::*;
use strata_core::{stat_inc, stat_percent, stat_register_fns, stats::*};
use strata_filters::BoxFilter;

mod common;
mod rectifier;
mod varestim;
mod vertex;

use common::*;

// Re-export.
pub use rectifier::*;
pub use varestim::*;
pub use vertex::*;

/// Tiles are square with this edge length in pixels.
const TILE_SIZE: Int = 16;

stat_percent!(
    "Integrator/Zero-radiance paths",
    ZERO_RADIANCE_PATHS,
    TOTAL_PATHS,
    bdpt_stats_paths
);

stat_register_fns!(bdpt_stats_paths);

/// MIS weighting heuristic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MisStrategy {
    /// Balance heuristic: density ratios enter the weight linearly.
    Balance,

    /// Power heuristic: density ratios are squared.
    Power,

    /// Uniform weighting across all strategies.
    Uniform,
}

impl From<&str> for MisStrategy {
    /// Returns a `MisStrategy` given a string name.
    fn from(name: &str) -> Self {
        match name {
            "balance" => Self::Balance,
            "power" => Self::Power,
            "uniform" => Self::Uniform,
            _ => {
                warn!("Unknown 'misstrategy' {} specified, defaulting to 'balance'", name);
                Self::Balance
            }
        }
    }
}

/// Scheme for deriving rectification factors from prepass moments.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MisModification {
    /// No rectification; all factors are 1.
    None,

    /// Factors are the reciprocal of the per-strategy variance.
    ReciprocalVariance,

    /// Factors are `1 + mean^2 / variance` of the per-strategy estimates.
    MomentOverVariance,
}

impl From<&str> for MisModification {
    /// Returns a `MisModification` given a string name.
    fn from(name: &str) -> Self {
        match name {
            "none" => Self::None,
            "reciprocal" => Self::ReciprocalVariance,
            "moment" => Self::MomentOverVariance,
            _ => {
                warn!("Unknown 'mismod' {} specified, defaulting to 'none'", name);
                Self::None
            }
        }
    }
}

/// Implements the bidirectional path tracing integrator with the SA-MIS
/// rectifier.
pub struct BDPTIntegrator {
    /// The sampler prototype; per-tile samplers are cloned off it.
    sampler: Box<dyn Sampler>,

    /// The camera.
    camera: ArcCamera,

    /// Maximum path depth in edges.
    max_depth: usize,

    /// Splat every `(s, t)` strategy into its own debug film.
    visualize_strategies: bool,

    /// Splat every strategy's weighted contribution into its own debug film.
    visualize_weights: bool,

    /// Pixel bounds for the image.
    pixel_bounds: Bounds2i,

    /// Light sampling strategy.
    light_sample_strategy: LightSampleStrategy,

    /// MIS weighting heuristic for the main pass.
    mis_strategy: MisStrategy,

    /// Rectification factor scheme.
    mis_mod: MisModification,

    /// Smallest rectified path length in edges.
    recti_min_depth: usize,

    /// Largest rectified path length in edges.
    recti_max_depth: usize,

    /// Edge length of the rectifier's downsampling blocks in pixels.
    downsampling_factor: usize,

    /// Write per-band factor images after rendering.
    visualize_factors: bool,

    /// Clamp threshold for rectification factors, relative to the band
    /// median.
    clamp_threshold: Float,

    /// Number of prepass samples per pixel.
    prepass_samples: usize,

    /// Allocate full-resolution variance estimators and dump diagnostics.
    estimate_variances: bool,

    /// Reference-variance mode: per-pixel moment grids and rectified
    /// weighting from the first sample on.
    use_reference_variances: bool,

    /// Number of worker threads.
    n_threads: usize,
}

/// Per-pass state shared by all render tiles.
struct PassContext<'a> {
    /// The scene.
    scene: &'a Scene,

    /// Distribution for choosing the light a subpath starts on.
    light_distribution: &'a ArcLightDistribution,

    /// Map from light IDs to distribution indices.
    light_to_index: &'a HashMap<usize, usize>,

    /// The rectifier, when SA-MIS is active.
    rectifier: Option<&'a SAMISRectifier>,

    /// Per-buffer variance estimators, when diagnostics are enabled.
    variance_estimators: Option<&'a [VarianceEstimator]>,

    /// Per-strategy debug films.
    weight_films: &'a [Option<Film>],

    /// Bounds of the film samples.
    sample_bounds: Bounds2i,

    /// Number of tiles in x and y.
    n_tiles: (usize, usize),

    /// Samples per pixel rendered by this pass.
    sample_count: usize,

    /// Index of the first sample of this pass.
    sample_offset: usize,

    /// Feed `add_estimate` calls to the rectifier during this pass.
    estimate_factors: bool,

    /// Apply rectification factors inside the MIS weight.
    rectify: bool,

    /// MIS weighting heuristic for this pass.
    mis_strategy: MisStrategy,

    /// Progress bar label.
    name: &'a str,
}

impl BDPTIntegrator {
    /// Create a new `BDPTIntegrator`.
    ///
    /// * `sampler`               - The sampler prototype.
    /// * `camera`                - The camera.
    /// * `options`               - The remaining configuration options.
    #[allow(clippy::too_many_arguments)]
    pub fn new(sampler: Box<dyn Sampler>, camera: ArcCamera, options: BDPTOptions) -> Self {
        register_stats();

        Self {
            sampler,
            camera,
            max_depth: options.max_depth,
            visualize_strategies: options.visualize_strategies,
            visualize_weights: options.visualize_weights,
            pixel_bounds: options.pixel_bounds,
            light_sample_strategy: options.light_sample_strategy,
            mis_strategy: options.mis_strategy,
            mis_mod: options.mis_mod,
            recti_min_depth: options.recti_min_depth,
            recti_max_depth: options.recti_max_depth,
            downsampling_factor: options.downsampling_factor,
            visualize_factors: options.visualize_factors,
            clamp_threshold: options.clamp_threshold,
            prepass_samples: options.prepass_samples,
            estimate_variances: options.estimate_variances,
            use_reference_variances: options.use_reference_variances,
            n_threads: options.n_threads,
        }
    }

    /// Render one pass over all tiles using a bounded work queue drained by a
    /// fixed pool of worker threads.
    ///
    /// * `ctx` - The per-pass state.
    fn render_pass(&self, ctx: &PassContext) {
        let camera_data = self.camera.get_data();
        let film = &camera_data.film;

        let tile_count = ctx.n_tiles.0 * ctx.n_tiles.1;
        let progress = create_progress_bar(tile_count as u64);
        progress.set_message(ctx.name.to_owned());

        let n_threads = max(1, self.n_threads);
        std::thread::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded::<usize>(n_threads);

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rxc = rx.clone();
                let progress = &progress;
                scope.spawn(move || {
                    for tile_idx in rxc.iter() {
                        // Render the section of the image corresponding to
                        // this tile and merge it into the film.
                        let film_tile = self.render_tile(tile_idx, ctx);
                        film.merge_film_tile(&film_tile);
                        progress.inc(1);
                    }
                });
            }
            drop(rx); // Drop extra rx since we've cloned one for each worker.

            // Send work.
            for tile_idx in 0..tile_count {
                tx.send(tile_idx).expect("tile queue disconnected");
            }
        });

        progress.finish_with_message(format!("{} done", ctx.name));
    }

    /// Render a single image tile.
    ///
    /// * `tile_idx` - Unique tile index.
    /// * `ctx`      - The per-pass state.
    fn render_tile(&self, tile_idx: usize, ctx: &PassContext) -> FilmTile {
        let tile_x = tile_idx % ctx.n_tiles.0;
        let tile_y = tile_idx / ctx.n_tiles.0;

        let camera_data = self.camera.get_data();
        let film = &camera_data.film;

        // Get a sampler instance for the tile, deterministically seeded from
        // the tile index and the pass offset.
        let seed = sampler_seed(tile_idx as u32, ctx.sample_offset as u32);
        let mut tile_sampler = self.sampler.clone_sampler(seed as u64);

        // Compute sample bounds for the tile.
        let x0 = ctx.sample_bounds.p_min.x + tile_x as Int * TILE_SIZE;
        let x1 = min(x0 + TILE_SIZE, ctx.sample_bounds.p_max.x);
        let y0 = ctx.sample_bounds.p_min.y + tile_y as Int * TILE_SIZE;
        let y1 = min(y0 + TILE_SIZE, ctx.sample_bounds.p_max.y);
        let tile_bounds = Bounds2i {
            p_min: Point2i::new(x0, y0),
            p_max: Point2i::new(x1, y1),
        };

        debug!("Starting image tile ({tile_x}, {tile_y}) -> {tile_bounds}");

        let mut film_tile = film.get_film_tile(tile_bounds);

        // Loop over pixels in the tile to render them.
        for pixel in tile_bounds {
            tile_sampler.start_pixel(&pixel);
            tile_sampler.set_sample_number(ctx.sample_offset);

            if !self.pixel_bounds.contains_exclusive(&pixel) {
                continue;
            }

            let mut cur_sample = 1;
            loop {
                // Generate a single sample using BDPT.
                let p_film = Point2f::from(pixel) + tile_sampler.get_2d();

                // Trace the camera subpath.
                let mut camera_vertices: Vec<Vertex> = vec![Vertex::default(); self.max_depth + 2];
                let mut light_vertices: Vec<Vertex> = vec![Vertex::default(); self.max_depth + 1];
                let n_camera = generate_camera_subpath(
                    ctx.scene,
                    &mut *tile_sampler,
                    self.max_depth + 2,
                    &self.camera,
                    &p_film,
                    &mut camera_vertices,
                );

                // Get a distribution for sampling the light at the start of
                // the light subpath. Because the light path follows multiple
                // bounces, basing the sampling distribution on any of the
                // vertices of the camera path is unlikely to be a good
                // strategy; the power distribution used by default ignores
                // the lookup point.
                let light_distr = match ctx.light_distribution.lookup(&camera_vertices[0].p()) {
                    Some(distr) => distr,
                    None => break,
                };

                // Now trace the light subpath.
                let n_light = generate_light_subpath(
                    ctx.scene,
                    &mut *tile_sampler,
                    self.max_depth + 1,
                    camera_vertices[0].time(),
                    &light_distr,
                    ctx.light_to_index,
                    &mut light_vertices,
                );

                // Execute all BDPT connection strategies.
                let mut l = Spectrum::ZERO;
                for t in 1..=n_camera {
                    for s in 0..=n_light {
                        let depth = t as isize + s as isize - 2;
                        if (s == 1 && t == 1) || depth < 0 || depth > self.max_depth as isize {
                            continue;
                        }

                        // Execute the (s, t) connection strategy and update
                        // `l`.
                        let (l_path, p_film_new, mis_weight) = connect_bdpt(
                            ctx.scene,
                            &mut light_vertices,
                            &mut camera_vertices,
                            s,
                            t,
                            &light_distr,
                            ctx.light_to_index,
                            &self.camera,
                            &mut *tile_sampler,
                            &p_film,
                            if ctx.rectify { ctx.rectifier } else { None },
                            ctx.mis_strategy,
                        );

                        let p_raster = p_film_new.unwrap_or(p_film);

                        if self.visualize_strategies || self.visualize_weights {
                            let mut value = Spectrum::ZERO;
                            if self.visualize_strategies {
                                value = if mis_weight == 0.0 { Spectrum::ZERO } else { l_path / mis_weight };
                            }
                            if self.visualize_weights {
                                value = l_path;
                            }
                            if let Some(Some(wf)) = ctx.weight_films.get(buffer_index(s, t)) {
                                wf.add_splat(&p_raster, &value);
                            }
                        }

                        if t != 1 {
                            l += l_path;
                        } else {
                            film.add_splat(&p_raster, &l_path);
                        }

                        // Log the contribution for stratification-aware MIS.
                        if ctx.estimate_factors {
                            if let Some(rectifier) = ctx.rectifier {
                                let unweighted = if mis_weight == 0.0 || l_path.is_black() {
                                    0.0
                                } else {
                                    l_path.y() / mis_weight
                                };
                                rectifier.add_estimate(&p_raster, s + t - 1, t, unweighted, l_path.y());
                            }
                        }

                        if let Some(estimators) = ctx.variance_estimators {
                            let unweighted = if mis_weight == 0.0 || l_path.is_black() {
                                0.0
                            } else {
                                l_path.y() / mis_weight
                            };
                            estimators[buffer_index(s, t)].add_estimate(&p_raster, unweighted);
                        }
                    }
                }

                debug!("Add film sample pFilm: {p_film}, L: {l}, (y: {})", l.y());
                film_tile.add_sample(p_film, l, 1.0);

                if !(cur_sample < ctx.sample_count && tile_sampler.start_next_sample()) {
                    break;
                }
                cur_sample += 1;
            }
        }

        film_tile
    }
}

impl Integrator for BDPTIntegrator {
    /// Render the scene.
    ///
    /// * `scene` - The scene.
    fn render(&mut self, scene: &Scene) {
        if self.pixel_bounds.area() <= 0 {
            error!("Degenerate 'pixelbounds'; aborting render");
            return;
        }

        let light_distribution = create_light_sample_distribution(self.light_sample_strategy, scene);

        // Compute a reverse mapping from light IDs to offsets into the scene
        // lights vector (and, equivalently, offsets into the light
        // distribution).
        let light_to_index: HashMap<usize, usize> =
            scene.lights.iter().enumerate().map(|(i, light)| (light.get_id(), i)).collect();

        // Partition the image into tiles.
        let camera_data = self.camera.get_data();
        let film = &camera_data.film;
        let sample_bounds = film.get_sample_bounds();
        let sample_extent = sample_bounds.diagonal();
        let n_tiles = (
            ((sample_extent.x + TILE_SIZE - 1) / TILE_SIZE) as usize,
            ((sample_extent.y + TILE_SIZE - 1) / TILE_SIZE) as usize,
        );

        // Allocate buffers for debug visualization.
        let buffer_count = (1 + self.max_depth) * (4 + self.max_depth) / 2;
        let mut weight_films: Vec<Option<Film>> = (0..buffer_count).map(|_| None).collect();
        if self.visualize_strategies || self.visualize_weights {
            for depth in 0..=self.max_depth {
                for s in 0..=depth + 2 {
                    let t = depth + 2 - s;
                    if t == 0 || (s == 1 && t == 1) {
                        continue;
                    }

                    let filename = format!("bdpt_d{depth:02}_s{s:02}_t{t:02}.exr");
                    weight_films[buffer_index(s, t)] = Some(Film::new(
                        &film.full_resolution,
                        &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
                        Arc::new(BoxFilter::new(Vector2f::new(0.5, 0.5))),
                        &filename,
                        Some(1.0),
                    ));
                }
            }
        }

        // Only used to compute reference variances.
        let variance_estimators: Option<Vec<VarianceEstimator>> = if self.estimate_variances {
            let count = (self.max_depth + 1) * (self.max_depth + 4) / 2;
            Some((0..count).map(|_| VarianceEstimator::new(film.cropped_pixel_bounds)).collect())
        } else {
            None
        };

        // Configure the rectifier.
        let enable_rectification = self.mis_mod != MisModification::None;
        let mut rectifier = if enable_rectification || self.use_reference_variances {
            Some(SAMISRectifier::new(
                film.cropped_pixel_bounds,
                self.recti_min_depth,
                self.recti_max_depth,
                if self.use_reference_variances {
                    1
                } else {
                    self.downsampling_factor
                },
                self.mis_mod,
            ))
        } else {
            None
        };

        let samples_per_pixel = self.sampler.get_data().samples_per_pixel;
        let prepass_samples = min(self.prepass_samples, samples_per_pixel);
        let main_samples = samples_per_pixel - prepass_samples;

        if scene.lights.is_empty() {
            warn!("No light sources in the scene; the rendered image will be black");
        }

        // The render loop is separated into two passes. The first runs under
        // the balance heuristic and estimates the stratification factors. The
        // resulting images are averaged per pixel, except where the
        // stratification factors were clamped.
        let mut frame_buffers: Vec<Vec<Float>> = Vec::with_capacity(2);

        // Prepass.
        if prepass_samples > 0 && !scene.lights.is_empty() {
            let ctx = PassContext {
                scene,
                light_distribution: &light_distribution,
                light_to_index: &light_to_index,
                rectifier: rectifier.as_ref(),
                variance_estimators: variance_estimators.as_deref(),
                weight_films: &weight_films,
                sample_bounds,
                n_tiles,
                sample_count: prepass_samples,
                sample_offset: 0,
                estimate_factors: enable_rectification,
                rectify: self.use_reference_variances,
                mis_strategy: MisStrategy::Balance,
                name: "Prepass",
            };
            self.render_pass(&ctx);
        }
        frame_buffers.push(film.write_image_to_buffer(1.0 / max(1, prepass_samples) as Float));
        film.clear();

        if let Some(rectifier) = rectifier.as_mut() {
            if enable_rectification {
                rectifier.prepare(prepass_samples, self.clamp_threshold);
            }
        }

        // Main pass with rectified weights.
        if main_samples > 0 && !scene.lights.is_empty() {
            let ctx = PassContext {
                scene,
                light_distribution: &light_distribution,
                light_to_index: &light_to_index,
                rectifier: rectifier.as_ref(),
                variance_estimators: variance_estimators.as_deref(),
                weight_films: &weight_films,
                sample_bounds,
                n_tiles,
                sample_count: main_samples,
                sample_offset: prepass_samples,
                estimate_factors: false,
                rectify: enable_rectification || self.use_reference_variances,
                mis_strategy: self.mis_strategy,
                name: "Render",
            };
            self.render_pass(&ctx);
        }
        frame_buffers.push(film.write_image_to_buffer(1.0 / max(1, main_samples) as Float));
        film.clear();

        // Weight and merge the two buffers proportionally to their sample
        // counts; masked pixels take the rectified pass alone.
        let inv_sample_count = 1.0 / max(1, samples_per_pixel) as Float;
        let weight_prepass = prepass_samples as Float * inv_sample_count;
        let weight_main = main_samples as Float * inv_sample_count;

        let mut out = std::mem::take(&mut frame_buffers[0]);
        if main_samples == 0 {
            // Nothing rendered in the main pass; keep the prepass as is.
        } else if prepass_samples == 0 {
            out.copy_from_slice(&frame_buffers[1]);
        } else {
            merge_frame_buffers(
                &mut out,
                &frame_buffers[1],
                weight_prepass,
                weight_main,
                film.cropped_pixel_bounds,
                |px| rectifier.as_ref().map_or(false, |r| r.is_masked(px)),
            );
        }

        if let Err(e) = strata_core::image_io::write_image(&film.filename, &out, &film.cropped_pixel_bounds) {
            error!("{e}");
        }

        // Write the per-strategy debug films.
        if self.visualize_strategies || self.visualize_weights {
            for wf in weight_films.iter().flatten() {
                if let Err(e) = wf.write_image(inv_sample_count) {
                    error!("{e}");
                }
            }
        }

        // Write the rectification factor maps.
        if self.visualize_factors && enable_rectification {
            if let Some(rectifier) = rectifier.as_ref() {
                if let Err(e) = rectifier.write_images() {
                    error!("{e}");
                }
            }
        }

        // Write the variance diagnostics.
        if let Some(estimators) = variance_estimators.as_ref() {
            let mut idx = 0;
            for d in 0..=self.max_depth {
                for t in 1..=d + 2 {
                    let variance_name = format!("variance-d{d}-t{t}.exr");
                    let factor_name = format!("factor-d{d}-t{t}.exr");
                    if let Err(e) = estimators[idx].write_to_file(&variance_name, samples_per_pixel, t == 1, false) {
                        error!("{e}");
                    }
                    if let Err(e) = estimators[idx].write_to_file(&factor_name, samples_per_pixel, t == 1, true) {
                        error!("{e}");
                    }
                    idx += 1;
                }
            }
        }
    }
}

/// Configuration options for `BDPTIntegrator`, typically parsed from a
/// `ParamSet`.
pub struct BDPTOptions {
    pub max_depth: usize,
    pub visualize_strategies: bool,
    pub visualize_weights: bool,
    pub pixel_bounds: Bounds2i,
    pub light_sample_strategy: LightSampleStrategy,
    pub mis_strategy: MisStrategy,
    pub mis_mod: MisModification,
    pub recti_min_depth: usize,
    pub recti_max_depth: usize,
    pub downsampling_factor: usize,
    pub visualize_factors: bool,
    pub clamp_threshold: Float,
    pub prepass_samples: usize,
    pub estimate_variances: bool,
    pub use_reference_variances: bool,
    pub n_threads: usize,
}

impl From<(&ParamSet, Box<dyn Sampler>, ArcCamera)> for BDPTIntegrator {
    /// Create a `BDPTIntegrator` from given parameter set, sampler and
    /// camera.
    ///
    /// * `p` - A tuple containing the parameter set, sampler and camera.
    fn from(p: (&ParamSet, Box<dyn Sampler>, ArcCamera)) -> Self {
        let (params, sampler, camera) = p;

        let mut max_depth = params.find_one_int("maxdepth", 5) as usize;
        let visualize_strategies = params.find_one_bool("visualizestrategies", false);
        let visualize_weights = params.find_one_bool("visualizeweights", false);
        if (visualize_strategies || visualize_weights) && max_depth > 5 {
            warn!("visualizestrategies/visualizeweights was enabled, limiting maxdepth to 5");
            max_depth = 5;
        }

        let pb = params.find_int("pixelbounds");
        let np = pb.len();
        let mut pixel_bounds = camera.get_data().film.get_sample_bounds();
        if np > 0 {
            if np != 4 {
                error!("Expected 4 values for 'pixelbounds' parameter. Got {np}");
            } else {
                pixel_bounds = pixel_bounds.intersect(&Bounds2i {
                    p_min: Point2i::new(pb[0], pb[2]),
                    p_max: Point2i::new(pb[1], pb[3]),
                });
                if pixel_bounds.area() <= 0 {
                    error!("Degenerate 'pixelbounds' specified.");
                }
            }
        }

        let lss = params.find_one_string("lightsamplestrategy", String::from("power"));
        let light_sample_strategy = LightSampleStrategy::from(lss.as_ref());

        let mis = params.find_one_string("misstrategy", String::from("balance"));
        let mis_strategy = MisStrategy::from(mis.as_ref());

        let mis_mod_name = params.find_one_string("mismod", String::from("none"));
        let mis_mod = MisModification::from(mis_mod_name.as_ref());

        let recti_min_depth = max(1, params.find_one_int("rectimindepth", 1)) as usize;
        let recti_max_depth = max(
            recti_min_depth as Int,
            params.find_one_int("rectimaxdepth", 1),
        ) as usize;
        let downsampling_factor = max(1, params.find_one_int("downsamplingfactor", 8)) as usize;
        let visualize_factors = params.find_one_bool("visualizefactors", true);
        let clamp_threshold = params.find_one_float("clampthreshold", 16.0);
        let prepass_samples = max(1, params.find_one_int("presamples", 1)) as usize;
        let estimate_variances = params.find_one_bool("estimatevariances", false);
        let use_reference_variances = params.find_one_bool("userefvars", false);

        let max_threads = std::thread::available_parallelism().map_or(1, |n| n.get());
        let n_threads = match params.find_one_int("nthreads", 0) {
            n if n <= 0 => max_threads,
            n => min(n as usize, max_threads),
        };

        Self::new(
            sampler,
            camera,
            BDPTOptions {
                max_depth,
                visualize_strategies,
                visualize_weights,
                pixel_bounds,
                light_sample_strategy,
                mis_strategy,
                mis_mod,
                recti_min_depth,
                recti_max_depth,
                downsampling_factor,
                visualize_factors,
                clamp_threshold,
                prepass_samples,
                estimate_variances,
                use_reference_variances,
                n_threads,
            },
        )
    }
}

/// Generate the camera subpath. Returns the number of vertices in the
/// subpath.
///
/// * `scene`     - The scene.
/// * `sampler`   - The sampler.
/// * `max_depth` - The maximum number of vertices.
/// * `camera`    - The camera.
/// * `p_film`    - The point on the camera film.
/// * `path`      - The vertex storage.
pub fn generate_camera_subpath<'scene>(
    scene: &'scene Scene,
    sampler: &mut dyn Sampler,
    max_depth: usize,
    camera: &ArcCamera,
    p_film: &Point2f,
    path: &mut [Vertex<'scene>],
) -> usize {
    if max_depth == 0 {
        return 0;
    }

    // Sample initial ray for camera subpath.
    let time = sampler.get_1d();
    let p_lens = sampler.get_2d();
    let camera_sample = CameraSample::new(*p_film, p_lens, time);
    let samples_per_pixel = sampler.get_data().samples_per_pixel;

    let (mut ray, beta) = camera.generate_ray_differential(&camera_sample);
    let beta = Spectrum::new(beta);
    ray.scale_differentials(1.0 / (samples_per_pixel as Float).sqrt());

    // Generate first vertex on camera subpath and start random walk.
    path[0] = Vertex::create_camera_from_ray(Arc::clone(camera), &ray, beta);

    let PDFResult { pos: pdf_pos, dir: pdf_dir } = camera.pdf_we(&ray);
    debug!("Starting camera subpath. Ray: {ray}, beta {beta}, pdf_pos {pdf_pos}, pdf_dir {pdf_dir}");

    random_walk(scene, &mut ray, sampler, beta, pdf_dir, max_depth - 1, TransportMode::Radiance, path) + 1
}

/// Generate the light subpath. Returns the number of vertices in the subpath.
///
/// * `scene`          - The scene.
/// * `sampler`        - The sampler.
/// * `max_depth`      - The maximum number of vertices.
/// * `time`           - The time.
/// * `light_distr`    - Distribution over the scene lights.
/// * `light_to_index` - Map from light IDs to distribution indices.
/// * `path`           - The vertex storage.
pub fn generate_light_subpath<'scene>(
    scene: &'scene Scene,
    sampler: &mut dyn Sampler,
    max_depth: usize,
    time: Float,
    light_distr: &Distribution1D,
    light_to_index: &HashMap<usize, usize>,
    path: &mut [Vertex<'scene>],
) -> usize {
    if max_depth == 0 || scene.lights.is_empty() {
        return 0;
    }

    // Sample initial ray for light subpath.
    let (light_num, light_pdf, _u_remapped) = light_distr.sample_discrete(sampler.get_1d());
    let light = &scene.lights[light_num];
    let sample = light.sample_le(&sampler.get_2d(), &sampler.get_2d(), time);

    let strata_core::light::Le {
        mut ray,
        n_light,
        pdf_pos,
        pdf_dir,
        value: le,
    } = sample;

    if pdf_pos == 0.0 || pdf_dir == 0.0 || le.is_black() {
        return 0;
    }

    // Generate first vertex on light subpath and start random walk. The
    // walk advances `ray` segment by segment, so the emitted direction is
    // saved for the infinite-light density corrections below.
    path[0] = Vertex::create_light_from_ray(Arc::clone(light), &ray, n_light, le, pdf_pos * light_pdf);
    let beta = le * n_light.abs_dot(&ray.d) / (light_pdf * pdf_pos * pdf_dir);
    let light_ray_d = ray.d;

    debug!("Starting light subpath. Ray: {ray}, le {le}, beta {beta}, pdf_pos {pdf_pos}, pdf_dir {pdf_dir}");
    let n_vertices = random_walk(
        scene,
        &mut ray,
        sampler,
        beta,
        pdf_dir,
        max_depth - 1,
        TransportMode::Importance,
        path,
    );

    // Correct subpath sampling densities for infinite area lights.
    if path[0].is_infinite_light() {
        // Set spatial density of path[1] for infinite area light.
        if n_vertices > 0 {
            path[1].pdf_fwd = pdf_pos;
            if path[1].is_on_surface() {
                path[1].pdf_fwd *= light_ray_d.abs_dot(&path[1].ng());
            }
        }

        // Set spatial density of path[0] for infinite area light.
        path[0].pdf_fwd = infinite_light_density(scene, light_distr, light_to_index, &light_ray_d);
    }

    n_vertices + 1
}

/// Generates the vertices of a camera or light subpath starting at index 1.
/// Returns the number of vertices generated; this does not include `path[0]`,
/// which is populated by the caller.
///
/// * `scene`     - The scene.
/// * `ray`       - The ray with the position and direction previously
///                 sampled.
/// * `sampler`   - The sampler.
/// * `beta`      - Path throughput weight.
/// * `pdf`       - Probability of sampling the ray per unit solid angle.
/// * `max_depth` - The maximum number of bounces.
/// * `mode`      - The light transport mode.
/// * `path`      - The vertex storage.
#[allow(clippy::too_many_arguments)]
fn random_walk<'scene>(
    scene: &'scene Scene,
    ray: &mut Ray,
    sampler: &mut dyn Sampler,
    beta: Spectrum,
    pdf: Float,
    max_depth: usize,
    mode: TransportMode,
    path: &mut [Vertex<'scene>],
) -> usize {
    if max_depth == 0 {
        return 0;
    }

    let mut beta = beta;
    let mut bounces = 0;

    // Declare variables for forward and reverse probability densities.
    let mut pdf_fwd = pdf;
    let mut pdf_rev;

    loop {
        // Attempt to create the next subpath vertex in `path`.
        debug!("Random walk. Bounces {bounces}, beta {beta}, pdf_fwd {pdf_fwd}");

        // Trace a ray and sample the medium, if any.
        let isect = scene.intersect(ray);

        let mi = if let Some(medium) = ray.medium.as_ref().map(Arc::clone) {
            let (sample, mut mi) = medium.sample(ray, sampler);
            beta *= sample;

            // The sampled interaction lies inside `medium`; record that on
            // its hit so rays spawned from the vertex, including shadow rays
            // built for later connection strategies, carry the medium.
            if let Some(mi) = mi.as_mut() {
                mi.hit.medium_interface = Some(MediumInterface::from(Arc::clone(&medium)));
            }
            mi
        } else {
            None
        };

        if beta.is_black() {
            break;
        }

        let vertex = bounces + 1; // Skip path[0].
        let prev = bounces;
        if let Some(mi) = mi {
            // Record medium interaction in `path` and compute forward
            // density.
            path[vertex] = Vertex::create_medium(mi, beta, pdf_fwd, &path[prev]);
            bounces += 1;
            if bounces >= max_depth {
                break;
            }

            // Sample direction and compute reverse density at the preceding
            // vertex. Phase functions are symmetric, so forward and reverse
            // densities match. The spawned ray inherits the medium from the
            // interaction's medium interface.
            let u = sampler.get_2d();
            let (pdf, new_ray) = {
                let mi = match &path[vertex].it {
                    VertexInteraction::Medium { mi } => mi,
                    _ => unreachable!(),
                };
                let (pdf, wi) = mi.phase.sample_p(&-ray.d, &u);
                (pdf, mi.spawn_ray(&wi))
            };
            pdf_fwd = pdf;
            pdf_rev = pdf;
            *ray = new_ray;
        } else {
            // Handle surface interaction for path generation.
            let mut isect = match isect {
                Some(isect) => isect,
                None => {
                    // Capture escaped rays when tracing from the camera.
                    if mode == TransportMode::Radiance {
                        let ei = EndpointInteraction::light_from_ray(ray);
                        path[vertex] = Vertex::create_light_from_endpoint(ei, beta, pdf_fwd);
                        bounces += 1;
                    }
                    break;
                }
            };

            // Compute scattering functions for `mode` and skip over medium
            // boundaries.
            isect.compute_scattering_functions(mode, true);
            if isect.bsdf.is_none() {
                *ray = isect.spawn_ray(&ray.d);
                continue;
            }

            // Initialize `vertex` with surface intersection information.
            let wo = isect.hit.wo;
            path[vertex] = Vertex::create_surface(isect, beta, pdf_fwd, &path[prev]);
            bounces += 1;
            if bounces >= max_depth {
                break;
            }

            // Sample BSDF at current vertex and compute reverse probability.
            let u = sampler.get_2d();
            let (sample, pdf_rev_w, shading_n, correction, new_ray) = {
                let si = match &path[vertex].it {
                    VertexInteraction::Surface { si } => si,
                    _ => unreachable!(),
                };
                let bsdf = si.bsdf.as_ref().expect("surface vertex carries a BSDF");
                let sample = bsdf.sample_f(&wo, &u, BSDF_ALL);
                let pdf_rev_w = bsdf.pdf(&sample.wi, &wo, BSDF_ALL);
                let correction = correct_shading_normal(si, &wo, &sample.wi, mode);
                (sample, pdf_rev_w, si.shading.n, correction, si.spawn_ray(&sample.wi))
            };

            pdf_fwd = sample.pdf;
            debug!("Random walk sampled dir {} f: {}, pdf_fwd: {pdf_fwd}", sample.wi, sample.f);
            if sample.f.is_black() || pdf_fwd == 0.0 {
                break;
            }

            beta *= sample.f * sample.wi.abs_dot(&shading_n) / pdf_fwd;
            pdf_rev = pdf_rev_w;
            if sample.bxdf_type & BSDF_SPECULAR > 0 {
                path[vertex].delta = true;
                pdf_rev = 0.0;
                pdf_fwd = 0.0;
            }

            beta *= correction;
            debug!("Random walk beta after shading normal correction {beta}");
            *ray = new_ray;
        }

        // Compute reverse area density at the preceding vertex.
        let pdf_rev_area = path[vertex].convert_density(pdf_rev, &path[prev]);
        path[prev].pdf_rev = pdf_rev_area;
    }

    bounces
}

/// Computes the generalized geometric term `G` for a connection between two
/// vertices, including the transmittance of intervening media.
///
/// * `scene`   - The scene.
/// * `sampler` - The sampler.
/// * `v0`      - First vertex.
/// * `v1`      - Second vertex.
fn g(scene: &Scene, sampler: &mut dyn Sampler, v0: &Vertex, v1: &Vertex) -> Spectrum {
    let mut d = v0.p() - v1.p();

    let mut g = 1.0 / d.length_squared();
    d *= g.sqrt();

    if v0.is_on_surface() {
        g *= v0.ns().abs_dot(&d);
    }
    if v1.is_on_surface() {
        g *= v1.ns().abs_dot(&d);
    }

    let vis = VisibilityTester::new(v0.hit().clone(), v1.hit().clone());
    vis.tr(scene, sampler) * g
}

/// Deals with Dirac delta functions in the path: their continuous density of
/// 0 is remapped to 1 so it cancels out of density ratios.
///
/// * `f` - The value to remap.
fn remap0(f: Float) -> Float {
    if f != 0.0 {
        f
    } else {
        1.0
    }
}

/// Calculates the multiple importance sampling weight of the `(s, t)`
/// strategy. It iterates over all alternative strategies that could
/// hypothetically have generated the same path but with an earlier or later
/// crossover point between the light and camera subpaths, accumulating their
/// relative densities, each scaled by its stratification factor when a
/// rectifier is active.
///
/// * `scene`           - The scene.
/// * `light_vertices`  - The vertices of the light subpath.
/// * `camera_vertices` - The vertices of the camera subpath.
/// * `sampled`         - The dynamically sampled endpoint for s=1 or t=1.
/// * `s`               - Number of light subpath vertices used.
/// * `t`               - Number of camera subpath vertices used.
/// * `light_pdf`       - Distribution over the scene lights.
/// * `light_to_index`  - Map from light IDs to distribution indices.
/// * `px`              - The pixel the strategy contributes to.
/// * `rectifier`       - The rectifier, when rectified weighting is active.
/// * `strategy`        - The MIS weighting heuristic.
#[allow(clippy::too_many_arguments)]
#[rustfmt::skip]
fn mis_weight<'scene>(
    scene: &'scene Scene,
    light_vertices: &mut [Vertex<'scene>],
    camera_vertices: &mut [Vertex<'scene>],
    sampled: &Vertex<'scene>,
    s: usize,
    t: usize,
    light_pdf: &Distribution1D,
    light_to_index: &HashMap<usize, usize>,
    px: &Point2i,
    rectifier: Option<&SAMISRectifier>,
    strategy: MisStrategy,
) -> Float {
    if s + t == 2 {
        return 1.0;
    }

    // Path length in edges; the rectifier stores factors per (depth,
    // strategy) band.
    let depth = s + t - 1;
    let factor = |i: usize| rectifier.map_or(1.0, |r| r.get(px, depth, i));

    let mut sum_ri = 0.0;

    // Look up connection vertices and their predecessors.
    let qs = s as isize - 1;
    let pt = t as isize - 1;
    let qs_minus = qs - 1;
    let pt_minus = pt - 1;

    // The strategy's viewpoint temporarily overwrites six vertex fields.
    // Holding several overlapping mutable borrows into the vertex arrays does
    // not work, so the backups are taken by hand and restored in reverse
    // order below.

    // Update sampled vertex for s=1 or t=1 strategy.
    let mut backup_qs: Option<Vertex> = None;
    let mut backup_pt: Option<Vertex> = None;
    if s == 1 {
        backup_qs = Some(light_vertices[qs as usize].clone());
        light_vertices[qs as usize] = sampled.clone();
    } else if t == 1 {
        backup_pt = Some(camera_vertices[pt as usize].clone());
        camera_vertices[pt as usize] = sampled.clone();
    }

    // Mark connection vertices as non-degenerate.
    let mut backup_pt_delta = false;
    if pt >= 0 {
        backup_pt_delta = camera_vertices[pt as usize].delta;
        camera_vertices[pt as usize].delta = false;
    }

    let mut backup_qs_delta = false;
    if qs >= 0 {
        backup_qs_delta = light_vertices[qs as usize].delta;
        light_vertices[qs as usize].delta = false;
    }

    // Update reverse density of vertex pt_{t-1}.
    let mut backup_pt_pdf_rev = 0.0;
    if pt >= 0 {
        backup_pt_pdf_rev = camera_vertices[pt as usize].pdf_rev;
        camera_vertices[pt as usize].pdf_rev = if s > 0 {
            light_vertices[qs as usize].pdf(
                scene,
                if qs_minus >= 0 { Some(&light_vertices[qs_minus as usize]) } else { None },
                &camera_vertices[pt as usize],
            )
        } else {
            camera_vertices[pt as usize].pdf_light_origin(
                scene,
                &camera_vertices[pt_minus as usize],
                light_pdf,
                light_to_index,
            )
        };
    }

    // Update reverse density of vertex pt_{t-2}.
    let mut backup_pt_minus_pdf_rev = 0.0;
    if pt_minus >= 0 {
        backup_pt_minus_pdf_rev = camera_vertices[pt_minus as usize].pdf_rev;
        camera_vertices[pt_minus as usize].pdf_rev = if s > 0 {
            camera_vertices[pt as usize].pdf(
                scene,
                if qs >= 0 { Some(&light_vertices[qs as usize]) } else { None },
                &camera_vertices[pt_minus as usize],
            )
        } else {
            camera_vertices[pt as usize].pdf_light(scene, &camera_vertices[pt_minus as usize])
        };
    }

    // Update reverse densities of vertices qs_{s-1} and qs_{s-2}.
    let mut backup_qs_pdf_rev = 0.0;
    if qs >= 0 {
        backup_qs_pdf_rev = light_vertices[qs as usize].pdf_rev;
        light_vertices[qs as usize].pdf_rev = camera_vertices[pt as usize].pdf(
            scene,
            if pt_minus >= 0 { Some(&camera_vertices[pt_minus as usize]) } else { None },
            &light_vertices[qs as usize],
        );
    }

    let mut backup_qs_minus_pdf_rev = 0.0;
    if qs_minus >= 0 {
        backup_qs_minus_pdf_rev = light_vertices[qs_minus as usize].pdf_rev;
        light_vertices[qs_minus as usize].pdf_rev = light_vertices[qs as usize].pdf(
            scene,
            if pt >= 0 { Some(&camera_vertices[pt as usize]) } else { None },
            &light_vertices[qs_minus as usize],
        );
    }

    // Consider hypothetical connection strategies along the camera subpath.
    let mut ri = 1.0;
    for i in (1..t).rev() {
        ri *= remap0(camera_vertices[i].pdf_rev) / remap0(camera_vertices[i].pdf_fwd);

        if !camera_vertices[i].delta && !camera_vertices[i - 1].delta {
            let eff_dens_ratio = match strategy {
                MisStrategy::Balance => ri,
                MisStrategy::Power => ri * ri,
                MisStrategy::Uniform => 1.0,
            };
            sum_ri += eff_dens_ratio * factor(i);
        }
    }

    // Consider hypothetical connection strategies along the light subpath.
    ri = 1.0;
    for i in (0..s).rev() {
        ri *= remap0(light_vertices[i].pdf_rev) / remap0(light_vertices[i].pdf_fwd);

        let delta_light_vertex = if i > 0 {
            light_vertices[i - 1].delta
        } else {
            light_vertices[0].is_delta_light()
        };

        if !light_vertices[i].delta && !delta_light_vertex {
            let eff_dens_ratio = match strategy {
                MisStrategy::Balance => ri,
                MisStrategy::Power => ri * ri,
                MisStrategy::Uniform => 1.0,
            };
            sum_ri += eff_dens_ratio * factor(s + t - i);
        }
    }

    // Stratification factor of the strategy actually being evaluated.
    let strat_factor_cur = factor(t);

    // Restore snapshots in reverse order of the backups.
    if qs_minus >= 0 { light_vertices [qs_minus as usize].pdf_rev = backup_qs_minus_pdf_rev; }
    if qs       >= 0 { light_vertices [qs       as usize].pdf_rev = backup_qs_pdf_rev; }
    if pt_minus >= 0 { camera_vertices[pt_minus as usize].pdf_rev = backup_pt_minus_pdf_rev; }
    if pt       >= 0 { camera_vertices[pt       as usize].pdf_rev = backup_pt_pdf_rev; }

    if qs >= 0 { light_vertices [qs as usize].delta = backup_qs_delta; }
    if pt >= 0 { camera_vertices[pt as usize].delta = backup_pt_delta; }

    if let Some(v) = backup_pt { camera_vertices[pt as usize] = v; }
    if let Some(v) = backup_qs { light_vertices [qs as usize] = v; }

    1.0 / (1.0 + sum_ri / strat_factor_cur)
}

/// Attempts to connect the two subpath prefixes and returns the weighted
/// radiance contribution, the raster position the contribution lands on when
/// `t = 1`, and the MIS weight of the strategy.
///
/// * `scene`           - The scene.
/// * `light_vertices`  - The vertices of the light subpath.
/// * `camera_vertices` - The vertices of the camera subpath.
/// * `s`               - Number of light subpath vertices used.
/// * `t`               - Number of camera subpath vertices used.
/// * `light_distr`     - Distribution over the scene lights.
/// * `light_to_index`  - Map from light IDs to distribution indices.
/// * `camera`          - The camera.
/// * `sampler`         - The sampler.
/// * `p_film`          - The film position of the camera subpath.
/// * `rectifier`       - The rectifier, when rectified weighting is active.
/// * `mis_strategy`    - The MIS weighting heuristic.
#[allow(clippy::too_many_arguments)]
pub fn connect_bdpt<'scene>(
    scene: &'scene Scene,
    light_vertices: &mut [Vertex<'scene>],
    camera_vertices: &mut [Vertex<'scene>],
    s: usize,
    t: usize,
    light_distr: &Distribution1D,
    light_to_index: &HashMap<usize, usize>,
    camera: &ArcCamera,
    sampler: &mut dyn Sampler,
    p_film: &Point2f,
    rectifier: Option<&SAMISRectifier>,
    mis_strategy: MisStrategy,
) -> (Spectrum, Option<Point2f>, Float) {
    let mut l = Spectrum::ZERO;
    let mut p_raster: Option<Point2f> = None;

    // Ignore invalid connections related to infinite area lights.
    if t > 1 && s != 0 && matches!(camera_vertices[t - 1].it, VertexInteraction::Light { .. }) {
        return (Spectrum::ZERO, None, 0.0);
    }

    // Perform connection and write contribution to `l`.
    let mut sampled = Vertex::default();
    if s == 0 {
        // Interpret the camera subpath as a complete path.
        let pt = &camera_vertices[t - 1];
        if pt.is_light() {
            l = pt.le(scene, &camera_vertices[t - 2]) * pt.beta;
        }
        debug_assert!(!l.has_nans());
    } else if t == 1 {
        // Sample a point on the camera and connect it to the light subpath.
        let qs = &light_vertices[s - 1];
        if qs.is_connectible() {
            let u = sampler.get_2d();
            let SampleResult {
                spectrum: wi_importance,
                wi,
                pdf,
                p_raster: pr,
                vis,
            } = camera.sample_wi(qs.hit(), &u);

            p_raster = pr;

            if pdf > 0.0 && !wi_importance.is_black() {
                // Initialize dynamically sampled vertex and `l` for the t=1
                // case.
                sampled = Vertex::create_camera_from_hit(Arc::clone(camera), vis.p1.clone(), wi_importance / pdf);
                l = qs.beta * qs.f(&sampled, TransportMode::Importance) * sampled.beta;

                if qs.is_on_surface() {
                    l *= wi.abs_dot(&qs.ns());
                }
                debug_assert!(!l.has_nans());

                // Only check visibility after we know that the path would
                // make a non-zero contribution.
                if !l.is_black() {
                    l *= vis.tr(scene, sampler);
                }
            }
        }
    } else if s == 1 {
        // Sample a point on a light and connect it to the camera subpath.
        let pt = &camera_vertices[t - 1];
        if pt.is_connectible() {
            let (light_num, light_pdf, _u_remapped) = light_distr.sample_discrete(sampler.get_1d());
            let light = &scene.lights[light_num];
            let u = sampler.get_2d();

            if let Some(li) = light.sample_li(pt.hit(), &u) {
                if li.pdf > 0.0 && !li.value.is_black() {
                    let ei = EndpointInteraction::light_from_hit(li.visibility.p1.clone(), Some(Arc::clone(light)));
                    sampled = Vertex::create_light_from_endpoint(ei, li.value / (li.pdf * light_pdf), 0.0);
                    sampled.pdf_fwd = sampled.pdf_light_origin(scene, pt, light_distr, light_to_index);

                    l = pt.beta * pt.f(&sampled, TransportMode::Radiance) * sampled.beta;
                    if pt.is_on_surface() {
                        l *= li.wi.abs_dot(&pt.ns());
                    }

                    // Only check visibility if the path would carry radiance.
                    if !l.is_black() {
                        l *= li.visibility.tr(scene, sampler);
                    }
                }
            }
        }
    } else {
        // Handle all other bidirectional connection cases.
        let qs = &light_vertices[s - 1];
        let pt = &camera_vertices[t - 1];
        if qs.is_connectible() && pt.is_connectible() {
            l = qs.beta * qs.f(pt, TransportMode::Importance) * pt.f(qs, TransportMode::Radiance) * pt.beta;

            if !l.is_black() {
                l *= g(scene, sampler, qs, pt);
            }
        }
    }

    stat_inc!(TOTAL_PATHS, 1);
    if l.is_black() {
        stat_inc!(ZERO_RADIANCE_PATHS, 1);
    }

    // Compute MIS weight for the connection strategy.
    let px_f = p_raster.unwrap_or(*p_film);
    let px = Point2i::from(px_f.floor());
    let mis = if l.is_black() {
        0.0
    } else {
        mis_weight(
            scene,
            light_vertices,
            camera_vertices,
            &sampled,
            s,
            t,
            light_distr,
            light_to_index,
            &px,
            rectifier,
            mis_strategy,
        )
    };
    debug!("MIS weight for (s,t) = ({s}, {t}) connection: {mis}");
    debug_assert!(!mis.is_nan());
    l *= mis;

    (l, p_raster, mis)
}

/// Blend the prepass buffer (in place) with the main-pass buffer using the
/// given per-pass weights. Pixels for which `masked` returns true take the
/// main-pass value alone, discarding the unrectified prepass estimate.
///
/// * `prepass`       - The prepass buffer; receives the merged result.
/// * `rectified`     - The main-pass buffer.
/// * `weight_prepass` - Blend weight of the prepass buffer.
/// * `weight_main`   - Blend weight of the main-pass buffer.
/// * `pixel_bounds`  - The pixel bounds covered by the buffers.
/// * `masked`        - Per-pixel mask predicate.
fn merge_frame_buffers<F>(
    prepass: &mut [Float],
    rectified: &[Float],
    weight_prepass: Float,
    weight_main: Float,
    pixel_bounds: Bounds2i,
    masked: F,
) where
    F: Fn(&Point2i) -> bool,
{
    let mut offset = 0;
    for px in pixel_bounds {
        let masked = masked(&px);
        for c in 0..3 {
            prepass[offset + c] = if masked {
                rectified[offset + c]
            } else {
                prepass[offset + c] * weight_prepass + rectified[offset + c] * weight_main
            };
        }
        offset += 3;
    }
}

/// Maps an `(s, t)` strategy to its index in the per-strategy buffer layout.
/// Buffers are laid out densely by `(depth, t)` with `depth = s + t - 2`:
/// strategies of equal depth are adjacent and `t` ranges over `1..=depth+2`.
///
/// * `s` - Number of light subpath vertices.
/// * `t` - Number of camera subpath vertices.
#[inline]
pub fn buffer_index(s: usize, t: usize) -> usize {
    debug_assert!(t >= 1 && s + t >= 2);
    let depth = s + t - 2;
    depth * (depth + 3) / 2 + (t - 1)
}

/// Returns the initializer for the FNV-1a hash function.
#[inline]
fn fnv_init() -> u32 {
    0x811C9DC5
}

/// Hashes 4 bytes using FNV-1a.
#[inline]
fn fnv_hash(h: u32, d: u32) -> u32 {
    let mut h = h;
    h = h.wrapping_mul(16777619) ^ (d & 0xFF);
    h = h.wrapping_mul(16777619) ^ ((d >> 8) & 0xFF);
    h = h.wrapping_mul(16777619) ^ ((d >> 16) & 0xFF);
    h = h.wrapping_mul(16777619) ^ ((d >> 24) & 0xFF);
    h
}

/// Returns a seed for a tile sampler based on the tile id and the pass
/// offset, so reruns are reproducible and the two passes decorrelated.
///
/// * `tile` - The tile index.
/// * `iter` - The pass offset.
#[inline]
fn sampler_seed(tile: u32, iter: u32) -> u32 {
    fnv_hash(fnv_hash(fnv_init(), tile), iter)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests;
