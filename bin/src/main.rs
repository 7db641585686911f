//! Command-line renderer driving the BDPT integrator over built-in scenes.

#[macro_use]
extern crate log;

mod scenes;

use clap::Parser;
use std::sync::Arc;
use strata_cameras::PerspectiveCamera;
use strata_core::camera::ArcCamera;
use strata_core::film::Film;
use strata_core::geometry::*;
use strata_core::integrator::Integrator;
use strata_core::paramset::ParamSet;
use strata_core::sampler::Sampler;
use strata_core::pbrt::*;
use strata_core::stats::print_stats;
use strata_filters::BoxFilter;
use strata_integrators::BDPTIntegrator;
use strata_samplers::RandomSampler;

/// Render one of the built-in scenes with the bidirectional path tracer.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// The scene to render: cornell, veach-mis, fog or env.
    #[arg(default_value = "cornell")]
    scene: String,

    /// Write the final image to the given filename (.exr, .png or .tga).
    #[arg(long = "outfile", short = 'o', value_name = "FILE", default_value = "strata.exr")]
    outfile: String,

    /// Image width in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 400)]
    xres: Int,

    /// Image height in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 400)]
    yres: Int,

    /// Samples per pixel.
    #[arg(long, value_name = "NUM", default_value_t = 16)]
    spp: usize,

    /// Number of rendering threads; 0 uses all logical CPUs.
    #[arg(long = "nthreads", short = 't', value_name = "NUM", default_value_t = 0)]
    n_threads: Int,

    /// Maximum path depth in edges.
    #[arg(long, value_name = "NUM", default_value_t = 5)]
    maxdepth: Int,

    /// Sub-rectangle of the image to render (x0 x1 y0 y1).
    #[arg(long, value_name = "NUM", num_args = 4)]
    pixelbounds: Option<Vec<Int>>,

    /// Light sampling strategy: power, uniform or spatial.
    #[arg(long, value_name = "NAME", default_value = "power")]
    lightsamplestrategy: String,

    /// MIS weighting heuristic: balance, power or uniform.
    #[arg(long, value_name = "NAME", default_value = "balance")]
    misstrategy: String,

    /// SA-MIS rectification scheme: none, reciprocal or moment.
    #[arg(long, value_name = "NAME", default_value = "none")]
    mismod: String,

    /// Smallest rectified path length in edges.
    #[arg(long, value_name = "NUM", default_value_t = 1)]
    rectimindepth: Int,

    /// Largest rectified path length in edges.
    #[arg(long, value_name = "NUM", default_value_t = 1)]
    rectimaxdepth: Int,

    /// Edge length of the rectifier's downsampling blocks in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 8)]
    downsamplingfactor: Int,

    /// Write per-band rectification factor images.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    visualizefactors: bool,

    /// Clamp threshold for rectification factors.
    #[arg(long, value_name = "FLOAT", default_value_t = 16.0)]
    clampthreshold: Float,

    /// Prepass samples per pixel.
    #[arg(long, value_name = "NUM", default_value_t = 1)]
    presamples: Int,

    /// Accumulate and write per-strategy variance diagnostics.
    #[arg(long)]
    estimatevariances: bool,

    /// Reference-variance mode (per-pixel grids, rectified prepass).
    #[arg(long)]
    userefvars: bool,

    /// Splat every (s, t) strategy into its own debug film.
    #[arg(long)]
    visualizestrategies: bool,

    /// Splat every strategy's weighted contribution into its own debug film.
    #[arg(long)]
    visualizeweights: bool,

    /// Suppress the statistics printed after rendering.
    #[arg(long)]
    quiet: bool,
}

fn main() {
    env_logger::init();

    let options = Options::parse();

    let description = match scenes::build(&options.scene) {
        Some(description) => description,
        None => {
            error!(
                "Unknown scene '{}'. Available scenes: cornell, veach-mis, fog, env.",
                options.scene
            );
            std::process::exit(1);
        }
    };

    // Build the film and camera.
    let film = Film::new(
        &Point2i::new(options.xres, options.yres),
        &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
        Arc::new(BoxFilter::new(Vector2f::new(0.5, 0.5))),
        &options.outfile,
        None,
    );
    let camera: ArcCamera = Arc::new(PerspectiveCamera::new(
        description.camera_to_world,
        screen_window(options.xres, options.yres),
        0.0,
        1.0,
        0.0,
        1e6,
        description.fov,
        film,
        description.camera_medium,
    ));

    // Build the sampler and the integrator configuration.
    let sampler: Box<dyn Sampler> = Box::new(RandomSampler::new(options.spp, None));

    let mut params = ParamSet::new();
    params.add_int("maxdepth", vec![options.maxdepth]);
    if let Some(pb) = options.pixelbounds.as_ref() {
        params.add_int("pixelbounds", pb.clone());
    }
    params.add_string("lightsamplestrategy", vec![options.lightsamplestrategy.clone()]);
    params.add_string("misstrategy", vec![options.misstrategy.clone()]);
    params.add_string("mismod", vec![options.mismod.clone()]);
    params.add_int("rectimindepth", vec![options.rectimindepth]);
    params.add_int("rectimaxdepth", vec![options.rectimaxdepth]);
    params.add_int("downsamplingfactor", vec![options.downsamplingfactor]);
    params.add_bool("visualizefactors", vec![options.visualizefactors]);
    params.add_float("clampthreshold", vec![options.clampthreshold]);
    params.add_int("presamples", vec![options.presamples]);
    params.add_bool("estimatevariances", vec![options.estimatevariances]);
    params.add_bool("userefvars", vec![options.userefvars]);
    params.add_bool("visualizestrategies", vec![options.visualizestrategies]);
    params.add_bool("visualizeweights", vec![options.visualizeweights]);
    params.add_int("nthreads", vec![options.n_threads]);

    let mut integrator = BDPTIntegrator::from((&params, sampler, Arc::clone(&camera)));

    info!("Rendering scene '{}' at {}x{}, {} spp", options.scene, options.xres, options.yres, options.spp);
    integrator.render(&description.scene);

    if !options.quiet {
        print_stats();
    }
}

/// Returns the screen window for the given image resolution, preserving the
/// aspect ratio.
///
/// * `xres` - Image width in pixels.
/// * `yres` - Image height in pixels.
fn screen_window(xres: Int, yres: Int) -> Bounds2f {
    let frame = xres as Float / yres as Float;
    if frame > 1.0 {
        Bounds2f::new(Point2f::new(-frame, -1.0), Point2f::new(frame, 1.0))
    } else {
        Bounds2f::new(Point2f::new(-1.0, -1.0 / frame), Point2f::new(1.0, 1.0 / frame))
    }
}
