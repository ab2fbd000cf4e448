use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::{random_scene, reference_camera, RenderSettings, SceneOptions};
use ember_renderer::{
    default_worker_count, render_parallel, render_serial, Framebuffer, RenderContext,
};

mod seed;

/// ember - offline Monte Carlo path tracer
#[derive(Parser, Debug)]
#[command(
    name = "ember",
    version,
    about = "Renders a seeded field of spheres with a multithreaded CPU path tracer",
    after_help = "EXAMPLES:\n  \
                  ember --output render.png\n  \
                  ember --seed 7 --samples 100 --width 1200\n  \
                  ember --seed-phrase \"hello world\" --no-threading"
)]
struct Cli {
    /// Settings file; created with default values if missing
    #[arg(short, long, default_value = "ember.json")]
    config: PathBuf,

    /// Output image (.ppm, .png, .jpg, .bmp, ...)
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// World seed, overrides the settings file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Free-text world seed, hashed to a number
    #[arg(long, conflicts_with = "seed")]
    seed_phrase: Option<String>,

    /// Ask for the world seed on stdin
    #[arg(long, conflicts_with_all = ["seed", "seed_phrase"])]
    prompt_seed: bool,

    /// Image width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(long)]
    depth: Option<u32>,

    /// Worker thread count (defaults to hardware concurrency)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Render on the main thread only
    #[arg(long)]
    no_threading: bool,

    /// Half-width of the random sphere grid
    #[arg(long, default_value_t = SceneOptions::default().grid_extent)]
    grid_extent: i32,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded settings.
    fn apply(&self, mut settings: RenderSettings) -> Result<RenderSettings> {
        if let Some(width) = self.width {
            settings.image_width = width;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
        if let Some(threads) = self.threads {
            settings.threads = Some(threads);
        }
        if self.no_threading {
            settings.use_threading = false;
        }

        if let Some(seed) = self.seed {
            settings.seed = seed;
        } else if let Some(phrase) = &self.seed_phrase {
            settings.seed = seed::seed_from_phrase(phrase);
        } else if self.prompt_seed {
            settings.seed = seed::prompt_seed(io::stdin().lock(), settings.seed)?;
        }

        Ok(settings.validated())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let settings = cli.apply(RenderSettings::load_or_create(&cli.config))?;

    let width = settings.image_width;
    let height = settings.image_height();
    log::info!(
        "Ember: {}x{}, {} spp, depth {}, seed {}",
        width,
        height,
        settings.samples_per_pixel,
        settings.max_depth,
        settings.seed
    );

    let start = Instant::now();
    let options = SceneOptions {
        grid_extent: cli.grid_extent,
        material_split: settings.material_split,
    };
    let scene = random_scene(settings.seed, &options);
    let camera = reference_camera(settings.aspect_ratio);
    log::info!("Scene built with {} spheres in {:?}", scene.len(), start.elapsed());

    let config = settings.render_config();
    let context = RenderContext::new(&camera, &scene, &config, width, height);
    let mut framebuffer = Framebuffer::new(width, height);

    let start = Instant::now();
    if settings.use_threading {
        let workers = settings.threads.unwrap_or_else(default_worker_count);
        let stats = render_parallel(&context, &mut framebuffer, workers);
        log::debug!("Scanlines per worker: {:?}", stats.rows_per_worker);
    } else {
        render_serial(&context, &mut framebuffer);
    }
    log::info!("Image created in {}ms, writing to file...", start.elapsed().as_millis());

    ember_core::save(&cli.output, &framebuffer)
        .with_context(|| format!("Failed to save image to '{}'", cli.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "ember",
            "--width",
            "64",
            "--samples",
            "3",
            "--seed",
            "99",
            "--no-threading",
        ]);
        let settings = cli.apply(RenderSettings::default()).unwrap();

        assert_eq!(settings.image_width, 64);
        assert_eq!(settings.samples_per_pixel, 3);
        assert_eq!(settings.seed, 99);
        assert!(!settings.use_threading);
        assert_eq!(settings.max_depth, RenderSettings::default().max_depth);
    }

    #[test]
    fn test_seed_phrase_override() {
        let cli = Cli::parse_from(["ember", "--seed-phrase", "sunset"]);
        let settings = cli.apply(RenderSettings::default()).unwrap();
        assert_eq!(settings.seed, seed::seed_from_phrase("sunset"));
    }

    #[test]
    fn test_conflicting_seeds_rejected() {
        assert!(Cli::try_parse_from(["ember", "--seed", "1", "--seed-phrase", "x"]).is_err());
    }

    #[test]
    fn test_invalid_override_falls_back() {
        let cli = Cli::parse_from(["ember", "--width", "0", "--threads", "0"]);
        let settings = cli.apply(RenderSettings::default()).unwrap();
        assert_eq!(settings.image_width, RenderSettings::default().image_width);
        assert_eq!(settings.threads, None);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
