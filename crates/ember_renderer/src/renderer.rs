//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a hard bounce cutoff
//! - Sky gradient background
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma 2 display conversion

use crate::{Camera, Color, Framebuffer, Hittable, Scatter, Scene};
use ember_math::{gen_f64, Interval, Ray, Vec3Ext};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Minimum hit distance, keeps bounced rays from re-hitting their own surface.
pub const SHADOW_ACNE_EPSILON: f64 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed; every scanline derives its own generator from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 10,
            max_depth: 50,
            seed: 1234,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, multiplying in the attenuation of each
/// surface it scatters off until it escapes to the sky, gets absorbed, or
/// runs out of bounces.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Bounce budget exhausted, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray, Interval::from_min(SHADOW_ACNE_EPSILON)) else {
        return sky_gradient(ray);
    };

    match scene.material(rec.material).scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, scene, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Background seen by rays that escape the scene.
///
/// White at the horizon blending to sky blue straight up.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().unit_vector();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f64| (256.0 * Interval::INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Seed for the generator of one scanline.
///
/// Rows get independent streams, so the image does not depend on which
/// worker renders which row.
pub fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (u64::from(row) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Everything a worker needs to shade pixels. Shared read-only across threads.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub camera: &'a Camera,
    pub scene: &'a Scene,
    pub config: &'a RenderConfig,
    pub width: u32,
    pub height: u32,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        camera: &'a Camera,
        scene: &'a Scene,
        config: &'a RenderConfig,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            camera,
            scene,
            config,
            width,
            height,
        }
    }

    /// Average of `samples_per_pixel` jittered estimates for one pixel, in linear light.
    ///
    /// `row` 0 is the top of the image.
    pub fn render_pixel(&self, x: u32, row: u32, rng: &mut dyn RngCore) -> Color {
        let samples = self.config.samples_per_pixel.max(1);
        let s_scale = f64::from(self.width.saturating_sub(1).max(1));
        let t_scale = f64::from(self.height.saturating_sub(1).max(1));
        let y = f64::from(self.height - 1 - row);

        let mut pixel_color = Color::ZERO;
        for _ in 0..samples {
            let s = (f64::from(x) + gen_f64(rng)) / s_scale;
            let t = (y + gen_f64(rng)) / t_scale;
            let ray = self.camera.get_ray(s, t, rng);
            pixel_color += ray_color(&ray, self.scene, self.config.max_depth, rng);
        }

        pixel_color / f64::from(samples)
    }

    /// Render one full scanline into `out`, which holds exactly `width` cells.
    pub fn render_row(&self, row: u32, out: &mut [Color]) {
        debug_assert_eq!(out.len(), self.width as usize);
        let mut rng = StdRng::seed_from_u64(row_seed(self.config.seed, row));

        for (x, pixel) in (0..self.width).zip(out.iter_mut()) {
            *pixel = self.render_pixel(x, row, &mut rng);
        }
    }
}

/// Render every scanline in order on the calling thread.
pub fn render_serial(context: &RenderContext, framebuffer: &mut Framebuffer) {
    log::info!(
        "Rendering {}x{} @ {} spp on 1 thread",
        framebuffer.width(),
        framebuffer.height(),
        context.config.samples_per_pixel
    );

    for (row, line) in framebuffer.rows_mut().enumerate() {
        context.render_row(row as u32, line);
        log::trace!("Finished scanline {}", row);
    }
}
