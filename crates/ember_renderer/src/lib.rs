//! Ember renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over a flat list of spheres with diffuse,
//! metallic and dielectric materials, rendered scanline by scanline on a
//! fixed pool of worker threads.

mod camera;
mod framebuffer;
mod hittable;
mod material;
mod renderer;
mod scene;
mod scheduler;
mod sphere;

pub use camera::Camera;
pub use framebuffer::Framebuffer;
pub use hittable::{HitRecord, Hittable};
pub use material::{
    Color, Dielectric, Lambertian, Material, MaterialId, Metal, Scatter, ScatterResult,
};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render_serial, row_seed, sky_gradient,
    RenderConfig, RenderContext, SHADOW_ACNE_EPSILON,
};
pub use scene::Scene;
pub use scheduler::{default_worker_count, render_parallel, RenderStats, Scheduler, WorkerState};
pub use sphere::Sphere;

/// Re-export the math types the renderer API is written in
pub use ember_math::{Interval, Point3, Ray, Vec3};
