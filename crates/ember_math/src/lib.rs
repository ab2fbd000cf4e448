//! Ember math kernel.
//!
//! Double-precision vector algebra built on glam's `DVec3`, plus the
//! rejection samplers, intervals and rays shared by the renderer.

pub use glam::DVec3;

/// 3-component double-precision vector used for points, directions and colors.
pub type Vec3 = DVec3;

/// A point in world space.
pub type Point3 = Vec3;

mod interval;
mod ray;
pub mod sampling;
mod vec3;

pub use interval::Interval;
pub use ray::Ray;
pub use sampling::{
    gen_f64, random_in_hemisphere, random_in_unit_disk, random_in_unit_sphere,
    random_unit_vector, random_vec3,
};
pub use vec3::{reflect, refract, Vec3Ext, NEAR_ZERO_EPSILON};
