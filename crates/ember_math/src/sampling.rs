//! Rejection samplers.
//!
//! Every helper draws from the generator passed in by the caller, so each
//! render thread can own its own stream.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Squared length below which a unit-ball sample is too short to normalize.
const MIN_NORMALIZE_LEN_SQ: f64 = 1e-12;

/// Uniform `f64` in `[0, 1)`.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Vector with each component uniform in `[min, max)`.
pub fn random_vec3(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    let span = max - min;
    Vec3::new(
        min + span * gen_f64(rng),
        min + span * gen_f64(rng),
        min + span * gen_f64(rng),
    )
}

/// Uniform point strictly inside the unit ball.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec3(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        if len_sq > MIN_NORMALIZE_LEN_SQ {
            return p / len_sq.sqrt();
        }
    }
}

/// Unit-ball sample flipped into the hemisphere around `normal`.
pub fn random_in_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let in_unit_sphere = random_in_unit_sphere(rng);
    if in_unit_sphere.dot(normal) >= 0.0 {
        in_unit_sphere
    } else {
        -in_unit_sphere
    }
}

/// Uniform point inside the unit disk in the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLES: usize = 10_000;

    #[test]
    fn test_unit_sphere_samples_inside_with_zero_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sum = Vec3::ZERO;

        for _ in 0..SAMPLES {
            let p = random_in_unit_sphere(&mut rng);
            assert!(p.length_squared() < 1.0);
            sum += p;
        }

        let mean = sum / SAMPLES as f64;
        assert!(mean.length() < 0.05, "mean drifted to {:?}", mean);
    }

    #[test]
    fn test_unit_vector_is_normalized() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hemisphere_faces_normal() {
        let mut rng = StdRng::seed_from_u64(3);
        let normal = Vec3::new(0.0, 0.0, -1.0);
        for _ in 0..1000 {
            let v = random_in_hemisphere(normal, &mut rng);
            assert!(v.dot(normal) >= 0.0);
            assert!(v.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_unit_disk_is_planar() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z, 0.0);
            assert!(p.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_random_vec3_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let v = random_vec3(&mut rng, 0.5, 1.0);
            for c in v.to_array() {
                assert!((0.5..1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(random_in_unit_sphere(&mut a), random_in_unit_sphere(&mut b));
        }
    }
}
