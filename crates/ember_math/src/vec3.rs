//! Vector helpers that glam does not provide directly.

use crate::Vec3;

/// Per-component magnitude below which a vector is treated as degenerate.
pub const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Extra operations on [`Vec3`] used by the shading code.
pub trait Vec3Ext {
    /// Return the vector scaled to unit length.
    ///
    /// Calling this on a zero vector is a logic error; debug builds assert on it.
    fn unit_vector(self) -> Self;

    /// True if every component is smaller in magnitude than [`NEAR_ZERO_EPSILON`].
    fn near_zero(self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn unit_vector(self) -> Self {
        let len = self.length();
        debug_assert!(len > 0.0, "unit_vector called on a zero-length vector");
        self / len
    }

    #[inline]
    fn near_zero(self) -> bool {
        self.x.abs() < NEAR_ZERO_EPSILON
            && self.y.abs() < NEAR_ZERO_EPSILON
            && self.z.abs() < NEAR_ZERO_EPSILON
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with the given ratio of indices.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_vector() {
        let v = Vec3::new(3.0, 0.0, 4.0).unit_vector();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "zero-length")]
    fn test_unit_vector_zero_asserts_in_debug() {
        let _ = Vec3::ZERO.unit_vector();
    }

    #[test]
    fn test_near_zero() {
        assert!(Vec3::ZERO.near_zero());
        assert!(Vec3::new(1e-9, -1e-9, 5e-9).near_zero());
        assert!(!Vec3::new(1e-9, 1e-7, 0.0).near_zero());
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let normals = [
            Vec3::Y,
            Vec3::new(1.0, 1.0, 0.0).unit_vector(),
            Vec3::new(-0.3, 0.2, 0.9).unit_vector(),
        ];
        let incoming = [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.2, -3.0, 1.5),
            Vec3::new(-4.0, 0.5, 0.25),
        ];

        for n in normals {
            for v in incoming {
                let r = reflect(v, n);
                assert!((r.dot(n) + v.dot(n)).abs() < 1e-9);
                assert!((r.length() - v.length()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_refract_straight_through_with_ratio_one() {
        let uv = Vec3::new(0.3, -1.0, 0.1).unit_vector();
        let refracted = refract(uv, Vec3::Y, 1.0);
        assert!((refracted - uv).length() < 1e-9);
    }

    #[test]
    fn test_refract_normal_incidence() {
        // Head-on rays are not bent regardless of the index ratio
        let refracted = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5);
        assert!((refracted - (-Vec3::Y)).length() < 1e-9);
    }
}
