//! Surface scattering model.
//!
//! Materials form a closed set: [`Material`] dispatches to the concrete
//! [`Lambertian`], [`Metal`] and [`Dielectric`] scatterers with an exhaustive
//! `match`, so adding a variant is a compile error until every site handles it.

use crate::hittable::HitRecord;
use ember_math::{
    gen_f64, random_in_unit_sphere, random_unit_vector, reflect, refract, Ray, Vec3, Vec3Ext,
};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Stable handle of a material inside a [`Scene`](crate::Scene) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    /// Position of the material in its scene.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Fraction of energy kept, per channel
    pub attenuation: Color,
    /// Outgoing ray
    pub scattered: Ray,
}

/// Something that can turn an incoming ray into an outgoing one.
pub trait Scatter {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Scatter for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough (clamped to [0, 1])
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Scatter for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().unit_vector(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the ray below the surface, which absorbs it
        if direction.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, direction),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f64 {
        self.ior
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ratio: f64) -> f64 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Scatter for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().unit_vector();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Any surface material a scene can hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian(Lambertian::new(albedo))
    }

    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    pub fn dielectric(ior: f64) -> Self {
        Material::Dielectric(Dielectric::new(ior))
    }
}

impl Scatter for Material {
    #[inline]
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(normal: Vec3, front_face: bool) -> HitRecord {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material: MaterialId::default(),
            t: 1.0,
            front_face,
        }
    }

    #[test]
    fn test_lambertian_attenuation_is_albedo() {
        let albedo = Color::new(0.8, 0.3, 0.1);
        let material = Material::lambertian(albedo);
        let mut rng = StdRng::seed_from_u64(1);

        for i in 0..500 {
            let ray_in = Ray::new(Vec3::new(i as f64, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.2));
            let result = material
                .scatter(&ray_in, &record(Vec3::Y, true), &mut rng)
                .expect("lambertian always scatters");
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), Vec3::ZERO);
            assert!(!result.scattered.direction().near_zero());
        }
    }

    #[test]
    fn test_mirror_metal_reflects_exactly() {
        let metal = Metal::new(Color::new(0.9, 0.9, 0.9), 0.0);
        let mut rng = StdRng::seed_from_u64(2);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let result = metal.scatter(&ray_in, &record(Vec3::Y, true), &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).unit_vector();
        assert!((result.scattered.direction() - expected).length() < 1e-9);
        assert_eq!(result.attenuation, Color::new(0.9, 0.9, 0.9));
    }

    #[test]
    fn test_metal_grazing_ray_can_be_absorbed() {
        let metal = Metal::new(Color::ONE, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        // Nearly tangent incoming ray: heavy fuzz sends many samples below the surface
        let ray_in = Ray::new(Vec3::new(-1.0, 0.001, 0.0), Vec3::new(1.0, -0.001, 0.0));

        let mut absorbed = 0;
        for _ in 0..1000 {
            match metal.scatter(&ray_in, &record(Vec3::Y, true), &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_dielectric_always_scatters_colorless() {
        let glass = Material::dielectric(1.5);
        let mut rng = StdRng::seed_from_u64(4);

        for i in 0..200 {
            let dir = Vec3::new(0.01 * i as f64, -1.0, 0.0);
            for front_face in [true, false] {
                let result = glass
                    .scatter(&Ray::new(Vec3::Y, dir), &record(Vec3::Y, front_face), &mut rng)
                    .unwrap();
                assert_eq!(result.attenuation, Color::ONE);
            }
        }
    }

    #[test]
    fn test_total_internal_reflection() {
        let glass = Dielectric::new(1.5);
        let mut rng = StdRng::seed_from_u64(5);
        // Leaving the glass at a steep angle: ratio 1.5 * sin(60deg) > 1
        let dir = Vec3::new(60f64.to_radians().sin(), -60f64.to_radians().cos(), 0.0);
        let ray_in = Ray::new(Vec3::Y, dir);

        for _ in 0..100 {
            let result = glass.scatter(&ray_in, &record(Vec3::Y, false), &mut rng).unwrap();
            let expected = reflect(dir.unit_vector(), Vec3::Y);
            assert!((result.scattered.direction() - expected).length() < 1e-9);
        }
    }

    #[test]
    fn test_schlick_reflectance_bounds() {
        assert!((Dielectric::reflectance(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-9);
        assert!((Dielectric::reflectance(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-9);
    }
}
