//! Flat list of spheres plus the material arena they point into.

use crate::{HitRecord, Hittable, Material, MaterialId, Sphere};
use ember_math::{Interval, Ray};

/// A renderable scene.
///
/// Intersection is a linear scan over every sphere.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: Vec<Material>,
    objects: Vec<Sphere>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return the handle spheres use to refer to it.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        self.materials.push(material.into());
        MaterialId(self.materials.len() - 1)
    }

    /// Add a sphere to the scene.
    ///
    /// The sphere's material must come from this scene's `add_material`.
    pub fn add(&mut self, sphere: Sphere) {
        debug_assert!(
            sphere.material().index() < self.materials.len(),
            "sphere references a material that is not in this scene"
        );
        self.objects.push(sphere);
    }

    /// Look up a material by handle.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn objects(&self) -> &[Sphere] {
        &self.objects
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Remove all spheres and materials.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.materials.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use ember_math::Vec3;

    #[test]
    fn test_empty_scene_never_hits() {
        let scene = Scene::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(scene.hit(&ray, Interval::UNIVERSE).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_nearest_hit_wins_regardless_of_order() {
        let mut scene = Scene::new();
        let far = scene.add_material(Material::lambertian(Color::new(1.0, 0.0, 0.0)));
        let near = scene.add_material(Material::metal(Color::ONE, 0.0));

        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, far));
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, near));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = scene.hit(&ray, Interval::from_min(0.001)).unwrap();

        assert!((rec.t - 1.5).abs() < 1e-12);
        assert_eq!(rec.material, near);
        assert_eq!(*scene.material(rec.material), Material::metal(Color::ONE, 0.0));
    }

    #[test]
    fn test_hit_respects_t_max() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::dielectric(1.5));
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, mat));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(scene.hit(&ray, Interval::new(0.001, 3.0)).is_none());
        assert!(scene.hit(&ray, Interval::new(0.001, 4.0)).is_some());
    }

    #[test]
    fn test_materials_are_shared() {
        let mut scene = Scene::new();
        let shared = scene.add_material(Material::lambertian(Color::splat(0.5)));
        for i in 0..4 {
            scene.add(Sphere::new(Vec3::new(i as f64, 0.0, -3.0), 0.25, shared));
        }

        assert_eq!(scene.len(), 4);
        assert_eq!(scene.material_count(), 1);

        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.material_count(), 0);
    }
}
