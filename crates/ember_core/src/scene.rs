//! Reference scene: a ground plane, a seeded field of small spheres and three
//! large feature spheres.

use ember_math::{gen_f64, random_vec3, Point3, Vec3};
use ember_renderer::{Camera, Color, Material, Scene, Sphere};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Radius of every small sphere in the random field.
const SMALL_RADIUS: f64 = 0.2;

/// Small spheres closer than this to the metal feature sphere's base are skipped.
const CLEARANCE: f64 = 0.9;

/// Probability split used when picking small-sphere materials.
///
/// `diffuse` and `metal` are probabilities; glass takes the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialSplit {
    pub diffuse: f64,
    pub metal: f64,
}

impl MaterialSplit {
    /// 80% diffuse, 15% metal, 5% glass.
    pub const CLASSIC: MaterialSplit = MaterialSplit {
        diffuse: 0.8,
        metal: 0.15,
    };

    /// 60% diffuse, 15% metal, 25% glass.
    pub const WIDE_GLASS: MaterialSplit = MaterialSplit {
        diffuse: 0.6,
        metal: 0.15,
    };

    pub fn glass(&self) -> f64 {
        1.0 - self.diffuse - self.metal
    }

    /// Both probabilities lie in [0, 1] and leave a non-negative glass share.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.diffuse)
            && (0.0..=1.0).contains(&self.metal)
            && self.diffuse + self.metal <= 1.0
    }
}

impl Default for MaterialSplit {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Knobs for [`random_scene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Small spheres are placed on the grid `-extent..extent` in x and z
    pub grid_extent: i32,
    pub material_split: MaterialSplit,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            grid_extent: 11,
            material_split: MaterialSplit::default(),
        }
    }
}

/// Build the reference scene. The result depends only on `seed` and `options`.
pub fn random_scene(seed: u64, options: &SceneOptions) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();
    let split = options.material_split;

    let ground = scene.add_material(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    scene.add(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    // Shared by every glass sphere
    let glass = scene.add_material(Material::dielectric(1.5));

    let keep_clear = Point3::new(4.0, 0.2, 0.0);
    for a in -options.grid_extent..options.grid_extent {
        for b in -options.grid_extent..options.grid_extent {
            let choose_mat = gen_f64(&mut rng);
            let center = Point3::new(
                f64::from(a) + 0.9 * gen_f64(&mut rng),
                0.2 + 0.3 * gen_f64(&mut rng),
                f64::from(b) + 0.9 * gen_f64(&mut rng),
            );

            if (center - keep_clear).length() <= CLEARANCE {
                continue;
            }

            let material = if choose_mat < split.diffuse {
                let albedo = random_vec3(&mut rng, 0.0, 1.0) * random_vec3(&mut rng, 0.0, 1.0);
                scene.add_material(Material::lambertian(albedo))
            } else if choose_mat < split.diffuse + split.metal {
                let albedo = random_vec3(&mut rng, 0.5, 1.0);
                let fuzz = 0.5 * gen_f64(&mut rng);
                scene.add_material(Material::metal(albedo, fuzz))
            } else {
                glass
            };

            scene.add(Sphere::new(center, SMALL_RADIUS, material));
        }
    }

    scene.add(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass));

    let brown = scene.add_material(Material::lambertian(Color::new(0.4, 0.2, 0.1)));
    scene.add(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, brown));

    let mirror = scene.add_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, mirror));

    log::debug!(
        "Built random scene: {} spheres, {} materials (seed {})",
        scene.len(),
        scene.material_count(),
        seed
    );
    scene
}

/// Camera framing the reference scene from above and to the side.
pub fn reference_camera(aspect_ratio: f64) -> Camera {
    let mut camera = Camera::new()
        .with_aspect_ratio(aspect_ratio)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0);
    camera.initialize();
    camera
}
