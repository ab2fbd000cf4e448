//! Simple path tracer example.
//!
//! Renders three spheres on a ground plane and saves a plain PPM.

use ember_renderer::{
    default_worker_count, render_parallel, Camera, Color, Framebuffer, Material, RenderConfig,
    RenderContext, Scene, Sphere, Vec3,
};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> std::io::Result<()> {
    println!("Ember Path Tracer - Simple Example");
    println!("==================================");

    let scene = build_scene();

    let (width, height) = (400, 225);
    let mut camera = Camera::new()
        .with_aspect_ratio(width as f64 / height as f64)
        .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(20.0, 0.2, 3.4);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: 50,
        max_depth: 10,
        seed: 7,
    };

    println!("Rendering {}x{} @ {} spp...", width, height, config.samples_per_pixel);

    let context = RenderContext::new(&camera, &scene, &config, width, height);
    let mut image = Framebuffer::new(width, height);
    let stats = render_parallel(&context, &mut image, default_worker_count());
    println!("Rendered in {:?}", stats.elapsed);

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let ground = scene.add_material(Material::lambertian(Color::new(0.8, 0.8, 0.0)));
    let center = scene.add_material(Material::lambertian(Color::new(0.1, 0.2, 0.5)));
    let glass = scene.add_material(Material::dielectric(1.5));
    let gold = scene.add_material(Material::metal(Color::new(0.8, 0.6, 0.2), 0.0));

    scene.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground));
    scene.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, center));
    scene.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass));
    scene.add(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, gold));

    println!("Created {} objects", scene.len());
    scene
}

fn save_ppm(image: &Framebuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width(), image.height())?;
    writeln!(writer, "255")?;

    for rgb in image.to_rgb8().chunks_exact(3) {
        writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }

    writer.flush()
}
