use rand::{rngs::StdRng, Rng, SeedableRng};
use vector_rs::vec3::Vec3;

use super::Scene;
use crate::models::{
    geometry::sphere::Sphere,
    light::Light,
    material::{lambert::Lambert, material_descriptor::Material, phong::Phong},
};

const RANDOM_SPHERES: usize = 15;
const MIN_RADIUS: f32 = 0.2;
const MAX_RADIUS: f32 = 0.7;

/// Builds the demo scene. With a seed the random spheres are reproducible.
pub fn build_scene(seed: Option<u64>) -> Scene {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut scene = Scene::new();
    scene.add_element(Sphere::new(
        1.0,
        Vec3::new(0.0, 0.0, 8.0),
        Phong::from_diffuse(Vec3::new(1.0, 0.0, 0.0), 0.8, 32.0),
    ));
    scene.add_element(Sphere::new(
        0.3,
        Vec3::new(2.0, 1.5, 4.0),
        Phong::from_diffuse(Vec3::new(0.0, 1.0, 0.0), 0.5, 16.0),
    ));
    scene.add_element(Sphere::new(
        0.9,
        Vec3::new(0.0, -1.0, 5.0),
        Lambert::new(Vec3::new(0.0, 0.0, 1.0)),
    ));
    scene.add_element(Sphere::new(
        0.5,
        Vec3::new(-2.0, -2.0, 5.0),
        Phong::from_diffuse(Vec3::new(1.0, 1.0, 1.0), 0.9, 64.0),
    ));

    for sphere in random_spheres(&mut rng, RANDOM_SPHERES, Vec3::new(5.0, 5.0, 10.0)) {
        scene.add_element(sphere);
    }

    scene.add_light(Light::new(Vec3::splat(1.0), Vec3::new(0.0, 10.0, 0.0)));
    scene.add_light(Light::new(
        Vec3::new(0.5, 0.5, 0.8),
        Vec3::new(-10.0, 5.0, -5.0),
    ));

    scene
}

fn random_spheres(rng: &mut impl Rng, count: usize, bounding_box: Vec3) -> Vec<Sphere> {
    (0..count)
        .map(|_| {
            let position = Vec3::new(
                rng.gen_range(-1.0f32..1.0) * bounding_box.x,
                rng.gen_range(-1.0f32..1.0) * bounding_box.y,
                rng.gen_range(-1.0f32..1.0) * bounding_box.z + 5.0,
            );
            let radius = rng.gen_range(MIN_RADIUS..MAX_RADIUS);
            let color = Vec3::new(rng.gen(), rng.gen(), rng.gen());

            let material = if rng.gen_bool(0.5) {
                Material::Lambert(Lambert::new(color))
            } else {
                let specular_strength = rng.gen::<f32>() * 0.9;
                let shininess = rng.gen_range(8.0..64.0);
                Material::Phong(Phong::from_diffuse(color, specular_strength, shininess))
            };

            Sphere::new(radius, position, material)
        })
        .collect()
}
