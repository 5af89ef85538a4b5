use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

use crate::models::{color::Color, light::Light};

const AMBIENT_COEFFICIENT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phong {
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub n: f32,
}

impl Phong {
    pub fn new(ka: Vec3, kd: Vec3, ks: Vec3, n: f32) -> Self {
        Self { ka, kd, ks, n }
    }

    pub fn from_diffuse(diffuse: Vec3, specular_strength: f32, shininess: f32) -> Self {
        Self {
            ka: diffuse * AMBIENT_COEFFICIENT,
            kd: diffuse,
            ks: Vec3::splat(specular_strength),
            n: shininess,
        }
    }

    pub fn render(&self, hit_point: Vec3, rd: Vec3, normal: Vec3, lights: &[Light]) -> Color {
        let view_dir = -rd;
        let mut total = Vec3::ZERO;

        for light in lights {
            let light_dir = (light.position - hit_point).normalized();
            let lambert = normal.dot(light_dir);

            let ambient = self.ka * light.color;
            let diffuse = self.kd * light.color * lambert.max(0.0);

            let reflect_dir = (-light_dir + normal * (2.0 * lambert)).normalized();
            let specular_factor = reflect_dir.dot(view_dir).max(0.0).powf(self.n);
            let specular = self.ks * light.color * specular_factor;

            total += ambient + diffuse + specular;
        }

        Color::from_unit(total.min_each(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_diffuse_derives_ambient_and_specular_terms() {
        let phong = Phong::from_diffuse(Vec3::new(1.0, 0.5, 0.0), 0.8, 32.0);
        assert_eq!(phong.ka, Vec3::new(0.1, 0.05, 0.0));
        assert_eq!(phong.ks, Vec3::splat(0.8));
        assert_eq!(phong.n, 32.0);
    }

    #[test]
    fn head_on_light_saturates_the_diffuse_channel() {
        let phong = Phong::from_diffuse(Vec3::new(1.0, 0.0, 0.0), 0.0, 8.0);
        let lights = [Light::new(Vec3::splat(1.0), Vec3::new(0.0, 0.0, -10.0))];
        let color = phong.render(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            &lights,
        );
        assert_eq!(color, Color::new(255, 0, 0));
    }
}
