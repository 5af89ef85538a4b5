use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

use crate::models::{color::Color, light::Light};

/// Purely diffuse material lit by the first light of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lambert {
    pub kd: Vec3,
}

impl Lambert {
    pub fn new(kd: Vec3) -> Self {
        Self { kd }
    }

    pub fn render(&self, hit_point: Vec3, normal: Vec3, lights: &[Light]) -> Color {
        let Some(light) = lights.first() else {
            return Color::BLACK;
        };

        let omega = (light.position - hit_point).normalized();
        let radiance =
            self.kd * light.color * normal.dot(omega).max(0.0) * (1.0 / std::f32::consts::PI);
        Color::from_unit(radiance)
    }
}
