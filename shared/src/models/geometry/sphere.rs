use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

use crate::models::{color::Color, light::Light, material::material_descriptor::Material};

const HIT_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub radius: f32,
    pub position: Vec3,
    pub material: Material,
}

impl Sphere {
    pub fn new(radius: f32, position: Vec3, material: impl Into<Material>) -> Self {
        Self {
            radius,
            position,
            material: material.into(),
        }
    }

    /// Distance along `rd` to the nearest intersection in front of `ro`.
    pub fn intersect(&self, ro: Vec3, rd: Vec3) -> Option<f32> {
        let l = ro - self.position;
        let a = rd.dot(rd);
        let b = 2.0 * rd.dot(l);
        let c = l.dot(l) - self.radius * self.radius;
        let delta = b * b - 4.0 * a * c;
        if delta <= 0.0 {
            return None;
        }

        let sqrt_delta = delta.sqrt();
        let t0 = (-b - sqrt_delta) / (2.0 * a);
        let t1 = (-b + sqrt_delta) / (2.0 * a);

        [t0, t1].into_iter().find(|t| *t > HIT_EPSILON)
    }

    pub fn shade(&self, ro: Vec3, rd: Vec3, t: f32, lights: &[Light]) -> Color {
        let hit_point = ro + rd * t;
        let normal = (hit_point - self.position).normalized();
        self.material.render(hit_point, rd, normal, lights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::material::lambert::Lambert;

    fn unit_sphere_at(z: f32) -> Sphere {
        Sphere::new(1.0, Vec3::new(0.0, 0.0, z), Lambert::new(Vec3::splat(1.0)))
    }

    #[test]
    fn ray_hits_front_surface() {
        let sphere = unit_sphere_at(5.0);
        let t = sphere.intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let sphere = unit_sphere_at(5.0);
        assert_eq!(sphere.intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)), None);
    }

    #[test]
    fn ray_from_inside_hits_back_surface() {
        let sphere = unit_sphere_at(0.0);
        let t = sphere.intersect(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }
}
