use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

use super::sphere::Sphere;
use crate::models::{color::Color, light::Light, material::material_descriptor::Material};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Sphere(Sphere),
}

impl Geometry {
    pub const VARIANTS: [&'static str; 1] = ["Sphere"];

    pub fn tag(&self) -> &'static str {
        match self {
            Geometry::Sphere(_) => "Sphere",
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Geometry::Sphere(sphere) => &sphere.material,
        }
    }

    pub fn intersect(&self, ro: Vec3, rd: Vec3) -> Option<f32> {
        match self {
            Geometry::Sphere(sphere) => sphere.intersect(ro, rd),
        }
    }

    pub fn shade(&self, ro: Vec3, rd: Vec3, t: f32, lights: &[Light]) -> Color {
        match self {
            Geometry::Sphere(sphere) => sphere.shade(ro, rd, t, lights),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(sphere: Sphere) -> Self {
        Geometry::Sphere(sphere)
    }
}
