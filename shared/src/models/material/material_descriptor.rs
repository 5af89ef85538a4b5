use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

use super::{lambert::Lambert, phong::Phong};
use crate::models::{color::Color, light::Light};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Lambert(Lambert),
    Phong(Phong),
}

impl Material {
    /// Serialization tags, one per variant.
    pub const VARIANTS: [&'static str; 2] = ["Lambert", "Phong"];

    pub fn tag(&self) -> &'static str {
        match self {
            Material::Lambert(_) => "Lambert",
            Material::Phong(_) => "Phong",
        }
    }

    pub fn render(&self, hit_point: Vec3, rd: Vec3, normal: Vec3, lights: &[Light]) -> Color {
        match self {
            Material::Lambert(lambert) => lambert.render(hit_point, normal, lights),
            Material::Phong(phong) => phong.render(hit_point, rd, normal, lights),
        }
    }
}

impl From<Lambert> for Material {
    fn from(lambert: Lambert) -> Self {
        Material::Lambert(lambert)
    }
}

impl From<Phong> for Material {
    fn from(phong: Phong) -> Self {
        Material::Phong(phong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambert_without_lights_is_black() {
        let material = Material::from(Lambert::new(Vec3::splat(1.0)));
        let color = material.render(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            &[],
        );
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn variants_serialize_under_their_tag() {
        let material = Material::from(Phong::from_diffuse(Vec3::splat(1.0), 0.5, 16.0));
        let json = serde_json::to_value(material).unwrap();
        assert!(json.get(material.tag()).is_some());
    }
}
