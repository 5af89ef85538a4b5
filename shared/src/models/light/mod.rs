use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub color: Vec3,
    pub position: Vec3,
}

impl Light {
    pub fn new(color: Vec3, position: Vec3) -> Self {
        Self { color, position }
    }
}
