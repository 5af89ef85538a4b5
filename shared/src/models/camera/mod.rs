use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

const COS_FOVY: f32 = 0.66;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub up: Vec3,
    pub at: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, up: Vec3, at: Vec3) -> Self {
        Self { position, up, at }
    }

    pub fn direction(&self) -> Vec3 {
        (self.at - self.position).normalized()
    }

    /// Image plane basis for a `width x height` image.
    pub fn basis(&self, width: u32, height: u32) -> (Vec3, Vec3) {
        let aspect = width as f32 / height as f32;
        let direction = self.direction();
        let horizontal = direction.cross(self.up).normalized() * (COS_FOVY * aspect);
        let vertical = horizontal.cross(direction).normalized() * COS_FOVY;
        (horizontal, vertical)
    }

    /// Primary ray direction through the center of pixel `(x, y)`.
    pub fn ray_direction(&self, x: u32, y: u32, width: u32, height: u32) -> Vec3 {
        let (horizontal, vertical) = self.basis(width, height);
        self.ray_direction_with(horizontal, vertical, x, y, width, height)
    }

    pub fn ray_direction_with(
        &self,
        horizontal: Vec3,
        vertical: Vec3,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Vec3 {
        let u = (x as f32 + 0.5) / width as f32;
        let v = (y as f32 + 0.5) / height as f32;
        (self.direction() + horizontal * (u - 0.5) + vertical * (v - 0.5)).normalized()
    }
}

pub fn default_camera() -> Camera {
    Camera::new(
        Vec3::new(0.0, 0.0, -5.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 5.0),
    )
}
