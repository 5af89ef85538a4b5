use serde::{Deserialize, Serialize};
use vector_rs::vec3::Vec3;

/// One RGB triple of the framebuffer, three bytes on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const BYTES: usize = 3;

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Maps a linear color in `[0, 1]` to bytes, clamping anything outside.
    pub fn from_unit(v: Vec3) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Self {
            r: channel(v.x),
            g: channel(v.y),
            b: channel(v.z),
        }
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}
