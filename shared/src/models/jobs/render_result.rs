use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::models::color::Color;

/// Output of exactly one `Job`. Only the header travels as JSON, the
/// pixels follow as raw RGB bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    pub start_x: u32,
    pub start_y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub pixels: Vec<Color>,
}

impl RenderResult {
    pub fn new(start_x: u32, start_y: u32, width: u32, height: u32, pixels: Vec<Color>) -> Self {
        Self {
            start_x,
            start_y,
            width,
            height,
            pixels,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn pixel_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|pixel| pixel.to_bytes()).collect()
    }

    /// Attaches the binary payload to a decoded header.
    pub fn with_pixel_bytes(mut self, data: &[u8]) -> Result<Self, String> {
        let expected = self.pixel_count() * Color::BYTES;
        if data.len() != expected {
            return Err(format!(
                "{}x{} region needs {} pixel bytes, got {}",
                self.width,
                self.height,
                expected,
                data.len()
            ));
        }

        self.pixels = data
            .chunks_exact(Color::BYTES)
            .map(|rgb| Color::new(rgb[0], rgb[1], rgb[2]))
            .collect();
        Ok(self)
    }
}

impl Message for RenderResult {
    const NAME: &'static str = "RenderResult";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_json_omits_pixels() {
        let result = RenderResult::new(0, 4, 1, 1, vec![Color::new(1, 2, 3)]);
        let json = result.to_json().unwrap();
        assert!(json["RenderResult"].get("pixels").is_none());
        assert_eq!(json["RenderResult"]["start_y"], 4);
    }

    #[test]
    fn short_payload_is_rejected() {
        let header = RenderResult::new(0, 0, 2, 2, Vec::new());
        assert!(header.with_pixel_bytes(&[0u8; 11]).is_err());
    }

    #[test]
    fn payload_is_split_into_rgb_triples() {
        let header = RenderResult::new(0, 0, 2, 1, Vec::new());
        let result = header.with_pixel_bytes(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(result.pixels, vec![Color::new(1, 2, 3), Color::new(4, 5, 6)]);
    }
}
