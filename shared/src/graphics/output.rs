use std::path::Path;

use image::RgbImage;
use log::info;

use crate::{models::color::Color, networking::result::NetworkingResult};

/// Writes the framebuffer as an RGB PNG (format picked from the extension).
pub fn save_png(pixels: &[Color], width: u32, height: u32, path: &Path) -> NetworkingResult<()> {
    let buffer: Vec<u8> = pixels.iter().flat_map(|pixel| pixel.to_bytes()).collect();
    let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        crate::networking::error::NetworkingError::Malformed(format!(
            "framebuffer holds {} pixels, expected {}x{}",
            pixels.len(),
            width,
            height
        ))
    })?;

    image.save(path)?;
    info!("Image saved as {}", path.display());
    Ok(())
}
