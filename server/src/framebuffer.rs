use std::sync::{Mutex, PoisonError};

use shared::models::{color::Color, jobs::render_result::RenderResult};

/// The full image, assembled from results as they arrive.
#[derive(Debug)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Mutex<Vec<Color>>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Mutex::new(vec![Color::default(); width as usize * height as usize]),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copies the result into place. Pixels landing outside the image are
    /// dropped. Returns how many pixels were written.
    pub fn apply(&self, result: &RenderResult) -> usize {
        let mut pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        let mut written = 0;

        for y in 0..result.height as u64 {
            let global_y = result.start_y as u64 + y;
            if global_y >= self.height as u64 {
                break;
            }
            for x in 0..result.width as u64 {
                let global_x = result.start_x as u64 + x;
                if global_x >= self.width as u64 {
                    break;
                }

                let source = (y * result.width as u64 + x) as usize;
                let Some(color) = result.pixels.get(source) else {
                    continue;
                };
                pixels[(global_y * self.width as u64 + global_x) as usize] = *color;
                written += 1;
            }
        }

        written
    }

    /// Replaces the whole image. Ignored unless `frame` has exactly
    /// `width * height` pixels.
    pub fn fill(&self, frame: Vec<Color>) -> bool {
        let mut pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        if frame.len() != pixels.len() {
            return false;
        }
        *pixels = frame;
        true
    }

    pub fn snapshot(&self) -> Vec<Color> {
        self.pixels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
