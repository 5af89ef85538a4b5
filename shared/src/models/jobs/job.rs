use serde::{Deserialize, Serialize};

use super::{message::Message, render_result::RenderResult};
use crate::{
    graphics::raytracer,
    models::{camera::Camera, scene::Scene},
};

/// One rectangular region `[start_x, end_x) x [start_y, end_y)` of a
/// `width x height` image, with everything needed to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub start_x: u32,
    pub end_x: u32,
    pub start_y: u32,
    pub end_y: u32,
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub scene: Scene,
}

impl Job {
    pub fn region_width(&self) -> u32 {
        self.end_x.saturating_sub(self.start_x)
    }

    pub fn region_height(&self) -> u32 {
        self.end_y.saturating_sub(self.start_y)
    }

    /// Checks that the region lies inside the image.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_x > self.end_x || self.end_x > self.width {
            return Err(format!(
                "columns [{}, {}) outside image width {}",
                self.start_x, self.end_x, self.width
            ));
        }
        if self.start_y > self.end_y || self.end_y > self.height {
            return Err(format!(
                "rows [{}, {}) outside image height {}",
                self.start_y, self.end_y, self.height
            ));
        }
        Ok(())
    }

    pub fn perform(&self) -> RenderResult {
        raytracer::render_job(self)
    }
}

impl Message for Job {
    const NAME: &'static str = "Job";
}
