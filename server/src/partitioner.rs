use shared::models::{camera::Camera, jobs::job::Job, scene::Scene};

/// Rows `[start, end)` of the image assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub start: u32,
    pub end: u32,
}

impl Band {
    pub fn rows(&self) -> u32 {
        self.end - self.start
    }
}

/// Splits `[0, height)` into `count` contiguous bands of `height / count`
/// rows, the last one absorbing the remainder. `count == 0` yields no band.
pub fn partition_rows(height: u32, count: usize) -> Vec<Band> {
    if count == 0 {
        return Vec::new();
    }

    let rows_per_band = (height as u64 / count as u64) as u32;
    (0..count)
        .map(|i| {
            let start = (i as u64 * rows_per_band as u64) as u32;
            let end = if i == count - 1 {
                height
            } else {
                start + rows_per_band
            };
            Band { start, end }
        })
        .collect()
}

/// One full-width job per band.
pub fn build_jobs(
    bands: &[Band],
    width: u32,
    height: u32,
    camera: &Camera,
    scene: &Scene,
) -> Vec<Job> {
    bands
        .iter()
        .map(|band| Job {
            start_x: 0,
            end_x: width,
            start_y: band.start,
            end_y: band.end,
            width,
            height,
            camera: *camera,
            scene: scene.clone(),
        })
        .collect()
}
