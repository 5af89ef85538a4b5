use std::ops::Range;

use vector_rs::vec3::Vec3;

use crate::models::{
    camera::Camera,
    color::Color,
    jobs::{job::Job, render_result::RenderResult},
    scene::Scene,
};

/// Color of the nearest object hit by the ray, black on a miss.
pub fn render_pixel(scene: &Scene, ro: Vec3, rd: Vec3) -> Color {
    let mut nearest = f32::INFINITY;
    let mut color = Color::BLACK;

    for object in &scene.objects {
        if let Some(t) = object.intersect(ro, rd) {
            if t < nearest {
                nearest = t;
                color = object.shade(ro, rd, t, &scene.lights);
            }
        }
    }

    color
}

/// Renders `columns x rows` of a `width x height` image, row-major.
pub fn render_region(
    camera: &Camera,
    scene: &Scene,
    width: u32,
    height: u32,
    columns: Range<u32>,
    rows: Range<u32>,
) -> Vec<Color> {
    let (horizontal, vertical) = camera.basis(width, height);
    let mut pixels = Vec::with_capacity(columns.len() * rows.len());

    for y in rows {
        for x in columns.clone() {
            let rd = camera.ray_direction_with(horizontal, vertical, x, y, width, height);
            pixels.push(render_pixel(scene, camera.position, rd));
        }
    }

    pixels
}

pub fn render_job(job: &Job) -> RenderResult {
    let pixels = render_region(
        &job.camera,
        &job.scene,
        job.width,
        job.height,
        job.start_x..job.end_x,
        job.start_y..job.end_y,
    );

    RenderResult::new(
        job.start_x,
        job.start_y,
        job.region_width(),
        job.region_height(),
        pixels,
    )
}

/// Whole-image render on the calling thread.
pub fn render_frame(camera: &Camera, scene: &Scene, width: u32, height: u32) -> Vec<Color> {
    render_region(camera, scene, width, height, 0..width, 0..height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        camera::default_camera, geometry::sphere::Sphere, light::Light,
        material::lambert::Lambert,
    };

    fn backdrop_scene() -> Scene {
        let mut scene = Scene::new();
        // Large enough to fill the whole view from the default camera.
        scene.add_element(Sphere::new(
            100.0,
            Vec3::new(0.0, 0.0, 200.0),
            Lambert::new(Vec3::splat(1.0)),
        ));
        scene.add_light(Light::new(Vec3::splat(1.0), Vec3::new(0.0, 0.0, -50.0)));
        scene
    }

    #[test]
    fn empty_scene_renders_black() {
        let scene = Scene::new();
        let pixels = render_frame(&default_camera(), &scene, 4, 4);
        assert_eq!(pixels, vec![Color::BLACK; 16]);
    }

    #[test]
    fn job_result_matches_the_same_rows_of_a_full_frame() {
        let scene = backdrop_scene();
        let camera = default_camera();
        let frame = render_frame(&camera, &scene, 8, 6);

        let job = Job {
            start_x: 0,
            end_x: 8,
            start_y: 2,
            end_y: 5,
            width: 8,
            height: 6,
            camera,
            scene,
        };
        let result = render_job(&job);

        assert_eq!((result.width, result.height), (8, 3));
        assert_eq!(result.pixels.len(), result.pixel_count());
        assert_eq!(result.pixels, frame[2 * 8..5 * 8]);
    }

    #[test]
    fn nearest_object_wins() {
        let mut scene = Scene::new();
        scene.add_light(Light::new(Vec3::splat(1.0), Vec3::new(0.0, 0.0, -10.0)));
        scene.add_element(Sphere::new(
            1.0,
            Vec3::new(0.0, 0.0, 10.0),
            Lambert::new(Vec3::new(0.0, 1.0, 0.0)),
        ));
        scene.add_element(Sphere::new(
            1.0,
            Vec3::new(0.0, 0.0, 5.0),
            Lambert::new(Vec3::new(1.0, 0.0, 0.0)),
        ));

        let color = render_pixel(&scene, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(color.r > 0);
        assert_eq!(color.g, 0);
    }
}
