pub mod camera;
pub mod color;
pub mod geometry;
pub mod jobs;
pub mod light;
pub mod material;
pub mod scene;
