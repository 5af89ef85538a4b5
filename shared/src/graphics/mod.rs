pub mod output;
pub mod raytracer;
