pub mod geometry_descriptor;
pub mod sphere;
