pub mod lambert;
pub mod material_descriptor;
pub mod phong;
