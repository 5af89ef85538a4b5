pub mod job;
pub mod message;
pub mod render_result;
