pub mod debug;
pub mod render;
