pub mod camera;
pub mod instance;

pub use camera::{Camera2D, CameraUniform, FollowConstraints};
pub use instance::{RenderBuffer, RenderInstance};
