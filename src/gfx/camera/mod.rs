pub mod camera_controller;
pub mod camera_utils;
pub mod free_camera;

// Re-export main types
pub use camera_controller::{CameraController, Motion};
pub use camera_utils::{Camera, ProjectionUniform, ViewUniform};
pub use free_camera::{FreeCamera, Projection, ProjectionMode};
