//! # Graphics Module
//!
//! Everything between an OBJ file on disk and a lit frame on screen.
//!
//! - **Camera** ([`camera`]) - free-flying camera, projection modes and key/mouse control
//! - **Rendering** ([`rendering`]) - Phong pipeline, surface management and uniform sync
//! - **Scene** ([`scene`]) - mesh loading, the displayed model and the light
//! - **Resources** ([`resources`]) - materials, textures and bind groups

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::FreeCamera;
pub use rendering::render_engine::RenderEngine;
