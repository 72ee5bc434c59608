//! OBJ Studio
//!
//! A single-window viewer for Wavefront OBJ models, built on wgpu and winit:
//! Phong lighting, optional textures, a free-flying camera with perspective or
//! oblique projection, and an imgui control panel.

pub mod app;
pub mod config;
pub mod gfx;
pub mod input;
pub mod studio;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

pub use app::StudioApp;
pub use config::StudioConfig;
pub use studio::Studio;
