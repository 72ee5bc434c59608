// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform buffers, and bind groups for rendering.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, ModelBindings};
pub use material::{Material, ModelUniform};
pub use texture_resource::{TextureError, TextureResource};
