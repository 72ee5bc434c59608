//! Core rendering functionality
//!
//! Owns the surface and pipeline, and decides which uniforms a frame re-sends.

pub mod frame_sync;
pub mod render_engine;

pub use frame_sync::{FrameSync, UniformUpdate};
pub use render_engine::{RenderEngine, RenderError};
