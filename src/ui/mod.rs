//! # User Interface Module
//!
//! Dear ImGui-based control panel for the studio.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture and
//!   per-frame rendering
//! - [`panel`] - The "3D Studio" window with object, light, material, texture
//!   and projection sections
//!
//! ## Input Handling
//!
//! Events the UI wants (typing into a path field, dragging a slider) are not
//! forwarded to the key bindings or the camera.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{studio_panel, PanelAction, PanelState};
