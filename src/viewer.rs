//! The seam between the window event loop and what is being shown.

use crate::{gfx::rendering::render_engine::RenderEngine, input::Command};

/// What the event loop asks of the application after handling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Callback that records the UI overlay into the frame's command encoder.
pub type OverlayFn<'a> =
    dyn FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView) + 'a;

/// An application driven by [`crate::app::StudioApp`].
///
/// The event loop owns the window, the render engine and the UI; the viewer
/// owns its state and decides what a frame contains.
pub trait Viewer {
    /// Handles one bound key command.
    fn on_input(&mut self, command: Command) -> Flow;

    /// Relative mouse motion in pixels.
    fn on_mouse_motion(&mut self, dx: f64, dy: f64);

    fn on_resize(&mut self, width: u32, height: u32);

    /// Releases every held key, e.g. when the window loses focus.
    fn release_input(&mut self);

    /// Advances continuous state (held keys, animation) by one frame.
    fn update(&mut self);

    /// Builds the debug UI for this frame.
    fn draw_ui(&mut self, ui: &imgui::Ui);

    /// Uploads what changed and draws the frame.
    fn render(
        &mut self,
        engine: &mut RenderEngine,
        overlay: Box<OverlayFn<'_>>,
    ) -> anyhow::Result<()>;

    /// True while the cursor is captured for camera look.
    fn mouse_look_active(&self) -> bool;
}
