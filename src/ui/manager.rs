//! Dear ImGui glued to winit (input) and wgpu (drawing).

use imgui::{ConfigFlags, Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

const FONT_SIZE: f32 = 16.0;

/// Owns the ImGui context and its platform and renderer backends.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

/// What kind of input an event is, as far as ImGui capture goes.
enum InputKind {
    Keyboard,
    Mouse,
}

fn input_kind(event: &WindowEvent) -> Option<InputKind> {
    match event {
        WindowEvent::KeyboardInput { .. } | WindowEvent::ModifiersChanged(_) => {
            Some(InputKind::Keyboard)
        }
        WindowEvent::CursorMoved { .. }
        | WindowEvent::MouseInput { .. }
        | WindowEvent::MouseWheel { .. }
        | WindowEvent::Focused(_) => Some(InputKind::Mouse),
        _ => None,
    }
}

impl UiManager {
    /// The panel is drawn at a fixed pixel scale (`HiDpiMode::Locked(1.0)`)
    /// so it looks the same on every display.
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: output_color_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Turns mouse interaction off while mouse look owns the cursor.
    pub fn set_mouse_enabled(&mut self, enabled: bool) {
        let flags = &mut self.context.io_mut().config_flags;
        flags.set(ConfigFlags::NO_MOUSE, !enabled);
        flags.set(ConfigFlags::NO_MOUSE_CURSOR_CHANGE, !enabled);
    }

    /// Feeds an event to ImGui. Returns true when ImGui wants it for itself,
    /// i.e. the key bindings and camera must not see it.
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        let Event::WindowEvent {
            event: window_event,
            ..
        } = event
        else {
            return false;
        };
        let Some(kind) = input_kind(window_event) else {
            return false;
        };

        self.platform
            .handle_event(self.context.io_mut(), window, event);

        let io = self.context.io();
        match kind {
            InputKind::Keyboard => io.want_capture_keyboard,
            InputKind::Mouse => io.want_capture_mouse,
        }
    }

    /// Builds this frame's UI with `build` and returns what it returned.
    ///
    /// Call once per frame, before [`UiManager::render_display_only`].
    pub fn update_logic<F, R>(&mut self, window: &Window, build: F) -> R
    where
        F: FnOnce(&imgui::Ui) -> R,
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(error) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Failed to prepare UI frame: {}", error);
        }

        let ui = self.context.frame();
        let result = build(&*ui);

        let cursor = ui.mouse_cursor();
        if self.last_cursor != cursor {
            self.last_cursor = cursor;
            self.platform.prepare_render(ui, window);
        }

        result
    }

    /// Draws the last built frame over the scene already in `target`.
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
    ) {
        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut overlay_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("studio_ui_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(error) = self
            .renderer
            .render(draw_data, queue, device, &mut overlay_pass)
        {
            log::error!("Failed to draw the control panel: {:?}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_input_kind() {
        assert!(matches!(
            input_kind(&WindowEvent::Focused(true)),
            Some(InputKind::Mouse)
        ));
        assert!(input_kind(&WindowEvent::CloseRequested).is_none());
        assert!(input_kind(&WindowEvent::Resized(PhysicalSize::new(1, 1))).is_none());
    }
}
