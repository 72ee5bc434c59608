use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::{
    config::StudioConfig,
    gfx::rendering::render_engine::{RenderEngine, DEFAULT_SHADER},
    input::command_for_key,
    ui::UiManager,
    viewer::{Flow, Viewer},
};

/// Window, GPU and UI plumbing around a [`Viewer`].
pub struct StudioApp<V: Viewer> {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState<V>,
}

struct AppState<V: Viewer> {
    config: StudioConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    viewer: V,
    cursor_grabbed: bool,
    /// Set when the loop had to stop because of an unrecoverable error.
    fatal: Option<anyhow::Error>,
}

impl<V: Viewer> StudioApp<V> {
    pub fn new(config: StudioConfig, viewer: V) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                viewer,
                cursor_grabbed: false,
                fatal: None,
            },
        })
    }

    /// Runs until the window closes. Returns the error that stopped it, if any.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already consumed"))?;

        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<V: Viewer> AppState<V> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let shader_source = match &self.config.shader_path {
            Some(path) => std::fs::read_to_string(path).map_err(|error| {
                anyhow::anyhow!("could not read shader {}: {}", path.display(), error)
            })?,
            None => DEFAULT_SHADER.to_string(),
        };

        let (width, height) = window.inner_size().into();
        let window_clone = window.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, &shader_source).await
        })?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        self.viewer.on_resize(width, height);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);

        Ok(())
    }

    /// Hides and confines the cursor while mouse look is on, keeping it at the anchor.
    fn sync_cursor(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let look = self.viewer.mouse_look_active();

        if look != self.cursor_grabbed {
            if look {
                let grabbed = window
                    .set_cursor_grab(CursorGrabMode::Confined)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
                if let Err(error) = grabbed {
                    log::warn!("Could not grab the cursor: {}", error);
                }
            } else if let Err(error) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Could not release the cursor: {}", error);
            }
            window.set_cursor_visible(!look);
            if let Some(ui_manager) = self.ui_manager.as_mut() {
                ui_manager.set_mouse_enabled(!look);
            }
            self.cursor_grabbed = look;
        }

        if look {
            let (x, y) = self.config.cursor_anchor;
            // Not every platform allows warping; look still works from raw motion.
            let _ = window.set_cursor_position(PhysicalPosition::new(x, y));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.viewer.update();
        self.sync_cursor();

        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        let viewer = &mut self.viewer;
        ui_manager.update_logic(window, |ui| viewer.draw_ui(ui));

        let overlay = Box::new(
            |device: &wgpu::Device,
             queue: &wgpu::Queue,
             encoder: &mut wgpu::CommandEncoder,
             view: &wgpu::TextureView| {
                ui_manager.render_display_only(device, queue, encoder, view);
            },
        );

        if let Err(error) = viewer.render(render_engine, overlay) {
            self.fail(event_loop, error);
        }
    }
}

impl<V: Viewer> ApplicationHandler for AppState<V> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.init_graphics(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first; key releases always reach the viewer so held
        // motions cannot get stuck.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            let is_release = matches!(
                event,
                WindowEvent::KeyboardInput {
                    event: KeyEvent {
                        state: ElementState::Released,
                        ..
                    },
                    ..
                }
            );
            if ui_manager.handle_input(&window, &ui_event) && !is_release {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if let Some(command) = command_for_key(key_code, state, repeat) {
                    if self.viewer.on_input(command) == Flow::Exit {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.viewer.on_resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::Focused(false) => {
                self.viewer.release_input();
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.viewer.mouse_look_active() {
                self.viewer.on_mouse_motion(delta.0, delta.1);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
