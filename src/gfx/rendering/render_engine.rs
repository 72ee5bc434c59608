//! WGPU-based rendering engine for the studio
//!
//! Owns the surface, device, pipeline and all uniform buffers. The engine
//! does not decide *what* changed; it writes the [`UniformUpdate`]s it is
//! given and draws the model every frame, followed by an optional UI overlay.

use std::path::Path;

use thiserror::Error;

use crate::gfx::{
    resources::{
        global_bindings::{self, GlobalBindings, ModelBindings},
        texture_resource::{TextureError, TextureResource},
    },
    scene::{
        object::{DrawObject, Model},
        vertex::Vertex3D,
    },
};

use super::frame_sync::UniformUpdate;

/// Shader used when no `--shader` path is given.
pub const DEFAULT_SHADER: &str = include_str!("shader.wgsl");

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.12,
    a: 1.0,
};

/// Failures that stop the application.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create the window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("the surface is not supported by the adapter")]
    UnsupportedSurface,

    #[error("shader compilation failed: {0}")]
    Shader(String),

    #[error("render pipeline creation failed: {0}")]
    Pipeline(String),

    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    global_bindings: GlobalBindings,
    model_bindings: ModelBindings,
    texture_layout: wgpu::BindGroupLayout,
    texture: TextureResource,
    texture_bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Compiles `shader_source` (WGSL) and links the pipeline inside a
    /// validation error scope, so a broken shader is reported as an error
    /// instead of aborting.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `shader_source` - WGSL source with `vs_main` and `fs_main` entry points
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        shader_source: &str,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("wgpu: {}", error);
        }));

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device);
        let model_bindings = ModelBindings::new(&device);
        let texture_layout = global_bindings::texture_bind_group_layout(&device);

        let texture = TextureResource::solid_white(&device, &queue);
        let texture_bind_group =
            global_bindings::texture_bind_group(&device, &texture_layout, &texture);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Studio Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });
        if let Some(error) = device.pop_error_scope().await {
            return Err(RenderError::Shader(error.to_string()));
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = create_pipeline(
            &device,
            &shader,
            format,
            &[
                global_bindings.layout(),
                model_bindings.layout(),
                &texture_layout,
            ],
        );
        if let Some(error) = device.pop_error_scope().await {
            return Err(RenderError::Pipeline(error.to_string()));
        }

        log::debug!("Render engine ready ({:?}, {}x{})", format, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline,
            global_bindings,
            model_bindings,
            texture_layout,
            texture,
            texture_bind_group,
        })
    }

    /// Writes the uniforms that changed since the last frame.
    pub fn apply(&self, updates: &[UniformUpdate]) {
        for update in updates {
            global_bindings::write_update(
                &self.queue,
                &self.global_bindings,
                &self.model_bindings,
                update,
            );
        }
    }

    /// Replaces the model texture. The previous one is dropped.
    pub fn set_texture(&mut self, texture: TextureResource) {
        self.texture_bind_group =
            global_bindings::texture_bind_group(&self.device, &self.texture_layout, &texture);
        self.texture = texture;
    }

    /// Loads an image from disk as the model texture.
    ///
    /// On failure the current texture stays bound.
    pub fn load_texture(&mut self, path: &Path) -> Result<(), TextureError> {
        let texture = TextureResource::from_image_file(&self.device, &self.queue, path)?;
        self.set_texture(texture);
        Ok(())
    }

    /// Draws `model` and then lets `ui_callback` record an overlay pass.
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is skipped.
    pub fn render_frame<F>(&mut self, model: &Model, ui_callback: F) -> Result<(), RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(error @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface {}; reconfiguring", error);
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(error) => return Err(RenderError::Surface(error)),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(1, self.model_bindings.bind_group(), &[]);
            render_pass.set_bind_group(2, &self.texture_bind_group, &[]);
            render_pass.draw_model(model);
        }

        ui_callback(
            &self.device,
            &self.queue,
            &mut encoder,
            &surface_texture_view,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Studio Pipeline Layout"),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Studio Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // OBJ files do not agree on winding.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
