//! Uniform bindings shared by the whole frame and by the model
//!
//! Bind group layout used by `shader.wgsl`:
//!
//! | group | binding | content                    | stages            |
//! |-------|---------|----------------------------|-------------------|
//! | 0     | 0       | [`ProjectionUniform`]      | vertex            |
//! | 0     | 1       | [`ViewUniform`]            | vertex, fragment  |
//! | 0     | 2       | [`LightUniform`]           | fragment          |
//! | 1     | 0       | [`ModelUniform`]           | vertex, fragment  |
//! | 2     | 0, 1    | texture view and sampler   | fragment          |

use crate::{
    gfx::{
        camera::camera_utils::{ProjectionUniform, ViewUniform},
        rendering::frame_sync::UniformUpdate,
        resources::{material::ModelUniform, texture_resource::TextureResource},
        scene::scene::LightUniform,
    },
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Projection, view and light buffers with their bind group (group 0).
pub struct GlobalBindings {
    projection: UniformBuffer<ProjectionUniform>,
    view: UniformBuffer<ViewUniform>,
    light: UniformBuffer<LightUniform>,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let projection = UniformBuffer::new(device);
        let view = UniformBuffer::new(device);
        let light = UniformBuffer::new(device);

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global Bind Group Layout"),
            entries: &[
                binding_types::entry(0, wgpu::ShaderStages::VERTEX, binding_types::uniform()),
                binding_types::entry(
                    1,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    binding_types::uniform(),
                ),
                binding_types::entry(2, wgpu::ShaderStages::FRAGMENT, binding_types::uniform()),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: projection.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: view.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: light.binding_resource(),
                },
            ],
        });

        Self {
            projection,
            view,
            light,
            layout,
            bind_group,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Model matrix and material buffer with its bind group (group 1).
pub struct ModelBindings {
    model: UniformBuffer<ModelUniform>,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ModelBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let model = UniformBuffer::new(device);

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[binding_types::entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                binding_types::uniform(),
            )],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model.binding_resource(),
            }],
        });

        Self {
            model,
            layout,
            bind_group,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Layout for the model texture (group 2).
pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Texture Bind Group Layout"),
        entries: &[
            binding_types::entry(0, wgpu::ShaderStages::FRAGMENT, binding_types::texture_2d()),
            binding_types::entry(
                1,
                wgpu::ShaderStages::FRAGMENT,
                binding_types::sampler(wgpu::SamplerBindingType::Filtering),
            ),
        ],
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &TextureResource,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Texture Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

/// Writes one collected update into the matching buffer.
pub fn write_update(
    queue: &wgpu::Queue,
    global: &GlobalBindings,
    model: &ModelBindings,
    update: &UniformUpdate,
) {
    match update {
        UniformUpdate::Projection(proj) => global.projection.write(queue, proj),
        UniformUpdate::View(view) => global.view.write(queue, view),
        UniformUpdate::Lighting(light) => global.light.write(queue, light),
        UniformUpdate::Model(uniform) => model.model.write(queue, uniform),
    }
}
