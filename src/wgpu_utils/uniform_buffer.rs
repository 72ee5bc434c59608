use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// A uniform buffer sized for exactly one `Content`.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Short type name used as the buffer label, e.g. `ModelUniform`.
    fn name() -> &'static str {
        let full = std::any::type_name::<Content>();
        full.rsplit("::").next().unwrap_or(full)
    }

    pub fn new(device: &wgpu::Device) -> Self {
        Self::new_with_data(device, &Content::zeroed())
    }

    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Buffer", Self::name())),
            contents: bytemuck::bytes_of(initial_content),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            buffer,
            content_type: PhantomData,
        }
    }

    /// Overwrites the whole buffer. Callers decide whether anything changed.
    pub fn write(&self, queue: &wgpu::Queue, content: &Content) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(content));
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
