//! Phong material and the per-object uniform it is uploaded in.
//!
//! The material shares a uniform buffer with the model matrix, so any change
//! to either re-sends the whole [`ModelUniform`].

use cgmath::Matrix4;

use crate::gfx::camera::camera_utils::convert_matrix4_to_array;

/// Phong reflection coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.6; 3],
            diffuse: [0.5; 3],
            specular: [0.5; 3],
            shininess: 5.0,
        }
    }
}

impl Material {
    pub const MIN_SHININESS: f32 = 1.0;
    pub const MAX_SHININESS: f32 = 50.0;
}

/// GPU layout of bind group 1: model matrix plus material.
///
/// Matches `ModelUniform` in `shader.wgsl` (112 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub ambient: [f32; 3],
    pub shininess: f32,
    pub diffuse: [f32; 3],
    /// Non-zero when the texture should be sampled.
    pub use_texture: u32,
    pub specular: [f32; 3],
    _padding: f32,
}

impl ModelUniform {
    /// Shininess is clamped to the material range.
    pub fn new(model: Matrix4<f32>, material: &Material, use_texture: bool) -> Self {
        Self {
            model: convert_matrix4_to_array(model),
            ambient: material.ambient,
            shininess: material
                .shininess
                .clamp(Material::MIN_SHININESS, Material::MAX_SHININESS),
            diffuse: material.diffuse,
            use_texture: use_texture as u32,
            specular: material.specular,
            _padding: 0.0,
        }
    }
}
