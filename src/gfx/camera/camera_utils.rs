use cgmath::{Matrix4, Point3, SquareMatrix};

/// Maps OpenGL clip-space depth (`-1..1`) onto wgpu's `0..1`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Anything that can feed the view and projection uniforms.
pub trait Camera {
    fn eye_position(&self) -> Point3<f32>;
    fn view_matrix(&self) -> Matrix4<f32>;
    /// Projection in OpenGL clip-space convention.
    fn projection_matrix(&self) -> Matrix4<f32>;

    fn projection_uniform(&self) -> ProjectionUniform {
        ProjectionUniform {
            proj: convert_matrix4_to_array(OPENGL_TO_WGPU_MATRIX * self.projection_matrix()),
        }
    }

    fn view_uniform(&self) -> ViewUniform {
        let eye = self.eye_position();
        ViewUniform {
            view: convert_matrix4_to_array(self.view_matrix()),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct ProjectionUniform {
    pub proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct ViewUniform {
    pub view: [[f32; 4]; 4],

    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub eye: [f32; 4],
}

impl Default for ProjectionUniform {
    fn default() -> Self {
        Self {
            proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

impl Default for ViewUniform {
    fn default() -> Self {
        Self {
            view: convert_matrix4_to_array(Matrix4::identity()),
            eye: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_depth_remap() {
        let near = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(near.z, 0.0);
        assert_eq!(far.z, 1.0);
    }

    #[test]
    fn test_matrix_array_is_column_major() {
        let m = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0));
        let a = convert_matrix4_to_array(m);
        assert_eq!(a[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
