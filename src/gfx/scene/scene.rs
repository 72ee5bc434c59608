/// Single point light plus a global ambient term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub ambient: [f32; 3],
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            position: [10.0, 10.0, 10.0],
            color: [1.0, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.2],
        }
    }
}

/// GPU layout of the light, binding 2 of the frame bind group.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    _padding0: f32,
    pub color: [f32; 3],
    _padding1: f32,
    pub ambient: [f32; 3],
    _padding2: f32,
}

impl From<&Lighting> for LightUniform {
    fn from(lighting: &Lighting) -> Self {
        Self {
            position: lighting.position,
            _padding0: 0.0,
            color: lighting.color,
            _padding1: 0.0,
            ambient: lighting.ambient,
            _padding2: 0.0,
        }
    }
}

/// Everything in the world besides the model and the camera.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub lighting: Lighting,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn light_uniform(&self) -> LightUniform {
        LightUniform::from(&self.lighting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_uniform_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);

        let scene = Scene::new();
        let uniform = scene.light_uniform();
        assert_eq!(uniform.position, [10.0, 10.0, 10.0]);
        assert_eq!(uniform.ambient, [0.2, 0.2, 0.2]);
    }
}
