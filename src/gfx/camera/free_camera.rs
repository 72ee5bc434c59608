//! # Free-Flying Camera
//!
//! First-person camera driven by yaw/pitch angles and translations, with a
//! perspective or oblique-parallel projection.
//!
//! The camera keeps everything in OpenGL clip-space convention; the depth
//! remap for wgpu happens when the projection uniform is built (see
//! [`Camera::projection_uniform`]).

use cgmath::*;

use super::camera_utils::Camera;

pub const NEAR_PLANE: f32 = 0.1;
pub const DEFAULT_STEP: f32 = 0.05;

const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Wraps an angle in degrees into `[0, 360)`.
fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Which projection the camera uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    /// Orthographic box with an optional oblique shear.
    Oblique,
}

impl ProjectionMode {
    pub const LABELS: [&'static str; 2] = ["Perspective", "Parallel"];

    pub fn index(self) -> usize {
        match self {
            ProjectionMode::Perspective => 0,
            ProjectionMode::Oblique => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            1 => ProjectionMode::Oblique,
            _ => ProjectionMode::Perspective,
        }
    }
}

/// Projection parameters edited by the GUI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub mode: ProjectionMode,
    /// Field of view in degrees (perspective only).
    pub fov: f32,
    pub far: f32,
    /// Half extent of the parallel view volume.
    pub top: f32,
    pub oblique_scale: f32,
    /// Shear direction in radians.
    pub oblique_angle: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fov: 60.0,
            far: 500.0,
            top: 1.0,
            oblique_scale: 0.0,
            oblique_angle: Rad::from(Deg(45.0f32)).0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FreeCamera {
    pub eye: Point3<f32>,
    pub center: Point3<f32>,
    pub up: Vector3<f32>,
    /// Degrees in `[0, 360)`.
    pub yaw: f32,
    /// Degrees in `[0, 360)`.
    pub pitch: f32,
    pub projection: Projection,
    pub aspect: f32,
}

impl Camera for FreeCamera {
    fn eye_position(&self) -> Point3<f32> {
        self.eye
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.center, self.up)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        let p = &self.projection;
        let far = p.far.max(NEAR_PLANE + 0.01);

        match p.mode {
            ProjectionMode::Perspective => {
                // Vertical fov is fov * aspect, kept inside (0, 180).
                let fovy = (p.fov * self.aspect).clamp(1.0, 179.0);
                perspective(Deg(fovy), self.aspect, NEAR_PLANE, far)
            }
            ProjectionMode::Oblique => {
                let top = p.top.max(f32::EPSILON);
                let parallel = ortho(-top, top, -top, top, NEAR_PLANE, far);
                oblique_shear(p.oblique_scale, p.oblique_angle) * parallel
            }
        }
    }
}

/// Shear that maps depth onto x/y; identity when `scale == 0`.
pub fn oblique_shear(scale: f32, angle: f32) -> Matrix4<f32> {
    let mut shear = Matrix4::identity();
    if scale != 0.0 {
        shear[2][0] = scale * angle.cos();
        shear[2][1] = scale * angle.sin();
    }
    shear
}

impl FreeCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: Point3::new(0.0, 0.0, 2.0),
            center: Point3::new(0.0, 0.0, 1.0),
            up: WORLD_UP,
            yaw: 270.0,
            pitch: 0.0,
            projection: Projection::default(),
            aspect: 1.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Restores the default pose and projection, keeping the aspect ratio.
    pub fn reset(&mut self) {
        let aspect = self.aspect;
        *self = Self {
            aspect,
            ..Self::new(1, 1)
        };
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw = wrap_degrees(self.yaw + delta);
        self.update_direction();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = wrap_degrees(self.pitch + delta);
        self.update_direction();
    }

    /// Re-derives `center` and `up` from the current yaw and pitch.
    pub fn update_direction(&mut self) {
        let (yaw, pitch) = (Rad::from(Deg(self.yaw)), Rad::from(Deg(self.pitch)));
        let forward = Vector3::new(
            yaw.0.cos() * pitch.0.cos(),
            pitch.0.sin(),
            yaw.0.sin() * pitch.0.cos(),
        )
        .normalize();

        self.center = self.eye + forward;

        // Looking straight up or down: try the previous up, then the yaw heading.
        let side = [forward.cross(WORLD_UP), forward.cross(self.up)]
            .into_iter()
            .find(|side| side.magnitude2() > 1e-8)
            .unwrap_or_else(|| Vector3::new(-yaw.0.sin(), 0.0, yaw.0.cos()));

        self.up = side.cross(forward).normalize();
    }

    /// Moves eye and center by the same offset.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.eye += offset;
        self.center += offset;
    }

    /// Unit vector from eye towards center.
    pub fn forward(&self) -> Vector3<f32> {
        let dir = self.center - self.eye;
        if dir.magnitude2() > 0.0 {
            dir.normalize()
        } else {
            -Vector3::unit_z()
        }
    }

    /// Unit vector to the right of the view direction.
    pub fn right(&self) -> Vector3<f32> {
        let right = (self.center - self.eye).cross(self.up);
        if right.magnitude2() > 0.0 {
            right.normalize()
        } else {
            Vector3::unit_x()
        }
    }

    pub fn move_forward(&mut self, step: f32) {
        self.translate(self.forward() * step);
    }

    pub fn move_backward(&mut self, step: f32) {
        self.translate(-self.forward() * step);
    }

    pub fn move_right(&mut self, step: f32) {
        self.translate(self.right() * step);
    }

    pub fn move_left(&mut self, step: f32) {
        self.translate(-self.right() * step);
    }

    pub fn move_up(&mut self, step: f32) {
        self.translate(self.up * step);
    }

    pub fn move_down(&mut self, step: f32) {
        self.translate(-self.up * step);
    }
}
