use super::free_camera::{FreeCamera, DEFAULT_STEP};

/// Continuous camera motions driven by held keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Forward,
    Backward,
    Left,
    Right,
    Ascend,
    Descend,
}

/// Turns held keys and mouse-look deltas into per-frame camera updates.
pub struct CameraController {
    pub step: f32,
    /// Mouse pixels per degree of rotation.
    pub sensitivity: f32,
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    ascend: bool,
    descend: bool,
    mouse_look: bool,
    pending_look: (f32, f32),
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(DEFAULT_STEP, 10.0)
    }
}

impl CameraController {
    pub fn new(step: f32, sensitivity: f32) -> Self {
        Self {
            step,
            sensitivity: sensitivity.max(f32::EPSILON),
            forward: false,
            backward: false,
            left: false,
            right: false,
            ascend: false,
            descend: false,
            mouse_look: false,
            pending_look: (0.0, 0.0),
        }
    }

    pub fn set_motion(&mut self, motion: Motion, active: bool) {
        match motion {
            Motion::Forward => self.forward = active,
            Motion::Backward => self.backward = active,
            Motion::Left => self.left = active,
            Motion::Right => self.right = active,
            Motion::Ascend => self.ascend = active,
            Motion::Descend => self.descend = active,
        }
    }

    /// Flips mouse look and returns the new state.
    pub fn toggle_mouse_look(&mut self) -> bool {
        self.mouse_look = !self.mouse_look;
        self.pending_look = (0.0, 0.0);
        log::debug!("Mouse look {}", if self.mouse_look { "on" } else { "off" });
        self.mouse_look
    }

    pub fn is_mouse_look(&self) -> bool {
        self.mouse_look
    }

    /// Accumulates raw mouse motion; ignored while mouse look is off.
    pub fn add_mouse_delta(&mut self, dx: f64, dy: f64) {
        if self.mouse_look {
            self.pending_look.0 += dx as f32;
            self.pending_look.1 += dy as f32;
        }
    }

    pub fn release_all(&mut self) {
        self.forward = false;
        self.backward = false;
        self.left = false;
        self.right = false;
        self.ascend = false;
        self.descend = false;
    }

    /// Applies one frame of motion and look. Returns true if the camera moved.
    pub fn apply(&mut self, camera: &mut FreeCamera) -> bool {
        let mut changed = false;

        let (dx, dy) = std::mem::take(&mut self.pending_look);
        if self.mouse_look && (dx != 0.0 || dy != 0.0) {
            camera.add_yaw(dx / self.sensitivity);
            camera.add_pitch(-dy / self.sensitivity);
            changed = true;
        }

        let step = self.step;
        let moves: [(bool, fn(&mut FreeCamera, f32)); 6] = [
            (self.forward, FreeCamera::move_forward),
            (self.backward, FreeCamera::move_backward),
            (self.left, FreeCamera::move_left),
            (self.right, FreeCamera::move_right),
            (self.ascend, FreeCamera::move_up),
            (self.descend, FreeCamera::move_down),
        ];

        for (active, movement) in moves {
            if active {
                movement(camera, step);
                changed = true;
            }
        }

        changed
    }
}
