//! Keyboard bindings.
//!
//! | key                 | command                         |
//! |---------------------|---------------------------------|
//! | arrows              | rotate the object 10°           |
//! | I / K / J / L       | move the object up/down/left/right |
//! | W / A / S / D       | fly forward/left/back/right     |
//! | Left Shift or E     | fly up                          |
//! | Left Ctrl or Q      | fly down                        |
//! | O                   | reload the current OBJ file     |
//! | Space               | toggle mouse look               |
//! | Escape              | quit                            |

use winit::{event::ElementState, keyboard::KeyCode};

use crate::gfx::camera::camera_controller::Motion;

/// Object rotation axes in model space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDir {
    /// Up arrow, about +X.
    Up,
    /// Down arrow, about -X.
    Down,
    /// Left arrow, about +Y.
    Left,
    /// Right arrow, about -Y.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateDir {
    Up,
    Down,
    Left,
    Right,
}

/// What a key event asks the studio to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RotateObject(RotateDir),
    TranslateObject(TranslateDir),
    /// Start (`true`) or stop a held camera motion.
    Move(Motion, bool),
    ReloadObject,
    ToggleMouseLook,
    Quit,
}

/// Maps a physical key event to a command.
///
/// Object commands fire on press and on auto-repeat. Motions fire on press
/// and release, ignoring repeats. Toggles fire once per press.
pub fn command_for_key(key: KeyCode, state: ElementState, repeat: bool) -> Option<Command> {
    let pressed = state == ElementState::Pressed;

    if let Some(motion) = motion_for_key(key) {
        return (!repeat).then_some(Command::Move(motion, pressed));
    }

    if !pressed {
        return None;
    }

    let command = match key {
        KeyCode::ArrowUp => Command::RotateObject(RotateDir::Up),
        KeyCode::ArrowDown => Command::RotateObject(RotateDir::Down),
        KeyCode::ArrowLeft => Command::RotateObject(RotateDir::Left),
        KeyCode::ArrowRight => Command::RotateObject(RotateDir::Right),
        KeyCode::KeyI => Command::TranslateObject(TranslateDir::Up),
        KeyCode::KeyK => Command::TranslateObject(TranslateDir::Down),
        KeyCode::KeyJ => Command::TranslateObject(TranslateDir::Left),
        KeyCode::KeyL => Command::TranslateObject(TranslateDir::Right),
        KeyCode::KeyO if !repeat => Command::ReloadObject,
        KeyCode::Space if !repeat => Command::ToggleMouseLook,
        KeyCode::Escape => Command::Quit,
        _ => return None,
    };

    Some(command)
}

fn motion_for_key(key: KeyCode) -> Option<Motion> {
    match key {
        KeyCode::KeyW => Some(Motion::Forward),
        KeyCode::KeyS => Some(Motion::Backward),
        KeyCode::KeyA => Some(Motion::Left),
        KeyCode::KeyD => Some(Motion::Right),
        KeyCode::ShiftLeft | KeyCode::KeyE => Some(Motion::Ascend),
        KeyCode::ControlLeft | KeyCode::KeyQ => Some(Motion::Descend),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESS: ElementState = ElementState::Pressed;
    const RELEASE: ElementState = ElementState::Released;

    #[test]
    fn test_motion_keys_press_and_release() {
        assert_eq!(
            command_for_key(KeyCode::KeyW, PRESS, false),
            Some(Command::Move(Motion::Forward, true))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyW, RELEASE, false),
            Some(Command::Move(Motion::Forward, false))
        );
        assert_eq!(command_for_key(KeyCode::KeyW, PRESS, true), None);
    }

    #[test]
    fn test_ascend_and_descend_have_two_keys() {
        for key in [KeyCode::ShiftLeft, KeyCode::KeyE] {
            assert_eq!(
                command_for_key(key, PRESS, false),
                Some(Command::Move(Motion::Ascend, true))
            );
        }
        for key in [KeyCode::ControlLeft, KeyCode::KeyQ] {
            assert_eq!(
                command_for_key(key, PRESS, false),
                Some(Command::Move(Motion::Descend, true))
            );
        }
    }

    #[test]
    fn test_object_keys_repeat() {
        assert_eq!(
            command_for_key(KeyCode::ArrowLeft, PRESS, true),
            Some(Command::RotateObject(RotateDir::Left))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyJ, PRESS, true),
            Some(Command::TranslateObject(TranslateDir::Left))
        );
        assert_eq!(command_for_key(KeyCode::ArrowLeft, RELEASE, false), None);
    }

    #[test]
    fn test_toggles_ignore_repeat() {
        assert_eq!(
            command_for_key(KeyCode::Space, PRESS, false),
            Some(Command::ToggleMouseLook)
        );
        assert_eq!(command_for_key(KeyCode::Space, PRESS, true), None);
        assert_eq!(
            command_for_key(KeyCode::KeyO, PRESS, false),
            Some(Command::ReloadObject)
        );
        assert_eq!(command_for_key(KeyCode::KeyO, PRESS, true), None);
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(command_for_key(KeyCode::KeyZ, PRESS, false), None);
    }
}
