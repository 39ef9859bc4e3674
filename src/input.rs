use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{camera::Camera, scene::RotationState};

/// Key code of a press or auto-repeat; releases and unidentified keys give `None`.
pub fn pressed_key(event: &KeyEvent) -> Option<KeyCode> {
    match (event.state, event.physical_key) {
        (ElementState::Pressed, PhysicalKey::Code(code)) => Some(code),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CameraMove {
    Front,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl CameraMove {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(CameraMove::Front),
            KeyCode::KeyS => Some(CameraMove::Back),
            KeyCode::KeyA => Some(CameraMove::Left),
            KeyCode::KeyD => Some(CameraMove::Right),
            KeyCode::Space => Some(CameraMove::Up),
            KeyCode::ControlLeft => Some(CameraMove::Down),
            _ => None,
        }
    }

    pub fn apply(self, camera: &mut Camera) {
        match self {
            CameraMove::Front => camera.move_front(),
            CameraMove::Back => camera.move_back(),
            CameraMove::Left => camera.move_left(),
            CameraMove::Right => camera.move_right(),
            CameraMove::Up => camera.move_up(),
            CameraMove::Down => camera.move_down(),
        }
    }
}

/// Keys that manipulate the selected object. Any other key clears the pending state.
pub fn object_rotation(key: KeyCode) -> RotationState {
    match key {
        KeyCode::KeyW => RotationState::Top,
        KeyCode::KeyS => RotationState::Down,
        KeyCode::KeyA => RotationState::Left,
        KeyCode::KeyD => RotationState::Right,
        KeyCode::KeyR => RotationState::RightTop,
        KeyCode::KeyE => RotationState::LeftDown,
        KeyCode::KeyI => RotationState::ZoomIn,
        KeyCode::KeyO => RotationState::ZoomOut,
        _ => RotationState::None,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn wasd_moves_camera() {
        let mut camera = Camera::new(800.0, 600.0).with_speed(1.0);
        for key in [KeyCode::KeyW, KeyCode::KeyD, KeyCode::Space] {
            CameraMove::from_key(key).unwrap().apply(&mut camera);
        }
        assert!((camera.position() - Vec3::new(1.0, 1.0, 2.0)).length() < 1e-6);
        assert_eq!(CameraMove::from_key(KeyCode::KeyR), None);
        assert_eq!(
            CameraMove::from_key(KeyCode::ControlLeft),
            Some(CameraMove::Down)
        );
    }

    #[test]
    fn object_keys_map_to_rotations() {
        assert_eq!(object_rotation(KeyCode::KeyW), RotationState::Top);
        assert_eq!(object_rotation(KeyCode::KeyE), RotationState::LeftDown);
        assert_eq!(object_rotation(KeyCode::KeyO), RotationState::ZoomOut);
        assert_eq!(object_rotation(KeyCode::KeyQ), RotationState::None);
    }
}
