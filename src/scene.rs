//! Object placement and keyboard manipulation for the configured scene.
//!
//! Selection id `0` is the camera; every non-orbiting object gets the next id in
//! configuration order. Tab walks through the ids.

use std::mem;

use glam::{Mat4, Vec3};

use crate::{
    camera::{self, Camera},
    config::{ObjectConfig, OrbitConfig},
};

pub const CAMERA_ID: usize = 0;

/// Degrees added per rotation key press.
const ROTATION_STEP: f32 = 45.0;
const ZOOM_STEP: f32 = 0.5;
const MAX_OBJECT_FOV: f32 = 120.0;

/// Pending manipulation for the selected object, consumed on the next frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RotationState {
    #[default]
    None,
    Top,
    Down,
    Left,
    Right,
    RightTop,
    LeftDown,
    ZoomIn,
    ZoomOut,
}

impl RotationState {
    fn axis(self) -> Option<Vec3> {
        match self {
            RotationState::Top => Some(Vec3::X),
            RotationState::Down => Some(Vec3::NEG_X),
            RotationState::Left => Some(Vec3::Y),
            RotationState::Right => Some(Vec3::NEG_Y),
            RotationState::RightTop => Some(Vec3::new(-1.0, -1.0, 0.0)),
            RotationState::LeftDown => Some(Vec3::new(1.0, 1.0, 0.0)),
            RotationState::None | RotationState::ZoomIn | RotationState::ZoomOut => None,
        }
    }
}

/// Circular path around the y axis. The angle doubles as a spin in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    pub radius: f32,
    pub height: f32,
    pub step: f32,
    angle: f32,
}

impl From<OrbitConfig> for Orbit {
    fn from(config: OrbitConfig) -> Self {
        Self {
            radius: config.radius,
            height: config.height,
            step: config.step,
            angle: 0.0,
        }
    }
}

impl Orbit {
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn advance(&mut self) {
        self.angle += self.step;
        if self.angle > 360.0 {
            self.angle -= 360.0;
        }
    }

    pub fn transform(&self) -> Mat4 {
        let translation = Vec3::new(
            self.radius * self.angle.cos(),
            self.height,
            self.radius * self.angle.sin(),
        );
        Mat4::from_translation(translation) * Mat4::from_rotation_y(self.angle.to_radians())
    }
}

#[derive(Clone, Debug)]
pub struct Placement {
    /// `None` for objects that orbit.
    id: Option<usize>,
    position: Vec3,
    scale: Vec3,
    rotation: f32,
    user_rotation: Mat4,
    zoom: f32,
    orbit: Option<Orbit>,
}

impl Placement {
    pub fn new(id: Option<usize>, config: &ObjectConfig) -> Self {
        Self {
            id,
            position: config.position,
            scale: config.scale,
            rotation: config.rotation,
            user_rotation: Mat4::IDENTITY,
            zoom: 0.0,
            orbit: config.orbit.map(Orbit::from),
        }
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Orbiting objects ignore their configured position and rotation.
    pub fn model(&self) -> Mat4 {
        let scale = Mat4::from_scale(self.scale);
        match &self.orbit {
            Some(orbit) => orbit.transform() * scale,
            None => {
                Mat4::from_translation(self.position)
                    * self.user_rotation
                    * Mat4::from_rotation_y(self.rotation.to_radians())
                    * scale
            }
        }
    }

    /// A zoomed object gets its own projection; the others share the camera's.
    pub fn projection(&self, camera: &Camera) -> Mat4 {
        if self.zoom == 0.0 {
            camera.projection()
        } else {
            camera.projection_with_fov(
                (camera::MAX_FOV - self.zoom).clamp(camera::MIN_FOV, MAX_OBJECT_FOV),
            )
        }
    }

    pub fn apply(&mut self, state: RotationState) {
        if let Some(axis) = state.axis() {
            self.user_rotation *=
                Mat4::from_axis_angle(axis.normalize(), ROTATION_STEP.to_radians());
        }
        match state {
            RotationState::ZoomIn => self.zoom += ZOOM_STEP,
            RotationState::ZoomOut => self.zoom -= ZOOM_STEP,
            _ => (),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    placements: Vec<Placement>,
    selected: usize,
    selectable: usize,
    pending: RotationState,
}

impl Scene {
    pub fn new(objects: &[ObjectConfig]) -> Self {
        let mut next_id = CAMERA_ID;
        let placements: Vec<Placement> = objects
            .iter()
            .map(|object| {
                let id = object.orbit.is_none().then(|| {
                    next_id += 1;
                    next_id
                });
                Placement::new(id, object)
            })
            .collect();
        Self {
            placements,
            selected: CAMERA_ID,
            selectable: next_id + 1,
            pending: RotationState::None,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn camera_selected(&self) -> bool {
        self.selected == CAMERA_ID
    }

    pub fn pending(&self) -> RotationState {
        self.pending
    }

    /// Moves the selection to the next id and forgets every object's zoom.
    pub fn cycle_selection(&mut self) -> usize {
        self.selected = (self.selected + 1) % self.selectable;
        self.pending = RotationState::None;
        for placement in &mut self.placements {
            placement.zoom = 0.0;
        }
        log::debug!("selected object {}", self.selected);
        self.selected
    }

    /// Queues a manipulation for the selected object; a newer one replaces it.
    pub fn request(&mut self, state: RotationState) {
        if !self.camera_selected() {
            self.pending = state;
        }
    }

    /// Applies the pending manipulation once and advances every orbit by a step.
    pub fn update(&mut self) {
        let pending = mem::take(&mut self.pending);
        for placement in &mut self.placements {
            if let Some(orbit) = &mut placement.orbit {
                orbit.advance();
            } else if placement.id == Some(self.selected) {
                placement.apply(pending);
            }
        }
    }
}
