use glam::{Mat4, Vec3};

const WORLD_UP: Vec3 = Vec3::Y;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Pitch is kept short of straight up/down so `front` never lines up with `WORLD_UP`.
pub const MAX_PITCH: f32 = 89.0;
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 45.0;

const DEFAULT_EYE: Vec3 = Vec3::new(0.0, 0.0, 3.0);
const DEFAULT_SPEED: f32 = 0.25;
const DEFAULT_SENSITIVITY: f32 = 0.05;

/// Free-fly camera steered by absolute cursor positions, angles in degrees.
#[derive(Clone, Debug)]
pub struct Camera {
    yaw: f32,
    pitch: f32,
    first_mouse: bool,
    speed: f32,
    sensitivity: f32,
    last_x: f32,
    last_y: f32,

    position: Vec3,
    front: Vec3,
    up: Vec3,

    fov: f32,
    aspect: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Camera at `(0, 0, 3)` looking down `-z` with a 45° vertical field of view.
    pub fn new(width: f32, height: f32) -> Self {
        let aspect = aspect_ratio(width, height);
        Self {
            yaw: -90.0,
            pitch: 0.0,
            first_mouse: true,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            last_x: 0.0,
            last_y: 0.0,

            position: DEFAULT_EYE,
            front: Vec3::NEG_Z,
            up: WORLD_UP,

            fov: MAX_FOV,
            aspect,
            view: Mat4::look_at_rh(DEFAULT_EYE, Vec3::ZERO, WORLD_UP),
            projection: perspective(MAX_FOV, aspect),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov.clamp(MIN_FOV, MAX_FOV);
        self.projection = perspective(self.fov, self.aspect);
        self
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Projection sharing this camera's aspect and clip planes but a different fov.
    pub fn projection_with_fov(&self, fov: f32) -> Mat4 {
        perspective(fov, self.aspect)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Overwrites the view matrix only. The next [`Camera::recalculate_view`] goes back
    /// to position/front/up.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.view = Mat4::look_at_rh(eye, target, up);
    }

    pub fn recalculate_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.front, self.up);
    }

    pub fn move_front(&mut self) {
        self.position += self.front * self.speed;
    }

    pub fn move_back(&mut self) {
        self.position -= self.front * self.speed;
    }

    pub fn move_right(&mut self) {
        self.position += self.right() * self.speed;
    }

    pub fn move_left(&mut self) {
        self.position -= self.right() * self.speed;
    }

    pub fn move_up(&mut self) {
        self.position += self.up * self.speed;
    }

    pub fn move_down(&mut self) {
        self.position -= self.up * self.speed;
    }

    fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Turns the camera by the cursor's travel since the last call. The first call only
    /// records where the cursor is.
    pub fn update_by_mouse_position(&mut self, x: f32, y: f32) {
        if self.first_mouse {
            self.last_x = x;
            self.last_y = y;
            self.first_mouse = false;
        }

        // screen y grows downwards
        let offset_x = (x - self.last_x) * self.sensitivity;
        let offset_y = (self.last_y - y) * self.sensitivity;
        self.last_x = x;
        self.last_y = y;

        self.yaw += offset_x;
        self.pitch = (self.pitch + offset_y).clamp(-MAX_PITCH, MAX_PITCH);

        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        let right = self.front.cross(WORLD_UP).normalize();
        self.up = right.cross(self.front).normalize();
    }

    /// Scrolling up narrows the field of view.
    pub fn zoom(&mut self, scroll: f32) {
        self.fov = (self.fov - scroll).clamp(MIN_FOV, MAX_FOV);
        self.projection = perspective(self.fov, self.aspect);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.aspect = aspect_ratio(width, height);
        self.projection = perspective(self.fov, self.aspect);
    }
}

fn aspect_ratio(width: f32, height: f32) -> f32 {
    width.max(1.0) / height.max(1.0)
}

fn perspective(fov: f32, aspect: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov.to_radians(), aspect, Z_NEAR, Z_FAR)
}
