use glam::{Mat4, Quat, Vec3};

use crate::config::{CameraConfigData, CameraMode};
use crate::field::ProjectileLaunch;
use crate::input::{Action, InputManager};

/// Perspective projection from a horizontal field of view in radians
pub fn perspective_horizontal(fov_x: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    let aspect_ratio = aspect_ratio.max(f32::EPSILON);
    let fov_y = 2.0 * ((fov_x * 0.5).tan() / aspect_ratio).atan();
    Mat4::perspective_rh(fov_y, aspect_ratio, near, far)
}

/// Lens settings shared by both rigs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Horizontal field of view in radians
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Lens {
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        perspective_horizontal(self.fov, aspect_ratio, self.near_plane, self.far_plane)
    }
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_2,
            near_plane: 1.0,
            far_plane: 1000.0,
        }
    }
}

/// Camera fixed at a point, looking at a target
#[derive(Debug, Clone, PartialEq)]
pub struct StaticCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub lens: Lens,
}

impl StaticCamera {
    pub fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            target,
            up,
            lens: Lens::default(),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Flight tuning for the free camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSettings {
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub move_speed: f32,
    /// Pitch input is ignored once |direction.y| reaches this
    pub pitch_limit: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_scale: f32,
}

impl From<&CameraConfigData> for FlightSettings {
    fn from(data: &CameraConfigData) -> Self {
        Self {
            yaw_speed: data.yaw_speed,
            pitch_speed: data.pitch_speed,
            move_speed: data.move_speed,
            pitch_limit: data.pitch_limit,
            min_height: data.min_height,
            max_height: data.max_height,
            projectile_speed: data.projectile_speed,
            projectile_lifetime: data.projectile_lifetime,
            projectile_scale: data.projectile_scale,
        }
    }
}

/// Free-flying camera steered by pointer motion and movement keys
#[derive(Debug, Clone, PartialEq)]
pub struct FlyingCamera {
    position: Vec3,
    /// Unit look direction
    direction: Vec3,
    up: Vec3,
    pub lens: Lens,
    pub settings: FlightSettings,
}

impl FlyingCamera {
    pub fn new(position: Vec3, direction: Vec3, settings: FlightSettings) -> Self {
        let direction = match direction.try_normalize() {
            Some(d) => d,
            None => Vec3::NEG_Z,
        };
        Self {
            position,
            direction,
            up: Vec3::Y,
            lens: Lens::default(),
            settings,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Left of the look direction
    pub fn left(&self) -> Vec3 {
        self.up.cross(self.direction).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    /// Turn by raw pointer deltas (x right, y down) over `dt` seconds
    pub fn steer(&mut self, dx: f32, dy: f32, dt: f32) {
        let yaw = Quat::from_axis_angle(self.up, dt * -dx * self.settings.yaw_speed);
        self.direction = (yaw * self.direction).normalize_or_zero();

        let y = self.direction.y;
        let limit = self.settings.pitch_limit;
        // Negative dy looks up
        if (y < limit && dy < 0.0) || (y > -limit && dy > 0.0) {
            let left = self.left();
            if left != Vec3::ZERO {
                // Positive angles about `left` lower the view
                let current = y.clamp(-1.0, 1.0).asin();
                let bound = limit.clamp(0.0, 1.0).asin();
                let target = (current - dt * dy * self.settings.pitch_speed).clamp(-bound, bound);
                let pitch = Quat::from_axis_angle(left, current - target);
                self.direction = (pitch * self.direction).normalize_or_zero();
            }
        }
    }

    /// Apply one tick of input; returns the projectile to launch, if fired
    pub fn update(&mut self, input: &mut InputManager, dt: f32) -> Option<ProjectileLaunch> {
        let delta = input.take_pointer_delta();
        self.steer(delta.x, delta.y, dt);

        let step = self.settings.move_speed * dt;
        let left = self.left();
        if input.is_held(Action::MoveForward) {
            self.position += self.direction * step;
        }
        if input.is_held(Action::MoveBackward) {
            self.position -= self.direction * step;
        }
        if input.is_held(Action::StrafeLeft) {
            self.position += left * step;
        }
        if input.is_held(Action::StrafeRight) {
            self.position -= left * step;
        }
        self.position.y = self.position.y.clamp(self.settings.min_height, self.settings.max_height);

        input.was_pressed(Action::Fire).then(|| self.launch())
    }

    /// Projectile leaving the camera along its look direction
    pub fn launch(&self) -> ProjectileLaunch {
        ProjectileLaunch {
            position: self.position,
            direction: self.direction,
            speed: self.settings.projectile_speed,
            lifetime: self.settings.projectile_lifetime,
            scale: self.settings.projectile_scale,
        }
    }
}

/// The camera driving the view
#[derive(Debug, Clone, PartialEq)]
pub enum CameraRig {
    Static(StaticCamera),
    Flying(FlyingCamera),
}

impl CameraRig {
    pub fn eye(&self) -> Vec3 {
        match self {
            CameraRig::Static(cam) => cam.eye,
            CameraRig::Flying(cam) => cam.position(),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        match self {
            CameraRig::Static(cam) => cam.view_matrix(),
            CameraRig::Flying(cam) => cam.view_matrix(),
        }
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        match self {
            CameraRig::Static(cam) => cam.lens.projection_matrix(aspect_ratio),
            CameraRig::Flying(cam) => cam.lens.projection_matrix(aspect_ratio),
        }
    }

    /// A static camera ignores input and never fires
    pub fn update(&mut self, input: &mut InputManager, dt: f32) -> Option<ProjectileLaunch> {
        match self {
            CameraRig::Static(_) => {
                input.take_pointer_delta();
                None
            }
            CameraRig::Flying(cam) => cam.update(input, dt),
        }
    }
}

impl From<&CameraConfigData> for CameraRig {
    fn from(data: &CameraConfigData) -> Self {
        let lens = Lens {
            fov: data.fov.to_radians(),
            near_plane: data.near_plane,
            far_plane: data.far_plane,
        };
        match data.mode {
            CameraMode::Static => CameraRig::Static(StaticCamera {
                lens,
                ..StaticCamera::new(data.position, data.target, data.up)
            }),
            CameraMode::Flying => {
                let mut cam = FlyingCamera::new(data.position, data.target - data.position, data.into());
                cam.lens = lens;
                CameraRig::Flying(cam)
            }
        }
    }
}
