/// Node transform component
///
/// Every drawable entity owns a `Node`. The world matrix is derived from five
/// inputs and is recomputed eagerly by every setter, so a node can be read at
/// any point of the tick without a stale matrix.
///
/// Composition order (applied to a model-space point):
/// relative rotation -> translate(origin) -> rotation -> scale -> translate(position)

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Build a rotation from a (yaw, pitch, roll) vector.
/// x = yaw about Y, y = pitch about X, z = roll about Z.
pub fn yaw_pitch_roll(angles: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, angles.x, angles.y, angles.z)
}

/// Compose the world matrix from the five node inputs.
pub fn compose(
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    origin: Vec3,
    relative_rotation: Vec3,
) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_scale(scale)
        * Mat4::from_quat(yaw_pitch_roll(rotation))
        * Mat4::from_translation(origin)
        * Mat4::from_quat(yaw_pitch_roll(relative_rotation))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    position: Vec3,
    rotation: Vec3,
    relative_rotation: Vec3,
    origin: Vec3,
    scale: Vec3,
    matrix: Mat4,
}

impl Node {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            relative_rotation: Vec3::ZERO,
            origin: Vec3::ZERO,
            scale: Vec3::ONE,
            matrix: Mat4::IDENTITY,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new().with_position(position)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_relative_rotation(mut self, relative_rotation: Vec3) -> Self {
        self.set_relative_rotation(relative_rotation);
        self
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.set_origin(origin);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn relative_rotation(&self) -> Vec3 {
        self.relative_rotation
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recompute();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.recompute();
    }

    pub fn set_relative_rotation(&mut self, relative_rotation: Vec3) {
        self.relative_rotation = relative_rotation;
        self.recompute();
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
        self.recompute();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.recompute();
    }

    /// Current world transformation matrix
    pub fn world_matrix(&self) -> Mat4 {
        self.matrix
    }

    /// World-space translation of the node (the matrix's translation column)
    pub fn translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Orient the node so its -Z axis points along `forward`.
    ///
    /// Expressed as a yaw/pitch rotation so the matrix keeps the standard
    /// composition. A zero vector leaves the rotation untouched.
    pub fn face_direction(&mut self, forward: Vec3) {
        let forward = forward.normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let pitch = forward.y.clamp(-1.0, 1.0).asin();
        let yaw = (-forward.x).atan2(-forward.z);
        self.set_rotation(Vec3::new(yaw, pitch, 0.0));
    }

    fn recompute(&mut self) {
        self.matrix = compose(
            self.position,
            self.rotation,
            self.scale,
            self.origin,
            self.relative_rotation,
        );
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
