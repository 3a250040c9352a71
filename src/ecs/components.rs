/// Core ECS components for solar system entities
///
/// Entities are composed rather than inherited: every drawable entity has a
/// `Node` transform plus a `Visual`, and gains behaviour by carrying
/// `Orbiting`, `Kinetic` or `SpriteAnimation`.

use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::assets::{ModelHandle, SpriteSheet, TextureHandle};

/// Cosmetic tumble added to kinetic entities on every update (yaw, pitch, roll)
pub const KINETIC_SPIN_STEP: Vec3 = Vec3::new(12.0 / 60.0, 0.0, 26.0 / 60.0);

/// Tag component for the different entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Star,
    Planet,
    Moon,
    Backdrop,
    Asteroid,
    Projectile,
    Debris,
    Explosion,
}

/// Display name, used for logging
#[derive(Debug, Clone)]
pub struct Name(pub String);

/// Visual representation component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visual {
    pub model: ModelHandle,
    pub texture: TextureHandle,
}

/// Angular-rate driven orbit
///
/// `orbit` is added to the node rotation and `spin` to the relative rotation,
/// both in radians per second. Satellites are owned exclusively by this body
/// and are only updated and drawn through it.
#[derive(Debug, Clone, Default)]
pub struct Orbiting {
    pub spin: Vec3,
    pub orbit: Vec3,
    pub satellites: Vec<Entity>,
}

impl Orbiting {
    pub fn new(spin: Vec3, orbit: Vec3) -> Self {
        Self {
            spin,
            orbit,
            satellites: Vec::new(),
        }
    }

    /// Stop all angular motion
    pub fn freeze(&mut self) {
        self.spin = Vec3::ZERO;
        self.orbit = Vec3::ZERO;
    }
}

/// Marks an entity as the satellite of another orbiting body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteOf(pub Entity);

/// Straight-line motion with a finite lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinetic {
    /// Unit direction of travel
    pub direction: Vec3,
    /// Units per second
    pub speed: f32,
    /// Seconds lived so far
    pub elapsed: f32,
    /// Lifetime after which the owning pool removes the entity
    pub despawn_after: f32,
}

impl Kinetic {
    pub fn new(direction: Vec3, speed: f32, despawn_after: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            speed,
            elapsed: 0.0,
            despawn_after,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.despawn_after
    }
}

/// Frame-by-frame sprite sequence played once over a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteAnimation {
    pub sheet: SpriteSheet,
    pub frame_ms: f32,
    pub elapsed_ms: f32,
}

/// Pixel rectangle of a single sprite frame inside its sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
