/// ECS world initialization helpers
///
/// Provides functions to create the solar system bodies and the transient
/// entities of the asteroid field.

use glam::Vec3;
use hecs::{Entity, World};

use super::components::*;
use super::effects::EXPLOSION_FRAME_MS;
use super::hierarchy::OrbitHierarchy;
use super::transform::Node;
use crate::assets::{AssetLoader, ModelHandle, SpriteSheet};
use crate::error::SimResult;

pub const SPHERE_MODEL: &str = "models/sphere";
pub const ASTEROID_MODELS: [&str; 2] = ["models/asteroid1", "models/asteroid2"];
pub const BILLBOARD_MODEL: &str = "models/cube10ur";
pub const ASTEROID_TEXTURE: &str = "textures/meteor1";
pub const PROJECTILE_TEXTURE: &str = "textures/earthmap";
pub const EXPLOSION_SHEET: &str = "textures/explosion";

/// Description of one body of the default solar system
#[derive(Debug, Clone, Copy)]
pub struct BodyTemplate {
    pub name: &'static str,
    pub kind: EntityKind,
    pub texture: &'static str,
    pub scale: Vec3,
    pub spin: Vec3,
    pub orbit: Vec3,
    pub origin: Vec3,
}

impl BodyTemplate {
    const fn planet(name: &'static str, texture: &'static str, scale: f32, rate: f32, distance: f32) -> Self {
        Self {
            name,
            kind: EntityKind::Planet,
            texture,
            scale: Vec3::splat(scale),
            spin: Vec3::new(rate, 0.0, 0.0),
            orbit: Vec3::new(rate, 0.0, 0.0),
            origin: Vec3::new(distance, 0.0, 0.0),
        }
    }
}

pub const SUN: BodyTemplate = BodyTemplate {
    kind: EntityKind::Star,
    ..BodyTemplate::planet("Sun", "textures/sun", 1.5, 0.5, 0.0)
};
pub const MERCURY: BodyTemplate = BodyTemplate::planet("Mercury", "textures/mercury", 0.4, 0.7, 7.0);
pub const VENUS: BodyTemplate = BodyTemplate::planet("Venus", "textures/venus", 0.6, 0.4, 8.0);
pub const EARTH: BodyTemplate = BodyTemplate::planet("Earth", "textures/earthmap", 0.6, 0.6, 12.0);
pub const MOON: BodyTemplate = BodyTemplate {
    kind: EntityKind::Moon,
    spin: Vec3::ZERO,
    orbit: Vec3::new(2.0, 0.0, 0.0),
    ..BodyTemplate::planet("Moon", "textures/meteor1", 0.2, 0.0, 10.0)
};
pub const MARS: BodyTemplate = BodyTemplate::planet("Mars", "textures/mars", 0.4, 0.3, 28.0);
pub const STARS: BodyTemplate = BodyTemplate {
    name: "Stars",
    kind: EntityKind::Backdrop,
    texture: "textures/stars",
    // Negative x turns the sphere inside out so the texture faces inward
    scale: Vec3::new(-100.0, 100.0, 100.0),
    spin: Vec3::new(0.01, 0.02, 0.03),
    orbit: Vec3::ZERO,
    origin: Vec3::ZERO,
};

/// Create an orbiting body from its description
pub fn create_body_entity(
    world: &mut World,
    assets: &mut dyn AssetLoader,
    body: &BodyTemplate,
) -> SimResult<Entity> {
    let visual = Visual {
        model: assets.load_model(SPHERE_MODEL)?,
        texture: assets.load_texture(body.texture)?,
    };

    Ok(world.spawn((
        Node::new().with_scale(body.scale).with_origin(body.origin),
        Orbiting::new(body.spin, body.orbit),
        visual,
        body.kind,
        Name(body.name.to_string()),
    )))
}

/// Build the default solar system and return its top-level bodies in draw order.
///
/// The Moon is a satellite of the Earth and is reached through it.
pub fn init_solar_system(world: &mut World, assets: &mut dyn AssetLoader) -> SimResult<Vec<Entity>> {
    let sun = create_body_entity(world, assets, &SUN)?;
    let mercury = create_body_entity(world, assets, &MERCURY)?;
    let venus = create_body_entity(world, assets, &VENUS)?;
    let earth = create_body_entity(world, assets, &EARTH)?;
    let moon = create_body_entity(world, assets, &MOON)?;
    OrbitHierarchy::add_satellite(world, earth, moon);
    let mars = create_body_entity(world, assets, &MARS)?;
    let stars = create_body_entity(world, assets, &STARS)?;

    log::info!("Solar system created with {} bodies", world.len());
    Ok(vec![sun, mercury, venus, earth, mars, stars])
}

/// Create a belt asteroid orbiting the centre
pub fn create_asteroid_entity(world: &mut World, node: Node, spin: Vec3, orbit: Vec3, visual: Visual) -> Entity {
    world.spawn((node, Orbiting::new(spin, orbit), visual, EntityKind::Asteroid))
}

/// Components of a projectile fired from `position` along `direction`
pub fn projectile_bundle(
    position: Vec3,
    direction: Vec3,
    speed: f32,
    lifetime: f32,
    scale: f32,
    visual: Visual,
) -> (Node, Kinetic, Visual, EntityKind) {
    (
        Node::from_position(position).with_scale(Vec3::splat(scale)),
        Kinetic::new(direction, speed, lifetime),
        visual,
        EntityKind::Projectile,
    )
}

/// Components of one debris chunk flung out of an impact
pub fn debris_bundle(
    position: Vec3,
    direction: Vec3,
    speed: f32,
    lifetime: f32,
    scale: f32,
    visual: Visual,
) -> (Node, Kinetic, Visual, EntityKind) {
    (
        Node::from_position(position).with_scale(Vec3::splat(scale)),
        Kinetic::new(direction, speed, lifetime),
        visual,
        EntityKind::Debris,
    )
}

/// Components of an explosion billboard playing its sprite sheet once
pub fn explosion_bundle(
    position: Vec3,
    scale: f32,
    model: ModelHandle,
    sheet: SpriteSheet,
) -> (Node, SpriteAnimation, Visual, EntityKind) {
    (
        Node::from_position(position).with_scale(Vec3::splat(scale)),
        SpriteAnimation::once(sheet, EXPLOSION_FRAME_MS),
        Visual {
            model,
            texture: sheet.texture,
        },
        EntityKind::Explosion,
    )
}
