//! Asteroid field simulation.
//!
//! Owns the pools of transient entities around the solar system and drives
//! their lifecycle once per tick:
//!
//! ```text
//! Background --(random promotion)--> Rogue --(hit by projectile)--> Destroyed
//!                                          \--(reaches the centre)--> Consumed
//! ```
//!
//! Pools hold hecs entities. Passes that remove members iterate a snapshot of
//! the pool and queue spawns/despawns on a [`CommandBuffer`] that is applied
//! once the pass is over, so no pool or archetype is mutated mid-iteration.

use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::{UVec2, Vec3};
use hecs::{CommandBuffer, Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assets::{AssetLoader, ModelHandle, SpriteSheet, TextureHandle};
use crate::config::FieldConfig;
use crate::ecs::components::{Kinetic, Orbiting, SpriteAnimation, Visual};
use crate::ecs::init::{
    create_asteroid_entity, debris_bundle, explosion_bundle, projectile_bundle, ASTEROID_MODELS,
    ASTEROID_TEXTURE, BILLBOARD_MODEL, EXPLOSION_SHEET, PROJECTILE_TEXTURE, SPHERE_MODEL,
};
use crate::ecs::rendering::RenderBatch;
use crate::ecs::transform::Node;
use crate::error::{SimError, SimResult};

/// Number of angular lanes the belt is split into
pub const ANGULAR_LANES: usize = 20;

/// Every background asteroid orbits about the vertical axis
pub const BELT_ORBIT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

pub const EXPLOSION_FRAME_SIZE: UVec2 = UVec2::new(107, 104);
pub const EXPLOSION_GRID: UVec2 = UVec2::new(5, 3);

/// A projectile to be added to the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub lifetime: f32,
    pub scale: f32,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub promoted: usize,
    pub consumed: usize,
    pub destroyed: usize,
    pub fizzled: usize,
    pub debris_spawned: usize,
    pub debris_expired: usize,
    pub effects_finished: usize,
}

/// Handles the field needs to build its entities
#[derive(Debug, Clone)]
struct FieldAssets {
    asteroid_models: Vec<ModelHandle>,
    asteroid_texture: TextureHandle,
    sphere_model: ModelHandle,
    projectile_texture: TextureHandle,
    billboard_model: ModelHandle,
    explosion: SpriteSheet,
}

impl FieldAssets {
    fn load(assets: &mut dyn AssetLoader) -> SimResult<Self> {
        let asteroid_models = ASTEROID_MODELS
            .iter()
            .map(|path| assets.load_model(path))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Self {
            asteroid_models,
            asteroid_texture: assets.load_texture(ASTEROID_TEXTURE)?,
            sphere_model: assets.load_model(SPHERE_MODEL)?,
            projectile_texture: assets.load_texture(PROJECTILE_TEXTURE)?,
            billboard_model: assets.load_model(BILLBOARD_MODEL)?,
            explosion: assets.load_sprite_sheet(EXPLOSION_SHEET, EXPLOSION_FRAME_SIZE, EXPLOSION_GRID)?,
        })
    }

    fn debris_visual(&self) -> Visual {
        Visual {
            model: self.sphere_model,
            texture: self.asteroid_texture,
        }
    }

    fn projectile_visual(&self) -> Visual {
        Visual {
            model: self.sphere_model,
            texture: self.projectile_texture,
        }
    }
}

fn check_band(name: &str, min: f32, max: f32) -> SimResult<()> {
    if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
        return Err(SimError::InvalidConfiguration(format!("{name} band must be finite")));
    }
    if min > max {
        return Err(SimError::InvalidConfiguration(format!(
            "{name} band is inverted ({min} > {max})"
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfiguration(format!("{name} must be positive, got {value}")))
    }
}

impl FieldConfig {
    /// Reject spawn requests that would produce nonsensical entities
    pub fn validate(&self) -> SimResult<()> {
        if self.asteroid_count == 0 {
            return Err(SimError::InvalidConfiguration(
                "asteroid count must be at least 1".to_string(),
            ));
        }
        check_band("distance", self.min_distance, self.max_distance)?;
        check_band("height", self.min_height, self.max_height)?;
        check_band("debris speed", self.debris_min_speed, self.debris_max_speed)?;
        if self.debris_min > self.debris_max {
            return Err(SimError::InvalidConfiguration(format!(
                "debris count band is inverted ({} > {})",
                self.debris_min, self.debris_max
            )));
        }
        if !(0.0..=1.0).contains(&self.rogue_probability) {
            return Err(SimError::InvalidConfiguration(format!(
                "rogue probability {} is outside [0, 1]",
                self.rogue_probability
            )));
        }
        check_positive("asteroid scale", self.asteroid_scale)?;
        check_positive("rogue speed", self.rogue_speed)?;
        check_positive("hit radius", self.hit_radius)?;
        check_positive("debris lifetime", self.debris_lifetime)?;
        if !self.consume_radius.is_finite() || self.consume_radius < 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "consume radius must be non-negative, got {}",
                self.consume_radius
            )));
        }
        Ok(())
    }
}

/// Random unit vector, uniform over the sphere
fn random_direction(rng: &mut impl Rng) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

pub struct AsteroidField {
    config: FieldConfig,
    rng: StdRng,
    assets: FieldAssets,
    background: Vec<Entity>,
    rogue: Vec<Entity>,
    debris: Vec<Entity>,
    effects: Vec<Entity>,
    projectiles: Vec<Entity>,
}

impl AsteroidField {
    /// Build the field, seeding its RNG from the config (or entropy)
    pub fn new(world: &mut World, config: FieldConfig, assets: &mut dyn AssetLoader) -> SimResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(world, config, assets, rng)
    }

    /// Build the field with an explicit random source
    pub fn with_rng(
        world: &mut World,
        config: FieldConfig,
        assets: &mut dyn AssetLoader,
        rng: StdRng,
    ) -> SimResult<Self> {
        config.validate()?;
        let assets = FieldAssets::load(assets)?;

        let mut field = Self {
            config,
            rng,
            assets,
            background: Vec::new(),
            rogue: Vec::new(),
            debris: Vec::new(),
            effects: Vec::new(),
            projectiles: Vec::new(),
        };
        field.spawn_belt(world);

        log::info!(
            "Asteroid field created: {} asteroids, up to {} rogue",
            field.background.len(),
            field.config.max_rogue
        );
        Ok(field)
    }

    fn spawn_belt(&mut self, world: &mut World) {
        let c = &self.config;
        let texture = self.assets.asteroid_texture;

        for index in 0..c.asteroid_count {
            let height = self.rng.gen_range(c.min_height..=c.max_height);
            let distance_x = self.rng.gen_range(c.min_distance..=c.max_distance);
            let distance_z = self.rng.gen_range(c.min_distance..=c.max_distance);

            // Fixed lane plus a continuous offset inside it
            let angle = (index % ANGULAR_LANES) as f32 + self.rng.gen_range(0.0..1.0);

            let spin = Vec3::new(
                self.rng.gen_range(0.0..TAU),
                self.rng.gen_range(0.0..TAU),
                self.rng.gen_range(0.0..TAU),
            );
            let model = self.assets.asteroid_models[self.rng.gen_range(0..self.assets.asteroid_models.len())];

            let node = Node::new()
                .with_scale(Vec3::splat(c.asteroid_scale))
                .with_origin(Vec3::new(angle.cos() * distance_x, height, angle.sin() * distance_z));

            let asteroid = create_asteroid_entity(world, node, spin, BELT_ORBIT, Visual { model, texture });
            self.background.push(asteroid);
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn background(&self) -> &[Entity] {
        &self.background
    }

    pub fn rogue(&self) -> &[Entity] {
        &self.rogue
    }

    pub fn debris(&self) -> &[Entity] {
        &self.debris
    }

    pub fn effects(&self) -> &[Entity] {
        &self.effects
    }

    pub fn projectiles(&self) -> &[Entity] {
        &self.projectiles
    }

    /// Add a projectile to the active pool
    pub fn launch_projectile(&mut self, world: &mut World, launch: ProjectileLaunch) -> Entity {
        let projectile = world.spawn(projectile_bundle(
            launch.position,
            launch.direction,
            launch.speed,
            launch.lifetime,
            launch.scale,
            self.assets.projectile_visual(),
        ));
        self.projectiles.push(projectile);
        log::debug!("Projectile {projectile:?} launched from {}", launch.position);
        projectile
    }

    /// Add a rogue asteroid at an absolute position, already falling inward.
    ///
    /// Returns `None` when the rogue pool is already at `max_rogue`.
    pub fn spawn_rogue(&mut self, world: &mut World, position: Vec3) -> Option<Entity> {
        if self.rogue.len() >= self.config.max_rogue {
            log::debug!("Rogue pool full, not spawning at {position}");
            return None;
        }
        let node = Node::from_position(position).with_scale(Vec3::splat(self.config.asteroid_scale));
        let visual = Visual {
            model: self.assets.asteroid_models[0],
            texture: self.assets.asteroid_texture,
        };
        let asteroid = create_asteroid_entity(world, node, Vec3::ZERO, Vec3::ZERO, visual);
        self.rogue.push(asteroid);
        Some(asteroid)
    }

    /// Advance the whole field by `dt` seconds.
    ///
    /// Passes run in a fixed order: belt orbit, promotion, rogue motion,
    /// projectile expiry, collision, aging. Debris and effects spawned during
    /// this tick start aging on the next one.
    pub fn update(&mut self, world: &mut World, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        let aging_debris = self.debris.clone();
        let aging_effects = self.effects.clone();

        self.orbit_background(world, dt);
        report.promoted = self.promote_rogues(world);
        report.consumed = self.move_rogues(world, dt);
        report.fizzled = self.expire_projectiles(world, dt);
        let (destroyed, debris_spawned) = self.resolve_collisions(world);
        report.destroyed = destroyed;
        report.debris_spawned = debris_spawned;
        report.debris_expired = self.age_debris(world, &aging_debris, dt);
        report.effects_finished = self.age_effects(world, &aging_effects, dt);

        if report.destroyed > 0 || report.promoted > 0 {
            log::debug!("Field tick: {report:?}");
        }
        report
    }

    fn orbit_background(&mut self, world: &mut World, dt: f32) {
        for &asteroid in &self.background {
            if let Ok((node, orbiting)) = world.query_one_mut::<(&mut Node, &Orbiting)>(asteroid) {
                node.set_rotation(node.rotation() + orbiting.orbit * dt);
                node.set_relative_rotation(node.relative_rotation() + orbiting.spin * dt);
            }
        }
    }

    /// Move random belt asteroids into the rogue pool, one roll per open slot
    fn promote_rogues(&mut self, world: &mut World) -> usize {
        let open = self.config.max_rogue.saturating_sub(self.rogue.len());
        let mut promoted = 0;

        for _ in 0..open {
            if self.background.is_empty() {
                break;
            }
            if self.rng.gen::<f32>() >= self.config.rogue_probability {
                continue;
            }

            let index = self.rng.gen_range(0..self.background.len());
            let asteroid = self.background.swap_remove(index);

            if let Ok((node, orbiting)) = world.query_one_mut::<(&mut Node, &mut Orbiting)>(asteroid) {
                orbiting.freeze();
                // Freeze where it is right now as an absolute position
                let translation = node.translation();
                node.set_origin(Vec3::ZERO);
                node.set_position(translation);
                log::debug!("Asteroid {asteroid:?} went rogue at {translation}");
            }
            self.rogue.push(asteroid);
            promoted += 1;
        }

        promoted
    }

    /// Pull every rogue toward the centre; rogues that arrived are consumed
    fn move_rogues(&mut self, world: &mut World, dt: f32) -> usize {
        let mut consumed = Vec::new();
        let step = self.config.rogue_speed * dt;

        for &asteroid in &self.rogue {
            let Ok(mut node) = world.get::<&mut Node>(asteroid) else {
                continue;
            };
            let position = node.translation();
            let distance = position.length();

            if distance <= self.config.consume_radius {
                consumed.push(asteroid);
                continue;
            }

            let inward = (-position).normalize_or_zero();
            let next = node.position() + inward * step.min(distance);
            node.set_position(next);
        }

        for &asteroid in &consumed {
            let _ = world.despawn(asteroid);
            log::debug!("Rogue asteroid {asteroid:?} reached the centre");
        }
        self.rogue.retain(|e| !consumed.contains(e));
        consumed.len()
    }

    /// Fly projectiles; the ones out of time fizzle into a small explosion
    fn expire_projectiles(&mut self, world: &mut World, dt: f32) -> usize {
        let mut cmd = CommandBuffer::new();
        let mut expired = Vec::new();

        for &projectile in &self.projectiles {
            let Ok((node, kinetic)) = world.query_one_mut::<(&mut Node, &mut Kinetic)>(projectile) else {
                continue;
            };
            kinetic.advance(node, dt);
            if kinetic.is_expired() {
                expired.push((projectile, node.translation()));
            }
        }

        for &(projectile, position) in &expired {
            cmd.despawn(projectile);
            self.queue_explosion(world, &mut cmd, position, self.config.fizzle_scale);
        }
        cmd.run_on(world);

        self.projectiles.retain(|e| !expired.iter().any(|(p, _)| p == e));
        expired.len()
    }

    /// Pairwise rogue/projectile test; returns (asteroids destroyed, debris spawned)
    fn resolve_collisions(&mut self, world: &mut World) -> (usize, usize) {
        let rogue_snapshot = self.rogue.clone();
        let projectile_snapshot = self.projectiles.clone();
        let mut destroyed = HashSet::new();
        let mut spent = HashSet::new();
        let mut cmd = CommandBuffer::new();
        let mut debris_spawned = 0;

        for &asteroid in &rogue_snapshot {
            let Some(asteroid_pos) = world.get::<&Node>(asteroid).ok().map(|n| n.translation()) else {
                continue;
            };

            for &projectile in &projectile_snapshot {
                if spent.contains(&projectile) {
                    continue;
                }
                let Some(projectile_pos) = world.get::<&Node>(projectile).ok().map(|n| n.translation())
                else {
                    continue;
                };

                if asteroid_pos.distance(projectile_pos) < self.config.hit_radius {
                    spent.insert(projectile);
                    destroyed.insert(asteroid);
                    cmd.despawn(asteroid);
                    cmd.despawn(projectile);

                    self.queue_explosion(world, &mut cmd, asteroid_pos, self.config.explosion_scale);
                    debris_spawned += self.queue_debris(world, &mut cmd, asteroid_pos);

                    log::info!("Asteroid {asteroid:?} destroyed at {asteroid_pos}");
                    // Gone from the rogue pool; it cannot be hit twice
                    break;
                }
            }
        }

        cmd.run_on(world);
        self.rogue.retain(|e| !destroyed.contains(e));
        self.projectiles.retain(|e| !spent.contains(e));
        (destroyed.len(), debris_spawned)
    }

    fn queue_explosion(&mut self, world: &World, cmd: &mut CommandBuffer, position: Vec3, scale: f32) {
        let effect = world.reserve_entity();
        cmd.insert(
            effect,
            explosion_bundle(position, scale, self.assets.billboard_model, self.assets.explosion),
        );
        self.effects.push(effect);
    }

    fn queue_debris(&mut self, world: &World, cmd: &mut CommandBuffer, position: Vec3) -> usize {
        let c = &self.config;
        let count = self.rng.gen_range(c.debris_min..=c.debris_max) as usize;

        for _ in 0..count {
            let direction = random_direction(&mut self.rng);
            let speed = self.rng.gen_range(c.debris_min_speed..=c.debris_max_speed);
            let chunk = world.reserve_entity();
            cmd.insert(
                chunk,
                debris_bundle(
                    position,
                    direction,
                    speed,
                    c.debris_lifetime,
                    c.debris_scale,
                    self.assets.debris_visual(),
                ),
            );
            self.debris.push(chunk);
        }
        count
    }

    fn age_debris(&mut self, world: &mut World, snapshot: &[Entity], dt: f32) -> usize {
        let mut expired = Vec::new();

        for &chunk in snapshot {
            let Ok((node, kinetic)) = world.query_one_mut::<(&mut Node, &mut Kinetic)>(chunk) else {
                continue;
            };
            kinetic.advance(node, dt);
            if kinetic.is_expired() {
                expired.push(chunk);
            }
        }

        for &chunk in &expired {
            let _ = world.despawn(chunk);
        }
        self.debris.retain(|e| !expired.contains(e));
        expired.len()
    }

    fn age_effects(&mut self, world: &mut World, snapshot: &[Entity], dt: f32) -> usize {
        let mut finished = Vec::new();

        for &effect in snapshot {
            let Ok(mut animation) = world.get::<&mut SpriteAnimation>(effect) else {
                continue;
            };
            animation.advance(dt);
            if animation.is_finished() {
                finished.push(effect);
            }
        }

        for &effect in &finished {
            let _ = world.despawn(effect);
        }
        self.effects.retain(|e| !finished.contains(e));
        finished.len()
    }

    /// Turn every effect billboard toward the viewer
    pub fn face_effects(&self, world: &mut World, eye: Vec3) {
        for &effect in &self.effects {
            if let Ok(mut node) = world.get::<&mut Node>(effect) {
                let forward = node.position() - eye;
                node.face_direction(forward);
            }
        }
    }

    /// Queue the field for drawing: effects over everything, then the belt,
    /// rogues, debris and projectiles
    pub fn draw(&self, world: &World, batch: &mut RenderBatch) {
        for &effect in &self.effects {
            batch.push_entity(world, effect, false);
        }
        for &asteroid in self.background.iter().chain(&self.rogue) {
            batch.push_entity(world, asteroid, true);
        }
        for &entity in self.debris.iter().chain(&self.projectiles) {
            batch.push_entity(world, entity, true);
        }
    }
}
