/// Asteroid field scenarios driven through the public API

use glam::{Mat4, Vec3};
use hecs::World;

use orrery::assets::MemoryAssets;
use orrery::config::FieldConfig;
use orrery::ecs::components::{EntityKind, Kinetic, SpriteAnimation};
use orrery::ecs::rendering::{DrawCall, RenderBatch, RenderContext};
use orrery::ecs::transform::Node;
use orrery::field::{AsteroidField, ProjectileLaunch};
use orrery::SimError;

fn quiet_config(count: usize) -> FieldConfig {
    FieldConfig {
        asteroid_count: count,
        rogue_probability: 0.0,
        seed: Some(42),
        ..FieldConfig::default()
    }
}

fn field(world: &mut World, config: FieldConfig) -> AsteroidField {
    AsteroidField::new(world, config, &mut MemoryAssets::permissive()).unwrap()
}

fn still_projectile(position: Vec3, lifetime: f32) -> ProjectileLaunch {
    ProjectileLaunch {
        position,
        direction: Vec3::NEG_Z,
        speed: 0.0,
        lifetime,
        scale: 0.2,
    }
}

fn position(world: &World, entity: hecs::Entity) -> Vec3 {
    world.get::<&Node>(entity).unwrap().translation()
}

#[test]
fn certain_promotion_fills_every_slot_in_one_tick() {
    let mut world = World::new();
    let mut field = field(
        &mut world,
        FieldConfig {
            asteroid_count: 10,
            max_rogue: 10,
            rogue_probability: 1.0,
            seed: Some(1),
            ..FieldConfig::default()
        },
    );

    let report = field.update(&mut world, 0.016);
    assert_eq!(report.promoted, 10);
    assert_eq!(field.rogue().len(), 10);
    assert!(field.background().is_empty());
}

#[test]
fn rogue_count_never_exceeds_cap() {
    let mut world = World::new();
    let mut field = field(
        &mut world,
        FieldConfig {
            asteroid_count: 30,
            max_rogue: 3,
            rogue_probability: 1.0,
            seed: Some(2),
            ..FieldConfig::default()
        },
    );

    for _ in 0..20 {
        field.update(&mut world, 0.1);
        assert!(field.rogue().len() <= 3);
        assert_eq!(field.rogue().len() + field.background().len(), 30);
    }
}

#[test]
fn rogue_falls_to_the_centre_then_is_consumed() {
    let mut world = World::new();
    let mut field = field(
        &mut world,
        FieldConfig {
            rogue_speed: 10.0,
            ..quiet_config(1)
        },
    );
    let rogue = field.spawn_rogue(&mut world, Vec3::new(10.0, 0.0, 0.0)).unwrap();

    let report = field.update(&mut world, 1.0);
    assert_eq!(report.consumed, 0);
    assert!(position(&world, rogue).abs_diff_eq(Vec3::ZERO, 1e-5));

    let report = field.update(&mut world, 1.0);
    assert_eq!(report.consumed, 1);
    assert!(field.rogue().is_empty());
    assert!(!world.contains(rogue));
}

#[test]
fn rogue_steps_by_speed_times_dt() {
    let mut world = World::new();
    let mut field = field(
        &mut world,
        FieldConfig {
            rogue_speed: 10.0,
            ..quiet_config(1)
        },
    );
    let rogue = field.spawn_rogue(&mut world, Vec3::new(30.0, 0.0, 0.0)).unwrap();

    field.update(&mut world, 1.0);
    assert!(position(&world, rogue).abs_diff_eq(Vec3::new(20.0, 0.0, 0.0), 1e-4));
    assert_eq!(field.rogue(), &[rogue]);
}

#[test]
fn hit_destroys_both_and_spawns_fragments() {
    let mut world = World::new();
    let mut field = field(&mut world, quiet_config(1));
    let rogue = field.spawn_rogue(&mut world, Vec3::new(5.0, 0.0, 0.0)).unwrap();
    let shot = field.launch_projectile(&mut world, still_projectile(Vec3::new(5.0, 0.0, 0.0), 10.0));

    let report = field.update(&mut world, 0.1);

    assert_eq!(report.destroyed, 1);
    assert!(!world.contains(rogue));
    assert!(!world.contains(shot));
    assert!(field.rogue().is_empty());
    assert!(field.projectiles().is_empty());

    assert_eq!(field.effects().len(), 1);
    assert!((4..=6).contains(&field.debris().len()));
    assert_eq!(report.debris_spawned, field.debris().len());

    let cfg = field.config().clone();
    for &chunk in field.debris() {
        assert_eq!(*world.get::<&EntityKind>(chunk).unwrap(), EntityKind::Debris);
        let kinetic = *world.get::<&Kinetic>(chunk).unwrap();
        assert!((kinetic.direction.length() - 1.0).abs() < 1e-4);
        assert!(kinetic.speed >= cfg.debris_min_speed && kinetic.speed <= cfg.debris_max_speed);
        assert_eq!(kinetic.elapsed, 0.0);
    }

    // The explosion sits where the asteroid was
    let effect = field.effects()[0];
    assert!(position(&world, effect).abs_diff_eq(Vec3::new(4.8, 0.0, 0.0), 1e-4));
}

#[test]
fn one_projectile_cannot_destroy_two_asteroids() {
    let mut world = World::new();
    let mut field = field(&mut world, quiet_config(1));
    let a = field.spawn_rogue(&mut world, Vec3::new(5.0, 0.0, 0.0)).unwrap();
    let b = field.spawn_rogue(&mut world, Vec3::new(5.0, 0.1, 0.0)).unwrap();
    field.launch_projectile(&mut world, still_projectile(Vec3::new(5.0, 0.0, 0.0), 10.0));

    let report = field.update(&mut world, 0.01);

    assert_eq!(report.destroyed, 1);
    assert_eq!(field.rogue().len(), 1);
    assert_eq!(field.effects().len(), 1);
    assert!(world.contains(a) != world.contains(b));
}

#[test]
fn one_asteroid_absorbs_only_one_projectile() {
    let mut world = World::new();
    let mut field = field(&mut world, quiet_config(1));
    field.spawn_rogue(&mut world, Vec3::new(5.0, 0.0, 0.0)).unwrap();
    field.launch_projectile(&mut world, still_projectile(Vec3::new(5.0, 0.0, 0.0), 10.0));
    field.launch_projectile(&mut world, still_projectile(Vec3::new(5.0, 0.2, 0.0), 10.0));

    let report = field.update(&mut world, 0.01);

    assert_eq!(report.destroyed, 1);
    assert_eq!(field.projectiles().len(), 1);
}

#[test]
fn expired_projectile_fizzles_before_collision() {
    let mut world = World::new();
    let mut field = field(&mut world, quiet_config(1));
    let rogue = field.spawn_rogue(&mut world, Vec3::new(5.0, 0.0, 0.0)).unwrap();
    field.launch_projectile(&mut world, still_projectile(Vec3::new(5.0, 0.0, 0.0), 0.05));

    let report = field.update(&mut world, 0.1);

    assert_eq!(report.fizzled, 1);
    assert_eq!(report.destroyed, 0);
    assert!(world.contains(rogue));
    assert!(field.projectiles().is_empty());
    assert_eq!(field.effects().len(), 1);
    assert!(field.debris().is_empty());
}

#[test]
fn fragments_age_out() {
    let mut world = World::new();
    let mut field = field(&mut world, quiet_config(1));
    field.spawn_rogue(&mut world, Vec3::new(5.0, 0.0, 0.0)).unwrap();
    field.launch_projectile(&mut world, still_projectile(Vec3::new(5.0, 0.0, 0.0), 10.0));
    field.update(&mut world, 0.1);

    let effect = field.effects()[0];
    let spawned = field.debris().len();

    // Spawned this tick, so nothing aged yet
    assert_eq!(world.get::<&SpriteAnimation>(effect).unwrap().elapsed_ms, 0.0);

    let report = field.update(&mut world, 1.0);
    assert_eq!(report.effects_finished, 0);
    assert_eq!(field.debris().len(), spawned);

    let report = field.update(&mut world, 1.0);
    assert_eq!(report.effects_finished, 1);
    assert!(field.effects().is_empty());
    assert!(!world.contains(effect));

    // Third full second reaches the debris lifetime
    let report = field.update(&mut world, 1.0);
    assert_eq!(report.debris_expired, spawned);
    assert!(field.debris().is_empty());
}

#[test]
fn invalid_requests_are_rejected() {
    let mut world = World::new();
    let configs = [
        FieldConfig { asteroid_count: 0, ..FieldConfig::default() },
        FieldConfig { min_height: 10.0, max_height: 0.0, ..FieldConfig::default() },
        FieldConfig { rogue_probability: -0.1, ..FieldConfig::default() },
        FieldConfig { consume_radius: f32::INFINITY, ..FieldConfig::default() },
        // Both ends finite, but the width overflows
        FieldConfig { min_height: -3e38, max_height: 3e38, ..FieldConfig::default() },
    ];

    for config in configs {
        let err = AsteroidField::new(&mut world, config, &mut MemoryAssets::permissive()).err();
        assert!(matches!(err, Some(SimError::InvalidConfiguration(_))));
    }
    assert_eq!(world.len(), 0);
}

#[test]
fn missing_asteroid_model_is_reported() {
    let mut world = World::new();
    let mut assets = MemoryAssets::with_resources(["models/sphere"]);
    let err = AsteroidField::new(&mut world, quiet_config(5), &mut assets).err();
    assert_eq!(err, Some(SimError::ResourceNotFound("models/asteroid1".to_string())));
}

#[test]
fn same_seed_builds_same_belt() {
    let mut a = World::new();
    let mut b = World::new();
    let field_a = field(&mut a, quiet_config(25));
    let field_b = field(&mut b, quiet_config(25));

    for (&ea, &eb) in field_a.background().iter().zip(field_b.background()) {
        assert_eq!(*a.get::<&Node>(ea).unwrap(), *b.get::<&Node>(eb).unwrap());
    }
}

#[test]
fn spawned_rogues_respect_the_cap() {
    let mut world = World::new();
    let mut field = field(
        &mut world,
        FieldConfig {
            max_rogue: 2,
            ..quiet_config(1)
        },
    );

    assert!(field.spawn_rogue(&mut world, Vec3::new(30.0, 0.0, 0.0)).is_some());
    assert!(field.spawn_rogue(&mut world, Vec3::new(0.0, 30.0, 0.0)).is_some());
    let entities = world.len();

    assert_eq!(field.spawn_rogue(&mut world, Vec3::new(0.0, 0.0, 30.0)), None);
    assert_eq!(field.rogue().len(), 2);
    assert_eq!(world.len(), entities);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Recorded {
    Depth(bool),
    Draw { matrix: Mat4, sprite: bool },
}

#[derive(Default)]
struct Recorder(Vec<Recorded>);

impl RenderContext for Recorder {
    fn begin_frame(&mut self, _view: Mat4, _projection: Mat4) {}

    fn set_depth_test(&mut self, enabled: bool) {
        self.0.push(Recorded::Depth(enabled));
    }

    fn draw(&mut self, call: &DrawCall) {
        self.0.push(Recorded::Draw {
            matrix: call.matrix,
            sprite: call.frame.is_some(),
        });
    }
}

#[test]
fn explosions_draw_first_without_depth_then_solids() {
    let mut world = World::new();
    let mut field = field(&mut world, quiet_config(2));
    field.spawn_rogue(&mut world, Vec3::new(5.0, 0.0, 0.0)).unwrap();
    field.spawn_rogue(&mut world, Vec3::new(30.0, 0.0, 0.0)).unwrap();
    field.launch_projectile(&mut world, still_projectile(Vec3::new(5.0, 0.0, 0.0), 10.0));
    field.launch_projectile(&mut world, still_projectile(Vec3::new(0.0, 50.0, 0.0), 10.0));

    let report = field.update(&mut world, 0.1);
    assert_eq!(report.destroyed, 1);

    let mut batch = RenderBatch::new();
    field.draw(&world, &mut batch);
    let mut recorder = Recorder::default();
    batch.submit(&mut recorder);

    let draw = |entity: hecs::Entity, sprite: bool| Recorded::Draw {
        matrix: world.get::<&Node>(entity).unwrap().world_matrix(),
        sprite,
    };
    let mut expected = vec![Recorded::Depth(false)];
    expected.extend(field.effects().iter().map(|&e| draw(e, true)));
    expected.push(Recorded::Depth(true));
    for group in [field.background(), field.rogue(), field.debris(), field.projectiles()] {
        expected.extend(group.iter().map(|&e| draw(e, false)));
    }

    assert_eq!(field.effects().len(), 1);
    assert_eq!(field.background().len(), 2);
    assert_eq!(field.rogue().len(), 1);
    assert_eq!(field.projectiles().len(), 1);
    assert_eq!(recorder.0, expected);
}
