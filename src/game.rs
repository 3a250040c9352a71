use glam::Vec3;
use hecs::Entity;

use crate::assets::AssetLoader;
use crate::config::OrreryConfig;
use crate::core::CameraRig;
use crate::ecs::hierarchy::OrbitHierarchy;
use crate::ecs::init::init_solar_system;
use crate::ecs::rendering::{RenderBatch, RenderContext};
use crate::ecs::EcsWorld;
use crate::error::SimResult;
use crate::field::{AsteroidField, TickReport};
use crate::input::{Action, InputManager};

/// Running totals of what the field did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub shots: usize,
    pub destroyed: usize,
    pub consumed: usize,
}

impl Tally {
    fn record(&mut self, report: &TickReport) {
        self.destroyed += report.destroyed;
        self.consumed += report.consumed;
    }
}

/// Everything one running simulation owns
pub struct Game {
    /// Time accumulator
    time: f32,
    pub camera: CameraRig,
    pub ecs_world: EcsWorld,
    /// Top-level orbiting bodies, in draw order
    pub planets: Vec<Entity>,
    pub field: AsteroidField,
    input: InputManager,
    aspect_ratio: f32,
    batch: RenderBatch,
    tally: Tally,
    exit_requested: bool,
}

impl Game {
    pub fn new(config: &OrreryConfig, assets: &mut dyn AssetLoader) -> SimResult<Self> {
        let mut ecs_world = EcsWorld::new();
        let planets = init_solar_system(&mut ecs_world.world, assets)?;
        let field = AsteroidField::new(&mut ecs_world.world, config.field.clone(), assets)?;

        log::info!("World ready with {} entities", ecs_world.entity_count());

        Ok(Self {
            time: 0.0,
            camera: CameraRig::from(&config.camera),
            ecs_world,
            planets,
            field,
            input: InputManager::with_default_bindings(),
            aspect_ratio: config.window.aspect_ratio(),
            batch: RenderBatch::new(),
            tally: Tally::default(),
            exit_requested: false,
        })
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        self.time += delta_time;
        self.input.begin_tick();
        if self.input.was_pressed(Action::Exit) {
            log::info!("Exit requested");
            self.exit_requested = true;
        }

        let world = &mut self.ecs_world.world;
        let report = self.field.update(world, delta_time);
        self.tally.record(&report);

        for &planet in &self.planets {
            OrbitHierarchy::update_body(world, planet, delta_time);
        }

        if let Some(launch) = self.camera.update(&mut self.input, delta_time) {
            self.field.launch_projectile(world, launch);
            self.tally.shots += 1;
        }

        self.field.face_effects(world, self.camera.eye());
    }

    /// Submit one frame: planets with their satellites, then the field
    pub fn draw(&mut self, ctx: &mut dyn RenderContext) {
        ctx.begin_frame(
            self.camera.view_matrix(),
            self.camera.projection_matrix(self.aspect_ratio),
        );

        let world = &self.ecs_world.world;
        self.batch.clear();
        for &planet in &self.planets {
            self.batch.push_body(world, planet);
        }
        self.field.draw(world, &mut self.batch);
        self.batch.submit(ctx);
    }

    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera.eye()
    }
}
