/// Rendering boundary for ECS entities
///
/// The simulation never talks to a GPU. Each frame it fills a `RenderBatch`
/// with world matrices and asset handles in draw order, and the batch replays
/// them into whatever `RenderContext` the host provides.

use glam::Mat4;
use hecs::{Entity, World};

use super::components::*;
use super::transform::Node;
use crate::assets::{ModelHandle, TextureHandle};

/// One draw submitted to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub matrix: Mat4,
    pub model: ModelHandle,
    pub texture: TextureHandle,
    /// Sub-rectangle of the texture for sprite-sheet entities
    pub frame: Option<SpriteFrame>,
}

/// Whatever the host draws with
pub trait RenderContext {
    fn begin_frame(&mut self, view: Mat4, projection: Mat4);

    fn set_depth_test(&mut self, enabled: bool);

    fn draw(&mut self, call: &DrawCall);
}

/// A single entity to render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEntity {
    pub call: DrawCall,
    pub depth_test: bool,
}

/// Render data extracted from the ECS for a frame, in submission order
#[derive(Debug, Default)]
pub struct RenderBatch {
    pub entities: Vec<RenderEntity>,
}

impl RenderBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one entity. Kinetic entities that have run out of time are skipped.
    pub fn push_entity(&mut self, world: &World, entity: Entity, depth_test: bool) {
        let Ok(mut query) = world.query_one::<(&Node, &Visual, Option<&Kinetic>, Option<&SpriteAnimation>)>(entity)
        else {
            return;
        };
        let Some((node, visual, kinetic, animation)) = query.get() else {
            return;
        };

        if kinetic.is_some_and(Kinetic::is_expired) {
            return;
        }

        self.entities.push(RenderEntity {
            call: DrawCall {
                matrix: node.world_matrix(),
                model: visual.model,
                texture: visual.texture,
                frame: animation.map(SpriteAnimation::frame_rect),
            },
            depth_test,
        });
    }

    /// Queue a body followed by its satellites, depth-first
    pub fn push_body(&mut self, world: &World, body: Entity) {
        self.push_entity(world, body, true);

        let satellites = world
            .get::<&Orbiting>(body)
            .map(|orbiting| orbiting.satellites.clone())
            .unwrap_or_default();
        for satellite in satellites {
            self.push_body(world, satellite);
        }
    }

    /// Replay the batch, switching depth testing only when it changes
    pub fn submit(&self, ctx: &mut dyn RenderContext) {
        let mut depth = None;
        for entity in &self.entities {
            if depth != Some(entity.depth_test) {
                ctx.set_depth_test(entity.depth_test);
                depth = Some(entity.depth_test);
            }
            ctx.draw(&entity.call);
        }
        if depth == Some(false) {
            ctx.set_depth_test(true);
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
