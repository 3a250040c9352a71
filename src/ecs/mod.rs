/// ECS world and component system
///
/// This module provides:
/// - The `Node` transform every drawable entity carries
/// - Component definitions for bodies, asteroids and their fragments
/// - Orbit hierarchy, kinetic and sprite-effect updates
/// - Extraction of draw calls for the host renderer

pub mod components;
pub mod effects;
pub mod hierarchy;
pub mod init;
pub mod kinetic;
pub mod rendering;
pub mod transform;

use hecs::World;

/// The main ECS world containing all entities
pub struct EcsWorld {
    /// hecs World - stores all entities and components
    pub world: World,
}

impl EcsWorld {
    pub fn new() -> Self {
        Self { world: World::new() }
    }

    /// Get the number of entities
    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }
}

impl Default for EcsWorld {
    fn default() -> Self {
        Self::new()
    }
}
