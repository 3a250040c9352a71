/// Orbital hierarchy for bodies with satellites
///
/// A body advances its own orbit and spin first, then re-anchors every
/// satellite on its freshly computed world translation before updating it.
/// Satellites therefore always read their parent's matrix for the current
/// tick, never the previous one.

use glam::Vec3;
use hecs::{Entity, World};

use super::components::{Orbiting, SatelliteOf};
use super::transform::Node;

pub struct OrbitHierarchy;

impl OrbitHierarchy {
    /// Advance one orbiting body and, recursively, all of its satellites
    pub fn update_body(world: &mut World, body: Entity, dt: f32) {
        // Collect satellites first to release the borrow on the body
        let (anchor, satellites) = {
            let Ok((node, orbiting)) = world.query_one_mut::<(&mut Node, &Orbiting)>(body) else {
                return;
            };
            node.set_rotation(node.rotation() + orbiting.orbit * dt);
            node.set_relative_rotation(node.relative_rotation() + orbiting.spin * dt);
            (node.translation(), orbiting.satellites.clone())
        };

        for satellite in satellites {
            Self::anchor(world, satellite, anchor);
            Self::update_body(world, satellite, dt);
        }
    }

    /// Place a satellite's orbit centre on its parent's translation
    fn anchor(world: &mut World, satellite: Entity, parent_translation: Vec3) {
        if let Ok(mut node) = world.get::<&mut Node>(satellite) {
            node.set_position(parent_translation);
        }
    }

    /// Attach `satellite` to `parent`.
    ///
    /// A satellite has exactly one parent; attaching it elsewhere detaches it
    /// from its previous parent first. Attaching a body to itself or to one of
    /// its own satellites is ignored.
    pub fn add_satellite(world: &mut World, parent: Entity, satellite: Entity) {
        if parent == satellite || Self::descendants(world, satellite).contains(&parent) {
            log::warn!("Refusing to attach {satellite:?} under its own descendant {parent:?}");
            return;
        }

        let previous = world.get::<&SatelliteOf>(satellite).ok().map(|p| p.0);
        if let Some(previous) = previous {
            Self::remove_satellite(world, previous, satellite);
        }

        let Ok(mut orbiting) = world.get::<&mut Orbiting>(parent) else {
            log::warn!("{parent:?} has no orbit and cannot hold satellites");
            return;
        };
        if !orbiting.satellites.contains(&satellite) {
            orbiting.satellites.push(satellite);
        }
        drop(orbiting);

        let _ = world.insert_one(satellite, SatelliteOf(parent));
    }

    /// Detach a satellite from its parent
    pub fn remove_satellite(world: &mut World, parent: Entity, satellite: Entity) {
        let _ = world.remove_one::<SatelliteOf>(satellite);

        if let Ok(mut orbiting) = world.get::<&mut Orbiting>(parent) {
            orbiting.satellites.retain(|&e| e != satellite);
        }
    }

    /// All satellites of a body, depth-first in list order
    pub fn descendants(world: &World, body: Entity) -> Vec<Entity> {
        let mut out = Vec::new();

        if let Ok(orbiting) = world.get::<&Orbiting>(body) {
            for &satellite in &orbiting.satellites {
                out.push(satellite);
                out.extend(Self::descendants(world, satellite));
            }
        }

        out
    }
}
