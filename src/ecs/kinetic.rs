/// Straight-line motion for projectiles and debris

use super::components::{Kinetic, KINETIC_SPIN_STEP};
use super::transform::Node;

impl Kinetic {
    /// Move the node along the direction of travel and age the entity.
    ///
    /// Returns false without touching anything once the lifetime is spent;
    /// such an entity is waiting for its pool to remove it.
    pub fn advance(&mut self, node: &mut Node, dt: f32) -> bool {
        if self.is_expired() {
            return false;
        }

        node.set_position(node.position() + self.velocity() * dt);
        node.set_rotation(node.rotation() + KINETIC_SPIN_STEP);
        self.elapsed += dt;
        true
    }
}
