use glam::Vec2;
use hecs::World;
use tracing::debug;

use super::Class;
use crate::defs::{UnitFlags, UnitInfo};
use crate::motion::{Body, MotionManager};

/// Spawn a unit facing `angle` (radians, 0 = east) and return its handle.
/// Hovering types start floating straight away.
pub fn spawn_unit(world: &mut World, info: &UnitInfo, position: Vec2, angle: f32) -> hecs::Entity {
    let body = Body::new(position);
    let mut motion = MotionManager::new(info, &body);
    motion.set_facing(angle);
    if info.flags.contains(UnitFlags::HOVER) {
        motion.levitate();
    }

    let entity = world.spawn((Class(info.id.clone()), body, motion));
    debug!(unit = %info.id, ?entity, ?position, angle, "spawn");
    entity
}
