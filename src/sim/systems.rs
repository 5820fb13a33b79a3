use hecs::World;

use crate::motion::{Body, MotionManager};

/* ── Motion system ────────────────────────────────────────────────── */
/// Velocity, facing and effect pass for every unit.
pub fn motion(world: &mut World, dt: f32) {
    for (_, (motion, body)) in world.query_mut::<(&mut MotionManager, &mut Body)>() {
        motion.update(body, dt);
    }
}

/* ── Physics system ───────────────────────────────────────────────── */
/// Advance positions by the velocity the motion system left on each body.
pub fn physics(world: &mut World, dt: f32) {
    for (_, body) in world.query_mut::<&mut Body>() {
        body.integrate(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn physics_moves_every_body() {
        let mut world = World::new();
        let mut body = Body::new(Vec2::ZERO);
        body.velocity = Vec2::new(35.0, -70.0);
        let e = world.spawn((body,));

        physics(&mut world, 1.0 / 35.0);
        let moved = *world.get::<&Body>(e).unwrap();
        assert!((moved.position - Vec2::new(1.0, -2.0)).length() < 1e-5);
    }
}
