use std::time::{Duration, Instant};

use glam::Vec2;
use hecs::{Entity, World};
use tracing::trace;

use super::{SimError, systems, unit};
use crate::defs::UnitInfo;
use crate::motion::{Activity, Body, ListenerId, MotionEvent, MotionManager};

pub const SIM_FPS: u32 = 35;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the ECS world and drives the motion and physics systems.
pub struct TicRunner {
    world: World,
    last: Instant,
    tic: u64,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            last: Instant::now(),
            tic: 0,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Tics run since creation.
    #[inline]
    pub fn tic(&self) -> u64 {
        self.tic
    }

    #[inline]
    pub fn spawn_unit(&mut self, info: &UnitInfo, position: Vec2, angle: f32) -> Entity {
        unit::spawn_unit(&mut self.world, info, position, angle)
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns how many ran.
    pub fn pump(&mut self) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            self.tick();
            self.last += TIC;
            ran += 1;
        }
        ran
    }

    /// Run one fixed-rate tic regardless of wall time (headless runs, tests).
    pub fn tick(&mut self) {
        systems::motion(&mut self.world, DT);
        systems::physics(&mut self.world, DT);
        self.tic += 1;
        trace!(tic = self.tic, "tic");
    }

    /* ---------------------------------------------------------------- */
    /* unit commands                                                     */
    /* ---------------------------------------------------------------- */

    pub fn move_to(&mut self, entity: Entity, activity: Box<dyn Activity>) -> Result<(), SimError> {
        self.with_unit(entity, |motion, body| motion.move_to(body, activity))??;
        Ok(())
    }

    pub fn rotate_to_target(
        &mut self,
        entity: Entity,
        activity: Box<dyn Activity>,
    ) -> Result<(), SimError> {
        self.with_unit(entity, |motion, body| motion.rotate_to_target(body, activity))??;
        Ok(())
    }

    pub fn stop(&mut self, entity: Entity) -> Result<(), SimError> {
        self.with_unit(entity, |motion, _| motion.stop())
    }

    pub fn levitate(&mut self, entity: Entity) -> Result<(), SimError> {
        self.with_unit(entity, |motion, _| motion.levitate())
    }

    pub fn stop_levitating(&mut self, entity: Entity) -> Result<(), SimError> {
        self.with_unit(entity, |motion, body| motion.stop_levitating(body))
    }

    pub fn on<F>(&mut self, entity: Entity, event: MotionEvent, callback: F) -> Result<ListenerId, SimError>
    where
        F: FnMut(MotionEvent) + Send + Sync + 'static,
    {
        self.with_unit(entity, |motion, _| motion.on(event, callback))
    }

    pub fn once<F>(&mut self, entity: Entity, event: MotionEvent, callback: F) -> Result<ListenerId, SimError>
    where
        F: FnMut(MotionEvent) + Send + Sync + 'static,
    {
        self.with_unit(entity, |motion, _| motion.once(event, callback))
    }

    /// Does `entity` face the current position of `target`?
    pub fn is_facing(&mut self, entity: Entity, target: Entity) -> Result<bool, SimError> {
        let target_body = *self
            .world
            .get::<&Body>(target)
            .map_err(|_| SimError::NoSuchEntity(target))?;
        self.with_unit(entity, |motion, body| {
            motion.is_entity_facing_target_entity(body, &target_body)
        })
    }

    fn with_unit<R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut MotionManager, &mut Body) -> R,
    ) -> Result<R, SimError> {
        let (motion, body) = self
            .world
            .query_one_mut::<(&mut MotionManager, &mut Body)>(entity)
            .map_err(|_| SimError::NoSuchEntity(entity))?;
        Ok(f(motion, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs;
    use crate::motion::{Effect, MotionError, PointActivity};
    use crate::sim::Class;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn runner_with(id: &str, at: Vec2) -> (TicRunner, Entity) {
        let mut sim = TicRunner::new();
        let e = sim.spawn_unit(defs::by_id(id).unwrap(), at, 0.0);
        (sim, e)
    }

    #[test]
    fn unit_travels_and_reports_arrival() {
        let (mut sim, e) = runner_with("fighter", Vec2::ZERO);
        let arrivals = Arc::new(AtomicUsize::new(0));
        let a = arrivals.clone();
        sim.on(e, MotionEvent::Arrive, move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        let order = PointActivity::new(Vec2::new(300.0, 0.0));
        sim.move_to(e, Box::new(order.clone())).unwrap();
        for _ in 0..SIM_FPS * 6 {
            sim.tick();
        }

        assert_eq!(sim.tic(), u64::from(SIM_FPS * 6));
        assert_eq!(arrivals.load(Ordering::SeqCst), 1);
        assert!(order.is_killed());
        let body = *sim.world().get::<&Body>(e).unwrap();
        assert!(body.position.distance(Vec2::new(300.0, 0.0)) < 20.0);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn hovering_units_spawn_floating() {
        let (sim, e) = runner_with("probe", Vec2::ZERO);
        let motion = sim.world().get::<&MotionManager>(e).unwrap();
        assert!(motion.queue().contains(Effect::Levitating));
        assert_eq!(sim.world().get::<&Class>(e).unwrap().id(), "probe");

        let (sim, e) = runner_with("fighter", Vec2::ZERO);
        assert!(sim.world().get::<&MotionManager>(e).unwrap().queue().is_empty());
    }

    #[test]
    fn spawn_angle_sets_facing() {
        let (sim, e) = runner_with("fighter", Vec2::ZERO);
        // angle 0 = east = code 12 on 16 facings
        assert_eq!(sim.world().get::<&MotionManager>(e).unwrap().current_angle_code(), 12);
    }

    #[test]
    fn facing_between_entities() {
        let (mut sim, e) = runner_with("fighter", Vec2::ZERO);
        let east = sim.spawn_unit(defs::by_id("beacon").unwrap(), Vec2::new(80.0, 0.0), 0.0);
        let south = sim.spawn_unit(defs::by_id("beacon").unwrap(), Vec2::new(0.0, 80.0), 0.0);
        assert!(sim.is_facing(e, east).unwrap());
        assert!(!sim.is_facing(e, south).unwrap());
    }

    #[test]
    fn pump_catches_up_with_wall_time() {
        let (mut sim, e) = runner_with("fighter", Vec2::ZERO);
        sim.last -= TIC * 3;
        let ran = sim.pump();
        assert!(ran >= 3, "ran {ran} tics");
        assert_eq!(sim.tic(), u64::from(ran));
        assert!(sim.world().get::<&MotionManager>(e).is_ok());
    }

    #[test]
    fn despawned_units_are_reported() {
        let (mut sim, e) = runner_with("fighter", Vec2::ZERO);
        sim.world_mut().despawn(e).unwrap();
        assert!(matches!(sim.stop(e), Err(SimError::NoSuchEntity(_))));
        assert!(matches!(
            sim.move_to(e, Box::new(PointActivity::new(Vec2::ONE))),
            Err(SimError::NoSuchEntity(_))
        ));
    }

    #[test]
    fn motion_errors_pass_through() {
        let (mut sim, e) = runner_with("fighter", Vec2::ZERO);
        let err = sim
            .move_to(e, Box::new(PointActivity::new(Vec2::new(f32::INFINITY, 0.0))))
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::Motion(MotionError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn stop_levitating_through_the_runner() {
        let (mut sim, e) = runner_with("probe", Vec2::ZERO);
        for _ in 0..10 {
            sim.tick();
        }
        sim.stop_levitating(e).unwrap();
        let body = *sim.world().get::<&Body>(e).unwrap();
        assert_eq!(body.anchor.y, 0.5);
    }
}
