//! Effect registry.
//!
//! Effects are stateless behaviour units.  Each one is a variant of
//! [`Effect`]; all the data it works on lives in the unit's
//! [`MotionState`], so a queue of effects is plain `Copy` data that can be
//! inspected or serialized at any time.

use std::collections::HashMap;

use glam::Vec2;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::angle::{bearing, target_angle_code};
use super::state::{MotionFlags, MotionState, Pose};
use super::MotionError;

/// Idle float: radians of bob phase per second.
pub const LEVITATION_SPEED: f32 = 2.5;
/// Idle float: peak anchor offset (sprite-relative units).
pub const LEVITATION_AMPLITUDE: f32 = 0.04;

/// What an effect reports after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Complete,
}

/// Everything an effect may touch.
pub struct EffectCtx<'a> {
    pub state: &'a mut MotionState,
    /// Destination of the command in flight.
    pub target: Vec2,
    /// Seconds since the previous tick.
    pub dt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    InitMovement,
    Stopping,
    ResetMovement,
    StopAnimation,
    RotateToTarget,
    AccelerateToTarget,
    MoveToTarget,
    StartMoveAnimation,
    Levitating,
}

impl Effect {
    pub const ALL: [Effect; 9] = [
        Effect::InitMovement,
        Effect::Stopping,
        Effect::ResetMovement,
        Effect::StopAnimation,
        Effect::RotateToTarget,
        Effect::AccelerateToTarget,
        Effect::MoveToTarget,
        Effect::StartMoveAnimation,
        Effect::Levitating,
    ];

    /// Registry name.
    pub const fn name(self) -> &'static str {
        match self {
            Effect::InitMovement => "initMovement",
            Effect::Stopping => "stopping",
            Effect::ResetMovement => "resetMovement",
            Effect::StopAnimation => "stopAnimation",
            Effect::RotateToTarget => "rotateToTarget",
            Effect::AccelerateToTarget => "accelerateToTarget",
            Effect::MoveToTarget => "moveToTarget",
            Effect::StartMoveAnimation => "startMoveAnimation",
            Effect::Levitating => "levitating",
        }
    }

    /// Concurrent effects run alongside the sequence instead of holding it up.
    #[inline]
    pub const fn is_concurrent(self) -> bool {
        matches!(self, Effect::Levitating)
    }

    /// One-shot setup.
    pub fn apply(self, ctx: &mut EffectCtx) {
        let s = &mut *ctx.state;
        match self {
            Effect::InitMovement => init_movement(s, ctx.target),
            Effect::Stopping => {
                s.movement.acceleration = 0.0;
                s.movement.drag = s.movement.drag_threshold;
            }
            Effect::ResetMovement => {
                let m = &mut s.movement;
                m.velocity = 0.0;
                m.acceleration = 0.0;
                m.drag = 0.0;
                m.velocity_xy = Vec2::ZERO;
                s.rotation.angular_velocity = 0.0;
                s.rotation.angular_velocity_helper = 0.0;
            }
            Effect::StopAnimation => s.pose = Pose::Idle,
            Effect::RotateToTarget => {
                s.rotation.angular_velocity = s.rotation.max_angular_velocity;
            }
            Effect::AccelerateToTarget => {
                s.movement.acceleration = s.movement.max_acceleration;
                s.movement.drag = 0.0;
            }
            Effect::MoveToTarget => {
                s.movement.acceleration = 0.0;
                s.movement.drag = 0.0;
            }
            Effect::StartMoveAnimation => s.pose = Pose::Moving,
            Effect::Levitating => {}
        }
    }

    /// Per-tick step.
    pub fn tick(self, ctx: &mut EffectCtx) -> Progress {
        self.apply(ctx);
        let s = &mut *ctx.state;
        match self {
            Effect::Stopping => {
                if s.movement.velocity != 0.0 {
                    return Progress::Continue;
                }
                if s.flags.contains(MotionFlags::ARRIVED) {
                    s.flags.insert(MotionFlags::STOPPED_AT_DESTINATION);
                }
                Progress::Complete
            }
            Effect::RotateToTarget => {
                if s.is_heading_mismatched() {
                    Progress::Continue
                } else {
                    Progress::Complete
                }
            }
            Effect::AccelerateToTarget => {
                let m = &s.movement;
                if m.velocity >= m.max_velocity || m.braking_distance() >= m.distance {
                    Progress::Complete
                } else {
                    Progress::Continue
                }
            }
            Effect::MoveToTarget => {
                let m = &s.movement;
                let overshot = m.distance_from_origin >= m.target_initial_distance;
                if m.distance <= m.braking_distance() || overshot {
                    s.flags.insert(MotionFlags::ARRIVED);
                    Progress::Complete
                } else {
                    Progress::Continue
                }
            }
            Effect::Levitating => {
                let l = &mut s.levitation;
                l.time += ctx.dt;
                l.offset = (l.time * LEVITATION_SPEED).sin() * LEVITATION_AMPLITUDE;
                Progress::Continue
            }
            Effect::InitMovement
            | Effect::ResetMovement
            | Effect::StopAnimation
            | Effect::StartMoveAnimation => Progress::Complete,
        }
    }
}

/// Capture origin, target, distance and the heading to turn to.
fn init_movement(s: &mut MotionState, target: Vec2) {
    let m = &mut s.movement;
    m.origin = m.position;
    m.target = target;
    m.target_initial_distance = m.position.distance(target);
    m.distance = m.target_initial_distance;
    m.distance_inverse = 0.0;
    m.distance_from_origin = 0.0;
    m.acceleration = 0.0;
    m.drag = 0.0;

    // already standing on the target: keep the current facing
    if m.target_initial_distance > 0.0 {
        m.target_angle = bearing(m.position, target);
        s.rotation.target_angle_code =
            target_angle_code(m.target_angle, s.rotation.max_angle_count);
    } else {
        m.target_angle = m.current_angle;
        s.rotation.target_angle_code = s.rotation.current_angle_code;
    }
    // same facing: correct the course now, the sprite does not need to turn
    if s.rotation.target_angle_code == s.rotation.current_angle_code {
        m.current_angle = m.target_angle;
    }

    s.flags.remove(
        MotionFlags::ARRIVED
            | MotionFlags::STOPPED_AT_DESTINATION
            | MotionFlags::HEADED_TO_DESTINATION,
    );
}

static REGISTRY: Lazy<HashMap<&'static str, Effect>> =
    Lazy::new(|| Effect::ALL.iter().map(|e| (e.name(), *e)).collect());

/// Effect registered under `name`.
///
/// # Panics
/// On an unregistered name: asking for an effect that does not exist is a
/// programming error and the tick must not go on with a half-built sequence.
pub fn get(name: &str) -> Effect {
    match REGISTRY.get(name) {
        Some(effect) => *effect,
        None => panic!("no effect registered under `{name}`"),
    }
}

/// Fallible lookup for names that come from outside the program.
pub fn try_get(name: &str) -> Result<Effect, MotionError> {
    REGISTRY
        .get(name)
        .copied()
        .ok_or_else(|| MotionError::UnknownEffect(name.to_owned()))
}

/// All registered names.
pub fn names() -> impl Iterator<Item = &'static str> {
    Effect::ALL.iter().map(|e| e.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs;

    fn state() -> MotionState {
        MotionState::new(defs::by_id("fighter").unwrap(), 0.5)
    }

    fn ctx(state: &mut MotionState) -> EffectCtx<'_> {
        EffectCtx {
            state,
            target: Vec2::new(100.0, 0.0),
            dt: 0.1,
        }
    }

    #[test]
    fn registry_round_trips_every_name() {
        for effect in Effect::ALL {
            assert_eq!(get(effect.name()), effect);
        }
        assert_eq!(names().count(), Effect::ALL.len());
    }

    #[test]
    #[should_panic(expected = "no effect registered")]
    fn unknown_name_is_fatal() {
        get("teleport");
    }

    #[test]
    fn unknown_name_is_reported() {
        assert_eq!(
            try_get("teleport"),
            Err(MotionError::UnknownEffect("teleport".into()))
        );
    }

    #[test]
    fn init_movement_captures_target() {
        let mut s = state();
        s.movement.position = Vec2::new(10.0, 0.0);
        Effect::InitMovement.apply(&mut ctx(&mut s));

        assert_eq!(s.movement.origin, Vec2::new(10.0, 0.0));
        assert_eq!(s.movement.target, Vec2::new(100.0, 0.0));
        assert!((s.movement.target_initial_distance - 90.0).abs() < 1e-4);
        // east on 16 facings
        assert_eq!(s.rotation.target_angle_code, 12);
        assert!(!s.flags.contains(MotionFlags::HEADED_TO_DESTINATION));
    }

    #[test]
    fn init_movement_on_target_keeps_facing() {
        let mut s = state();
        s.rotation.current_angle_code = 3;
        s.movement.position = Vec2::new(100.0, 0.0);
        Effect::InitMovement.apply(&mut ctx(&mut s));
        assert_eq!(s.rotation.target_angle_code, 3);
        assert_eq!(s.movement.target_initial_distance, 0.0);
    }

    #[test]
    fn stopping_waits_for_zero_velocity() {
        let mut s = state();
        s.movement.velocity = 3.0;
        assert_eq!(Effect::Stopping.tick(&mut ctx(&mut s)), Progress::Continue);
        assert_eq!(s.movement.drag, s.movement.drag_threshold);
        assert_eq!(s.movement.acceleration, 0.0);

        s.movement.velocity = 0.0;
        assert_eq!(Effect::Stopping.tick(&mut ctx(&mut s)), Progress::Complete);
        assert!(!s.flags.contains(MotionFlags::STOPPED_AT_DESTINATION));
    }

    #[test]
    fn stopping_after_arrival_marks_destination() {
        let mut s = state();
        s.flags.insert(MotionFlags::ARRIVED);
        assert_eq!(Effect::Stopping.tick(&mut ctx(&mut s)), Progress::Complete);
        assert!(s.flags.contains(MotionFlags::STOPPED_AT_DESTINATION));
    }

    #[test]
    fn accelerate_stops_at_top_speed() {
        let mut s = state();
        s.movement.distance = 1_000.0;
        assert_eq!(
            Effect::AccelerateToTarget.tick(&mut ctx(&mut s)),
            Progress::Continue
        );
        assert_eq!(s.movement.acceleration, s.movement.max_acceleration);

        s.movement.velocity = s.movement.max_velocity;
        assert_eq!(
            Effect::AccelerateToTarget.tick(&mut ctx(&mut s)),
            Progress::Complete
        );
    }

    #[test]
    fn accelerate_gives_up_on_short_hops() {
        let mut s = state();
        s.movement.velocity = 100.0;
        // braking from 100 at 320/s² needs 15.6 units
        s.movement.distance = 10.0;
        assert_eq!(
            Effect::AccelerateToTarget.tick(&mut ctx(&mut s)),
            Progress::Complete
        );
    }

    #[test]
    fn move_to_target_flags_arrival() {
        let mut s = state();
        s.movement.velocity = s.movement.max_velocity;
        s.movement.target_initial_distance = 500.0;
        s.movement.distance = 400.0;
        assert_eq!(Effect::MoveToTarget.tick(&mut ctx(&mut s)), Progress::Continue);
        assert!(!s.flags.contains(MotionFlags::ARRIVED));

        s.movement.distance = 100.0;
        assert_eq!(Effect::MoveToTarget.tick(&mut ctx(&mut s)), Progress::Complete);
        assert!(s.flags.contains(MotionFlags::ARRIVED));
    }

    #[test]
    fn levitating_never_completes() {
        let mut s = state();
        for _ in 0..100 {
            assert_eq!(Effect::Levitating.tick(&mut ctx(&mut s)), Progress::Continue);
            assert!(s.levitation.offset.abs() <= LEVITATION_AMPLITUDE);
        }
        assert!((s.levitation.time - 10.0).abs() < 1e-3);
    }

    #[test]
    fn reset_movement_zeroes_kinematics() {
        let mut s = state();
        s.movement.velocity = 12.0;
        s.movement.acceleration = 3.0;
        s.rotation.angular_velocity = 5.0;
        s.rotation.angular_velocity_helper = 0.5;
        assert_eq!(
            Effect::ResetMovement.tick(&mut ctx(&mut s)),
            Progress::Complete
        );
        assert_eq!(s.movement.velocity, 0.0);
        assert_eq!(s.movement.acceleration, 0.0);
        assert_eq!(s.rotation.angular_velocity, 0.0);
        assert_eq!(s.rotation.angular_velocity_helper, 0.0);
    }

    #[test]
    fn serializes_by_registry_name() {
        let json = serde_json::to_string(&Effect::AccelerateToTarget).unwrap();
        assert_eq!(json, "\"accelerateToTarget\"");
    }
}
