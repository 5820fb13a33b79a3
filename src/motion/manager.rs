//! Per-unit motion facade.
//!
//! A [`MotionManager`] turns commands into effect sequences and, once per
//! tic, integrates velocity and facing before letting the queued effects
//! react to the result:
//!
//! ```text
//! update:  velocity → rotation → effect pass → arrival checks → body
//! ```

use std::{borrow::Cow, fmt};

use glam::Vec2;
use tracing::{debug, info};

use super::activity::Activity;
use super::angle::{bearing, shorter_direction, step, target_angle_code};
use super::body::Body;
use super::effects::{self, Effect, EffectCtx};
use super::events::{EventDispatcher, ListenerId, MotionEvent};
use super::queue::EffectQueue;
use super::state::{MotionFlags, MotionState, Pose};
use super::MotionError;
use crate::defs::UnitInfo;

/// Full brake, then drop every leftover rate.
const BRAKE: [Effect; 2] = [Effect::Stopping, Effect::ResetMovement];

/// Orient → accelerate → cruise until arrival → decelerate → idle pose.
const TRAVEL: [Effect; 7] = [
    Effect::StopAnimation,
    Effect::RotateToTarget,
    Effect::AccelerateToTarget,
    Effect::MoveToTarget,
    Effect::Stopping,
    Effect::ResetMovement,
    Effect::StopAnimation,
];

const TURN: [Effect; 2] = [Effect::RotateToTarget, Effect::StopAnimation];

/// Turn while the brake bleeds off the speed left over from the last command.
const TURN_UNDERWAY: [Effect; 4] = [
    Effect::RotateToTarget,
    Effect::Stopping,
    Effect::ResetMovement,
    Effect::StopAnimation,
];

const HALT: [Effect; 3] = [Effect::Stopping, Effect::ResetMovement, Effect::StopAnimation];

pub struct MotionManager {
    unit: Cow<'static, str>,
    slow_maneuverability: bool,
    state: MotionState,
    effects: EffectQueue,
    dispatcher: EventDispatcher<MotionEvent>,
    activity: Option<Box<dyn Activity>>,
    /// Float again whenever the queue runs dry.
    idle_float: bool,
    /// Facing reached the target this tic; `Headed` still to be dispatched.
    headed_pending: bool,
}

impl MotionManager {
    pub fn new(info: &UnitInfo, body: &Body) -> Self {
        let mut state = MotionState::new(info, body.anchor.y);
        state.movement.position = body.position;
        Self {
            unit: info.id.clone(),
            slow_maneuverability: info.has_slow_maneuverability(),
            state,
            effects: EffectQueue::new(),
            dispatcher: EventDispatcher::new(),
            activity: None,
            idle_float: false,
            headed_pending: false,
        }
    }

    /* ------------------------------------------------------------------ */
    /* commands                                                            */
    /* ------------------------------------------------------------------ */

    /// Travel to the activity's target and stop on it.  `Arrive` fires once
    /// the unit has come to rest there.
    pub fn move_to(
        &mut self,
        body: &Body,
        activity: Box<dyn Activity>,
    ) -> Result<(), MotionError> {
        self.start_command(body, activity)?;
        let braking = self.queue_brake_if_required();
        TRAVEL.iter().for_each(|e| self.effects.add_effect(*e));

        debug!(
            unit = %self.unit,
            target = ?self.state.movement.target,
            target_code = self.state.rotation.target_angle_code,
            braking,
            "move to"
        );
        Ok(())
    }

    /// Turn in place to face the activity's target.
    pub fn rotate_to_target(
        &mut self,
        body: &Body,
        activity: Box<dyn Activity>,
    ) -> Result<(), MotionError> {
        self.start_command(body, activity)?;
        let braking = self.queue_brake_if_required();
        if self.state.is_moving() && !braking {
            let target = self.state.movement.target;
            let mut ctx = EffectCtx {
                state: &mut self.state,
                target,
                dt: 0.0,
            };
            self.effects.execute(Effect::Stopping, &mut ctx);
            TURN_UNDERWAY.iter().for_each(|e| self.effects.add_effect(*e));
        } else {
            TURN.iter().for_each(|e| self.effects.add_effect(*e));
        }

        debug!(
            unit = %self.unit,
            target_code = self.state.rotation.target_angle_code,
            braking,
            "rotate to target"
        );
        Ok(())
    }

    /// Brake to a halt, dropping whatever was in flight.  The brake is
    /// already engaged when this returns.
    pub fn stop(&mut self) {
        self.reset();
        self.activity = None;
        self.state
            .flags
            .remove(MotionFlags::ARRIVED | MotionFlags::STOPPED_AT_DESTINATION);

        let target = self.state.movement.target;
        let mut ctx = EffectCtx {
            state: &mut self.state,
            target,
            dt: 0.0,
        };
        self.effects.execute(Effect::Stopping, &mut ctx);
        HALT.iter().for_each(|e| self.effects.add_effect(*e));

        debug!(unit = %self.unit, velocity = self.state.movement.velocity, "stop");
    }

    /// Clear the effect queue without queuing anything.
    pub fn reset(&mut self) {
        self.effects.reset_effects();
        // a discarded float must not leave the sprite lifted
        self.state.levitation.offset = 0.0;
    }

    /// Start the idle float.  No-op while already floating.  The float is
    /// dropped by the next command and resumed once its sequence is done.
    pub fn levitate(&mut self) {
        self.idle_float = true;
        if !self.effects.contains(Effect::Levitating) {
            self.effects.add_effect(Effect::Levitating);
        }
    }

    /// End the idle float and put the sprite back on its default anchor.
    pub fn stop_levitating(&mut self, body: &mut Body) {
        self.idle_float = false;
        self.effects.remove_effect(Effect::Levitating);
        let l = &mut self.state.levitation;
        l.offset = 0.0;
        l.time = 0.0;
        body.anchor.y = l.default_anchor_y;
    }

    /// Queue a registered effect by name (scripted sequences, debugging).
    pub fn add_effect_by_name(&mut self, name: &str) -> Result<(), MotionError> {
        self.effects.add_effect(effects::try_get(name)?);
        Ok(())
    }

    /// Snap the facing to `angle` without turning (spawning, teleports).
    pub fn set_facing(&mut self, angle: f32) {
        let code = self.target_angle_code_by_target_angle(angle);
        let s = &mut self.state;
        s.rotation.current_angle_code = code;
        s.rotation.target_angle_code = code;
        s.movement.current_angle = angle;
        s.movement.target_angle = angle;
    }

    /* ------------------------------------------------------------------ */
    /* tick                                                                */
    /* ------------------------------------------------------------------ */

    pub fn update(&mut self, body: &mut Body, dt: f32) {
        self.update_velocity(body.position, dt);
        self.update_rotation(dt);

        let target = self.state.movement.target;
        let mut ctx = EffectCtx {
            state: &mut self.state,
            target,
            dt,
        };
        self.effects.update_effects(&mut ctx);
        if self.idle_float && self.effects.is_empty() {
            self.effects.add_effect(Effect::Levitating);
        }

        self.execute_checks();
        self.sync_body(body);
    }

    fn update_velocity(&mut self, position: Vec2, dt: f32) {
        let m = &mut self.state.movement;

        m.position = position;
        m.distance = position.distance(m.target);
        m.distance_inverse = m.target_initial_distance - m.distance;
        m.distance_from_origin = position.distance(m.origin);

        if m.acceleration != 0.0 {
            m.velocity += m.acceleration * dt;
        } else if m.drag != 0.0 {
            let drag = m.drag * dt;
            if m.velocity - drag > 0.0 {
                m.velocity -= drag;
            } else if m.velocity + drag < 0.0 {
                m.velocity += drag;
            } else {
                m.velocity = 0.0;
            }
        }

        let max = m.max_velocity.abs();
        if m.velocity > max {
            m.velocity = max;
        } else if m.velocity < -max {
            m.velocity = -max;
        }

        let (s, c) = m.current_angle.sin_cos();
        m.velocity_xy = Vec2::new(c, s) * m.velocity;
    }

    fn update_rotation(&mut self, dt: f32) {
        let s = &mut self.state;

        if s.is_heading_mismatched() {
            // heading is committed while underway
            if s.is_moving() && self.slow_maneuverability {
                return;
            }

            s.movement.current_angle = s.movement.target_angle;

            let r = &mut s.rotation;
            r.angular_direction =
                shorter_direction(r.current_angle_code, r.target_angle_code, r.max_angle_count);
            r.angular_velocity_helper += r.angular_velocity * dt;
            if r.angular_velocity_helper >= 1.0 {
                r.angular_velocity_helper = 0.0;
                r.current_angle_code =
                    step(r.current_angle_code, r.angular_direction, r.max_angle_count);
            }

            if s.is_heading_mismatched() {
                return;
            }
        }

        if s.flags.contains(MotionFlags::HEADED_TO_DESTINATION) {
            return;
        }
        // only a live sequence can be headed somewhere, and its leading
        // stopAnimation has to reset the pose first
        match self.effects.next_sequential() {
            Some(Effect::StopAnimation) | None => return,
            Some(_) => {}
        }
        s.flags.insert(MotionFlags::HEADED_TO_DESTINATION);
        s.movement.current_angle = s.movement.target_angle;
        self.effects.add_effect_to_top(Effect::StartMoveAnimation);
        self.headed_pending = true;
    }

    fn execute_checks(&mut self) {
        if self.headed_pending {
            self.headed_pending = false;
            self.dispatcher.dispatch(MotionEvent::Headed);
        }

        if self.state.flags.contains(MotionFlags::STOPPED_AT_DESTINATION) {
            if let Some(mut activity) = self.activity.take() {
                activity.kill();
            }
            info!(unit = %self.unit, position = ?self.state.movement.position, "arrived");
            self.dispatcher.dispatch(MotionEvent::Arrive);
            self.state
                .flags
                .remove(MotionFlags::STOPPED_AT_DESTINATION | MotionFlags::ARRIVED);
        }
    }

    fn sync_body(&self, body: &mut Body) {
        body.velocity = self.state.movement.velocity_xy;
        body.frame = self.state.frame();
        body.anchor.y = self.state.levitation.anchor_y();
    }

    /* ------------------------------------------------------------------ */
    /* events                                                              */
    /* ------------------------------------------------------------------ */

    pub fn on<F>(&mut self, event: MotionEvent, callback: F) -> ListenerId
    where
        F: FnMut(MotionEvent) + Send + Sync + 'static,
    {
        self.dispatcher.add_event_listener(event, callback)
    }

    pub fn once<F>(&mut self, event: MotionEvent, callback: F) -> ListenerId
    where
        F: FnMut(MotionEvent) + Send + Sync + 'static,
    {
        self.dispatcher.add_once_listener(event, callback)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.dispatcher.remove_event_listener(id)
    }

    /* ------------------------------------------------------------------ */
    /* queries                                                             */
    /* ------------------------------------------------------------------ */

    pub fn is_entity_facing_target_entity(&self, body: &Body, target: &Body) -> bool {
        let code = self.target_angle_code_by_target_angle(bearing(body.position, target.position));
        self.state.rotation.current_angle_code == code
    }

    /// Moving, facing the wrong way and too sluggish to turn underway.
    pub fn is_required_to_stop_before_further_action(&self) -> bool {
        self.state.is_moving() && self.state.is_heading_mismatched() && self.slow_maneuverability
    }

    #[inline]
    pub fn current_angle_code(&self) -> u16 {
        self.state.rotation.current_angle_code
    }

    #[inline]
    pub fn target_angle_code_by_target_angle(&self, angle: f32) -> u16 {
        target_angle_code(angle, self.state.rotation.max_angle_count)
    }

    #[inline]
    pub fn has_slow_maneuverability(&self) -> bool {
        self.slow_maneuverability
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.state.pose
    }

    #[inline]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    #[inline]
    pub fn queue(&self) -> &EffectQueue {
        &self.effects
    }

    #[inline]
    pub fn has_activity(&self) -> bool {
        self.activity.is_some()
    }

    /* ------------------------------------------------------------------ */
    /* internal                                                            */
    /* ------------------------------------------------------------------ */

    /// Validate the activity, drop the running sequence and capture the
    /// new target.
    fn start_command(
        &mut self,
        body: &Body,
        activity: Box<dyn Activity>,
    ) -> Result<(), MotionError> {
        let target = activity.target().ok_or(MotionError::MissingTarget)?;
        if !target.is_finite() || !body.position.is_finite() {
            return Err(MotionError::InvalidTarget {
                x: target.x,
                y: target.y,
            });
        }

        self.activity = Some(activity);
        self.reset();
        self.state.movement.position = body.position;

        let mut ctx = EffectCtx {
            state: &mut self.state,
            target,
            dt: 0.0,
        };
        self.effects.execute(Effect::InitMovement, &mut ctx);
        Ok(())
    }

    fn queue_brake_if_required(&mut self) -> bool {
        let required = self.is_required_to_stop_before_further_action();
        if required {
            BRAKE.iter().for_each(|e| self.effects.add_effect(*e));
        }
        required
    }
}

impl fmt::Debug for MotionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionManager")
            .field("unit", &self.unit)
            .field("state", &self.state)
            .field("effects", &self.effects.names())
            .field("dispatcher", &self.dispatcher)
            .field("activity", &self.activity.is_some())
            .field("idle_float", &self.idle_float)
            .finish()
    }
}
