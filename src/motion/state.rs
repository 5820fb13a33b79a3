use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::defs::UnitInfo;

/// Linear kinematics along the current heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Signed speed along `current_angle` (map-units / s).
    pub velocity: f32,
    pub acceleration: f32,
    /// Braking deceleration, only applied while `acceleration` is 0.
    pub drag: f32,
    pub max_velocity: f32,
    pub max_acceleration: f32,
    pub drag_threshold: f32,

    /// Body position sampled at the last update / command.
    pub position: Vec2,
    pub target: Vec2,
    pub origin: Vec2,
    pub target_initial_distance: f32,
    /// Straight-line distance left to `target`.
    pub distance: f32,
    /// Distance already covered (`target_initial_distance - distance`).
    pub distance_inverse: f32,
    pub distance_from_origin: f32,

    /// Heading the velocity is resolved along (radians).
    pub current_angle: f32,
    /// Bearing from origin to target (radians).
    pub target_angle: f32,

    /// `velocity` resolved on the X-Y plane.
    pub velocity_xy: Vec2,
}

impl Movement {
    /// Distance needed to brake from the current speed with `drag_threshold`.
    #[inline]
    pub fn braking_distance(&self) -> f32 {
        if self.drag_threshold <= 0.0 {
            return f32::INFINITY;
        }
        self.velocity * self.velocity / (2.0 * self.drag_threshold)
    }
}

/// Facing, quantized into angle codes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub current_angle_code: u16,
    pub target_angle_code: u16,
    pub max_angle_count: u16,
    /// Angle-code steps per second while turning.
    pub angular_velocity: f32,
    /// Fractional step accumulator in `[0, 1)`.
    pub angular_velocity_helper: f32,
    pub max_angular_velocity: f32,
    pub frame_padding: u16,
    /// +1 / -1, the direction of the last step taken.
    pub angular_direction: i8,
}

/// Idle float state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Levitation {
    pub time: f32,
    /// Vertical anchor of the sprite when it is not floating.
    pub default_anchor_y: f32,
    /// Offset currently added to the default anchor.
    pub offset: f32,
}

impl Levitation {
    #[inline]
    pub fn anchor_y(&self) -> f32 {
        self.default_anchor_y + self.offset
    }
}

bitflags! {
    /// Edge-triggered travel milestones.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MotionFlags: u8 {
        /// Cruise phase is over; the unit is braking onto its target.
        const ARRIVED                = 0b001;
        /// Braking finished after arriving; consumed by the arrival check.
        const STOPPED_AT_DESTINATION = 0b010;
        /// Facing matches the target code for the current command.
        const HEADED_TO_DESTINATION  = 0b100;
    }
}

/// Animation the host's animation driver should be playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    #[default]
    Idle,
    Moving,
}

/// Complete per-unit kinematic record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub movement: Movement,
    pub rotation: Rotation,
    pub levitation: Levitation,
    pub flags: MotionFlags,
    pub pose: Pose,
}

impl MotionState {
    /// Fresh state for a unit of type `info`, idle and facing code 0.
    pub fn new(info: &UnitInfo, default_anchor_y: f32) -> Self {
        Self {
            movement: Movement {
                max_velocity: info.speed,
                max_acceleration: info.speed,
                drag_threshold: info.speed,
                ..Movement::default()
            },
            rotation: Rotation {
                current_angle_code: 0,
                target_angle_code: 0,
                max_angle_count: info.directions.max(1),
                angular_velocity: 0.0,
                angular_velocity_helper: 0.0,
                max_angular_velocity: info.maneuverability,
                frame_padding: info.frame_padding(),
                angular_direction: 1,
            },
            levitation: Levitation {
                time: 0.0,
                default_anchor_y,
                offset: 0.0,
            },
            // an idle unit already faces where it is headed
            flags: MotionFlags::HEADED_TO_DESTINATION,
            pose: Pose::Idle,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.movement.velocity > 0.0
    }

    #[inline]
    pub fn is_heading_mismatched(&self) -> bool {
        self.rotation.current_angle_code != self.rotation.target_angle_code
    }

    /// Sprite-sheet frame for the current facing.
    #[inline]
    pub fn frame(&self) -> u32 {
        self.rotation.current_angle_code as u32 * self.rotation.frame_padding as u32
    }
}
