//! Discrete facing math.
//!
//! A unit is drawn in one of `max_angle_count` facings.  Code 0 is the
//! sprite sheet's first facing, which the art draws pointing *down*
//! (south, +Y on screen); codes grow clockwise.  A bearing of 0 rad points
//! east, so it lands three quarters of the way round the sheet.

use glam::Vec2;

/// Bearing in radians from `from` towards `to` (0 = +X, +Y is down-screen).
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Offset that aligns bearing 0 with code 0 of the sprite sheet.
#[inline]
pub fn rotation_offset(max_angle_count: u16) -> i64 {
    (max_angle_count as f32 * 0.75).floor() as i64
}

/// Quantize a bearing in radians into an angle code in `[0, max_angle_count)`.
///
/// Single-facing units always report 0.
pub fn target_angle_code(angle: f32, max_angle_count: u16) -> u16 {
    if max_angle_count <= 1 {
        return 0;
    }
    let n = max_angle_count as i64;

    let mut degrees = angle.to_degrees();
    if degrees < 0.0 {
        degrees = 360.0 - degrees.abs();
    }
    let sector = (degrees / (360.0 / max_angle_count as f32)).floor() as i64;

    (sector + rotation_offset(max_angle_count)).rem_euclid(n) as u16
}

/// Advance `code` one facing in `direction` (+1 / -1), wrapping round.
#[inline]
pub fn step(code: u16, direction: i8, max_angle_count: u16) -> u16 {
    let n = max_angle_count.max(1) as i32;
    (code as i32 + direction.signum() as i32).rem_euclid(n) as u16
}

/// Facings to walk from `current` to `target` going up (+1) and down (-1).
#[inline]
pub fn step_counts(current: u16, target: u16, max_angle_count: u16) -> (u16, u16) {
    let n = max_angle_count.max(1) as i32;
    let up = (target as i32 - current as i32).rem_euclid(n);
    let down = (current as i32 - target as i32).rem_euclid(n);
    (up as u16, down as u16)
}

/// The cheaper way round; ties go up.
#[inline]
pub fn shorter_direction(current: u16, target: u16, max_angle_count: u16) -> i8 {
    let (up, down) = step_counts(current, target, max_angle_count);
    if down < up { -1 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn east_on_sixteen_facings_is_twelve() {
        assert_eq!(target_angle_code(0.0, 16), 12);
    }

    #[test]
    fn cardinal_bearings_on_sixteen_facings() {
        // south (+Y) is a quarter turn clockwise from east
        assert_eq!(target_angle_code(FRAC_PI_2, 16), 0);
        // north (-Y)
        assert_eq!(target_angle_code(-FRAC_PI_2, 16), 8);
        // west
        assert_eq!(target_angle_code(PI, 16), 4);
    }

    #[test]
    fn single_facing_is_always_zero() {
        for a in [-PI, -1.0, 0.0, 1.0, PI] {
            assert_eq!(target_angle_code(a, 1), 0);
        }
    }

    #[test]
    fn codes_stay_in_range() {
        for n in [2u16, 3, 5, 8, 16, 32, 36] {
            let mut a = -2.0 * TAU;
            while a <= 2.0 * TAU {
                let code = target_angle_code(a, n);
                assert!(code < n, "angle {a} on {n} facings gave {code}");
                a += 0.013;
            }
            // values that round to exactly 360°
            assert!(target_angle_code(-1e-9, n) < n);
            assert!(target_angle_code(-f32::EPSILON, n) < n);
        }
    }

    #[test]
    fn stepping_wraps() {
        assert_eq!(step(15, 1, 16), 0);
        assert_eq!(step(0, -1, 16), 15);
        assert_eq!(step(7, 1, 16), 8);
        assert_eq!(step(0, 1, 1), 0);
    }

    #[test]
    fn picks_shorter_way_round() {
        assert_eq!(shorter_direction(0, 3, 16), 1);
        assert_eq!(shorter_direction(0, 13, 16), -1);
        assert_eq!(shorter_direction(14, 1, 16), 1);
        assert_eq!(shorter_direction(1, 14, 16), -1);
    }

    #[test]
    fn tie_goes_up() {
        assert_eq!(shorter_direction(0, 8, 16), 1);
        assert_eq!(shorter_direction(5, 1, 8), 1);
    }

    #[test]
    fn bearing_points_at_target() {
        assert!((bearing(Vec2::ZERO, Vec2::new(10.0, 0.0))).abs() < 1e-6);
        assert!((bearing(Vec2::ZERO, Vec2::new(0.0, 4.0)) - FRAC_PI_2).abs() < 1e-6);
    }
}
