use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::UnitFlags;

/// Static attributes of one unit type – the "data object" every motion
/// manager reads its limits from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitInfo {
    pub id: Cow<'static, str>,
    /// Top speed in map-units / second.  Also used as acceleration and
    /// braking drag.
    pub speed: f32,
    /// Number of rendered facing directions (angle codes).
    pub directions: u16,
    /// Angle-code steps per second while turning.
    pub maneuverability: f32,
    /// Sprite-sheet frames between two consecutive facings; 0 counts as 1.
    #[serde(default = "default_anim_frame")]
    pub anim_frame: u16,
    /// Vision radius in map-units (consumed by visibility code, not here).
    #[serde(default)]
    pub vision: f32,
    #[serde(default)]
    pub flags: UnitFlags,
}

fn default_anim_frame() -> u16 {
    1
}

impl UnitInfo {
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Frames per facing as the renderer uses it (never 0).
    #[inline]
    pub fn frame_padding(&self) -> u16 {
        self.anim_frame.max(1)
    }

    #[inline]
    pub fn has_slow_maneuverability(&self) -> bool {
        self.flags.contains(UnitFlags::SLOW_MANEUVER)
    }
}

/// Built-in unit types.
pub static UNITINFO: &[UnitInfo] = &[
    UnitInfo {
        id: Cow::Borrowed("interceptor"),
        speed: 420.0,
        directions: 16,
        maneuverability: 24.0,
        anim_frame: 1,
        vision: 380.0,
        flags: UnitFlags::empty(),
    },
    UnitInfo {
        id: Cow::Borrowed("fighter"),
        speed: 320.0,
        directions: 16,
        maneuverability: 16.0,
        anim_frame: 1,
        vision: 350.0,
        flags: UnitFlags::empty(),
    },
    UnitInfo {
        id: Cow::Borrowed("frigate"),
        speed: 160.0,
        directions: 16,
        maneuverability: 6.0,
        anim_frame: 2,
        vision: 420.0,
        flags: UnitFlags::SLOW_MANEUVER,
    },
    UnitInfo {
        id: Cow::Borrowed("carrier"),
        speed: 90.0,
        directions: 32,
        maneuverability: 4.0,
        anim_frame: 3,
        vision: 500.0,
        flags: UnitFlags::SLOW_MANEUVER,
    },
    UnitInfo {
        id: Cow::Borrowed("probe"),
        speed: 240.0,
        directions: 8,
        maneuverability: 10.0,
        anim_frame: 1,
        vision: 300.0,
        flags: UnitFlags::HOVER,
    },
    UnitInfo {
        id: Cow::Borrowed("beacon"),
        speed: 60.0,
        directions: 1,
        maneuverability: 0.0,
        anim_frame: 1,
        vision: 200.0,
        flags: UnitFlags::HOVER,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_unique() {
        for (i, a) in UNITINFO.iter().enumerate() {
            for b in &UNITINFO[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate built-in id");
            }
        }
    }

    #[test]
    fn builtin_table_is_sane() {
        for info in UNITINFO {
            assert!(info.speed > 0.0, "{} has no speed", info.id);
            assert!(info.directions >= 1, "{} has no facings", info.id);
            assert!(info.frame_padding() >= 1);
        }
    }

    #[test]
    fn lookup_by_id() {
        let frigate = crate::defs::by_id("frigate").expect("frigate missing");
        assert!(frigate.has_slow_maneuverability());
        assert!(crate::defs::by_id("nope").is_none());
    }
}
