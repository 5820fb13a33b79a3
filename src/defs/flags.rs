use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Static behaviour traits carried by every unit type.
    ///
    /// In TOML tables they are written as `flags = "SLOW_MANEUVER | HOVER"`.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UnitFlags: u32 {
        // Must brake to a full stop before it may change heading.
        const SLOW_MANEUVER  = 0x0000_0001;
        // Floats up and down whenever no order is running.
        const HOVER          = 0x0000_0002;
    }
}
