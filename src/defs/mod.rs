pub mod flags;
pub mod table;
pub mod unitinfo;

pub use self::{
    flags::UnitFlags,
    table::{TableError, UnitTable},
    unitinfo::{UNITINFO, UnitInfo},
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

static BY_ID: Lazy<HashMap<&'static str, &'static UnitInfo>> =
    Lazy::new(|| UNITINFO.iter().map(|info| (info.id(), info)).collect());

/// Built-in unit type by its id (`"frigate"`, `"probe"`, ...).
pub fn by_id(id: &str) -> Option<&'static UnitInfo> {
    BY_ID.get(id).copied()
}
