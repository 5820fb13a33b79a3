//! Unit tables loaded from TOML.
//!
//! ```toml
//! [[unit]]
//! id = "scout"
//! speed = 300.0
//! directions = 16
//! maneuverability = 12.0
//! flags = "HOVER"
//! ```

use std::{collections::HashMap, fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

use super::{UNITINFO, UnitInfo};

/// Errors that can be encountered while loading a unit table.
#[derive(Error, Debug)]
pub enum TableError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File is not valid TOML or does not match the table layout.
    #[error("malformed unit table: {0}")]
    Parse(#[from] toml::de::Error),

    /// A unit carries attributes the motion code cannot work with.
    #[error("unit `{id}`: {reason}")]
    Invalid { id: String, reason: &'static str },

    /// Two entries share the same id.
    #[error("duplicate unit id `{0}`")]
    Duplicate(String),
}

#[derive(Deserialize)]
struct RawTable {
    #[serde(default, rename = "unit")]
    units: Vec<UnitInfo>,
}

/// Set of unit types addressable by id.
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    units: Vec<UnitInfo>,
    by_id: HashMap<String, usize>,
}

impl UnitTable {
    /// Table holding the built-in unit types.
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_units(UNITINFO.to_vec())
    }

    pub fn from_units(units: Vec<UnitInfo>) -> Result<Self, TableError> {
        let mut by_id = HashMap::with_capacity(units.len());
        for (i, info) in units.iter().enumerate() {
            validate(info)?;
            if by_id.insert(info.id().to_owned(), i).is_some() {
                return Err(TableError::Duplicate(info.id().to_owned()));
            }
        }
        Ok(Self { units, by_id })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, TableError> {
        let raw: RawTable = toml::from_str(text)?;
        Self::from_units(raw.units)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Add the entries of `other`, replacing same-id entries.
    pub fn merge(&mut self, other: UnitTable) {
        for info in other.units {
            match self.by_id.get(info.id()) {
                Some(&i) => self.units[i] = info,
                None => {
                    self.by_id.insert(info.id().to_owned(), self.units.len());
                    self.units.push(info);
                }
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&UnitInfo> {
        self.by_id.get(id).map(|&i| &self.units[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitInfo> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

fn validate(info: &UnitInfo) -> Result<(), TableError> {
    let invalid = |reason| TableError::Invalid {
        id: info.id().to_owned(),
        reason,
    };
    if info.id().is_empty() {
        return Err(invalid("empty id"));
    }
    if !(info.speed.is_finite() && info.speed > 0.0) {
        return Err(invalid("speed must be a positive number"));
    }
    if info.directions == 0 {
        return Err(invalid("needs at least one direction"));
    }
    if !(info.maneuverability.is_finite() && info.maneuverability >= 0.0) {
        return Err(invalid("maneuverability must be zero or positive"));
    }
    // with 0 a unit that has more than one facing could never turn
    if info.directions > 1 && info.maneuverability <= 0.0 {
        return Err(invalid("a unit with several facings needs a positive maneuverability"));
    }
    Ok(())
}
