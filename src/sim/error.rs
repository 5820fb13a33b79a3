use hecs::Entity;
use thiserror::Error;

use crate::motion::MotionError;

#[derive(Error, Debug)]
pub enum SimError {
    /// Entity is gone or was never spawned as a unit.
    #[error("entity {0:?} is not a live unit")]
    NoSuchEntity(Entity),

    #[error(transparent)]
    Motion(#[from] MotionError),
}
