use thiserror::Error;

/// Precondition violations reported by motion commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// The activity has nothing to move towards.
    #[error("activity supplied no target")]
    MissingTarget,

    /// Target or current position is NaN / infinite.
    #[error("target ({x}, {y}) is not a finite point")]
    InvalidTarget { x: f32, y: f32 },

    /// Effect name not present in the registry.
    #[error("no effect registered under `{0}`")]
    UnknownEffect(String),
}
