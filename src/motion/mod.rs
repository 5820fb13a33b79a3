pub mod activity;
pub mod angle;
pub mod body;
pub mod effects;
pub mod error;
pub mod events;
pub mod manager;
pub mod queue;
pub mod state;

pub use activity::{Activity, PointActivity};
pub use body::{Body, DEFAULT_ANCHOR};
pub use effects::{Effect, EffectCtx, Progress};
pub use error::MotionError;
pub use events::{EventDispatcher, ListenerId, MotionEvent};
pub use manager::MotionManager;
pub use queue::EffectQueue;
pub use state::{Levitation, MotionFlags, MotionState, Movement, Pose, Rotation};
