mod components;
mod error;
mod systems;
mod tic;
mod unit;

pub use components::Class;
pub use error::SimError;
pub use systems::{motion, physics};
pub use tic::{DT, SIM_FPS, TicRunner};
pub use unit::spawn_unit;
