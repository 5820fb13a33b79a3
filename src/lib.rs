//! Effect-queue driven motion for sprite units that face one of a fixed
//! number of rendered directions.
//!
//! * [`motion`] – the per-unit pipeline: state, effects, queue, events and
//!   the [`motion::MotionManager`] facade.
//! * [`defs`] – static unit attributes (built-in table + TOML tables).
//! * [`sim`] – a `hecs` arena of units driven by a fixed-rate tic runner.

pub mod defs;
pub mod logging;
pub mod motion;
pub mod sim;
