//! Shared types for the tickline engine core.
//!
//! Everything here is plain data: entity handles, exact simulation time, and
//! the draw command vocabulary spoken between entities and render backends.

mod draw;
mod time;
mod types;

pub use draw::{DrawTarget, Quad};
pub use time::SimTime;
pub use types::{Color, EntityId};
