//! Kernel: fixed-timestep scheduling and the simulation context it drives.
//!
//! # Invariants
//! - Simulation time advances only in whole fixed steps; wall-clock jitter
//!   and the debug time scale change how many steps run, never their size.
//! - Steps within a frame run synchronously in the order pre-update,
//!   registry update, post-update, diagnostic.
//! - The number of steps per frame is bounded, even after a long stall.
//! - While paused the accumulator is frozen; frames still render.

pub mod clock;
pub mod config;
pub mod resources;
pub mod scheduler;
pub mod world;

pub use clock::SimulationClock;
pub use config::{ConfigError, SchedulerConfig};
pub use resources::Resources;
pub use scheduler::{FrameHooks, FrameReport, FrameScheduler};
pub use world::World;
