//! Live entity registry for the tickline engine core.
//!
//! Entities live in a generational arena and are enrolled into two ordered
//! collections: every live entity, and the collidable subset. Parents own an
//! ordered child list; children hold a lookup-only back reference.
//!
//! # Invariants
//! - A live entity appears exactly once in `all`, and exactly once in
//!   `collidable` iff it was enrolled as collidable.
//! - Destruction only marks. Entities leave the collections during the sweep
//!   at the end of [`Registry::update`] and at no other point.
//! - Once an entity is destroyed, none of its descendants is updated for the
//!   rest of that tick.
//! - Each entity is updated at most once per tick, even if it is detached
//!   and becomes a root after it ran.

mod entity;
mod query;
mod registry;

pub use entity::{Behavior, Entity, EntityDesc, UpdateContext};
pub use query::{Region, aabb_overlap};
pub use registry::{Registry, UpdateStats};

pub use tickline_common::{EntityId, SimTime};
