//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior beyond small invariant-keeping helpers - the rest
//! lives in systems.

mod attractor;
mod common;
mod kinds;
mod region;
mod resources;
mod units;

pub use attractor::*;
pub use common::*;
pub use kinds::*;
pub use region::*;
pub use resources::*;
pub use units::*;
