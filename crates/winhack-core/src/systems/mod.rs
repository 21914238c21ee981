//! Systems - logic that operates on components

mod attractor;
mod behavior;
mod click;
mod control;
mod earning;
mod harvest;
mod membership;
mod physics;
mod spawning;

pub use attractor::*;
pub use behavior::*;
pub use click::*;
pub use control::*;
pub use earning::*;
pub use harvest::*;
pub use membership::*;
pub use physics::*;
pub use spawning::*;
