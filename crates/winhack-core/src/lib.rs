//! WinHack Core - Idle Clicker Simulation Engine
//!
//! The simulation core of a real-time idle/clicker game: autonomous units
//! wander a 2D world, harvest resources and earn currency, but only while
//! they are inside a movable, resizable region the player controls.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Units, resources, attractors, remnants
//! - **Components**: Pure data attached to entities (Position, Body, Unit, Worker, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Session-wide state (region, economy, shop, objective timer) lives on the
//! [`engine::Simulation`] context object. Presentation is driven entirely by
//! the [`events::SimEvent`] outbox the host drains after each tick.
//!
//! # Example
//!
//! ```rust,no_run
//! use winhack_core::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig::default()).unwrap();
//!
//! loop {
//!     sim.update(1.0 / 60.0, &InputFrame::idle()); // 60 FPS
//!     for event in sim.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod economy;
pub mod engine;
pub mod error;
pub mod events;
pub mod input;
pub mod progress;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimConfig;
    pub use crate::economy::{Purchase, ShopButtonState, UpgradeKind};
    pub use crate::engine::Simulation;
    pub use crate::error::{ConfigError, Refusal};
    pub use crate::events::SimEvent;
    pub use crate::input::InputFrame;
}
