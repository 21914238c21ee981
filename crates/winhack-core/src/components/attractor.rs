//! Temporary area-of-effect earner ("boombox").

use serde::{Deserialize, Serialize};

use super::common::IntervalTimer;
use crate::config::AttractorConfig;

/// Pulls nearby eligible units in and auto-clicks them on a fixed cadence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attractor {
    pub radius: f32,
    /// Velocity change per second applied toward the center
    pub pull_force: f32,
    /// Upper bound on the per-tick velocity change
    pub max_pull: f32,
    pub credit_timer: IntervalTimer,
    pub age: f32,
    pub lifetime: f32,
}

impl Attractor {
    pub fn from_config(config: &AttractorConfig) -> Self {
        Self {
            radius: config.radius,
            pull_force: config.pull_force,
            max_pull: config.max_pull,
            credit_timer: IntervalTimer::new(config.credit_interval),
            age: 0.0,
            lifetime: config.lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Pull magnitude for a tick of `delta_seconds`
    pub fn pull(&self, delta_seconds: f32) -> f32 {
        (self.pull_force * delta_seconds).min(self.max_pull)
    }
}
