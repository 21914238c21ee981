//! Unit components: identity, eligibility, behavior state and capabilities.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::{IntervalTimer, Vec2};
use super::kinds::SpawnKind;

/// Marker + core data for an autonomous unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Archetype this unit was built from
    pub archetype: String,
    /// Currency credited per manual click or attractor pulse
    pub gain_per_click: u64,
    /// Set on region entry, cleared on exit. Only the membership system writes it.
    pub can_earn: bool,
}

impl Unit {
    pub fn new(archetype: impl Into<String>, gain_per_click: u64) -> Self {
        Self {
            archetype: archetype.into(),
            gain_per_click,
            can_earn: false,
        }
    }
}

/// Movement/work state, re-evaluated every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    #[default]
    Wandering,
    Approaching(Entity),
    Harvesting(Entity),
}

impl Behavior {
    pub fn target(&self) -> Option<Entity> {
        match self {
            Behavior::Wandering => None,
            Behavior::Approaching(e) | Behavior::Harvesting(e) => Some(*e),
        }
    }

    pub fn is_wandering(&self) -> bool {
        matches!(self, Behavior::Wandering)
    }
}

/// Harvesting capability
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Worker {
    /// Straight-line approach speed (units/second)
    pub move_speed: f32,
    /// Damage dealt per work strike
    pub work_amount: u32,
    /// Seconds between strikes; starts primed so the first contact strikes at once
    pub work_timer: IntervalTimer,
    /// Weak reference to the bound resource; may dangle after depletion
    #[serde(skip)]
    pub target: Option<Entity>,
}

impl Worker {
    pub fn new(move_speed: f32, work_interval: f32, work_amount: u32) -> Self {
        Self {
            move_speed,
            work_amount,
            work_timer: IntervalTimer::primed(work_interval),
            target: None,
        }
    }
}

/// Random-impulse wandering and border bounce tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wanderer {
    pub force: f32,
    pub interval_min: f32,
    pub interval_max: f32,
    pub bounce_force: f32,
    /// Seconds until the next impulse is due
    pub next_in: f32,
}

impl Wanderer {
    pub fn new(force: f32, interval_min: f32, interval_max: f32, bounce_force: f32) -> Self {
        Self {
            force,
            interval_min,
            interval_max,
            bounce_force,
            next_in: 0.0,
        }
    }

    pub fn schedule<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.next_in = if self.interval_max > self.interval_min {
            rng.gen_range(self.interval_min..=self.interval_max)
        } else {
            self.interval_min
        };
    }
}

/// Passive currency generation while eligible
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PassiveIncome {
    pub amount: u64,
    pub timer: IntervalTimer,
}

impl PassiveIncome {
    pub fn new(amount: u64, interval: f32) -> Self {
        Self {
            amount,
            timer: IntervalTimer::new(interval),
        }
    }
}

/// Periodically spawns a configured entity next to the unit while eligible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offspring {
    pub kind: SpawnKind,
    pub offset: Vec2,
    pub timer: IntervalTimer,
}

impl Offspring {
    pub fn new(kind: SpawnKind, interval: f32, offset: Vec2) -> Self {
        Self {
            kind,
            offset,
            timer: IntervalTimer::new(interval),
        }
    }
}
