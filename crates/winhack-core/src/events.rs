//! Simulation outbox - everything presentation collaborators react to.
//!
//! Systems push events while a tick runs; the host drains them after
//! `Simulation::update` returns, so every credit of a tick has landed before
//! anything is rendered.

use hecs::Entity;

use crate::components::{ResourceKind, SpawnKind, Vec2};
use crate::economy::UpgradeKind;

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Currency balance changed (UI counter)
    CurrencyChanged { balance: u64 },
    /// A resource ledger counter changed
    ResourceLedgerChanged { kind: ResourceKind, count: u64 },
    /// Price of the next tier changed; `None` once the track is maxed
    UpgradeCostChanged {
        track: UpgradeKind,
        next_cost: Option<u64>,
    },
    /// Outcome of a shop purchase attempt
    PurchaseResult { item: String, success: bool },
    /// Spend succeeded or failed (buy / error sound)
    SpendFeedback { success: bool },
    /// A click credited at least one unit (click sound)
    ClickFeedback { units: u32, total: u64 },
    /// First successful click of the session
    TutorialDismissed,
    /// "+amount" popup at a world position
    FloatingText { position: Vec2, amount: u64 },
    /// Player started moving the region (loop sound on)
    RegionMovementStarted,
    /// Player stopped moving the region (loop sound off)
    RegionMovementStopped,
    UnitEnteredRegion { entity: Entity },
    UnitExitedRegion { entity: Entity },
    ResourceDepleted {
        entity: Entity,
        kind: ResourceKind,
        position: Vec2,
    },
    /// Spawn collaborator should instantiate a presentation object
    Spawned {
        entity: Entity,
        kind: SpawnKind,
        position: Vec2,
    },
    /// Presentation object should be removed
    Despawned { entity: Entity },
    /// Camera zoom parameter shifted after a region resize
    ZoomChanged { zoom: f32 },
    /// Objective countdown reached zero
    ObjectiveExpired { progress_percent: f32 },
}

/// Ordered event buffer
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Count events matching a predicate (handy for tests and harnesses)
    pub fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
