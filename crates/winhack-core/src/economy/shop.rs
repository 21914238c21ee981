//! Cooldown-gated shop entries.

use serde::{Deserialize, Serialize};

use super::upgrades::UpgradeKind;
use crate::components::SpawnKind;
use crate::config::ShopEntryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateState {
    Ready,
    Cooling { remaining: f32 },
}

/// Cooldown guarding one buyable action. Only a successful purchase starts it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PurchaseGate {
    pub cooldown: f32,
    pub state: GateState,
}

impl PurchaseGate {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown: cooldown.max(0.0),
            state: GateState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    pub fn remaining(&self) -> f32 {
        match self.state {
            GateState::Ready => 0.0,
            GateState::Cooling { remaining } => remaining,
        }
    }

    /// Enter cooldown after a successful purchase
    pub fn start(&mut self) {
        if self.cooldown > 0.0 {
            self.state = GateState::Cooling {
                remaining: self.cooldown,
            };
        }
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        if let GateState::Cooling { remaining } = self.state {
            let left = remaining - delta_seconds;
            self.state = if left <= 0.0 {
                GateState::Ready
            } else {
                GateState::Cooling { remaining: left }
            };
        }
    }

    /// Cooldown fill for the button overlay: 0 right after a purchase, 1 when ready
    pub fn fill(&self) -> f32 {
        match self.state {
            GateState::Ready => 1.0,
            GateState::Cooling { remaining } if self.cooldown > 0.0 => {
                (1.0 - remaining / self.cooldown).clamp(0.0, 1.0)
            }
            GateState::Cooling { .. } => 1.0,
        }
    }
}

/// What a shop entry does when bought
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ShopAction {
    /// Spend a fixed price and spawn at the region's position
    Buy { kind: SpawnKind, cost: u64 },
    /// Buy the next tier of an upgrade track at the track's price
    Upgrade { track: UpgradeKind },
}

#[derive(Debug, Clone)]
pub struct ShopEntry {
    pub id: String,
    pub action: ShopAction,
    pub gate: PurchaseGate,
}

/// Ordered list of buyable entries
#[derive(Debug, Clone, Default)]
pub struct Shop {
    entries: Vec<ShopEntry>,
}

impl Shop {
    pub fn new(configs: &[ShopEntryConfig]) -> Self {
        Self {
            entries: configs
                .iter()
                .map(|c| ShopEntry {
                    id: c.id.clone(),
                    action: c.action.clone(),
                    gate: PurchaseGate::new(c.cooldown),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[ShopEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ShopEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ShopEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        for entry in &mut self.entries {
            entry.gate.tick(delta_seconds);
        }
    }
}

/// Snapshot a UI button needs to draw itself
#[derive(Debug, Clone, PartialEq)]
pub struct ShopButtonState {
    pub id: String,
    /// Current price; `None` for a maxed upgrade
    pub cost: Option<u64>,
    pub affordable: bool,
    pub ready: bool,
    /// Upgrade track exhausted - the button should be hidden
    pub maxed: bool,
    pub interactable: bool,
    pub cooldown_fill: f32,
}

/// What a successful purchase produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Purchase {
    Spawned(hecs::Entity),
    Upgraded(super::upgrades::UpgradeStep),
}
