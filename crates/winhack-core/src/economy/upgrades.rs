//! Tiered upgrade tracks (region size, click radius).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::UpgradeTrackConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Grows the region and zooms the camera out
    Region,
    /// Widens the manual click radius
    ClickRadius,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 2] = [UpgradeKind::Region, UpgradeKind::ClickRadius];

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::Region => "region",
            UpgradeKind::ClickRadius => "click_radius",
        }
    }
}

impl FromStr for UpgradeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" | "window" => Ok(UpgradeKind::Region),
            "click_radius" | "click" => Ok(UpgradeKind::ClickRadius),
            other => Err(format!("unknown upgrade track `{}`", other)),
        }
    }
}

/// One upgrade track: current tier, cap and per-tier prices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeTrack {
    pub tier: u32,
    pub max_tier: u32,
    /// Price of tier `i` is `costs[i]`; a short table repeats its last entry
    pub costs: Vec<u64>,
    /// Effect size applied per tier
    pub step: f32,
}

impl UpgradeTrack {
    pub fn from_config(config: &UpgradeTrackConfig) -> Self {
        Self {
            tier: 0,
            max_tier: config.max_tier,
            costs: config.costs.clone(),
            step: config.step,
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.tier >= self.max_tier
    }

    /// Price of the next tier, `None` once maxed
    pub fn next_cost(&self) -> Option<u64> {
        if self.is_maxed() {
            return None;
        }
        self.cost_at(self.tier)
    }

    fn cost_at(&self, tier: u32) -> Option<u64> {
        let last = self.costs.len().checked_sub(1)?;
        self.costs.get((tier as usize).min(last)).copied()
    }
}

/// Applied upgrade, handed back so the caller can apply the effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeStep {
    pub track: UpgradeKind,
    /// Tier after the upgrade
    pub tier: u32,
    pub step: f32,
    pub cost: u64,
}
