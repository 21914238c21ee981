//! Entity kinds shared by config, spawning and the event outbox.

use serde::{Deserialize, Serialize};

/// Harvestable resource kinds. Each kind feeds its own ledger counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Yields wood
    Tree,
    /// Yields stone
    Mine,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Tree, ResourceKind::Mine];

    /// Name of the ledger counter this kind feeds
    pub fn ledger_name(&self) -> &'static str {
        match self {
            ResourceKind::Tree => "wood",
            ResourceKind::Mine => "stone",
        }
    }
}

/// Something the simulation can instantiate at a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnKind {
    /// A unit built from the named archetype
    Unit { archetype: String },
    /// A fresh resource of the given kind
    Resource { kind: ResourceKind },
    /// A temporary area-of-effect earner ("boombox")
    Attractor,
    /// Inert leftovers of a depleted resource
    Remnant { kind: ResourceKind },
}

impl SpawnKind {
    pub fn unit(archetype: impl Into<String>) -> Self {
        SpawnKind::Unit {
            archetype: archetype.into(),
        }
    }
}

impl std::fmt::Display for SpawnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnKind::Unit { archetype } => write!(f, "unit:{}", archetype),
            SpawnKind::Resource { kind } => write!(f, "resource:{:?}", kind),
            SpawnKind::Attractor => write!(f, "attractor"),
            SpawnKind::Remnant { kind } => write!(f, "remnant:{:?}", kind),
        }
    }
}
