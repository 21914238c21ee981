//! Error types.
//!
//! `ConfigError` is the only hard failure in the crate and only happens while
//! loading configuration. A player action that cannot go through at runtime
//! yields a `Refusal`: an expected outcome reported back to the caller, never
//! a panic.

use std::path::PathBuf;

use thiserror::Error;

use crate::economy::UpgradeKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: String },

    #[error("unknown unit archetype `{archetype}` referenced by {referenced_by}")]
    UnknownArchetype {
        archetype: String,
        referenced_by: String,
    },

    #[error("duplicate shop item id `{0}`")]
    DuplicateShopItem(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Why a purchase, spend or upgrade was turned down
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Refusal {
    #[error("insufficient funds: cost {cost}, balance {balance}")]
    InsufficientFunds { cost: u64, balance: u64 },

    #[error("upgrade track {track:?} is already at max tier")]
    MaxTier { track: UpgradeKind },

    #[error("still cooling down ({remaining:.1}s left)")]
    CoolingDown { remaining: f32 },

    #[error("region is already at its maximum size")]
    RegionAtCapacity,

    #[error("unknown shop item `{0}`")]
    UnknownItem(String),

    #[error("unknown unit archetype `{0}`")]
    UnknownArchetype(String),
}
