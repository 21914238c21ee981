//! Simulation configuration.
//!
//! Every section has defaults matching the shipped game tuning, so a JSON
//! document only needs to name the values it changes. Load with
//! [`SimConfig::from_json_str`] or [`SimConfig::from_path`]; both validate.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::components::{ResourceKind, SpawnKind, Vec2};
use crate::economy::ShopAction;
use crate::economy::UpgradeKind;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    pub region: RegionConfig,
    pub click: ClickConfig,
    pub attractor: AttractorConfig,
    /// Unit archetypes by name. Entries in a JSON document are merged over
    /// the default archetypes; a named archetype is replaced as a whole.
    #[serde(deserialize_with = "merge_default_units")]
    pub units: BTreeMap<String, UnitArchetype>,
    pub resources: ResourcesConfig,
    pub economy: EconomyConfig,
    pub shop: Vec<ShopEntryConfig>,
    pub progress: ProgressConfig,
    pub scene: SceneConfig,
}

fn default_units() -> BTreeMap<String, UnitArchetype> {
    let mut units = BTreeMap::new();
    units.insert("worker".to_string(), UnitArchetype::default());
    units.insert(
        "special".to_string(),
        UnitArchetype {
            gain_per_click: 2,
            move_speed: 2.5,
            passive_income: Some(PassiveIncomeConfig {
                amount: 1,
                interval: 2.0,
            }),
            offspring: Some(OffspringConfig {
                kind: SpawnKind::Resource {
                    kind: ResourceKind::Tree,
                },
                interval: 20.0,
                offset: Vec2::new(1.5, 0.0),
            }),
            ..Default::default()
        },
    );
    units
}

fn merge_default_units<'de, D>(deserializer: D) -> Result<BTreeMap<String, UnitArchetype>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, UnitArchetype>::deserialize(deserializer)?;
    let mut units = default_units();
    units.extend(overrides);
    Ok(units)
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            region: RegionConfig::default(),
            click: ClickConfig::default(),
            attractor: AttractorConfig::default(),
            units: default_units(),
            resources: ResourcesConfig::default(),
            economy: EconomyConfig::default(),
            shop: default_shop(),
            progress: ProgressConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub position: Vec2,
    pub half_extent: Vec2,
    /// Movement bounds from the origin, per axis
    pub max_distance: Vec2,
    /// Keyboard move speed, also the drag smoothing rate
    pub keyboard_speed: f32,
    /// Initial camera zoom (orthographic half-height)
    pub camera_zoom: f32,
    /// Zoom change per unit of half-extent growth
    pub zoom_per_unit: f32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            half_extent: Vec2::new(3.0, 3.0),
            max_distance: Vec2::new(20.0, 20.0),
            keyboard_speed: 5.0,
            camera_zoom: 5.0,
            zoom_per_unit: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    pub radius: f32,
    /// Floating text appears this far above the credited unit
    pub text_offset: f32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            text_offset: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractorConfig {
    pub radius: f32,
    pub pull_force: f32,
    pub max_pull: f32,
    pub credit_interval: f32,
    pub lifetime: f32,
}

impl Default for AttractorConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            pull_force: 5.0,
            max_pull: 0.5,
            credit_interval: 1.0,
            lifetime: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitArchetype {
    pub gain_per_click: u64,
    pub move_speed: f32,
    pub work_interval: f32,
    pub work_amount: u32,
    pub wander_force: f32,
    pub wander_interval_min: f32,
    pub wander_interval_max: f32,
    pub bounce_force: f32,
    pub radius: f32,
    pub mass: f32,
    pub damping: f32,
    pub passive_income: Option<PassiveIncomeConfig>,
    pub offspring: Option<OffspringConfig>,
}

impl Default for UnitArchetype {
    fn default() -> Self {
        Self {
            gain_per_click: 1,
            move_speed: 2.0,
            work_interval: 1.0,
            work_amount: 1,
            wander_force: 1.0,
            wander_interval_min: 1.0,
            wander_interval_max: 2.0,
            bounce_force: 0.5,
            radius: 0.5,
            mass: 1.0,
            damping: 1.0,
            passive_income: None,
            offspring: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassiveIncomeConfig {
    pub amount: u64,
    pub interval: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffspringConfig {
    pub kind: SpawnKind,
    pub interval: f32,
    #[serde(default)]
    pub offset: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceArchetype {
    pub max_health: u32,
    pub yield_amount: u32,
    pub radius: f32,
    /// Spawned in place of the resource when it is depleted
    pub successor: Option<SpawnKind>,
}

impl Default for ResourceArchetype {
    fn default() -> Self {
        Self {
            max_health: 5,
            yield_amount: 1,
            radius: 0.5,
            successor: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub tree: ResourceArchetype,
    pub mine: ResourceArchetype,
}

impl ResourcesConfig {
    pub fn get(&self, kind: ResourceKind) -> &ResourceArchetype {
        match kind {
            ResourceKind::Tree => &self.tree,
            ResourceKind::Mine => &self.mine,
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            tree: ResourceArchetype {
                successor: Some(SpawnKind::Remnant {
                    kind: ResourceKind::Tree,
                }),
                ..Default::default()
            },
            mine: ResourceArchetype {
                max_health: 8,
                yield_amount: 2,
                radius: 0.6,
                successor: Some(SpawnKind::Remnant {
                    kind: ResourceKind::Mine,
                }),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_balance: u64,
    pub upgrades: UpgradesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradesConfig {
    pub region: UpgradeTrackConfig,
    pub click_radius: UpgradeTrackConfig,
}

impl UpgradesConfig {
    pub fn get(&self, kind: UpgradeKind) -> &UpgradeTrackConfig {
        match kind {
            UpgradeKind::Region => &self.region,
            UpgradeKind::ClickRadius => &self.click_radius,
        }
    }
}

impl Default for UpgradesConfig {
    fn default() -> Self {
        Self {
            region: UpgradeTrackConfig {
                max_tier: 8,
                costs: vec![50, 100, 200, 350, 550, 800, 1100, 1500],
                step: 1.0,
            },
            click_radius: UpgradeTrackConfig {
                max_tier: 10,
                costs: vec![30, 60, 100, 150, 220, 300, 400, 520, 660, 820],
                step: 2.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeTrackConfig {
    pub max_tier: u32,
    /// Per-tier prices; shorter than `max_tier` repeats the last entry
    pub costs: Vec<u64>,
    /// Half-extent growth (region) or radius growth (click) per tier
    pub step: f32,
}

impl Default for UpgradeTrackConfig {
    fn default() -> Self {
        Self {
            max_tier: 1,
            costs: vec![50],
            step: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopEntryConfig {
    pub id: String,
    #[serde(flatten)]
    pub action: ShopAction,
    #[serde(default)]
    pub cooldown: f32,
}

fn default_shop() -> Vec<ShopEntryConfig> {
    vec![
        ShopEntryConfig {
            id: "buy_unit".into(),
            action: ShopAction::Buy {
                kind: SpawnKind::unit("worker"),
                cost: 25,
            },
            cooldown: 15.0,
        },
        ShopEntryConfig {
            id: "buy_special_unit".into(),
            action: ShopAction::Buy {
                kind: SpawnKind::unit("special"),
                cost: 100,
            },
            cooldown: 15.0,
        },
        ShopEntryConfig {
            id: "buy_boombox".into(),
            action: ShopAction::Buy {
                kind: SpawnKind::Attractor,
                cost: 60,
            },
            cooldown: 30.0,
        },
        ShopEntryConfig {
            id: "upgrade_region".into(),
            action: ShopAction::Upgrade {
                track: UpgradeKind::Region,
            },
            cooldown: 5.0,
        },
        ShopEntryConfig {
            id: "upgrade_click_radius".into(),
            action: ShopAction::Upgrade {
                track: UpgradeKind::ClickRadius,
            },
            cooldown: 5.0,
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Lifetime earnings that count as 100%
    pub target: u64,
    /// Countdown length in seconds
    pub duration_secs: f32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            target: 10_000,
            duration_secs: 300.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitPlacement {
    pub archetype: String,
    pub position: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePlacement {
    pub kind: ResourceKind,
    pub position: Vec2,
}

/// Entities present when the session starts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub units: Vec<UnitPlacement>,
    pub resources: Vec<ResourcePlacement>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            units: vec![UnitPlacement {
                archetype: "worker".into(),
                position: Vec2::ZERO,
            }],
            resources: vec![
                ResourcePlacement {
                    kind: ResourceKind::Tree,
                    position: Vec2::new(2.0, 1.0),
                },
                ResourcePlacement {
                    kind: ResourceKind::Tree,
                    position: Vec2::new(-6.0, 4.0),
                },
                ResourcePlacement {
                    kind: ResourceKind::Mine,
                    position: Vec2::new(7.0, -5.0),
                },
            ],
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn unit_archetype(&self, name: &str) -> Option<&UnitArchetype> {
        self.units.get(name)
    }

    /// Check structural invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.region;
        finite("region.position.x", r.position.x)?;
        finite("region.position.y", r.position.y)?;
        positive("region.half_extent.x", r.half_extent.x)?;
        positive("region.half_extent.y", r.half_extent.y)?;
        positive("region.max_distance.x", r.max_distance.x)?;
        positive("region.max_distance.y", r.max_distance.y)?;
        non_negative("region.keyboard_speed", r.keyboard_speed)?;
        positive("region.camera_zoom", r.camera_zoom)?;
        non_negative("region.zoom_per_unit", r.zoom_per_unit)?;
        non_negative("click.radius", self.click.radius)?;
        finite("click.text_offset", self.click.text_offset)?;

        let a = &self.attractor;
        non_negative("attractor.radius", a.radius)?;
        non_negative("attractor.pull_force", a.pull_force)?;
        non_negative("attractor.max_pull", a.max_pull)?;
        positive("attractor.credit_interval", a.credit_interval)?;
        positive("attractor.lifetime", a.lifetime)?;

        for (name, unit) in &self.units {
            let field = |f: &str| format!("units.{}.{}", name, f);
            non_negative(&field("move_speed"), unit.move_speed)?;
            positive(&field("work_interval"), unit.work_interval)?;
            positive(&field("mass"), unit.mass)?;
            non_negative(&field("radius"), unit.radius)?;
            non_negative(&field("damping"), unit.damping)?;
            non_negative(&field("wander_force"), unit.wander_force)?;
            non_negative(&field("bounce_force"), unit.bounce_force)?;
            non_negative(&field("wander_interval_min"), unit.wander_interval_min)?;
            non_negative(&field("wander_interval_max"), unit.wander_interval_max)?;
            if unit.wander_interval_min > unit.wander_interval_max {
                return Err(ConfigError::invalid(
                    field("wander_interval_max"),
                    "must not be below wander_interval_min",
                ));
            }
            if let Some(income) = &unit.passive_income {
                positive(&field("passive_income.interval"), income.interval)?;
            }
            if let Some(offspring) = &unit.offspring {
                positive(&field("offspring.interval"), offspring.interval)?;
                finite(&field("offspring.offset.x"), offspring.offset.x)?;
                finite(&field("offspring.offset.y"), offspring.offset.y)?;
                self.check_spawn_kind(&offspring.kind, &field("offspring"))?;
            }
        }

        for kind in ResourceKind::ALL {
            let res = self.resources.get(kind);
            let field = |f: &str| format!("resources.{:?}.{}", kind, f).to_lowercase();
            if res.max_health == 0 {
                return Err(ConfigError::invalid(field("max_health"), "must be at least 1"));
            }
            non_negative(&field("radius"), res.radius)?;
            if let Some(successor) = &res.successor {
                self.check_spawn_kind(successor, "resource successor")?;
            }
        }

        for kind in UpgradeKind::ALL {
            let track = self.economy.upgrades.get(kind);
            if track.costs.is_empty() {
                return Err(ConfigError::invalid(
                    format!("economy.upgrades.{}.costs", kind.name()),
                    "cost table must have at least one entry",
                ));
            }
            // Upgrades only ever grow the region and the click radius
            positive(&format!("economy.upgrades.{}.step", kind.name()), track.step)?;
        }

        let mut seen = HashSet::new();
        for entry in &self.shop {
            if !seen.insert(entry.id.as_str()) {
                return Err(ConfigError::DuplicateShopItem(entry.id.clone()));
            }
            non_negative(&format!("shop.{}.cooldown", entry.id), entry.cooldown)?;
            if let ShopAction::Buy { kind, .. } = &entry.action {
                self.check_spawn_kind(kind, &format!("shop item `{}`", entry.id))?;
            }
        }

        non_negative("progress.duration_secs", self.progress.duration_secs)?;

        for placement in &self.scene.units {
            if !self.units.contains_key(&placement.archetype) {
                return Err(ConfigError::UnknownArchetype {
                    archetype: placement.archetype.clone(),
                    referenced_by: "scene".into(),
                });
            }
        }

        Ok(())
    }

    fn check_spawn_kind(&self, kind: &SpawnKind, referenced_by: &str) -> Result<(), ConfigError> {
        match kind {
            SpawnKind::Unit { archetype } if !self.units.contains_key(archetype) => {
                Err(ConfigError::UnknownArchetype {
                    archetype: archetype.clone(),
                    referenced_by: referenced_by.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

fn finite(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {}", value)))
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be > 0, got {}", value)))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be >= 0, got {}", value)))
    }
}
