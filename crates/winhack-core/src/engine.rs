//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::config::SimConfig;
use crate::economy::{Economy, Purchase, Shop, ShopAction, ShopButtonState, UpgradeKind, UpgradeStep, UpgradeTrack};
use crate::error::{ConfigError, Refusal};
use crate::events::{EventLog, SimEvent};
use crate::input::InputFrame;
use crate::progress::{percent, HackTimer};
use crate::systems::*;

/// Main simulation engine. Owns the world and every piece of session state
/// the systems share.
pub struct Simulation {
    /// ECS world containing units, resources, attractors and remnants
    pub world: World,
    region: Region,
    control: RegionControl,
    economy: Economy,
    shop: Shop,
    hack_timer: HackTimer,
    click_radius: f32,
    camera_zoom: f32,
    events: EventLog,
    rng: StdRng,
    config: SimConfig,
    /// Spawn order for resources
    next_serial: u64,
    tutorial_dismissed: bool,
    /// Seconds simulated since start
    sim_time: f64,
}

impl Simulation {
    /// Build a session from a config and populate its starting scene.
    /// Seeds from `config.seed`, or from entropy when unset.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Same as [`Simulation::new`] with an explicit RNG
    pub fn with_rng(config: SimConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let max_resizes = config.economy.upgrades.region.max_tier;
        let mut sim = Self {
            world: World::new(),
            region: Region::from_config(&config.region, max_resizes),
            control: RegionControl::new(config.region.keyboard_speed),
            economy: Economy::new(&config.economy),
            shop: Shop::new(&config.shop),
            hack_timer: HackTimer::from_config(&config.progress),
            click_radius: config.click.radius,
            camera_zoom: config.region.camera_zoom,
            events: EventLog::new(),
            rng,
            config,
            next_serial: 0,
            tutorial_dismissed: false,
            sim_time: 0.0,
        };
        sim.populate()?;
        Ok(sim)
    }

    fn populate(&mut self) -> Result<(), ConfigError> {
        let scene = self.config.scene.clone();
        for placement in &scene.units {
            self.spawn(&SpawnKind::unit(placement.archetype.as_str()), placement.position)
                .map_err(|_| ConfigError::UnknownArchetype {
                    archetype: placement.archetype.clone(),
                    referenced_by: "scene".into(),
                })?;
        }
        for placement in &scene.resources {
            // Resources always resolve
            let _ = self.spawn(
                &SpawnKind::Resource {
                    kind: placement.kind,
                },
                placement.position,
            );
        }
        log::info!(
            "Session ready: {} units, {} resources",
            scene.units.len(),
            scene.resources.len()
        );
        Ok(())
    }

    /// Advance the simulation by one tick
    pub fn update(&mut self, delta_seconds: f32, input: &InputFrame) {
        self.sim_time += delta_seconds as f64;

        // Objective countdown
        let progress = self.progress_percent();
        self.hack_timer.tick(delta_seconds, progress, &mut self.events);

        // Region first, then membership, so everything below sees fresh eligibility
        region_control_system(
            &mut self.control,
            &mut self.region,
            input,
            delta_seconds,
            &mut self.events,
        );
        region_membership_system(&mut self.world, &mut self.region, &mut self.events);

        if let Some(point) = input.pointer_down {
            self.click(point);
        }

        // Behavior, then damage and depletion
        let strikes = unit_behavior_system(&mut self.world, &self.region, delta_seconds, &mut self.rng);
        let mut pending = apply_work_strikes(
            &mut self.world,
            &strikes,
            &self.config.resources,
            &mut self.economy,
            &mut self.events,
        );

        // Eligibility-only earning
        passive_income_system(&mut self.world, delta_seconds, &mut self.economy, &mut self.events);
        pending.extend(offspring_system(&mut self.world, delta_seconds));
        self.spawn_pending(pending);

        attractor_system(
            &mut self.world,
            delta_seconds,
            self.config.click.text_offset,
            &mut self.economy,
            &mut self.events,
        );

        integrate_system(&mut self.world, delta_seconds);
        border_bounce_system(&mut self.world, &self.region);

        self.shop.tick(delta_seconds);
    }

    fn spawn_pending(&mut self, pending: Vec<(SpawnKind, Vec2)>) {
        for (kind, position) in pending {
            if let Err(refusal) = self.spawn(&kind, position) {
                log::warn!("Dropped spawn of {}: {}", kind, refusal);
            }
        }
    }

    /// Spawn an entity of `kind` at `position`
    pub fn spawn(&mut self, kind: &SpawnKind, position: Vec2) -> Result<Entity, Refusal> {
        spawn_kind(
            &mut self.world,
            &self.config,
            kind,
            position,
            &mut self.next_serial,
            &mut self.rng,
            &mut self.events,
        )
    }

    /// Manual click at a world point. The first successful click of the
    /// session also dismisses the tutorial.
    pub fn click(&mut self, point: Vec2) -> ClickReport {
        let report = click_system(
            &self.world,
            point,
            self.click_radius,
            self.config.click.text_offset,
            &mut self.economy,
            &mut self.events,
        );
        if report.is_hit() && !self.tutorial_dismissed {
            self.tutorial_dismissed = true;
            self.events.push(SimEvent::TutorialDismissed);
        }
        report
    }

    /// Add currency from outside the simulation (rewards, debugging)
    pub fn credit(&mut self, amount: u64) {
        self.economy.credit(amount, &mut self.events);
    }

    /// Buy a shop entry by id. A cooling gate refuses without touching the
    /// balance; the gate only starts after the action succeeds.
    pub fn purchase(&mut self, id: &str) -> Result<Purchase, Refusal> {
        let result = self.run_purchase(id);
        match &result {
            Ok(_) => log::debug!("Purchased {}", id),
            Err(refusal) => log::debug!("Purchase of {} refused: {}", id, refusal),
        }
        self.events.push(SimEvent::PurchaseResult {
            item: id.to_string(),
            success: result.is_ok(),
        });
        result
    }

    fn run_purchase(&mut self, id: &str) -> Result<Purchase, Refusal> {
        let entry = self
            .shop
            .get(id)
            .ok_or_else(|| Refusal::UnknownItem(id.to_string()))?;
        if !entry.gate.is_ready() {
            return Err(Refusal::CoolingDown {
                remaining: entry.gate.remaining(),
            });
        }

        let purchase = match entry.action.clone() {
            ShopAction::Buy { kind, cost } => Purchase::Spawned(self.buy_entity(&kind, cost)?),
            ShopAction::Upgrade { track } => Purchase::Upgraded(self.try_upgrade(track)?),
        };

        if let Some(entry) = self.shop.get_mut(id) {
            entry.gate.start();
        }
        Ok(purchase)
    }

    /// Spend `cost`, then spawn `kind` at the region's current position.
    /// Unknown archetypes are refused before anything is spent.
    pub fn buy_entity(&mut self, kind: &SpawnKind, cost: u64) -> Result<Entity, Refusal> {
        if let SpawnKind::Unit { archetype } = kind {
            if self.config.unit_archetype(archetype).is_none() {
                return Err(Refusal::UnknownArchetype(archetype.clone()));
            }
        }
        self.economy.try_spend(cost, &mut self.events)?;
        let position = self.region.position();
        self.spawn(kind, position)
    }

    /// Buy and apply the next tier of an upgrade track
    pub fn try_upgrade(&mut self, kind: UpgradeKind) -> Result<UpgradeStep, Refusal> {
        let maxed = self.economy.track(kind).map_or(true, UpgradeTrack::is_maxed);
        if kind == UpgradeKind::Region && !maxed && self.region.is_at_capacity() {
            return Err(Refusal::RegionAtCapacity);
        }

        let step = self.economy.try_upgrade(kind, &mut self.events)?;
        match kind {
            UpgradeKind::Region => {
                self.region.resize(step.step);
                self.camera_zoom += step.step * self.config.region.zoom_per_unit;
                self.events.push(SimEvent::ZoomChanged {
                    zoom: self.camera_zoom,
                });
            }
            UpgradeKind::ClickRadius => {
                self.click_radius += step.step;
            }
        }
        log::debug!("Upgraded {} to tier {}", kind.name(), step.tier);
        Ok(step)
    }

    /// Button state for every shop entry, in shop order
    pub fn shop_status(&self) -> Vec<ShopButtonState> {
        self.shop
            .entries()
            .iter()
            .map(|entry| {
                let (cost, maxed) = match &entry.action {
                    ShopAction::Buy { cost, .. } => (Some(*cost), false),
                    ShopAction::Upgrade { track } => {
                        let track = self.economy.track(*track);
                        (
                            track.and_then(UpgradeTrack::next_cost),
                            track.map_or(true, UpgradeTrack::is_maxed),
                        )
                    }
                };
                let affordable = cost.map_or(false, |c| self.economy.can_afford(c));
                let ready = entry.gate.is_ready();
                ShopButtonState {
                    id: entry.id.clone(),
                    cost,
                    affordable,
                    ready,
                    maxed,
                    interactable: affordable && ready && !maxed,
                    cooldown_fill: entry.gate.fill(),
                }
            })
            .collect()
    }

    /// Objective completion, 0-100
    pub fn progress_percent(&self) -> f32 {
        percent(self.economy.lifetime_earned(), self.config.progress.target)
    }

    /// Take every event raised since the last drain, in order
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain().collect()
    }

    /// Events raised since the last drain, without taking them
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    pub fn control(&self) -> &RegionControl {
        &self.control
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn hack_timer(&self) -> &HackTimer {
        &self.hack_timer
    }

    pub fn hack_timer_mut(&mut self) -> &mut HackTimer {
        &mut self.hack_timer
    }

    pub fn click_radius(&self) -> f32 {
        self.click_radius
    }

    pub fn camera_zoom(&self) -> f32 {
        self.camera_zoom
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn tutorial_dismissed(&self) -> bool {
        self.tutorial_dismissed
    }

    pub fn unit_count(&self) -> usize {
        self.world.query::<&Unit>().iter().count()
    }

    /// Active resources only
    pub fn resource_count(&self) -> usize {
        self.world
            .query::<&Resource>()
            .iter()
            .filter(|(_, r)| r.is_active())
            .count()
    }

    pub fn attractor_count(&self) -> usize {
        self.world.query::<&Attractor>().iter().count()
    }

    pub fn remnant_count(&self) -> usize {
        self.world.query::<&Remnant>().iter().count()
    }

    /// Units currently inside the region
    pub fn eligible_units(&self) -> usize {
        self.region.members().len()
    }

    /// When the region holds no unit, the unit closest to its center, for the
    /// off-screen pointer. `None` while any unit is inside or none exist.
    /// Membership is as of the last tick.
    pub fn nearest_unit_outside(&self) -> Option<(Entity, Vec2)> {
        if !self.region.members().is_empty() {
            return None;
        }
        let center = self.region.position();
        self.world
            .query::<(&Unit, &Position)>()
            .iter()
            .map(|(entity, (_, pos))| (entity, pos.0))
            .min_by(|a, b| {
                a.1.distance_squared(&center)
                    .total_cmp(&b.1.distance_squared(&center))
                    .then(a.0.id().cmp(&b.0.id()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn empty_config() -> SimConfig {
        SimConfig {
            seed: Some(42),
            scene: SceneConfig {
                units: vec![],
                resources: vec![],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_creation() {
        let sim = Simulation::new(SimConfig {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(sim.unit_count(), 1);
        assert_eq!(sim.resource_count(), 3);
        assert_eq!(sim.economy().balance(), 0);
        assert_eq!(sim.events().count(|e| matches!(e, SimEvent::Spawned { .. })), 4);
    }

    #[test]
    fn test_engine_update() {
        let mut sim = Simulation::new(SimConfig {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        for _ in 0..120 {
            sim.update(1.0 / 60.0, &InputFrame::idle());
        }
        assert!((sim.sim_time() - 2.0).abs() < 1e-3);
        // The starting worker sits at the origin inside the region
        assert_eq!(sim.eligible_units(), 1);
    }

    #[test]
    fn test_first_hit_dismisses_tutorial_once() {
        let mut sim = Simulation::new(SimConfig {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        sim.update(0.01, &InputFrame::idle());
        sim.drain_events();

        assert!(sim.click(Vec2::new(0.1, 0.0)).is_hit());
        assert!(sim.click(Vec2::new(0.1, 0.0)).is_hit());
        assert!(sim.tutorial_dismissed());
        let events = sim.drain_events();
        assert_eq!(
            events.iter().filter(|e| **e == SimEvent::TutorialDismissed).count(),
            1
        );
    }

    #[test]
    fn test_purchase_unknown_item() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        let err = sim.purchase("nope").unwrap_err();
        assert_eq!(err, Refusal::UnknownItem("nope".into()));
        assert!(sim
            .drain_events()
            .contains(&SimEvent::PurchaseResult {
                item: "nope".into(),
                success: false
            }));
    }

    #[test]
    fn test_buy_unit_spawns_at_region() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        sim.region_mut().move_to(Vec2::new(4.0, -2.0));
        sim.credit(30);

        let Purchase::Spawned(entity) = sim.purchase("buy_unit").unwrap() else {
            panic!("expected a spawn");
        };
        assert_eq!(sim.economy().balance(), 5);
        assert_eq!(world_pos(&sim, entity), Vec2::new(4.0, -2.0));
        assert_eq!(sim.unit_count(), 1);

        // Gate is cooling now
        sim.credit(100);
        let err = sim.purchase("buy_unit").unwrap_err();
        assert!(matches!(err, Refusal::CoolingDown { .. }));
        assert_eq!(sim.economy().balance(), 105);
    }

    fn world_pos(sim: &Simulation, entity: Entity) -> Vec2 {
        sim.world.get::<&Position>(entity).unwrap().0
    }

    #[test]
    fn test_refused_purchase_does_not_start_gate() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        assert!(matches!(
            sim.purchase("buy_unit"),
            Err(Refusal::InsufficientFunds { .. })
        ));
        let status = sim.shop_status();
        let button = status.iter().find(|b| b.id == "buy_unit").unwrap();
        assert!(button.ready);
        assert!(!button.affordable);
        assert!(!button.interactable);
    }

    #[test]
    fn test_region_upgrade_resizes_and_zooms() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        sim.credit(50);
        let step = sim.try_upgrade(UpgradeKind::Region).unwrap();
        assert_eq!(step.tier, 1);
        assert_eq!(sim.region().half_extent(), Vec2::new(4.0, 4.0));
        assert_eq!(sim.camera_zoom(), 6.0);
        assert!(sim.events().iter().any(|e| *e == SimEvent::ZoomChanged { zoom: 6.0 }));
    }

    #[test]
    fn test_click_radius_upgrade() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        sim.credit(30);
        sim.try_upgrade(UpgradeKind::ClickRadius).unwrap();
        assert_eq!(sim.click_radius(), 4.0);
    }

    #[test]
    fn test_maxed_upgrade_hides_button() {
        let mut config = empty_config();
        config.economy.upgrades.click_radius.max_tier = 1;
        config.economy.upgrades.click_radius.costs = vec![10];
        let mut sim = Simulation::new(config).unwrap();
        sim.credit(100);
        sim.try_upgrade(UpgradeKind::ClickRadius).unwrap();

        assert_eq!(
            sim.try_upgrade(UpgradeKind::ClickRadius).unwrap_err(),
            Refusal::MaxTier {
                track: UpgradeKind::ClickRadius
            }
        );
        let status = sim.shop_status();
        let button = status.iter().find(|b| b.id == "upgrade_click_radius").unwrap();
        assert!(button.maxed);
        assert_eq!(button.cost, None);
        assert!(!button.interactable);
    }

    #[test]
    fn test_unknown_scene_archetype_rejected() {
        let mut config = empty_config();
        config.scene.units.push(crate::config::UnitPlacement {
            archetype: "ghost".into(),
            position: Vec2::ZERO,
        });
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_infinite_wander_interval_rejected() {
        let mut config = empty_config();
        if let Some(worker) = config.units.get_mut("worker") {
            worker.wander_interval_max = f32::INFINITY;
        }
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_nearest_unit_outside_region() {
        let mut config = empty_config();
        for arch in config.units.values_mut() {
            arch.wander_force = 0.0;
        }
        for x in [10.0, -6.0] {
            config.scene.units.push(crate::config::UnitPlacement {
                archetype: "worker".into(),
                position: Vec2::new(x, 0.0),
            });
        }
        let mut sim = Simulation::new(config).unwrap();
        sim.update(0.1, &InputFrame::idle());

        let (_, pos) = sim.nearest_unit_outside().unwrap();
        assert_eq!(pos, Vec2::new(-6.0, 0.0));

        sim.region_mut().move_to(Vec2::new(-6.0, 0.0));
        sim.update(0.1, &InputFrame::idle());
        assert_eq!(sim.eligible_units(), 1);
        assert!(sim.nearest_unit_outside().is_none());
    }

    #[test]
    fn test_nearest_unit_outside_empty_world() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        sim.update(0.1, &InputFrame::idle());
        assert!(sim.nearest_unit_outside().is_none());
    }
}
