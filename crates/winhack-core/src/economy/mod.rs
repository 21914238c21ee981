//! Currency economy: balance, lifetime earnings, resource ledger, upgrade
//! tracks and the cooldown-gated shop.
//!
//! The balance is the one piece of state written by many sources (clicks,
//! passive income, attractors, purchases). The simulation is single-threaded,
//! so the only discipline needed is that [`Economy::try_spend`] checks and
//! debits in one call.

mod shop;
mod upgrades;

pub use shop::*;
pub use upgrades::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::ResourceKind;
use crate::config::EconomyConfig;
use crate::error::Refusal;
use crate::events::{EventLog, SimEvent};

/// Per-kind resource counters, separate from currency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    counts: BTreeMap<ResourceKind, u64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to a counter, returning the new count
    pub fn add(&mut self, kind: ResourceKind, amount: u64) -> u64 {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(amount);
        *count
    }

    pub fn get(&self, kind: ResourceKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Currency ledger plus upgrade tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Economy {
    balance: u64,
    lifetime_earned: u64,
    ledger: ResourceLedger,
    tracks: BTreeMap<UpgradeKind, UpgradeTrack>,
}

impl Economy {
    pub fn new(config: &EconomyConfig) -> Self {
        let mut tracks = BTreeMap::new();
        tracks.insert(
            UpgradeKind::Region,
            UpgradeTrack::from_config(&config.upgrades.region),
        );
        tracks.insert(
            UpgradeKind::ClickRadius,
            UpgradeTrack::from_config(&config.upgrades.click_radius),
        );

        Self {
            balance: config.starting_balance,
            lifetime_earned: 0,
            ledger: ResourceLedger::new(),
            tracks,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Everything ever credited; spending never lowers it
    pub fn lifetime_earned(&self) -> u64 {
        self.lifetime_earned
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn track(&self, kind: UpgradeKind) -> Option<&UpgradeTrack> {
        self.tracks.get(&kind)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (&UpgradeKind, &UpgradeTrack)> {
        self.tracks.iter()
    }

    /// Add currency. Saturates at `u64::MAX` rather than wrapping.
    pub fn credit(&mut self, amount: u64, events: &mut EventLog) {
        self.balance = self.balance.saturating_add(amount);
        self.lifetime_earned = self.lifetime_earned.saturating_add(amount);
        events.push(SimEvent::CurrencyChanged {
            balance: self.balance,
        });
    }

    /// Atomic check-then-debit. No partial spends.
    pub fn try_spend(&mut self, amount: u64, events: &mut EventLog) -> Result<(), Refusal> {
        if self.balance >= amount {
            self.balance -= amount;
            events.push(SimEvent::CurrencyChanged {
                balance: self.balance,
            });
            events.push(SimEvent::SpendFeedback { success: true });
            Ok(())
        } else {
            events.push(SimEvent::SpendFeedback { success: false });
            Err(Refusal::InsufficientFunds {
                cost: amount,
                balance: self.balance,
            })
        }
    }

    /// Credit a depletion yield to the resource ledger
    pub fn add_resource(&mut self, kind: ResourceKind, amount: u64, events: &mut EventLog) -> u64 {
        let count = self.ledger.add(kind, amount);
        events.push(SimEvent::ResourceLedgerChanged { kind, count });
        count
    }

    /// Buy the next tier of a track. A maxed track is refused before any
    /// spend is attempted. The caller applies the returned step's effect.
    pub fn try_upgrade(
        &mut self,
        kind: UpgradeKind,
        events: &mut EventLog,
    ) -> Result<UpgradeStep, Refusal> {
        let cost = self
            .tracks
            .get(&kind)
            .and_then(UpgradeTrack::next_cost)
            .ok_or(Refusal::MaxTier { track: kind })?;

        self.try_spend(cost, events)?;

        let track = self
            .tracks
            .get_mut(&kind)
            .ok_or(Refusal::MaxTier { track: kind })?;
        track.tier += 1;
        events.push(SimEvent::UpgradeCostChanged {
            track: kind,
            next_cost: track.next_cost(),
        });

        Ok(UpgradeStep {
            track: kind,
            tier: track.tier,
            step: track.step,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EconomyConfig, UpgradeTrackConfig, UpgradesConfig};
    use proptest::prelude::*;

    fn economy() -> Economy {
        Economy::new(&EconomyConfig {
            starting_balance: 0,
            upgrades: UpgradesConfig {
                region: UpgradeTrackConfig {
                    max_tier: 2,
                    costs: vec![50, 120],
                    step: 1.0,
                },
                click_radius: UpgradeTrackConfig {
                    max_tier: 3,
                    costs: vec![10],
                    step: 2.0,
                },
            },
        })
    }

    #[test]
    fn test_credit_and_spend() {
        let mut eco = economy();
        let mut events = EventLog::new();

        eco.credit(30, &mut events);
        assert_eq!(eco.balance(), 30);
        assert!(eco.try_spend(20, &mut events).is_ok());
        assert_eq!(eco.balance(), 10);
        assert_eq!(eco.lifetime_earned(), 30);

        assert_eq!(
            events.count(|e| *e == SimEvent::SpendFeedback { success: true }),
            1
        );
    }

    #[test]
    fn test_overspend_is_refused_and_untouched() {
        let mut eco = economy();
        let mut events = EventLog::new();
        eco.credit(5, &mut events);

        let err = eco.try_spend(6, &mut events).unwrap_err();
        assert_eq!(err, Refusal::InsufficientFunds { cost: 6, balance: 5 });
        assert_eq!(eco.balance(), 5);
        assert_eq!(
            events.count(|e| *e == SimEvent::SpendFeedback { success: false }),
            1
        );
    }

    #[test]
    fn test_upgrade_scenario() {
        let mut eco = economy();
        let mut events = EventLog::new();

        assert!(eco.try_upgrade(UpgradeKind::Region, &mut events).is_err());
        assert_eq!(eco.track(UpgradeKind::Region).unwrap().tier, 0);

        eco.credit(50, &mut events);
        assert_eq!(eco.balance(), 50);

        let step = eco.try_upgrade(UpgradeKind::Region, &mut events).unwrap();
        assert_eq!(step.tier, 1);
        assert_eq!(step.cost, 50);
        assert_eq!(eco.balance(), 0);
        assert_eq!(eco.track(UpgradeKind::Region).unwrap().next_cost(), Some(120));
        assert!(events.iter().any(|e| *e
            == SimEvent::UpgradeCostChanged {
                track: UpgradeKind::Region,
                next_cost: Some(120),
            }));
    }

    #[test]
    fn test_maxed_track_refuses_without_spending() {
        let mut eco = economy();
        let mut events = EventLog::new();
        eco.credit(1000, &mut events);

        for _ in 0..3 {
            eco.try_upgrade(UpgradeKind::ClickRadius, &mut events).unwrap();
        }
        events.clear();

        let err = eco
            .try_upgrade(UpgradeKind::ClickRadius, &mut events)
            .unwrap_err();
        assert_eq!(
            err,
            Refusal::MaxTier {
                track: UpgradeKind::ClickRadius
            }
        );
        assert_eq!(eco.balance(), 970);
        assert!(events.is_empty());
    }

    #[test]
    fn test_resource_ledger_is_separate() {
        let mut eco = economy();
        let mut events = EventLog::new();
        assert_eq!(eco.add_resource(ResourceKind::Tree, 3, &mut events), 3);
        assert_eq!(eco.add_resource(ResourceKind::Tree, 2, &mut events), 5);
        assert_eq!(eco.ledger().get(ResourceKind::Mine), 0);
        assert_eq!(eco.balance(), 0);
    }

    #[test]
    fn test_credit_saturates() {
        let mut eco = economy();
        let mut events = EventLog::new();
        eco.credit(u64::MAX, &mut events);
        eco.credit(10, &mut events);
        assert_eq!(eco.balance(), u64::MAX);
        assert_eq!(eco.lifetime_earned(), u64::MAX);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Credit(u64),
        Spend(u64),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..1_000).prop_map(Op::Credit),
            (0u64..1_500).prop_map(Op::Spend),
        ]
    }

    proptest! {
        /// Balance never underflows, lifetime only grows and equals the credit sum.
        #[test]
        fn ledger_invariants_hold(ops in prop::collection::vec(arb_op(), 0..64)) {
            let mut eco = economy();
            let mut events = EventLog::new();
            let mut credited = 0u64;
            let mut last_lifetime = 0u64;

            for op in ops {
                match op {
                    Op::Credit(n) => {
                        eco.credit(n, &mut events);
                        credited += n;
                    }
                    Op::Spend(n) => {
                        let before = eco.balance();
                        let ok = eco.try_spend(n, &mut events).is_ok();
                        prop_assert_eq!(ok, n <= before);
                        if !ok {
                            prop_assert_eq!(eco.balance(), before);
                        }
                    }
                }
                prop_assert!(eco.lifetime_earned() >= last_lifetime);
                last_lifetime = eco.lifetime_earned();
            }

            prop_assert_eq!(eco.lifetime_earned(), credited);
        }
    }
}
