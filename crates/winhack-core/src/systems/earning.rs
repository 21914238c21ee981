//! Earning systems - passive income and offspring for units inside the region

use hecs::World;

use crate::components::{Offspring, PassiveIncome, Position, SpawnKind, Unit, Vec2};
use crate::economy::Economy;
use crate::events::EventLog;

/// Credit passive income. Timers only run while the unit can earn; leaving
/// the region resets the countdown so re-entry waits a full interval.
pub fn passive_income_system(
    world: &mut World,
    delta_seconds: f32,
    economy: &mut Economy,
    events: &mut EventLog,
) {
    let mut total = 0u64;
    for (_, (unit, income)) in world.query_mut::<(&Unit, &mut PassiveIncome)>() {
        if !unit.can_earn {
            income.timer.reset();
            continue;
        }
        if income.timer.tick(delta_seconds) {
            total = total.saturating_add(income.amount);
        }
    }

    if total > 0 {
        economy.credit(total, events);
    }
}

/// Tick offspring timers and collect what should be spawned next to each
/// eligible unit. Same eligibility rule as passive income.
pub fn offspring_system(world: &mut World, delta_seconds: f32) -> Vec<(SpawnKind, Vec2)> {
    let mut spawns = Vec::new();
    for (_, (unit, pos, offspring)) in world.query_mut::<(&Unit, &Position, &mut Offspring)>() {
        if !unit.can_earn {
            offspring.timer.reset();
            continue;
        }
        if offspring.timer.tick(delta_seconds) {
            spawns.push((offspring.kind.clone(), pos.0 + offspring.offset));
        }
    }
    spawns
}
