//! Click dispatch - credits eligible units under the pointer

use hecs::{Entity, World};

use crate::components::{Position, Unit, Vec2};
use crate::economy::Economy;
use crate::events::{EventLog, SimEvent};

/// Outcome of a single click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickReport {
    /// Units credited
    pub units: u32,
    /// Currency credited in total
    pub total: u64,
}

impl ClickReport {
    pub fn is_hit(&self) -> bool {
        self.units > 0
    }
}

/// The one eligibility predicate shared by clicks and attractors: the unit
/// can earn and sits within `radius` of `center` (inclusive).
pub fn is_earning_within(unit: &Unit, position: &Vec2, center: &Vec2, radius: f32) -> bool {
    unit.can_earn && position.distance_squared(center) <= radius * radius
}

/// Credit one unit's click gain and raise its floating text
pub(crate) fn credit_unit(
    unit: &Unit,
    position: Vec2,
    text_offset: f32,
    economy: &mut Economy,
    events: &mut EventLog,
) -> u64 {
    economy.credit(unit.gain_per_click, events);
    events.push(SimEvent::FloatingText {
        position: position + Vec2::UP * text_offset,
        amount: unit.gain_per_click,
    });
    unit.gain_per_click
}

/// Credit every eligible unit within `radius` of `point` exactly once.
/// Emits a single `ClickFeedback` when at least one unit qualified.
pub fn click_system(
    world: &World,
    point: Vec2,
    radius: f32,
    text_offset: f32,
    economy: &mut Economy,
    events: &mut EventLog,
) -> ClickReport {
    let mut report = ClickReport::default();

    for (_, (unit, pos)) in world.query::<(&Unit, &Position)>().iter() {
        if is_earning_within(unit, &pos.0, &point, radius) {
            let amount = credit_unit(unit, pos.0, text_offset, economy, events);
            report.units += 1;
            report.total = report.total.saturating_add(amount);
        }
    }

    if report.is_hit() {
        events.push(SimEvent::ClickFeedback {
            units: report.units,
            total: report.total,
        });
    }
    report
}

/// Units a click at `point` would credit, without crediting them
pub fn units_under_pointer(world: &World, point: Vec2, radius: f32) -> Vec<Entity> {
    world
        .query::<(&Unit, &Position)>()
        .iter()
        .filter(|(_, (unit, pos))| is_earning_within(unit, &pos.0, &point, radius))
        .map(|(entity, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EconomyConfig;

    fn unit(gain: u64, eligible: bool) -> Unit {
        let mut unit = Unit::new("worker", gain);
        unit.can_earn = eligible;
        unit
    }

    #[test]
    fn test_click_credits_each_eligible_unit_once() {
        let mut world = World::new();
        let mut economy = Economy::new(&EconomyConfig::default());
        let mut events = EventLog::new();

        world.spawn((unit(1, true), Position::new(0.5, 0.0)));
        world.spawn((unit(2, true), Position::new(0.0, -1.0)));
        world.spawn((unit(5, false), Position::new(0.0, 0.0)));
        world.spawn((unit(7, true), Position::new(4.0, 0.0)));

        let report = click_system(&world, Vec2::ZERO, 2.0, 1.0, &mut economy, &mut events);
        assert_eq!(report, ClickReport { units: 2, total: 3 });
        assert_eq!(economy.balance(), 3);
        assert_eq!(events.count(|e| matches!(e, SimEvent::ClickFeedback { .. })), 1);
        assert_eq!(events.count(|e| matches!(e, SimEvent::FloatingText { .. })), 2);
        assert!(events.iter().any(|e| *e
            == SimEvent::FloatingText {
                position: Vec2::new(0.5, 1.0),
                amount: 1
            }));
    }

    #[test]
    fn test_click_on_nothing_is_silent() {
        let mut world = World::new();
        let mut economy = Economy::new(&EconomyConfig::default());
        let mut events = EventLog::new();
        world.spawn((unit(1, true), Position::new(9.0, 9.0)));

        let report = click_system(&world, Vec2::ZERO, 2.0, 1.0, &mut economy, &mut events);
        assert!(!report.is_hit());
        assert!(events.is_empty());
        assert_eq!(economy.balance(), 0);
    }

    #[test]
    fn test_radius_edge_is_inclusive() {
        let u = unit(1, true);
        assert!(is_earning_within(&u, &Vec2::new(2.0, 0.0), &Vec2::ZERO, 2.0));
        assert!(!is_earning_within(&u, &Vec2::new(2.01, 0.0), &Vec2::ZERO, 2.0));
    }

    #[test]
    fn test_units_under_pointer_matches_click() {
        let mut world = World::new();
        let inside = world.spawn((unit(1, true), Position::new(1.0, 0.0)));
        world.spawn((unit(1, false), Position::new(1.0, 0.0)));
        assert_eq!(units_under_pointer(&world, Vec2::ZERO, 2.0), vec![inside]);
    }
}
