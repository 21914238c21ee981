//! Region membership system - recomputes which units are inside the region

use std::collections::HashSet;

use hecs::World;

use crate::components::{Position, Region, Unit};
use crate::events::{EventLog, SimEvent};

/// Point-in-box test for every unit. Flips `can_earn` only on entry/exit
/// transitions and stores the fresh member set on the region.
///
/// Must run before unit behavior each tick: eligibility gates seeking and
/// earning, and the region may have moved.
pub fn region_membership_system(world: &mut World, region: &mut Region, events: &mut EventLog) {
    let mut inside = HashSet::new();

    for (entity, (unit, pos)) in world.query_mut::<(&mut Unit, &Position)>() {
        let contained = region.contains(&pos.0);
        if contained {
            inside.insert(entity);
        }

        if contained && !unit.can_earn {
            unit.can_earn = true;
            events.push(SimEvent::UnitEnteredRegion { entity });
        } else if !contained && unit.can_earn {
            unit.can_earn = false;
            events.push(SimEvent::UnitExitedRegion { entity });
        }
    }

    region.set_members(inside);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;

    #[test]
    fn test_entry_and_exit_transitions() {
        let mut world = World::new();
        let mut region = Region::new(Vec2::ZERO, Vec2::new(2.0, 2.0), Vec2::new(20.0, 20.0), 1);
        let mut events = EventLog::new();

        let inside = world.spawn((Unit::new("worker", 1), Position::new(1.0, 1.0)));
        let outside = world.spawn((Unit::new("worker", 1), Position::new(8.0, 0.0)));

        region_membership_system(&mut world, &mut region, &mut events);
        assert!(world.get::<&Unit>(inside).unwrap().can_earn);
        assert!(!world.get::<&Unit>(outside).unwrap().can_earn);
        assert!(region.is_member(inside));
        assert_eq!(region.members().len(), 1);
        assert_eq!(events.len(), 1);

        // No transition, no new events
        region_membership_system(&mut world, &mut region, &mut events);
        assert_eq!(events.len(), 1);

        // Region moves away from the first unit and over the second
        region.move_to(Vec2::new(7.0, 0.0));
        region_membership_system(&mut world, &mut region, &mut events);
        assert!(!world.get::<&Unit>(inside).unwrap().can_earn);
        assert!(world.get::<&Unit>(outside).unwrap().can_earn);
        assert!(events
            .iter()
            .any(|e| *e == SimEvent::UnitExitedRegion { entity: inside }));
        assert!(events
            .iter()
            .any(|e| *e == SimEvent::UnitEnteredRegion { entity: outside }));
    }
}
