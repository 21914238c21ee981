//! Harvest system - applies work strikes and handles resource depletion

use hecs::World;

use crate::components::{Position, Resource, SpawnKind, Vec2};
use crate::config::ResourcesConfig;
use crate::economy::Economy;
use crate::events::{EventLog, SimEvent};

use super::WorkStrike;

/// Apply this tick's strikes in order. A resource that reaches zero health
/// credits its yield to the ledger exactly once, queues its successor and is
/// despawned; strikes that arrive later in the same batch are ignored.
///
/// Returns the successors to spawn, with their positions.
pub fn apply_work_strikes(
    world: &mut World,
    strikes: &[WorkStrike],
    resources: &ResourcesConfig,
    economy: &mut Economy,
    events: &mut EventLog,
) -> Vec<(SpawnKind, Vec2)> {
    let mut depleted = Vec::new();

    for strike in strikes {
        let Ok((res, pos)) = world.query_one_mut::<(&mut Resource, &Position)>(strike.resource)
        else {
            continue;
        };
        if let Some(depletion) = res.damage(strike.amount) {
            depleted.push((strike.resource, depletion, pos.0));
        }
    }

    let mut successors = Vec::new();
    for (entity, depletion, position) in depleted {
        economy.add_resource(depletion.kind, depletion.yield_amount as u64, events);
        events.push(SimEvent::ResourceDepleted {
            entity,
            kind: depletion.kind,
            position,
        });

        if let Some(successor) = &resources.get(depletion.kind).successor {
            successors.push((successor.clone(), position));
        }

        if world.despawn(entity).is_ok() {
            events.push(SimEvent::Despawned { entity });
        }
        log::debug!(
            "{:?} depleted at ({:.1}, {:.1}), +{} {}",
            depletion.kind,
            position.x,
            position.y,
            depletion.yield_amount,
            depletion.kind.ledger_name()
        );
    }

    successors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ResourceKind;
    use crate::config::EconomyConfig;

    #[test]
    fn test_depletion_credits_once_and_queues_successor() {
        let mut world = World::new();
        let mut economy = Economy::new(&EconomyConfig::default());
        let mut events = EventLog::new();
        let config = ResourcesConfig::default();

        let tree = world.spawn((
            Resource::new(ResourceKind::Tree, 2, 3, 0),
            Position::new(1.0, 2.0),
        ));

        // Two units strike the same tree in one tick, then a third overkills
        let strikes = [
            WorkStrike { resource: tree, amount: 1 },
            WorkStrike { resource: tree, amount: 1 },
            WorkStrike { resource: tree, amount: 1 },
        ];
        let successors = apply_work_strikes(&mut world, &strikes, &config, &mut economy, &mut events);

        assert_eq!(economy.ledger().get(ResourceKind::Tree), 3);
        assert_eq!(
            successors,
            vec![(
                SpawnKind::Remnant {
                    kind: ResourceKind::Tree
                },
                Vec2::new(1.0, 2.0)
            )]
        );
        assert!(!world.contains(tree));
        assert_eq!(events.count(|e| matches!(e, SimEvent::ResourceDepleted { .. })), 1);
        assert_eq!(events.count(|e| *e == SimEvent::Despawned { entity: tree }), 1);

        // Strikes on a despawned resource are dropped
        let again = apply_work_strikes(&mut world, &strikes, &config, &mut economy, &mut events);
        assert!(again.is_empty());
        assert_eq!(economy.ledger().get(ResourceKind::Tree), 3);
    }

    #[test]
    fn test_partial_damage_keeps_resource() {
        let mut world = World::new();
        let mut economy = Economy::new(&EconomyConfig::default());
        let mut events = EventLog::new();

        let mine = world.spawn((
            Resource::new(ResourceKind::Mine, 8, 2, 0),
            Position::new(0.0, 0.0),
        ));
        let strikes = [WorkStrike { resource: mine, amount: 3 }];
        apply_work_strikes(&mut world, &strikes, &ResourcesConfig::default(), &mut economy, &mut events);

        assert_eq!(world.get::<&Resource>(mine).unwrap().health, 5);
        assert!(events.is_empty());
    }
}
