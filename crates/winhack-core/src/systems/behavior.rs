//! Unit behavior system - the per-unit seek / approach / harvest / wander state machine

use std::collections::HashMap;
use std::f32::consts::TAU;

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{
    circles_overlap, Behavior, Body, Position, Region, Resource, Unit, Vec2, Wanderer, Worker,
};

/// A work strike that landed this tick, applied after the unit query ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkStrike {
    pub resource: Entity,
    pub amount: u32,
}

/// Active resource as seen at the start of the behavior pass
#[derive(Debug, Clone, Copy)]
struct ResourceView {
    position: Vec2,
    radius: f32,
    serial: u64,
    in_region: bool,
}

/// Evaluate every unit once, highest priority state first:
///
/// 1. outside the region: release the target and wander
/// 2. no valid target: bind the nearest active resource inside the region
/// 3. target bound: walk straight at it
/// 4. touching the target: stop and strike every `work_interval`
/// 5. nothing to do: wander
///
/// Nearest-resource search is a full scan, O(units x resources) per tick.
pub fn unit_behavior_system<R: Rng + ?Sized>(
    world: &mut World,
    region: &Region,
    delta_seconds: f32,
    rng: &mut R,
) -> Vec<WorkStrike> {
    let resources: HashMap<Entity, ResourceView> = world
        .query::<(&Resource, &Position)>()
        .iter()
        .filter(|(_, (res, _))| res.is_active())
        .map(|(entity, (res, pos))| {
            (
                entity,
                ResourceView {
                    position: pos.0,
                    radius: res.radius,
                    serial: res.serial,
                    in_region: region.contains(&pos.0),
                },
            )
        })
        .collect();

    let mut strikes = Vec::new();

    for (_, (unit, pos, body, worker, wanderer, behavior)) in world.query_mut::<(
        &Unit,
        &Position,
        &mut Body,
        &mut Worker,
        &mut Wanderer,
        &mut Behavior,
    )>() {
        wanderer.next_in -= delta_seconds;

        if !unit.can_earn {
            worker.target = None;
            *behavior = Behavior::Wandering;
            wander(wanderer, body, rng);
            continue;
        }

        // Target depleted or despawned by someone else
        if let Some(target) = worker.target {
            if !resources.contains_key(&target) {
                worker.target = None;
            }
        }

        if worker.target.is_none() {
            worker.target = nearest_in_region(&resources, pos.0);
        }

        let bound = worker
            .target
            .and_then(|target| resources.get(&target).map(|view| (target, *view)));

        match bound {
            Some((target, view)) => {
                if circles_overlap(&pos.0, body.radius, &view.position, view.radius) {
                    body.halt();
                    *behavior = Behavior::Harvesting(target);
                    if worker.work_timer.tick(delta_seconds) {
                        strikes.push(WorkStrike {
                            resource: target,
                            amount: worker.work_amount,
                        });
                    }
                } else {
                    body.velocity = (view.position - pos.0).normalize() * worker.move_speed;
                    *behavior = Behavior::Approaching(target);
                }
            }
            None => {
                *behavior = Behavior::Wandering;
                wander(wanderer, body, rng);
            }
        }
    }

    strikes
}

/// Nearest active resource inside the region; equal distances go to the
/// lowest spawn serial so the choice does not depend on storage order.
fn nearest_in_region(resources: &HashMap<Entity, ResourceView>, from: Vec2) -> Option<Entity> {
    resources
        .iter()
        .filter(|(_, view)| view.in_region)
        .min_by(|(_, a), (_, b)| {
            let da = a.position.distance_squared(&from);
            let db = b.position.distance_squared(&from);
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.serial.cmp(&b.serial))
        })
        .map(|(entity, _)| *entity)
}

fn wander<R: Rng + ?Sized>(wanderer: &mut Wanderer, body: &mut Body, rng: &mut R) {
    if wanderer.next_in > 0.0 {
        return;
    }
    let angle = rng.gen_range(0.0..TAU);
    body.apply_impulse(Vec2::from_angle(angle) * wanderer.force);
    wanderer.schedule(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ResourceKind, Vec2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn region() -> Region {
        Region::new(Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(20.0, 20.0), 1)
    }

    fn spawn_unit(world: &mut World, x: f32, y: f32, eligible: bool) -> Entity {
        let mut unit = Unit::new("worker", 1);
        unit.can_earn = eligible;
        let mut wanderer = Wanderer::new(1.0, 1.0, 2.0, 0.5);
        wanderer.next_in = 10.0;
        world.spawn((
            unit,
            Position::new(x, y),
            Body::new(0.5, 1.0, 0.0),
            Worker::new(2.0, 1.0, 1),
            wanderer,
            Behavior::default(),
        ))
    }

    fn spawn_resource(world: &mut World, x: f32, y: f32, serial: u64) -> Entity {
        world.spawn((
            Resource::new(ResourceKind::Tree, 3, 1, serial),
            Position::new(x, y),
        ))
    }

    #[test]
    fn test_seeks_nearest_resource_in_region() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let unit = spawn_unit(&mut world, 0.0, 0.0, true);
        let _far = spawn_resource(&mut world, 4.0, 0.0, 0);
        let near = spawn_resource(&mut world, 0.0, 3.0, 1);
        let _outside = spawn_resource(&mut world, 1.0, 8.0, 2);

        unit_behavior_system(&mut world, &region(), 0.1, &mut rng);

        assert_eq!(*world.get::<&Behavior>(unit).unwrap(), Behavior::Approaching(near));
        let body = world.get::<&Body>(unit).unwrap();
        assert!((body.velocity.y - 2.0).abs() < 1e-4);
        assert!(body.velocity.x.abs() < 1e-4);
    }

    #[test]
    fn test_ties_go_to_first_spawned() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let unit = spawn_unit(&mut world, 0.0, 0.0, true);
        let later = spawn_resource(&mut world, -3.0, 0.0, 9);
        let first = spawn_resource(&mut world, 3.0, 0.0, 4);

        unit_behavior_system(&mut world, &region(), 0.1, &mut rng);
        assert_eq!(world.get::<&Worker>(unit).unwrap().target, Some(first));
        let _ = later;
    }

    #[test]
    fn test_ineligible_unit_releases_target() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let unit = spawn_unit(&mut world, 0.0, 0.0, true);
        let res = spawn_resource(&mut world, 2.0, 0.0, 0);

        unit_behavior_system(&mut world, &region(), 0.1, &mut rng);
        assert_eq!(world.get::<&Worker>(unit).unwrap().target, Some(res));

        world.get::<&mut Unit>(unit).unwrap().can_earn = false;
        unit_behavior_system(&mut world, &region(), 0.1, &mut rng);
        assert_eq!(world.get::<&Worker>(unit).unwrap().target, None);
        assert_eq!(*world.get::<&Behavior>(unit).unwrap(), Behavior::Wandering);
    }

    #[test]
    fn test_harvest_strikes_on_contact_then_per_interval() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let unit = spawn_unit(&mut world, 0.0, 0.0, true);
        let res = spawn_resource(&mut world, 0.5, 0.0, 0);

        let strikes = unit_behavior_system(&mut world, &region(), 0.25, &mut rng);
        assert_eq!(strikes, vec![WorkStrike { resource: res, amount: 1 }]);
        assert_eq!(*world.get::<&Behavior>(unit).unwrap(), Behavior::Harvesting(res));
        assert_eq!(world.get::<&Body>(unit).unwrap().velocity, Vec2::ZERO);

        // Interval is 1s: three more quarter ticks do nothing, the fourth strikes
        for _ in 0..3 {
            assert!(unit_behavior_system(&mut world, &region(), 0.25, &mut rng).is_empty());
        }
        assert_eq!(unit_behavior_system(&mut world, &region(), 0.25, &mut rng).len(), 1);
    }

    #[test]
    fn test_stale_target_is_reacquired() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let unit = spawn_unit(&mut world, 0.0, 0.0, true);
        let first = spawn_resource(&mut world, 2.0, 0.0, 0);
        let second = spawn_resource(&mut world, -3.0, 0.0, 1);

        unit_behavior_system(&mut world, &region(), 0.1, &mut rng);
        assert_eq!(world.get::<&Worker>(unit).unwrap().target, Some(first));

        world.despawn(first).unwrap();
        unit_behavior_system(&mut world, &region(), 0.1, &mut rng);
        assert_eq!(world.get::<&Worker>(unit).unwrap().target, Some(second));
    }

    #[test]
    fn test_wander_impulse_when_idle() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        let unit = spawn_unit(&mut world, 0.0, 0.0, true);
        world.get::<&mut Wanderer>(unit).unwrap().next_in = 0.05;

        unit_behavior_system(&mut world, &region(), 0.1, &mut rng);

        let body = world.get::<&Body>(unit).unwrap();
        assert!((body.velocity.length() - 1.0).abs() < 1e-4);
        let wanderer = world.get::<&Wanderer>(unit).unwrap();
        assert!(wanderer.next_in >= 1.0 && wanderer.next_in <= 2.0);
    }
}
