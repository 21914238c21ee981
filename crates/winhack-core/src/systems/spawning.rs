//! Spawning - builds entities from their archetypes

use hecs::{Entity, EntityBuilder, World};
use rand::Rng;

use crate::components::{
    Attractor, Behavior, Body, Offspring, PassiveIncome, Position, Remnant, Resource,
    ResourceKind, SpawnKind, Unit, Vec2, Wanderer, Worker,
};
use crate::config::{SimConfig, UnitArchetype};
use crate::error::Refusal;
use crate::events::{EventLog, SimEvent};

/// Spawn anything the simulation knows how to build and announce it with a
/// `Spawned` event. `next_serial` orders resources for tie-breaking.
pub fn spawn_kind<R: Rng + ?Sized>(
    world: &mut World,
    config: &SimConfig,
    kind: &SpawnKind,
    position: Vec2,
    next_serial: &mut u64,
    rng: &mut R,
    events: &mut EventLog,
) -> Result<Entity, Refusal> {
    let entity = match kind {
        SpawnKind::Unit { archetype } => {
            let arch = config
                .unit_archetype(archetype)
                .ok_or_else(|| Refusal::UnknownArchetype(archetype.clone()))?;
            spawn_unit(world, archetype, arch, position, rng)
        }
        SpawnKind::Resource { kind } => {
            let serial = *next_serial;
            *next_serial += 1;
            spawn_resource(world, config, *kind, position, serial)
        }
        SpawnKind::Attractor => world.spawn((
            Attractor::from_config(&config.attractor),
            Position(position),
        )),
        SpawnKind::Remnant { kind } => world.spawn((Remnant { kind: *kind }, Position(position))),
    };

    log::debug!(
        "spawned {} at ({:.1}, {:.1})",
        kind,
        position.x,
        position.y
    );
    events.push(SimEvent::Spawned {
        entity,
        kind: kind.clone(),
        position,
    });
    Ok(entity)
}

/// Build a unit. Passive income and offspring are attached only when the
/// archetype configures them.
pub fn spawn_unit<R: Rng + ?Sized>(
    world: &mut World,
    name: &str,
    arch: &UnitArchetype,
    position: Vec2,
    rng: &mut R,
) -> Entity {
    let mut wanderer = Wanderer::new(
        arch.wander_force,
        arch.wander_interval_min,
        arch.wander_interval_max,
        arch.bounce_force,
    );
    wanderer.schedule(rng);

    let mut builder = EntityBuilder::new();
    builder.add(Unit::new(name, arch.gain_per_click));
    builder.add(Position(position));
    builder.add(Body::new(arch.radius, arch.mass, arch.damping));
    builder.add(Worker::new(arch.move_speed, arch.work_interval, arch.work_amount));
    builder.add(wanderer);
    builder.add(Behavior::default());

    if let Some(income) = &arch.passive_income {
        builder.add(PassiveIncome::new(income.amount, income.interval));
    }
    if let Some(offspring) = &arch.offspring {
        builder.add(Offspring::new(
            offspring.kind.clone(),
            offspring.interval,
            offspring.offset,
        ));
    }

    world.spawn(builder.build())
}

pub fn spawn_resource(
    world: &mut World,
    config: &SimConfig,
    kind: ResourceKind,
    position: Vec2,
    serial: u64,
) -> Entity {
    let arch = config.resources.get(kind);
    world.spawn((
        Resource::new(kind, arch.max_health, arch.yield_amount, serial).with_radius(arch.radius),
        Position(position),
    ))
}
