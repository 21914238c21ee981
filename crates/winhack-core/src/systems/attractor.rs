//! Attractor system - boombox pull, periodic credit and expiry

use hecs::{Entity, World};

use crate::components::{Attractor, Body, Position, Unit, Vec2};
use crate::economy::Economy;
use crate::events::{EventLog, SimEvent};

use super::click::{credit_unit, is_earning_within};

/// Advance every attractor by one tick:
///
/// - expired attractors are despawned before doing anything else
/// - eligible units in range get a bounded pull toward the center
/// - when the credit timer fires, every unit in range is credited once
pub fn attractor_system(
    world: &mut World,
    delta_seconds: f32,
    text_offset: f32,
    economy: &mut Economy,
    events: &mut EventLog,
) {
    let mut active: Vec<(Vec2, f32, f32, bool)> = Vec::new();
    let mut expired: Vec<Entity> = Vec::new();

    for (entity, (attractor, pos)) in world.query_mut::<(&mut Attractor, &Position)>() {
        attractor.age += delta_seconds;
        if attractor.is_expired() {
            expired.push(entity);
            continue;
        }
        let credit = attractor.credit_timer.tick(delta_seconds);
        active.push((pos.0, attractor.radius, attractor.pull(delta_seconds), credit));
    }

    for entity in expired {
        if world.despawn(entity).is_ok() {
            log::debug!("attractor {:?} expired", entity);
            events.push(SimEvent::Despawned { entity });
        }
    }

    if active.is_empty() {
        return;
    }

    for (_, (unit, pos, body)) in world.query_mut::<(&Unit, &Position, &mut Body)>() {
        for (center, radius, pull, credit) in &active {
            if !is_earning_within(unit, &pos.0, center, *radius) {
                continue;
            }
            body.apply_impulse((*center - pos.0).normalize() * (*pull * body.mass));
            if *credit {
                credit_unit(unit, pos.0, text_offset, economy, events);
            }
        }
    }
}
