//! Physics - velocity integration, damping and region border bounce

use hecs::World;

use crate::components::{Body, Position, Region, Wanderer};

/// Semi-implicit Euler step with linear damping
pub fn integrate_system(world: &mut World, delta_seconds: f32) {
    for (_, (pos, body)) in world.query_mut::<(&mut Position, &mut Body)>() {
        pos.0 += body.velocity * delta_seconds;
        body.velocity = body.velocity * (1.0 / (1.0 + body.damping * delta_seconds));
    }
}

/// Kick wanderers off the region border. The impulse fires once when a
/// unit's circle first straddles an edge; it re-arms after the unit leaves
/// the edge.
pub fn border_bounce_system(world: &mut World, region: &Region) {
    let bounds = region.bounds();
    for (_, (pos, body, wanderer)) in world.query_mut::<(&Position, &mut Body, &Wanderer)>() {
        let contact = bounds.edge_contact(&pos.0, body.radius);
        match contact {
            Some(normal) if !body.touching_border => {
                body.apply_impulse(normal * wanderer.bounce_force);
                body.touching_border = true;
            }
            Some(_) => {}
            None => body.touching_border = false,
        }
    }
}
