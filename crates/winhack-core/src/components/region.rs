//! The movable, resizable play region ("window") that gates unit eligibility.

use std::collections::HashSet;

use hecs::Entity;

use super::common::{Aabb, Vec2};
use crate::config::RegionConfig;

/// Axis-aligned region the player drags around the world.
///
/// Units whose center lies inside the box are eligible to earn and harvest.
/// The box is always kept inside the movement bounds: after every move or
/// resize, `|x| <= max_distance.x - half_extent.x` (same for y).
#[derive(Debug, Clone)]
pub struct Region {
    position: Vec2,
    half_extent: Vec2,
    /// Movement bounds, measured from the world origin per axis
    max_distance: Vec2,
    resize_count: u32,
    max_resizes: u32,
    /// Units inside the box as of the last membership pass
    members: HashSet<Entity>,
}

impl Region {
    pub fn new(position: Vec2, half_extent: Vec2, max_distance: Vec2, max_resizes: u32) -> Self {
        let mut region = Self {
            position,
            half_extent,
            max_distance,
            resize_count: 0,
            max_resizes,
            members: HashSet::new(),
        };
        region.position = region.clamp(position);
        region
    }

    pub fn from_config(config: &RegionConfig, max_resizes: u32) -> Self {
        Self::new(
            config.position,
            config.half_extent,
            config.max_distance,
            max_resizes,
        )
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn half_extent(&self) -> Vec2 {
        self.half_extent
    }

    pub fn max_distance(&self) -> Vec2 {
        self.max_distance
    }

    pub fn resize_count(&self) -> u32 {
        self.resize_count
    }

    pub fn max_resizes(&self) -> u32 {
        self.max_resizes
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.half_extent)
    }

    /// Clamp a candidate center so the box edges stay within the movement bounds.
    /// An axis whose half-extent already exceeds its bound is pinned to 0.
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        let max_x = (self.max_distance.x - self.half_extent.x).max(0.0);
        let max_y = (self.max_distance.y - self.half_extent.y).max(0.0);
        Vec2::new(pos.x.clamp(-max_x, max_x), pos.y.clamp(-max_y, max_y))
    }

    /// Move by a keyboard-style delta; returns the clamped position
    pub fn move_by(&mut self, delta: Vec2) -> Vec2 {
        self.move_to(self.position + delta)
    }

    /// Move to an absolute target; returns the clamped position
    pub fn move_to(&mut self, target: Vec2) -> Vec2 {
        self.position = self.clamp(target);
        self.position
    }

    /// Smoothly follow a drag target, covering fraction `t` of the gap
    pub fn drag_toward(&mut self, target: Vec2, t: f32) -> Vec2 {
        let next = self.position.lerp(target, t);
        self.move_to(next)
    }

    /// Grow both half-extents by `amount`. Refused once the resize cap is
    /// reached. The position is re-clamped afterwards since a bigger box can
    /// poke past the movement bounds.
    pub fn resize(&mut self, amount: f32) -> bool {
        if self.resize_count >= self.max_resizes {
            return false;
        }
        self.half_extent = self.half_extent + Vec2::new(amount, amount);
        self.resize_count += 1;
        self.position = self.clamp(self.position);
        true
    }

    pub fn is_at_capacity(&self) -> bool {
        self.resize_count >= self.max_resizes
    }

    pub fn contains(&self, point: &Vec2) -> bool {
        self.bounds().contains(point)
    }

    pub fn members(&self) -> &HashSet<Entity> {
        &self.members
    }

    pub fn is_member(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    pub(crate) fn set_members(&mut self, members: HashSet<Entity>) {
        self.members = members;
    }
}
