//! Depletable resources and the entities they leave behind.

use serde::{Deserialize, Serialize};

use super::kinds::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceState {
    Active,
    /// Terminal; the entity is despawned by the harvest system
    Depleted,
}

/// What a depletion hands back to the caller, returned exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depletion {
    pub kind: ResourceKind,
    pub yield_amount: u32,
}

/// Harvestable resource node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub health: u32,
    pub max_health: u32,
    pub yield_amount: u32,
    /// Collision circle radius
    pub radius: f32,
    pub state: ResourceState,
    /// Spawn order, used to break nearest-resource ties deterministically
    pub serial: u64,
}

impl Resource {
    pub fn new(kind: ResourceKind, max_health: u32, yield_amount: u32, serial: u64) -> Self {
        Self {
            kind,
            health: max_health,
            max_health,
            yield_amount,
            radius: 0.5,
            state: ResourceState::Active,
            serial,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state == ResourceState::Active
    }

    /// Apply damage. Returns the depletion on the single transition from
    /// `Active` to `Depleted`; every other call returns `None`.
    pub fn damage(&mut self, amount: u32) -> Option<Depletion> {
        if !self.is_active() {
            return None;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.state = ResourceState::Depleted;
            Some(Depletion {
                kind: self.kind,
                yield_amount: self.yield_amount,
            })
        } else {
            None
        }
    }

    /// Remaining health as a fraction of max (0.0 - 1.0)
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

/// Inert leftovers of a depleted resource (stump, spent mine)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Remnant {
    pub kind: ResourceKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_until_depleted() {
        let mut res = Resource::new(ResourceKind::Tree, 3, 2, 0);
        assert_eq!(res.damage(1), None);
        assert_eq!(res.health, 2);
        assert!((res.health_fraction() - 2.0 / 3.0).abs() < 0.001);

        let dep = res.damage(5).unwrap();
        assert_eq!(dep.kind, ResourceKind::Tree);
        assert_eq!(dep.yield_amount, 2);
        assert_eq!(res.health, 0);
        assert!(!res.is_active());
    }

    #[test]
    fn test_depletion_is_one_shot() {
        let mut res = Resource::new(ResourceKind::Mine, 1, 1, 0);
        assert!(res.damage(1).is_some());
        for _ in 0..10 {
            assert!(res.damage(1).is_none());
        }
        assert_eq!(res.health, 0);
    }

    #[test]
    fn test_zero_damage_never_depletes_healthy_node() {
        let mut res = Resource::new(ResourceKind::Mine, 2, 1, 0);
        assert!(res.damage(0).is_none());
        assert_eq!(res.health, 2);
    }
}
