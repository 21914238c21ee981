//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

/// 2D vector in world units
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const UP: Self = Self { x: 0.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians from +x
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Linear interpolation toward `other`, `t` clamped to [0, 1]
    pub fn lerp(&self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Axis-aligned box described by its center and half-extents
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extent
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extent
    }

    /// Closed containment test (points on the edge are inside)
    pub fn contains(&self, point: &Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// If a circle straddles one of the box edges, returns the contact
    /// normal pointing from that edge toward the circle's center side.
    pub fn edge_contact(&self, center: &Vec2, radius: f32) -> Option<Vec2> {
        let min = self.min();
        let max = self.max();
        let inside = self.contains(center);

        if inside {
            // Nearest edge, normal points back into the box
            let candidates = [
                (center.x - min.x, Vec2::new(1.0, 0.0)),
                (max.x - center.x, Vec2::new(-1.0, 0.0)),
                (center.y - min.y, Vec2::new(0.0, 1.0)),
                (max.y - center.y, Vec2::new(0.0, -1.0)),
            ];
            candidates
                .iter()
                .filter(|(gap, _)| *gap < radius)
                .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(_, normal)| *normal)
        } else {
            // Closest point on the box, normal points outward toward the circle
            let closest = Vec2::new(center.x.clamp(min.x, max.x), center.y.clamp(min.y, max.y));
            let offset = *center - closest;
            if offset.length_squared() < radius * radius {
                Some(offset.normalize())
            } else {
                None
            }
        }
    }
}

/// Spatial position component - where an entity is in world space
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Physics body - velocity and collision circle driven by the integrator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub velocity: Vec2,
    pub mass: f32,
    /// Linear damping coefficient (per second)
    pub damping: f32,
    /// Collision circle radius
    pub radius: f32,
    /// Whether the body touched a region border last physics step
    pub touching_border: bool,
}

impl Body {
    pub fn new(radius: f32, mass: f32, damping: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            mass: mass.max(f32::EPSILON),
            damping: damping.max(0.0),
            radius,
            touching_border: false,
        }
    }

    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * (1.0 / self.mass);
    }

    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

/// Level-triggered countdown: fires when it crosses zero, then restarts at a
/// full interval (leftover time is dropped, so one tick fires at most once).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IntervalTimer {
    pub interval: f32,
    pub remaining: f32,
}

impl IntervalTimer {
    /// Timer that fires after a full interval
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: interval,
        }
    }

    /// Timer that fires on the first tick
    pub fn primed(interval: f32) -> Self {
        Self {
            interval,
            remaining: 0.0,
        }
    }

    pub fn tick(&mut self, delta_seconds: f32) -> bool {
        self.remaining -= delta_seconds;
        if self.remaining <= 0.0 {
            self.remaining = self.interval;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }
}

/// Whether two collision circles overlap
pub fn circles_overlap(a: &Vec2, ra: f32, b: &Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}
