//! Per-tick input supplied by the host. The core never polls devices.

use crate::components::Vec2;

/// Already-resolved input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// World position of a pointer press that started this tick
    pub pointer_down: Option<Vec2>,
    /// World position of the pointer while the button is held
    pub pointer_held: Option<Vec2>,
    /// Movement axis, each component in [-1, 1]
    pub keyboard_axis: Vec2,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    /// A press-and-hold at `point`
    pub fn click(point: Vec2) -> Self {
        Self {
            pointer_down: Some(point),
            pointer_held: Some(point),
            keyboard_axis: Vec2::ZERO,
        }
    }

    pub fn hold(point: Vec2) -> Self {
        Self {
            pointer_down: None,
            pointer_held: Some(point),
            keyboard_axis: Vec2::ZERO,
        }
    }

    pub fn keys(x: f32, y: f32) -> Self {
        Self {
            keyboard_axis: Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)),
            ..Self::default()
        }
    }

    /// Any axis deflection above the dead zone counts as a key press
    pub fn keyboard_pressed(&self) -> bool {
        self.keyboard_axis.x.abs() > 0.01 || self.keyboard_axis.y.abs() > 0.01
    }
}
