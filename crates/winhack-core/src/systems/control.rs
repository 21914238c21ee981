//! Region control system - turns keyboard and drag input into region moves

use crate::components::{Region, Vec2};
use crate::events::{EventLog, SimEvent};
use crate::input::InputFrame;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ControlMode {
    #[default]
    Idle,
    Keyboard,
    /// Dragging with the pointer; `offset` keeps the grab point under the cursor
    Drag { offset: Vec2 },
}

/// Who is steering the region, plus the moving flag for the loop sound
#[derive(Debug, Clone, Default)]
pub struct RegionControl {
    pub mode: ControlMode,
    pub moving: bool,
    /// Keyboard speed (units/second); also the drag smoothing rate
    pub speed: f32,
}

impl RegionControl {
    pub fn new(speed: f32) -> Self {
        Self {
            mode: ControlMode::Idle,
            moving: false,
            speed,
        }
    }
}

/// Apply one tick of input to the region. Keyboard and drag are exclusive:
/// whichever starts while idle keeps control until released.
pub fn region_control_system(
    control: &mut RegionControl,
    region: &mut Region,
    input: &InputFrame,
    delta_seconds: f32,
    events: &mut EventLog,
) {
    let keys = input.keyboard_pressed();

    // Mode transitions
    control.mode = match control.mode {
        ControlMode::Idle if keys => ControlMode::Keyboard,
        ControlMode::Idle => match input.pointer_down {
            Some(p) if region.contains(&p) => ControlMode::Drag {
                offset: region.position() - p,
            },
            _ => ControlMode::Idle,
        },
        ControlMode::Keyboard if !keys => ControlMode::Idle,
        ControlMode::Drag { .. } if input.pointer_held.is_none() => ControlMode::Idle,
        mode => mode,
    };

    // Movement
    let moving = match control.mode {
        ControlMode::Keyboard => {
            let mut axis = input.keyboard_axis;
            // Diagonals are no faster than straight moves
            if axis.length_squared() > 1.0 {
                axis = axis.normalize();
            }
            region.move_by(axis * (control.speed * delta_seconds));
            true
        }
        ControlMode::Drag { offset } => match input.pointer_held {
            Some(p) => {
                region.drag_toward(p + offset, control.speed * delta_seconds);
                true
            }
            None => false,
        },
        ControlMode::Idle => false,
    };

    if moving && !control.moving {
        events.push(SimEvent::RegionMovementStarted);
    } else if !moving && control.moving {
        events.push(SimEvent::RegionMovementStopped);
    }
    control.moving = moving;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (RegionControl, Region, EventLog) {
        (
            RegionControl::new(5.0),
            Region::new(Vec2::ZERO, Vec2::new(2.0, 2.0), Vec2::new(20.0, 20.0), 8),
            EventLog::new(),
        )
    }

    #[test]
    fn test_keyboard_moves_and_signals() {
        let (mut control, mut region, mut events) = setup();

        region_control_system(&mut control, &mut region, &InputFrame::keys(1.0, 0.0), 1.0, &mut events);
        assert_eq!(control.mode, ControlMode::Keyboard);
        assert!((region.position().x - 5.0).abs() < 1e-4);

        region_control_system(&mut control, &mut region, &InputFrame::idle(), 1.0, &mut events);
        assert_eq!(control.mode, ControlMode::Idle);

        let started = events.count(|e| *e == SimEvent::RegionMovementStarted);
        let stopped = events.count(|e| *e == SimEvent::RegionMovementStopped);
        assert_eq!((started, stopped), (1, 1));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let (mut control, mut region, mut events) = setup();
        region_control_system(&mut control, &mut region, &InputFrame::keys(1.0, 1.0), 1.0, &mut events);
        assert!((region.position().length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let (mut control, mut region, mut events) = setup();

        // Grab one unit right of center
        region_control_system(
            &mut control,
            &mut region,
            &InputFrame::click(Vec2::new(1.0, 0.0)),
            0.0,
            &mut events,
        );
        assert_eq!(
            control.mode,
            ControlMode::Drag {
                offset: Vec2::new(-1.0, 0.0)
            }
        );

        // Hold at x=11 with a full lerp step: center lands at x=10
        region_control_system(
            &mut control,
            &mut region,
            &InputFrame::hold(Vec2::new(11.0, 0.0)),
            1.0,
            &mut events,
        );
        assert!((region.position().x - 10.0).abs() < 1e-4);

        region_control_system(&mut control, &mut region, &InputFrame::idle(), 0.1, &mut events);
        assert_eq!(control.mode, ControlMode::Idle);
    }

    #[test]
    fn test_click_outside_region_does_not_drag() {
        let (mut control, mut region, mut events) = setup();
        region_control_system(
            &mut control,
            &mut region,
            &InputFrame::click(Vec2::new(9.0, 9.0)),
            0.1,
            &mut events,
        );
        assert_eq!(control.mode, ControlMode::Idle);
        assert!(events.is_empty());
    }
}
