//! Objective progress: the non-linear "hack" percentage and its countdown.

use crate::config::ProgressConfig;
use crate::events::{EventLog, SimEvent};

/// Map lifetime earnings onto a 0-100 completion percentage.
///
/// Piecewise-linear over `f = clamp01(earned / target)`: the first 30% of
/// the target fills half the bar, the next 30% only adds ten points, and the
/// last 40% covers the remaining forty. Monotone, continuous at both
/// breakpoints, saturating at 100. A zero target counts as complete.
pub fn percent(lifetime_earned: u64, target: u64) -> f32 {
    if target == 0 {
        return 100.0;
    }
    let f = (lifetime_earned as f64 / target as f64).clamp(0.0, 1.0);

    let p = if f <= 0.3 {
        lerp(0.0, 50.0, f / 0.3)
    } else if f <= 0.6 {
        lerp(50.0, 60.0, (f - 0.3) / 0.3)
    } else {
        lerp(60.0, 100.0, (f - 0.6) / 0.4)
    };
    p as f32
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Countdown the objective must be reached within
#[derive(Debug, Clone)]
pub struct HackTimer {
    duration: f32,
    remaining: f32,
    running: bool,
    expired: bool,
}

impl HackTimer {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration: duration_secs,
            remaining: duration_secs,
            running: true,
            expired: false,
        }
    }

    pub fn from_config(config: &ProgressConfig) -> Self {
        Self::new(config.duration_secs)
    }

    /// Advance the countdown. Returns true on the tick it expires; the
    /// expiry event is emitted exactly once.
    pub fn tick(&mut self, delta_seconds: f32, progress_percent: f32, events: &mut EventLog) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= delta_seconds;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            self.expired = true;
            log::info!("Objective timer expired at {:.0}% progress", progress_percent);
            events.push(SimEvent::ObjectiveExpired { progress_percent });
            return true;
        }
        false
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self) {
        self.remaining = self.duration;
        self.running = true;
        self.expired = false;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Remaining time as `mm:ss`
    pub fn clock_text(&self) -> String {
        let total = self.remaining.max(0.0).floor() as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}
