//! Safety-stop countdown.
//!
//! The timer holds no clock of its own. The embedding shell owns a single
//! repeating one-second tick source and calls [`SafetyTimer::tick`] while
//! [`SafetyTimer::is_running`] is true; `start` on a running timer is a
//! no-op so a second tick source is never needed.

use tracing::{debug, info};

use crate::config::Settings;

/// Outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// The timer is stopped; nothing changed.
    Idle,
    Ticked { remaining_sec: u32 },
    /// The countdown reached zero and the timer stopped. Sound the alarm.
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyTimer {
    remaining_sec: u32,
    default_sec: u32,
    low_time_sec: u32,
    extra_time_sec: u32,
    running: bool,
}

impl Default for SafetyTimer {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SafetyTimer {
    pub fn from_settings(settings: &Settings) -> Self {
        SafetyTimer {
            remaining_sec: settings.safety_stop_sec,
            default_sec: settings.safety_stop_sec,
            low_time_sec: settings.low_time_sec,
            extra_time_sec: settings.extra_time_sec,
            running: false,
        }
    }

    pub fn remaining_sec(&self) -> u32 {
        self.remaining_sec
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        debug!(remaining_sec = self.remaining_sec, "safety timer started");
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Start when stopped, stop when running. Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
        self.running
    }

    /// Stop and restore the default duration.
    pub fn reset(&mut self) {
        self.stop();
        self.remaining_sec = self.default_sec;
    }

    pub fn add_minute(&mut self) {
        self.remaining_sec = self.remaining_sec.saturating_add(self.extra_time_sec);
    }

    pub fn tick(&mut self) -> TimerEvent {
        if !self.running {
            return TimerEvent::Idle;
        }
        self.remaining_sec = self.remaining_sec.saturating_sub(1);
        if self.remaining_sec == 0 {
            self.running = false;
            info!("safety stop complete");
            return TimerEvent::Expired;
        }
        TimerEvent::Ticked {
            remaining_sec: self.remaining_sec,
        }
    }

    /// Change the default duration and the time shown. Ignored while running
    /// or when `minutes` is not positive.
    pub fn set_default_duration(&mut self, minutes: f64) -> bool {
        let seconds = (minutes * 60.0).round();
        if self.running || !seconds.is_finite() || seconds <= 0.0 {
            return false;
        }
        let seconds = seconds.min(u32::MAX as f64) as u32;
        self.default_sec = seconds;
        self.remaining_sec = seconds;
        true
    }

    /// Remaining time as `m:ss`.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining_sec / 60, self.remaining_sec % 60)
    }

    pub fn is_low(&self) -> bool {
        self.remaining_sec <= self.low_time_sec
    }
}
