use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant},
};

use crate::errors::{AppError, AppResult};

/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// The clock is not running; nothing changed.
    Idle,
    Remaining(u32),
    /// Reached zero on this tick. Reported once per countdown.
    Expired,
}

/// Countdown for one timed attempt. Advisory only: the backend judges
/// lateness from its own started/completed timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptClock {
    remaining: Option<u32>,
    running: bool,
    expired: bool,
}

impl AttemptClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, total_seconds: u32) -> AppResult<()> {
        if self.running {
            return Ok(());
        }
        if total_seconds == 0 {
            return Err(AppError::ValidationError(
                "clock must start with a positive number of seconds".to_string(),
            ));
        }

        self.remaining = Some(total_seconds);
        self.running = true;
        self.expired = false;
        Ok(())
    }

    pub fn tick(&mut self) -> ClockTick {
        if !self.running {
            return ClockTick::Idle;
        }

        let remaining = self.remaining.unwrap_or(0).saturating_sub(1);
        self.remaining = Some(remaining);

        if remaining == 0 {
            self.running = false;
            self.expired = true;
            ClockTick::Expired
        } else {
            ClockTick::Remaining(remaining)
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Ends a timed countdown at zero without reporting expiry. An untimed
    /// clock stays untimed.
    pub fn pin_at_zero(&mut self) {
        self.running = false;
        if self.remaining.is_some() {
            self.remaining = Some(0);
            self.expired = true;
        }
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn display(&self) -> Option<String> {
        self.remaining.map(format_remaining)
    }
}

/// `m:ss`, e.g. 90 seconds is "1:30".
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Owned periodic task that feeds ticks into a session's event channel.
///
/// The first tick arrives one full period after `start`. Stopping or
/// dropping the driver aborts the task.
#[derive(Debug, Default)]
pub struct ClockDriver {
    handle: Option<JoinHandle<()>>,
}

impl ClockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<T>(&mut self, period: Duration, sender: mpsc::Sender<T>, tick: T)
    where
        T: Clone + Send + 'static,
    {
        if self.is_running() {
            return;
        }

        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if sender.send(tick.clone()).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
