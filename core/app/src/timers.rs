//! Per-host unlock countdown scheduling.
//!
//! Each unlocked host owns at most one tick task. Starting a countdown
//! always aborts the previous task for that host first, so a restart can
//! never leave two schedules racing. The spawned tasks only emit events;
//! all bookkeeping (decrement, expiry) happens in the controller loop
//! through [`TimerManager::on_tick`].

use crate::events::{AppEvent, EventSender};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Wall-clock length of one countdown tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct HostTimer {
    remaining_minutes: u32,
    task: JoinHandle<()>,
}

/// Outcome of applying one tick to a host's countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown continues with this many minutes left.
    Continue(u32),
    /// The window elapsed; the schedule was cancelled and the host
    /// should be locked.
    Expired,
}

#[derive(Debug, Default)]
pub struct TimerManager {
    timers: HashMap<String, HostTimer>,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the countdown for a host. An existing
    /// schedule is cancelled first, so restarts never stack.
    pub fn start(&mut self, host: &str, minutes: u32, events: EventSender) {
        self.cancel(host);
        let task = spawn_ticker(host.to_string(), events);
        self.timers.insert(
            host.to_string(),
            HostTimer {
                remaining_minutes: minutes,
                task,
            },
        );
    }

    /// Applies one tick to a host's countdown. Returns `None` for hosts
    /// without one (a tick that raced its own cancellation).
    pub fn on_tick(&mut self, host: &str) -> Option<TickOutcome> {
        let timer = self.timers.get_mut(host)?;
        timer.remaining_minutes = timer.remaining_minutes.saturating_sub(1);
        let remaining = timer.remaining_minutes;

        if remaining == 0 {
            self.cancel(host);
            Some(TickOutcome::Expired)
        } else {
            Some(TickOutcome::Continue(remaining))
        }
    }

    pub fn remaining(&self, host: &str) -> Option<u32> {
        self.timers.get(host).map(|timer| timer.remaining_minutes)
    }

    pub fn is_running(&self, host: &str) -> bool {
        self.timers.contains_key(host)
    }

    /// Cancels a host's schedule, if any.
    pub fn cancel(&mut self, host: &str) {
        if let Some(timer) = self.timers.remove(host) {
            timer.task.abort();
        }
    }

    /// Cancels every schedule (logout path).
    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.task.abort();
        }
    }

    pub fn active_hosts(&self) -> Vec<String> {
        self.timers.keys().cloned().collect()
    }
}

// No schedule outlives the manager.
impl Drop for TimerManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn spawn_ticker(host: String, events: EventSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so a countdown
        // minute spans a full interval.
        interval.tick().await;
        loop {
            interval.tick().await;
            if events.send(AppEvent::UnlockTick(host.clone())).is_err() {
                break;
            }
        }
    })
}
