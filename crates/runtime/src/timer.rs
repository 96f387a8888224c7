//! Cancellable timers that fire back into a match worker.
//!
//! A timer is a spawned task that sends [`TimerFired`] messages into the
//! worker's timer channel. The worker keeps the task in a [`TimerSlot`]; only
//! firings whose id matches the slot's current task are acted on, so a timer
//! that was cancelled or replaced can never trigger anything even if its
//! message was already queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

pub type TimerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Per-second countdown of a regular turn.
    TurnCountdown,
    /// Gap between two turns.
    Transition,
    /// Per-second display countdown of a combat turn.
    CombatTick,
    /// Deadline after which the fighter attacks automatically.
    CombatExpiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick { seconds_left: u32 },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub id: TimerId,
    pub kind: TimerKind,
    pub signal: TimerSignal,
}

/// A running timer task. Dropping it aborts the task.
#[derive(Debug)]
pub struct ScheduledTask {
    id: TimerId,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn id(&self) -> TimerId {
        self.id
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Holds at most one live timer.
#[derive(Debug, Default)]
pub struct TimerSlot {
    task: Option<ScheduledTask>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels whatever was running and installs `task`.
    pub fn replace(&mut self, task: ScheduledTask) {
        self.task = Some(task);
    }

    /// Cancels the running timer, if any. Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.task = None;
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    pub fn is_current(&self, id: TimerId) -> bool {
        self.task.as_ref().is_some_and(|task| task.id == id)
    }

    /// Clears the slot if `id` is the running timer. Returns whether it was.
    pub fn take_if_current(&mut self, id: TimerId) -> bool {
        if self.is_current(id) {
            self.task = None;
            true
        } else {
            false
        }
    }
}

/// Spawns timers that report to one worker.
#[derive(Debug, Clone)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<TimerFired>,
    next_id: Arc<AtomicU64>,
}

impl Scheduler {
    pub fn new(tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn next_id(&self) -> TimerId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Ticks once per second with the seconds left, from `seconds - 1` down
    /// to 1, then reports `Expired` after `seconds`.
    pub fn countdown(&self, kind: TimerKind, seconds: u32) -> ScheduledTask {
        let id = self.next_id();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = time::interval_at(Instant::now() + period, period);
            for seconds_left in (1..seconds).rev() {
                interval.tick().await;
                let signal = TimerSignal::Tick { seconds_left };
                if tx.send(TimerFired { id, kind, signal }).is_err() {
                    return;
                }
            }
            if seconds > 0 {
                interval.tick().await;
            }
            let _ = tx.send(TimerFired {
                id,
                kind,
                signal: TimerSignal::Expired,
            });
        });
        ScheduledTask { id, handle }
    }

    /// Reports `Expired` once after `delay`.
    pub fn delay(&self, kind: TimerKind, delay: Duration) -> ScheduledTask {
        let id = self.next_id();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(TimerFired {
                id,
                kind,
                signal: TimerSignal::Expired,
            });
        });
        ScheduledTask { id, handle }
    }
}
