//! Host-driven deferred task scheduling.
//!
//! Time only moves when the host calls [`TaskScheduler::advance`], so delayed
//! work is deterministic and cancellable. Due tasks come out ordered by due
//! time, ties broken by scheduling order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(u64);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TaskHandle,
    due_ms: u64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct TaskScheduler<T> {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_handle: 1,
            pending: Vec::new(),
        }
    }
}

impl<T> TaskScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since the scheduler was created.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` once `delay_ms` have elapsed from now.
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled {
            handle,
            due_ms: self.now_ms.saturating_add(delay_ms),
            task,
        });
        handle
    }

    /// Drop a pending task. Returns false when it already ran or never existed.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|scheduled| scheduled.handle == handle)
    }

    pub fn due_at(&self, handle: TaskHandle) -> Option<u64> {
        self.pending
            .iter()
            .find(|scheduled| scheduled.handle == handle)
            .map(|scheduled| scheduled.due_ms)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward and hand back every task that became due.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<(TaskHandle, T)> {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let now = self.now_ms;

        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.due_ms <= now);
        self.pending = waiting;

        due.sort_by_key(|scheduled| (scheduled.due_ms, scheduled.handle));
        due.into_iter()
            .map(|scheduled| (scheduled.handle, scheduled.task))
            .collect()
    }

    /// Drop every pending task, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_at_due_time() {
        let mut scheduler = TaskScheduler::new();
        let handle = scheduler.schedule(800, "navigate");
        assert_eq!(scheduler.due_at(handle), Some(800));

        assert!(scheduler.advance(799).is_empty());
        assert!(scheduler.is_pending(handle));

        let due = scheduler.advance(1);
        assert_eq!(due, vec![(handle, "navigate")]);
        assert_eq!(scheduler.pending_len(), 0);
        assert_eq!(scheduler.now_ms(), 800);
    }

    #[test]
    fn orders_by_due_time_then_schedule_order() {
        let mut scheduler = TaskScheduler::new();
        let late = scheduler.schedule(300, "late");
        let first = scheduler.schedule(100, "first");
        let tie = scheduler.schedule(100, "tie");

        let due = scheduler.advance(1_000);
        assert_eq!(due, vec![(first, "first"), (tie, "tie"), (late, "late")]);
    }

    #[test]
    fn delay_is_relative_to_current_time() {
        let mut scheduler = TaskScheduler::new();
        scheduler.advance(250);
        let handle = scheduler.schedule(800, ());
        assert_eq!(scheduler.due_at(handle), Some(1_050));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = TaskScheduler::new();
        let handle = scheduler.schedule(10, 1);
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.advance(100).is_empty());
    }

    #[test]
    fn clear_reports_dropped_count() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(10, 'a');
        scheduler.schedule(20, 'b');
        assert_eq!(scheduler.clear(), 2);
        assert!(scheduler.advance(100).is_empty());
    }
}
