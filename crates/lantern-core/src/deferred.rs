//! Cancellable deferred follow-ups for display delays.
//!
//! Puzzle engines are synchronous, but a few transitions are committed only
//! after a presentational pause (a crossing in progress, a weighing result on
//! display, the adversary "thinking", the win/fail banner). Those follow-ups
//! are queued here, tagged with the [`InstanceId`] they were scheduled for.
//! The owner pops them once they fall due and drops any whose instance has
//! since been replaced.

use slotmap::SlotMap;

use crate::fixed::Millis;
use crate::id::{InstanceId, TaskId};

// ---------------------------------------------------------------------------
// Task record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Deferred<T> {
    due: Millis,
    seq: u64,
    instance: InstanceId,
    blocking: bool,
    payload: T,
}

/// A follow-up whose due time has been reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask<T> {
    pub id: TaskId,
    pub due: Millis,
    pub instance: InstanceId,
    pub payload: T,
}

// ---------------------------------------------------------------------------
// DeferredQueue
// ---------------------------------------------------------------------------

/// Pending follow-ups ordered by due time, then by scheduling order.
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    tasks: SlotMap<TaskId, Deferred<T>>,
    next_seq: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fall due `delay` ms after `now`.
    ///
    /// A blocking task marks its instance as busy until it is popped or
    /// cancelled; see [`has_blocking`](Self::has_blocking).
    pub fn schedule(
        &mut self,
        now: Millis,
        delay: Millis,
        instance: InstanceId,
        blocking: bool,
        payload: T,
    ) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(Deferred {
            due: now.saturating_add(delay),
            seq,
            instance,
            blocking,
            payload,
        })
    }

    /// Cancel one task. Returns its payload if it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        self.tasks.remove(id).map(|t| t.payload)
    }

    /// Cancel every task scheduled for `instance`. Returns how many were dropped.
    pub fn cancel_instance(&mut self, instance: InstanceId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, t| t.instance != instance);
        before - self.tasks.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<DueTask<T>> {
        let id = self
            .tasks
            .iter()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(id, _)| id)?;
        let task = self.tasks.remove(id)?;
        Some(DueTask {
            id,
            due: task.due,
            instance: task.instance,
            payload: task.payload,
        })
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<Millis> {
        self.tasks.values().map(|t| t.due).min()
    }

    /// Whether a blocking task is pending for `instance`.
    pub fn has_blocking(&self, instance: InstanceId) -> bool {
        self.tasks
            .values()
            .any(|t| t.blocking && t.instance == instance)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
