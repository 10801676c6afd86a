//! Board state and optimistic status sync
//!
//! The board applies a drop locally before the server has confirmed it, so
//! the card lands in its new column with no round-trip lag. Every in-flight
//! move is tracked in `pending` with the status the card had before; a
//! confirmation replaces the local task with the server copy, and a failure
//! is resolved by reloading the whole board rather than patching guesses
//! back in one at a time.

use std::collections::HashMap;

use crate::task::{Status, Task};

/// A position on the board: which column, and how far down it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub column: Status,
    pub index: usize,
}

/// A committed move that still needs a server sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: i64,
    pub from: Status,
    pub to: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing to sync: the drag was cancelled, dropped where it started,
    /// or pointed at a task the board no longer knows about.
    NoOp,
    /// The task moved locally; the change must be sent to the server.
    Moved(StatusChange),
}

#[derive(Debug, Default)]
pub struct BoardState {
    tasks: Vec<Task>,
    /// Task id -> status before the optimistic move, for every unconfirmed
    /// status request.
    pending: HashMap<i64, Status>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh server snapshot. Any pending moves are forgotten:
    /// the snapshot is authoritative.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.pending.clear();
    }

    pub fn get(&self, task_id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Tasks in one column, in server list order.
    pub fn column(&self, status: Status) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    pub fn column_len(&self, status: Status) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    pub fn task_at(&self, status: Status, index: usize) -> Option<&Task> {
        self.tasks.iter().filter(|t| t.status == status).nth(index)
    }

    pub fn is_pending(&self, task_id: i64) -> bool {
        self.pending.contains_key(&task_id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Resolve a finished drag. `to` is `None` when the drag was cancelled.
    ///
    /// A drop onto the exact source position is a no-op. Anywhere else, the
    /// card is spliced into the destination slot locally and the move is
    /// recorded as pending; the caller sends the returned change to the
    /// server. Only the column is synced, so in-column ordering lasts until
    /// the next reload. A same-column drop at a new index still syncs,
    /// matching what any other client would send.
    pub fn apply_drop(
        &mut self,
        task_id: i64,
        from: DropTarget,
        to: Option<DropTarget>,
    ) -> DropOutcome {
        let Some(to) = to else {
            return DropOutcome::NoOp;
        };
        if to == from {
            return DropOutcome::NoOp;
        }
        if self.pending.contains_key(&task_id) {
            return DropOutcome::NoOp;
        }
        let Some(vec_index) = self.tasks.iter().position(|t| t.id == task_id) else {
            return DropOutcome::NoOp;
        };

        let mut task = self.tasks.remove(vec_index);
        let previous = task.status;
        task.status = to.column;
        let insert_at = self.insert_position(to);
        self.tasks.insert(insert_at, task);

        self.pending.insert(task_id, previous);
        DropOutcome::Moved(StatusChange {
            task_id,
            from: previous,
            to: to.column,
        })
    }

    /// Vec index where a card must land to show up at `to.index` of its
    /// column. Past the end of the column means after everything.
    fn insert_position(&self, to: DropTarget) -> usize {
        let mut seen = 0;
        for (index, task) in self.tasks.iter().enumerate() {
            if task.status == to.column {
                if seen == to.index {
                    return index;
                }
                seen += 1;
            }
        }
        self.tasks.len()
    }

    /// The server accepted a status change: adopt its copy of the task and
    /// mark the move settled.
    pub fn confirm(&mut self, task: Task) {
        self.pending.remove(&task.id);
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    /// The server rejected a status change. Only the pending record is
    /// dropped here; the caller follows up with a full reload, which is the
    /// one rollback that cannot disagree with the server.
    pub fn resolve_failure(&mut self, task_id: i64) {
        self.pending.remove(&task_id);
    }
}
