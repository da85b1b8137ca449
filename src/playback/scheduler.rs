use std::collections::VecDeque;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle of a scheduled frame task.
    pub struct TaskId;
}

/// Single-threaded queue of tasks to run on the next display frame.
///
/// Cancelling removes the task outright, so a cancelled callback can never run. Tasks run in
/// the order they were scheduled; anything scheduled while a frame is being run waits for the
/// following frame.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    tasks: SlotMap<TaskId, T>,
    order: VecDeque<TaskId>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameScheduler<T> {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            order: VecDeque::new(),
        }
    }

    /// Queue `task` for the next frame.
    pub fn schedule(&mut self, task: T) -> TaskId {
        let id = self.tasks.insert(task);
        self.order.push_back(id);
        id
    }

    /// Remove a pending task, returning it if it had not run yet.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let task = self.tasks.remove(id);
        if task.is_some() {
            tracing::trace!(?id, "frame task cancelled");
        }
        task
    }

    /// Whether `id` is still waiting to run.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of tasks waiting to run.
    pub fn pending_len(&self) -> usize {
        self.tasks.len()
    }

    /// Take every task due on this frame, oldest first.
    pub fn take_due(&mut self) -> Vec<(TaskId, T)> {
        let mut due = Vec::with_capacity(self.tasks.len());
        while let Some(id) = self.order.pop_front() {
            if let Some(task) = self.tasks.remove(id) {
                due.push((id, task));
            }
        }
        due
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
