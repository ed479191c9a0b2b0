//! Task and microtask queue management.
//!
//! This module provides the two queue tiers used by the event loop. Tasks
//! are executed one at a time, with all microtasks draining after each task.
//! Continuations registered on futures always ride the microtask tier.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// A task to be executed by the event loop.
///
/// Tasks represent host-tier work to be done in the next iteration of the
/// event loop: timer callbacks, I/O completions, external settlement of a
/// deferred future.
pub struct Task {
    callback: Box<dyn FnOnce() + Send>,
}

impl Task {
    /// Creates a new Task from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task.
    ///
    /// Task callbacks are infallible: every failure inside the engine is
    /// captured into some future's rejected state, never surfaced here.
    pub fn run(self) {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A microtask to be executed by the event loop.
///
/// Microtasks are drained completely after each task. Future settlement and
/// continuation dispatch are scheduled as microtasks, which is what keeps a
/// handler from running inside the synchronous block that registered it.
pub struct MicroTask {
    callback: Box<dyn FnOnce() + Send>,
}

impl MicroTask {
    /// Creates a new MicroTask from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the microtask.
    pub fn run(self) {
        (self.callback)()
    }
}

impl std::fmt::Debug for MicroTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MicroTask {{ ... }}")
    }
}

/// A queue for tasks.
///
/// Tasks are processed in FIFO order, one at a time, by the queue's owner.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Creates a new empty TaskQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a task to the end of the queue.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// A queue for microtasks.
///
/// Unlike [`TaskQueue`], this is a cheaply cloneable shared handle: futures
/// hold a clone and enqueue continuation dispatches from inside callbacks
/// while the event loop drains the same queue. FIFO order is preserved among
/// microtasks enqueued from the same logical tick.
#[derive(Debug, Clone, Default)]
pub struct MicrotaskQueue {
    queue: Arc<Mutex<VecDeque<MicroTask>>>,
}

impl MicrotaskQueue {
    /// Creates a new empty MicrotaskQueue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a microtask to the end of the queue.
    pub fn enqueue(&self, microtask: MicroTask) {
        self.queue.lock().push_back(microtask);
    }

    /// Removes and returns the next microtask from the queue.
    pub fn dequeue(&self) -> Option<MicroTask> {
        self.queue.lock().pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Returns the number of microtasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}
