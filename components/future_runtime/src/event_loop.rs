//! Event loop implementation.
//!
//! This module provides the cooperative event loop that coordinates task and
//! microtask execution. Each turn runs one task, then drains every pending
//! microtask before the next task is considered.

use crate::task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue};

/// The cooperative event loop.
///
/// Each iteration (turn) of the loop:
/// 1. Takes the oldest task from the task queue and executes it
/// 2. Drains all microtasks in the microtask queue
/// 3. Repeats
///
/// Everything runs on one logical thread; there is no preemption. A callback
/// runs to completion before the next queued callback starts.
///
/// # Examples
///
/// ```
/// use future_runtime::{EventLoop, MicroTask, Task};
///
/// let mut event_loop = EventLoop::new();
///
/// event_loop.enqueue_task(Task::new(|| {}));
/// event_loop.enqueue_microtask(MicroTask::new(|| {}));
/// event_loop.run_until_done();
/// ```
#[derive(Debug, Default)]
pub struct EventLoop {
    task_queue: TaskQueue,
    microtask_queue: MicrotaskQueue,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues.
    pub fn new() -> Self {
        Self {
            task_queue: TaskQueue::new(),
            microtask_queue: MicrotaskQueue::new(),
        }
    }

    /// Returns a shared handle to the microtask queue.
    ///
    /// Futures constructed with this handle schedule their settlement and
    /// continuation dispatch onto this loop.
    pub fn microtasks(&self) -> MicrotaskQueue {
        self.microtask_queue.clone()
    }

    /// Adds a task to the task queue.
    ///
    /// The task will be executed in the next available iteration of the loop.
    pub fn enqueue_task(&mut self, task: Task) {
        self.task_queue.enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    ///
    /// The microtask will be executed after the current task completes.
    pub fn enqueue_microtask(&self, microtask: MicroTask) {
        self.microtask_queue.enqueue(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.task_queue.is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.microtask_queue.is_empty()
    }

    /// Runs the event loop until all tasks and microtasks are processed.
    pub fn run_until_done(&mut self) {
        while !self.task_queue.is_empty() || !self.microtask_queue.is_empty() {
            // Execute one task (if available)
            if let Some(task) = self.task_queue.dequeue() {
                task.run();
            }

            // Drain all microtasks
            self.run_all_microtasks();
        }
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// New microtasks enqueued during execution are also processed before
    /// this method returns.
    pub fn run_all_microtasks(&mut self) {
        while let Some(microtask) = self.microtask_queue.dequeue() {
            microtask.run();
        }
    }

    /// Processes one complete cycle: one task followed by all microtasks.
    pub fn process_one_cycle(&mut self) {
        if let Some(task) = self.task_queue.dequeue() {
            task.run();
        }

        self.run_all_microtasks();
    }
}
