//! Unit tests for EventLoop

use std::sync::{Arc, Mutex};

use future_runtime::{EventLoop, MicroTask, Task};

#[test]
fn new_event_loop_has_empty_queues() {
    let el = EventLoop::new();
    assert!(el.is_task_queue_empty());
    assert!(el.is_microtask_queue_empty());
}

#[test]
fn run_until_done_on_empty_loop_returns() {
    let mut el = EventLoop::new();
    el.run_until_done();
}

#[test]
fn tasks_run_in_fifo_order() {
    let mut el = EventLoop::new();
    let order = Arc::new(Mutex::new(vec![]));

    for i in 1..=3 {
        let o = order.clone();
        el.enqueue_task(Task::new(move || o.lock().unwrap().push(i)));
    }

    el.run_until_done();
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn microtasks_drain_after_each_task() {
    let mut el = EventLoop::new();
    let order = Arc::new(Mutex::new(vec![]));

    let handle = el.microtasks();
    let o = order.clone();
    el.enqueue_task(Task::new(move || {
        o.lock().unwrap().push("task1");
        let o2 = o.clone();
        handle.enqueue(MicroTask::new(move || {
            o2.lock().unwrap().push("micro1");
        }));
    }));

    let o = order.clone();
    el.enqueue_task(Task::new(move || {
        o.lock().unwrap().push("task2");
    }));

    el.run_until_done();

    // The microtask scheduled by task1 runs before task2 starts
    assert_eq!(
        *order.lock().unwrap(),
        vec!["task1", "micro1", "task2"],
    );
}

#[test]
fn microtasks_scheduled_during_drain_run_before_return() {
    let mut el = EventLoop::new();
    let order = Arc::new(Mutex::new(vec![]));

    let handle = el.microtasks();
    let o = order.clone();
    el.enqueue_microtask(MicroTask::new(move || {
        o.lock().unwrap().push(1);
        let o2 = o.clone();
        let inner = handle.clone();
        handle.enqueue(MicroTask::new(move || {
            o2.lock().unwrap().push(2);
            let o3 = o2.clone();
            inner.enqueue(MicroTask::new(move || {
                o3.lock().unwrap().push(3);
            }));
        }));
    }));

    el.run_all_microtasks();
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn process_one_cycle_runs_one_task_and_all_microtasks() {
    let mut el = EventLoop::new();
    let order = Arc::new(Mutex::new(vec![]));

    let o = order.clone();
    el.enqueue_task(Task::new(move || o.lock().unwrap().push('a')));
    let o = order.clone();
    el.enqueue_task(Task::new(move || o.lock().unwrap().push('b')));
    let o = order.clone();
    el.enqueue_microtask(MicroTask::new(move || o.lock().unwrap().push('m')));

    el.process_one_cycle();
    assert_eq!(*order.lock().unwrap(), vec!['a', 'm']);
    assert!(!el.is_task_queue_empty());

    el.process_one_cycle();
    assert_eq!(*order.lock().unwrap(), vec!['a', 'm', 'b']);
}
