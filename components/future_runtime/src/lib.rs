//! Deferred-value runtime.
//!
//! This crate provides a Promise/A+-style deferred value and the cooperative
//! host facility it schedules on:
//! - [`Future`] - a deferred value with chained continuations, error
//!   propagation, and transparent flattening of nested deferred values
//! - [`EventLoop`] - the event loop coordinating task and microtask
//!   execution
//!
//! # Overview
//!
//! A producer constructs a [`Future`] with a setup routine that receives the
//! two settlement capabilities ([`Resolver`] and [`Rejecter`]). Consumers
//! attach continuations with [`Future::then`], which returns a new future and
//! so composes into chains. Handlers are never invoked synchronously from
//! within settlement: dispatch always rides the microtask queue, so code
//! running after a `then` call in the same synchronous block always runs
//! before the handler does.
//!
//! # Examples
//!
//! ```
//! use core_types::Value;
//! use future_runtime::{EventLoop, Function, Future};
//!
//! let mut event_loop = EventLoop::new();
//! let queue = event_loop.microtasks();
//!
//! let doubled = Future::resolved(&queue, Value::Smi(21)).then(
//!     Some(Function::new(|v| match v {
//!         Value::Smi(n) => Ok(Value::Smi(n * 2)),
//!         other => Ok(other),
//!     })),
//!     None,
//! );
//!
//! event_loop.run_until_done();
//! assert_eq!(doubled.result(), Some(Value::Smi(42)));
//! ```
//!
//! Settling from outside a setup routine uses [`Future::deferred`]:
//!
//! ```
//! use core_types::Value;
//! use future_runtime::{EventLoop, Future, FutureState, Task};
//!
//! let mut event_loop = EventLoop::new();
//! let deferred = Future::deferred(&event_loop.microtasks());
//!
//! let resolver = deferred.resolver.clone();
//! event_loop.enqueue_task(Task::new(move || {
//!     resolver.resolve(Value::from("done"));
//! }));
//!
//! event_loop.run_until_done();
//! assert_eq!(deferred.future.state(), FutureState::Fulfilled);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event_loop;
pub mod future;
pub mod task_queue;

// Re-export main types at crate root
pub use event_loop::EventLoop;
pub use future::{Deferred, Function, Future, FutureState, Rejecter, Resolver};
pub use task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue};
