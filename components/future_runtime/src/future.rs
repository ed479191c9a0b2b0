//! Deferred-value implementation following the Promise/A+ contract.
//!
//! This module provides the [`Future`] type: a one-shot state machine from
//! pending to fulfilled or rejected, a registry of continuation records
//! drained in registration order, and the resolution algorithm that adopts
//! nested thenable values instead of storing them.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use core_types::{Callback, RuntimeError, Thenable, Value};
use parking_lot::Mutex;

use crate::task_queue::{MicroTask, MicrotaskQueue};

/// The state of a Future.
///
/// Once settled (Fulfilled or Rejected), a future never becomes pending
/// again; the only state change after settlement is the documented flip a
/// failing fulfillment handler applies to its own source future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureState {
    /// The initial state; neither fulfilled nor rejected.
    Pending,
    /// The future has been fulfilled with a value.
    Fulfilled,
    /// The future has been rejected with a reason.
    Rejected,
}

/// A one-shot continuation handler.
///
/// This wraps the user-supplied transform attached via [`Future::then`]. The
/// callback is consumed when called; returning an `Err` is the handler's way
/// of throwing.
pub struct Function {
    callback: Box<dyn FnOnce(Value) -> Result<Value, RuntimeError> + Send>,
}

impl Function {
    /// Creates a new Function from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Value) -> Result<Value, RuntimeError> + Send + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Calls the function with the given argument, consuming it.
    pub fn call(self, arg: Value) -> Result<Value, RuntimeError> {
        (self.callback)(arg)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function {{ ... }}")
    }
}

/// Identity source for futures. Starts at zero; the first future created in
/// a process observes id 1, and ids increase monotonically from there.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Which settlement path a reaction is registered on.
#[derive(Debug, Clone, Copy)]
enum Path {
    Fulfill,
    Reject,
}

/// A registered continuation record.
enum Reaction {
    /// A `then` registration: the optional user transform plus the
    /// settlement capabilities of the downstream future it feeds.
    Chain {
        handler: Option<Function>,
        target: Settler,
    },
    /// A raw continuation from thenable adoption; fired with the settled
    /// payload as-is.
    Notify(Callback),
}

struct Core {
    state: FutureState,
    value: Option<Value>,
    /// Set once a settlement task has been scheduled. The state transition
    /// itself happens inside that deferred task, so this is what makes
    /// settlement one-shot in the window before the task runs.
    committed: bool,
    fulfill_reactions: Vec<Reaction>,
    reject_reactions: Vec<Reaction>,
}

impl Core {
    fn can_settle(&self) -> bool {
        self.state == FutureState::Pending && !self.committed
    }

    fn settled_value(&self) -> Value {
        // A settled future always carries a payload; `undefined` is the
        // host-value reading of "settled with nothing".
        self.value.clone().unwrap_or(Value::Undefined)
    }
}

struct Shared {
    id: u64,
    core: Mutex<Core>,
    queue: MicrotaskQueue,
}

impl Shared {
    /// Settle-as-fulfilled. Runs thenable unwrapping synchronously, before
    /// any scheduling: a future fulfilled with a nested deferred value
    /// adopts that value's eventual outcome instead of storing it.
    fn resolve(shared: &Arc<Shared>, value: Value) {
        let adopted = {
            let mut core = shared.core.lock();
            if !core.can_settle() {
                drop(core);
                tracing::debug!(future = shared.id, "fulfill ignored; future already settling");
                return;
            }
            match value.thenable() {
                Some(thenable) => Some(thenable.clone()),
                None => {
                    core.committed = true;
                    None
                }
            }
        };

        match adopted {
            Some(thenable) => {
                // Hand this future's own settlement capabilities to the
                // nested value. The relayed fulfillment runs unwrapping
                // again, so nesting flattens to arbitrary depth without an
                // intermediate "fulfilled with a thenable" state.
                let on_fulfilled: Callback = {
                    let shared = shared.clone();
                    Box::new(move |v| Shared::resolve(&shared, v))
                };
                let on_rejected: Callback = {
                    let shared = shared.clone();
                    Box::new(move |r| Shared::reject(&shared, r))
                };
                if let Err(error) = thenable.subscribe(on_fulfilled, on_rejected) {
                    Shared::reject(shared, Value::Error(error));
                }
            }
            None => {
                let shared = shared.clone();
                shared.queue.clone().enqueue(MicroTask::new(move || {
                    Shared::run_fulfill(&shared, value);
                }));
            }
        }
    }

    /// Settle-as-rejected.
    fn reject(shared: &Arc<Shared>, reason: Value) {
        {
            let mut core = shared.core.lock();
            if !core.can_settle() {
                drop(core);
                tracing::debug!(future = shared.id, "reject ignored; future already settling");
                return;
            }
            core.committed = true;
        }
        let shared = shared.clone();
        shared.queue.clone().enqueue(MicroTask::new(move || {
            Shared::run_reject(&shared, reason);
        }));
    }

    /// The deferred fulfillment task: transition, store the value, drain the
    /// fulfillment records in registration order.
    fn run_fulfill(shared: &Arc<Shared>, value: Value) {
        let reactions = {
            let mut core = shared.core.lock();
            core.state = FutureState::Fulfilled;
            core.value = Some(value.clone());
            mem::take(&mut core.fulfill_reactions)
        };

        for reaction in reactions {
            if let Err(error) = dispatch(reaction, value.clone(), Path::Fulfill) {
                // A failing fulfillment handler flips this future itself:
                // continuations attached from here on observe a rejection
                // carrying the handler's error. The remaining records of
                // this drain still receive the original value.
                let mut core = shared.core.lock();
                core.value = Some(Value::Error(error));
                core.state = FutureState::Rejected;
            }
        }
    }

    /// The deferred rejection task: transition, store the reason, drain the
    /// rejection records in registration order.
    fn run_reject(shared: &Arc<Shared>, reason: Value) {
        let reactions = {
            let mut core = shared.core.lock();
            core.state = FutureState::Rejected;
            core.value = Some(reason.clone());
            mem::take(&mut core.reject_reactions)
        };

        for reaction in reactions {
            if let Err(error) = dispatch(reaction, reason.clone(), Path::Reject) {
                // A failing rejection handler is a dead end for its branch.
                // Its downstream future was already rejected by dispatch;
                // this future keeps its reason.
                tracing::debug!(
                    future = shared.id,
                    error = %error,
                    "rejection handler failed"
                );
            }
        }
    }
}

/// Runs one continuation record against a settled payload.
///
/// For a `Chain` record with a transform: the transform's return value
/// settles the downstream future (unwrapped again if it is a thenable),
/// except that returning the downstream future itself is a type error. A
/// transform failure rejects the downstream future and is also reported to
/// the caller, which decides what it means for the source future.
fn dispatch(reaction: Reaction, payload: Value, path: Path) -> Result<(), RuntimeError> {
    match reaction {
        Reaction::Notify(callback) => {
            callback(payload);
            Ok(())
        }
        Reaction::Chain {
            handler: None,
            target,
        } => {
            // No transform: the payload passes through unchanged.
            match path {
                Path::Fulfill => target.resolve(payload),
                Path::Reject => target.reject(payload),
            }
            Ok(())
        }
        Reaction::Chain {
            handler: Some(transform),
            target,
        } => match transform.call(payload) {
            Ok(result) => {
                if result.thenable().and_then(|t| t.id()) == Some(target.id()) {
                    target.reject(Value::Error(RuntimeError::type_error(
                        "cannot fulfill or reject a future with itself",
                    )));
                } else {
                    target.resolve(result);
                }
                Ok(())
            }
            Err(error) => {
                target.reject(Value::Error(error.clone()));
                Err(error)
            }
        },
    }
}

/// Internal settlement capability pair for one future.
#[derive(Clone)]
struct Settler {
    shared: Arc<Shared>,
}

impl Settler {
    fn resolve(&self, value: Value) {
        Shared::resolve(&self.shared, value);
    }

    fn reject(&self, reason: Value) {
        Shared::reject(&self.shared, reason);
    }

    fn id(&self) -> u64 {
        self.shared.id
    }
}

/// The settle-as-fulfilled capability of a future.
///
/// Handed to the setup routine of [`Future::new`] and returned by
/// [`Future::deferred`]. Fulfilling is a no-op once the future has committed
/// to a settlement.
#[derive(Clone)]
pub struct Resolver {
    settler: Settler,
}

impl Resolver {
    /// Fulfills the future with `value`, adopting it first if it is a
    /// thenable.
    pub fn resolve(&self, value: Value) {
        self.settler.resolve(value);
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolver {{ future: {} }}", self.settler.id())
    }
}

/// The settle-as-rejected capability of a future.
#[derive(Clone)]
pub struct Rejecter {
    settler: Settler,
}

impl Rejecter {
    /// Rejects the future with `reason`. A no-op once the future has
    /// committed to a settlement.
    pub fn reject(&self, reason: Value) {
        self.settler.reject(reason);
    }
}

impl fmt::Debug for Rejecter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rejecter {{ future: {} }}", self.settler.id())
    }
}

/// A future together with its settlement capabilities, for producer code
/// that settles from outside the setup routine.
#[derive(Debug)]
pub struct Deferred {
    /// The pending future.
    pub future: Future,
    /// Its settle-as-fulfilled capability.
    pub resolver: Resolver,
    /// Its settle-as-rejected capability.
    pub rejecter: Rejecter,
}

/// A deferred value.
///
/// A `Future` represents the eventual result of an asynchronous computation.
/// Consumers attach continuations with [`Future::then`]; producers settle it
/// through the capabilities handed to the setup routine, or externally via
/// [`Future::deferred`]. Handlers are never invoked synchronously from
/// within settlement or registration: dispatch always rides the microtask
/// queue the future was built with.
///
/// Cloning a `Future` clones a handle; all clones observe the same state.
///
/// # Examples
///
/// ```
/// use core_types::Value;
/// use future_runtime::{EventLoop, Function, Future};
///
/// let mut event_loop = EventLoop::new();
/// let queue = event_loop.microtasks();
///
/// let chained = Future::resolved(&queue, Value::Smi(5)).then(
///     Some(Function::new(|v| match v {
///         Value::Smi(n) => Ok(Value::Smi(n + 1)),
///         other => Ok(other),
///     })),
///     None,
/// );
///
/// event_loop.run_until_done();
/// assert_eq!(chained.result(), Some(Value::Smi(6)));
/// ```
#[derive(Clone)]
pub struct Future {
    shared: Arc<Shared>,
}

impl Future {
    /// Creates a future and runs `setup` synchronously with the two
    /// settlement capabilities.
    ///
    /// An `Err` returned by the setup routine is caught and becomes the
    /// future's rejection; construction itself never fails. (The host
    /// language's "setup must be callable" check has no runtime counterpart
    /// here: the signature only admits callables.)
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use future_runtime::{EventLoop, Future};
    ///
    /// let mut event_loop = EventLoop::new();
    /// let future = Future::new(&event_loop.microtasks(), |resolver, _rejecter| {
    ///     resolver.resolve(Value::from("ready"));
    ///     Ok(())
    /// });
    ///
    /// event_loop.run_until_done();
    /// assert_eq!(future.result(), Some(Value::from("ready")));
    /// ```
    pub fn new<F>(queue: &MicrotaskQueue, setup: F) -> Future
    where
        F: FnOnce(Resolver, Rejecter) -> Result<(), RuntimeError>,
    {
        let future = Future::pending(queue);
        let resolver = Resolver {
            settler: future.settler(),
        };
        let rejecter = Rejecter {
            settler: future.settler(),
        };
        if let Err(error) = setup(resolver, rejecter) {
            Shared::reject(&future.shared, Value::Error(error));
        }
        future
    }

    /// Creates a future already fulfilled with `value` (still subject to
    /// thenable adoption, and still settled through the microtask queue).
    pub fn resolved(queue: &MicrotaskQueue, value: Value) -> Future {
        Future::new(queue, move |resolver, _rejecter| {
            resolver.resolve(value);
            Ok(())
        })
    }

    /// Creates a future already rejected with `reason`.
    pub fn rejected(queue: &MicrotaskQueue, reason: Value) -> Future {
        Future::new(queue, move |_resolver, rejecter| {
            rejecter.reject(reason);
            Ok(())
        })
    }

    /// Creates a pending future and hands its settlement capabilities to the
    /// caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use future_runtime::{EventLoop, Future, FutureState};
    ///
    /// let mut event_loop = EventLoop::new();
    /// let deferred = Future::deferred(&event_loop.microtasks());
    /// assert_eq!(deferred.future.state(), FutureState::Pending);
    ///
    /// deferred.resolver.resolve(Value::Smi(1));
    /// event_loop.run_until_done();
    /// assert_eq!(deferred.future.state(), FutureState::Fulfilled);
    /// ```
    pub fn deferred(queue: &MicrotaskQueue) -> Deferred {
        let future = Future::pending(queue);
        let resolver = Resolver {
            settler: future.settler(),
        };
        let rejecter = Rejecter {
            settler: future.settler(),
        };
        Deferred {
            future,
            resolver,
            rejecter,
        }
    }

    /// Attaches continuations and returns the downstream future they feed.
    ///
    /// The downstream future is returned synchronously and is always
    /// pending at that point, whatever the state of `self`. A single call
    /// registers both a fulfillment record and a rejection record; an
    /// omitted handler passes the value or reason through unchanged, which
    /// is how chains forward outcomes past links that do not care about
    /// them.
    ///
    /// Against an already-settled source, the matching record is scheduled
    /// immediately as a microtask; the handler still never runs inside the
    /// current synchronous block.
    pub fn then(&self, on_fulfilled: Option<Function>, on_rejected: Option<Function>) -> Future {
        let downstream = Future::pending(&self.shared.queue);
        let target = downstream.settler();

        let mut core = self.shared.core.lock();

        let reaction = Reaction::Chain {
            handler: on_fulfilled,
            target: target.clone(),
        };
        if core.state == FutureState::Fulfilled {
            let payload = core.settled_value();
            self.shared.queue.enqueue(MicroTask::new(move || {
                let _ = dispatch(reaction, payload, Path::Fulfill);
            }));
        } else {
            core.fulfill_reactions.push(reaction);
        }

        let reaction = Reaction::Chain {
            handler: on_rejected,
            target,
        };
        if core.state == FutureState::Rejected {
            let payload = core.settled_value();
            self.shared.queue.enqueue(MicroTask::new(move || {
                let _ = dispatch(reaction, payload, Path::Reject);
            }));
        } else {
            core.reject_reactions.push(reaction);
        }

        drop(core);
        downstream
    }

    /// Returns the current state.
    pub fn state(&self) -> FutureState {
        self.shared.core.lock().state
    }

    /// Returns the settled payload: the value if fulfilled, the reason if
    /// rejected, `None` while pending.
    pub fn result(&self) -> Option<Value> {
        self.shared.core.lock().value.clone()
    }

    /// Returns this future's construction-time identifier.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    fn pending(queue: &MicrotaskQueue) -> Future {
        Future {
            shared: Arc::new(Shared {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed) + 1,
                core: Mutex::new(Core {
                    state: FutureState::Pending,
                    value: None,
                    committed: false,
                    fulfill_reactions: Vec::new(),
                    reject_reactions: Vec::new(),
                }),
                queue: queue.clone(),
            }),
        }
    }

    fn settler(&self) -> Settler {
        Settler {
            shared: self.shared.clone(),
        }
    }
}

impl fmt::Debug for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.shared.core.lock();
        f.debug_struct("Future")
            .field("id", &self.shared.id)
            .field("state", &core.state)
            .finish_non_exhaustive()
    }
}

impl Thenable for Future {
    /// A future used as a value is itself a thenable: subscribing registers
    /// raw continuations that fire through the microtask queue with the
    /// eventual payload.
    fn subscribe(&self, on_fulfilled: Callback, on_rejected: Callback) -> Result<(), RuntimeError> {
        let mut core = self.shared.core.lock();
        match core.state {
            FutureState::Pending => {
                core.fulfill_reactions.push(Reaction::Notify(on_fulfilled));
                core.reject_reactions.push(Reaction::Notify(on_rejected));
            }
            FutureState::Fulfilled => {
                let payload = core.settled_value();
                self.shared.queue.enqueue(MicroTask::new(move || {
                    on_fulfilled(payload);
                }));
            }
            FutureState::Rejected => {
                let payload = core.settled_value();
                self.shared.queue.enqueue(MicroTask::new(move || {
                    on_rejected(payload);
                }));
            }
        }
        Ok(())
    }

    fn id(&self) -> Option<u64> {
        Some(self.shared.id)
    }
}

impl From<Future> for Value {
    fn from(future: Future) -> Value {
        Value::Thenable(Arc::new(future))
    }
}
