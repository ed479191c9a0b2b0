//! Continuation capability for future-like values.
//!
//! A value that satisfies [`Thenable`] is treated as a nested deferred value:
//! when such a value is used to fulfill a future, the runtime does not store
//! it as the payload but instead subscribes to it and adopts whatever outcome
//! it eventually produces. This is the capability-check rendition of the
//! duck-typed "has a callable `then` member" convention: satisfying the trait
//! is what makes a value a thenable, so the probe itself cannot fail; only
//! invoking the capability can.

use crate::{RuntimeError, Value};

/// A one-shot settlement callback handed to [`Thenable::subscribe`].
pub type Callback = Box<dyn FnOnce(Value) + Send>;

/// The continuation accessor of a nested deferred value.
pub trait Thenable: Send + Sync {
    /// Arranges for exactly one of the two callbacks to be invoked with the
    /// eventual outcome: `on_fulfilled` with the success value, or
    /// `on_rejected` with the rejection reason.
    ///
    /// Returning an error rejects the future that is adopting this value.
    fn subscribe(
        &self,
        on_fulfilled: Callback,
        on_rejected: Callback,
    ) -> Result<(), RuntimeError>;

    /// Per-instance identity, when the implementor has one.
    ///
    /// Futures report their construction-time identifier here; it is how a
    /// consumer can detect that a thenable *is* a particular future without
    /// comparing allocations across `dyn` boundaries.
    fn id(&self) -> Option<u64> {
        None
    }
}
