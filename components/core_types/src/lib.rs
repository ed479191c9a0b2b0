//! Core value and error types for the deferred-value runtime.
//!
//! This crate provides the foundational types shared by the runtime
//! components: the dynamic payload a future carries, the error type raised
//! by setup routines and continuation handlers, and the capability trait
//! that marks a value as a nested deferred value.
//!
//! # Overview
//!
//! - [`Value`] - Dynamic representation of the payloads futures carry
//! - [`RuntimeError`] - Errors raised by setup routines and handlers
//! - [`ErrorKind`] - Categories of runtime errors
//! - [`Thenable`] - Continuation capability for future-like values
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, RuntimeError, Value};
//!
//! // Create host values
//! let num = Value::Smi(42);
//! assert_eq!(num.to_string(), "42");
//!
//! // Create an error and carry it as a value
//! let error = RuntimeError::new(ErrorKind::TypeError, "not a function");
//! let reason = Value::Error(error);
//! assert_eq!(reason.to_string(), "TypeError: not a function");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod thenable;
mod value;

pub use error::{ErrorKind, RuntimeError};
pub use thenable::{Callback, Thenable};
pub use value::Value;
