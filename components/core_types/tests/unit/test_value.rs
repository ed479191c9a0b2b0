//! Unit tests for the Value enum

use std::sync::Arc;

use core_types::{Callback, RuntimeError, Thenable, Value};

/// A thenable that fulfills immediately with a fixed value.
struct ImmediateThenable {
    value: Value,
}

impl Thenable for ImmediateThenable {
    fn subscribe(
        &self,
        on_fulfilled: Callback,
        _on_rejected: Callback,
    ) -> Result<(), RuntimeError> {
        on_fulfilled(self.value.clone());
        Ok(())
    }
}

#[test]
fn display_follows_host_conversion_rules() {
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Boolean(true).to_string(), "true");
    assert_eq!(Value::Boolean(false).to_string(), "false");
    assert_eq!(Value::Smi(-3).to_string(), "-3");
    assert_eq!(Value::String("hi".to_string()).to_string(), "hi");
}

#[test]
fn display_of_doubles() {
    assert_eq!(Value::Double(3.0).to_string(), "3");
    assert_eq!(Value::Double(3.5).to_string(), "3.5");
    assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Double(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
}

#[test]
fn display_of_errors_uses_error_form() {
    let reason = Value::Error(RuntimeError::type_error("bad"));
    assert_eq!(reason.to_string(), "TypeError: bad");
}

#[test]
fn equality_is_structural_for_plain_values() {
    assert_eq!(Value::Smi(1), Value::Smi(1));
    assert_ne!(Value::Smi(1), Value::Smi(2));
    assert_ne!(Value::Undefined, Value::Null);
    assert_eq!(
        Value::Error(RuntimeError::type_error("x")),
        Value::Error(RuntimeError::type_error("x")),
    );
}

#[test]
fn equality_is_identity_for_thenables() {
    let a: Arc<dyn Thenable> = Arc::new(ImmediateThenable {
        value: Value::Smi(1),
    });
    let b: Arc<dyn Thenable> = Arc::new(ImmediateThenable {
        value: Value::Smi(1),
    });

    assert_eq!(Value::Thenable(a.clone()), Value::Thenable(a.clone()));
    assert_ne!(Value::Thenable(a), Value::Thenable(b));
}

#[test]
fn thenable_probe_matches_capability() {
    let t: Arc<dyn Thenable> = Arc::new(ImmediateThenable {
        value: Value::Undefined,
    });
    assert!(Value::Thenable(t).thenable().is_some());
    assert!(Value::Smi(0).thenable().is_none());
}

#[test]
fn thenable_id_defaults_to_none() {
    let t: Arc<dyn Thenable> = Arc::new(ImmediateThenable {
        value: Value::Undefined,
    });
    assert_eq!(t.id(), None);
}

#[test]
fn from_conversions() {
    assert_eq!(Value::from(true), Value::Boolean(true));
    assert_eq!(Value::from(7), Value::Smi(7));
    assert_eq!(Value::from(2.5), Value::Double(2.5));
    assert_eq!(Value::from("s"), Value::String("s".to_string()));
    assert_eq!(
        Value::from(RuntimeError::internal("oops")),
        Value::Error(RuntimeError::internal("oops")),
    );
}
