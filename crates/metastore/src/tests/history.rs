//! History growth, type-preserving restore and revert.

use super::Fixture;
use crate::{Error, TypedValue, Value};

#[test]
fn test_every_write_grows_history_by_one() {
    let fx = Fixture::new();
    let loc = fx.root();

    let _ = fx.store.write(loc, "count", 1, None).unwrap();
    assert_eq!(fx.store.history(loc, "count").unwrap().len(), 0);

    for (n, value) in [Value::Int(2), Value::from("three"), Value::Int(4)]
        .into_iter()
        .enumerate()
    {
        let _ = fx.store.write(loc, "count", value, None).unwrap();
        assert_eq!(fx.store.history(loc, "count").unwrap().len(), n + 1);
    }
}

#[test]
fn test_restore_preserves_type() {
    let fx = Fixture::new();
    let loc = fx.root();
    let _ = fx.store.write(loc, "age", 5, None).unwrap();
    let _ = fx.store.write(loc, "age", 6.0, None).unwrap();

    let live = fx.store.read(loc, "age", None).unwrap();
    assert_eq!(live, TypedValue::new("float", Value::Float(6.0)));

    let restored = fx.store.restore(loc, "age", 0).unwrap();
    assert_eq!(restored, TypedValue::new("int", Value::Int(5)));
    // Restoring changes nothing
    assert_eq!(fx.store.read(loc, "age", None).unwrap(), live);
    assert_eq!(fx.store.history(loc, "age").unwrap().len(), 1);
}

#[test]
fn test_type_change_scenario() {
    let fx = Fixture::new();
    let loc = fx.root();
    let _ = fx.store.write(loc, "isawesome.string", "True", None).unwrap();
    let entry = fx.store.write(loc, "isawesome.int", 1, None).unwrap();

    assert_eq!(entry.stored_name(), "isawesome.int");
    assert_eq!(fx.store.ls(loc).unwrap(), vec!["isawesome.int"]);

    let history = fx.store.history(loc, "isawesome").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].suffix, "string");
    assert_eq!(history[0].value, Value::from("True"));
}

#[test]
fn test_restore_out_of_range() {
    let fx = Fixture::new();
    let _ = fx.store.write(fx.root(), "x", 1, None).unwrap();
    let err = fx.store.restore(fx.root(), "x", 3).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { ordinal: 3, len: 0 }));
}

#[test]
fn test_revert_writes_old_type_back() {
    let fx = Fixture::new();
    let loc = fx.root();
    let _ = fx.store.write(loc, "age", 5, None).unwrap();
    let _ = fx.store.write(loc, "age", "five", None).unwrap();

    let entry = fx.store.revert(loc, "age.string", 0).unwrap();
    assert_eq!(entry.stored_name(), "age.int");
    assert_eq!(fx.store.read(loc, "age", None).unwrap().value, Value::Int(5));

    // The reverted-from value is itself kept
    let history = fx.store.history(loc, "age").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].value, Value::from("five"));
}

#[test]
fn test_clear_then_write() {
    let fx = Fixture::new();
    let loc = fx.root();
    let _ = fx.store.write(loc, "flag", true, None).unwrap();
    fx.store.clear(loc, "flag").unwrap();
    assert!(fx.store.read(loc, "flag", None).unwrap_err().is_not_found());
    assert_eq!(fx.store.history(loc, "flag").unwrap().len(), 1);

    // The cleared state is recorded as null
    let _ = fx.store.write(loc, "flag", false, None).unwrap();
    let history = fx.store.history(loc, "flag").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].typed(), TypedValue::new("null", Value::Null));
}

#[test]
fn test_container_gains_history_on_first_value() {
    let fx = Fixture::new();
    let loc = fx.root();
    let _ = fx.store.write(loc, "group/member", 1, None).unwrap();
    let _ = fx.store.write(loc, "group", "g", None).unwrap();

    let history = fx.store.history(loc, "group").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].value, Value::Null);
}

#[test]
fn test_non_finite_float_rejected() {
    let fx = Fixture::new();
    let loc = fx.root();
    let _ = fx.store.write(loc, "ratio", 1.5, None).unwrap();

    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = fx.store.write(loc, "ratio", bad, None).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }
    let err = fx
        .store
        .write(loc, "ratios", Value::List(vec![Value::Float(f64::NAN)]), None)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));

    // The record stays readable and writable
    assert_eq!(fx.store.read(loc, "ratio", None).unwrap().value, Value::Float(1.5));
    assert!(fx.store.history(loc, "ratio").unwrap().is_empty());
    let _ = fx.store.write(loc, "ratio", 2.0, None).unwrap();
    assert_eq!(fx.store.history(loc, "ratio").unwrap().len(), 1);
    assert_eq!(fx.store.find(loc, "ratios", None).unwrap(), None);
}

#[test]
fn test_history_timestamps_ordered() {
    let fx = Fixture::new();
    let loc = fx.root();
    for n in 0..4 {
        let _ = fx.store.write(loc, "tick", n, None).unwrap();
    }
    let history = fx.store.history(loc, "tick").unwrap();
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert!(history[0].time().is_some());
}

#[test]
fn test_purge_history() {
    let fx = Fixture::new();
    let loc = fx.root();
    let _ = fx.store.write(loc, "x", 1, None).unwrap();
    let _ = fx.store.write(loc, "x", 2, None).unwrap();
    fx.store.purge_history(loc, "x").unwrap();
    assert!(fx.store.history(loc, "x").unwrap().is_empty());
    assert_eq!(fx.store.read(loc, "x", None).unwrap().value, Value::Int(2));
}
