//! Tests for positional argument encoding and decoding.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use event_emitter::{arg, to_args, Callback, Emitter, EmitterError};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, PartialEq, Deserialize)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn to_args_spreads_tuples_into_positions() {
    assert_eq!(to_args((1, "two", true)).unwrap(), vec![json!(1), json!("two"), json!(true)]);
    assert_eq!(to_args(vec![3, 4]).unwrap(), vec![json!(3), json!(4)]);
}

#[test]
fn to_args_of_unit_is_empty() {
    assert!(to_args(()).unwrap().is_empty());
}

#[test]
fn to_args_wraps_a_single_value() {
    assert_eq!(to_args("solo").unwrap(), vec![json!("solo")]);
    assert_eq!(to_args(json!({"x": 1})).unwrap(), vec![json!({"x": 1})]);
}

#[test]
fn to_args_reports_encode_failures() {
    // JSON object keys must be strings.
    let mut bad = HashMap::new();
    bad.insert((1, 2), "tuple key");

    let err = to_args(bad).unwrap_err();
    assert!(matches!(err, EmitterError::Encode(_)), "got {err:?}");
}

#[test]
fn arg_reads_missing_and_null_as_unset() {
    let args = [json!(1), Value::Null];

    assert_eq!(arg::<i64>(&args, 0).unwrap(), Some(1));
    assert_eq!(arg::<i64>(&args, 1).unwrap(), None);
    assert_eq!(arg::<i64>(&args, 2).unwrap(), None);
    assert_eq!(arg::<i64>(&[], 0).unwrap(), None);
}

#[test]
fn arg_decodes_structured_values() {
    let args = [json!("label"), json!({"x": 3, "y": -4})];

    assert_eq!(arg::<String>(&args, 0).unwrap().as_deref(), Some("label"));
    assert_eq!(arg::<Point>(&args, 1).unwrap(), Some(Point { x: 3, y: -4 }));
}

#[test]
fn arg_reports_the_failing_position() {
    let args = [json!(1), json!("not a number")];

    let err = arg::<i64>(&args, 1).unwrap_err();
    assert!(err.to_string().starts_with("Argument 1 "), "got {err}");
    match err {
        EmitterError::Decode { index, .. } => assert_eq!(index, 1),
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[test]
fn emit_with_serializes_then_dispatches() {
    let ee: Emitter = Emitter::new();
    let stored: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));

    let store = {
        let stored = Arc::clone(&stored);
        Callback::new(move |args: &[Value]| *stored.lock().unwrap() = args.to_vec())
    };
    ee.register("bar", &store);

    ee.emit_with("bar", (1, 2)).unwrap();
    assert_eq!(*stored.lock().unwrap(), vec![json!(1), json!(2)]);

    ee.emit_with("bar", ()).unwrap();
    assert!(stored.lock().unwrap().is_empty());
}
