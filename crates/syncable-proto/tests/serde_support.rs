//! JSON encoding of specifiers and operations.

#![cfg(feature = "serde")]

use syncable_proto::{log, Op, Spec};

#[test]
fn test_spec_is_a_json_string() {
    let spec = Spec::parse("/Model#id!stamp+me.set").unwrap();
    let json = serde_json::to_string(&spec).unwrap();
    assert_eq!(json, r#""/Model#id!stamp+me.set""#);

    let back: Spec = serde_json::from_str(&json).unwrap();
    assert_eq!(back, spec);
}

#[test]
fn test_bad_spec_string_is_rejected() {
    let err = serde_json::from_str::<Spec>(r#""no quant""#).unwrap_err();
    assert!(err.to_string().contains("malformed specifier"));
}

#[test]
fn test_op_as_object() {
    let ops = log::parse("/M#i!v.on\t\n\t!t0.set\t1\n\n/M#i!w.set\t2\n").unwrap();
    let json = serde_json::to_value(&ops).unwrap();

    assert_eq!(json[0]["spec"], "/M#i!v.on");
    assert_eq!(json[0]["patch"][0]["spec"], "!t0.set");
    assert!(json[1]["patch"].is_null());

    let back: Vec<Op> = serde_json::from_value(json).unwrap();
    assert_eq!(back, ops);
}
