//! Tests for the pluck operator

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::observer::Observer;
use crate::operators::take;
use crate::registry::SubscriptionRegistry;
use crate::source::Observable;

#[test]
fn test_pluck_forwards_only_the_property() {
    let registry = SubscriptionRegistry::new();
    let source: Observable<Value> = Observable::new(&registry);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let observer = {
        let seen = Rc::clone(&seen);
        Observer::new(move |v: &Value| seen.borrow_mut().push(v.clone()))
    };

    let tail = source
        .pipe([take(1), pluck("email").unwrap()])
        .unwrap();
    tail.subscribe(&observer);

    source
        .emit(json!({ "name": "King", "email": "email@kingdom" }))
        .unwrap();
    source
        .emit(json!({ "name": "Queen", "email": "email@queendom" }))
        .unwrap();
    assert_eq!(*seen.borrow(), vec![json!("email@kingdom")]);
}

#[test]
fn test_pluck_missing_key_yields_null() {
    let stage = pluck("email").unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let observer = {
        let seen = Rc::clone(&seen);
        Observer::new(move |v: &Value| seen.borrow_mut().push(v.clone()))
    };

    stage.subscribe(&observer);
    stage.emit(json!({ "name": "King" })).unwrap();
    assert_eq!(*seen.borrow(), vec![Value::Null]);
}

#[test]
fn test_pluck_rejects_empty_key() {
    let err = pluck::<Value>("").unwrap_err();
    assert!(matches!(err, CascadeError::EmptyPluckKey));
    assert_eq!(err.to_string(), "pluck operator expects a property name");
}

#[test]
fn test_keyed_extraction_on_json_values() {
    let item = json!({ "a": 1, "b": { "c": 2 } });
    assert_eq!(item.extract("a"), json!(1));
    assert_eq!(item.extract("b"), json!({ "c": 2 }));
    assert_eq!(item.extract("missing"), Value::Null);
}

#[test]
fn test_pluck_name() {
    let stage: crate::Stage<Value> = pluck("email").unwrap();
    assert_eq!(stage.operator_name(), "pluck");
}
