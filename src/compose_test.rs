//! Tests for function composition helpers

use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[test]
fn test_pipe_composes_left_to_right() {
    let f = pipe(vec![
        Box::new(|n: i64| n + 1) as Box<dyn Fn(i64) -> i64>,
        Box::new(|n: i64| n * 10),
    ]);
    assert_eq!(f(4), 50);
}

#[test]
fn test_inspect_observes_without_modifying() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let f = pipe(vec![
        Box::new(|n: i64| n * 4) as Box<dyn Fn(i64) -> i64>,
        inspect({
            let seen = Rc::clone(&seen);
            move |n: &i64| seen.borrow_mut().push(*n)
        }),
        inspect({
            let seen = Rc::clone(&seen);
            move |n: &i64| seen.borrow_mut().push(*n * 2)
        }),
    ]);

    assert_eq!(f(10), 40);
    assert_eq!(*seen.borrow(), vec![40, 80]);
}

#[test]
fn test_composed_function_drives_an_observer() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let deliver = pipe(vec![
        Box::new(|n: i64| n * 2) as Box<dyn Fn(i64) -> i64>,
        inspect({
            let seen = Rc::clone(&seen);
            move |n: &i64| seen.borrow_mut().push(*n)
        }),
    ]);

    let registry = crate::SubscriptionRegistry::new();
    let source = crate::Observable::new(&registry);
    let observer = crate::Observer::new(move |n: &i64| {
        deliver(*n);
    });

    source.subscribe(&observer);
    source.emit_all([1, 2, 3]).unwrap();
    assert_eq!(*seen.borrow(), vec![2, 4, 6]);
}
