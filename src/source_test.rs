//! Tests for the emitting source

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::operators::map;

fn recording() -> (Rc<RefCell<Vec<i64>>>, Rc<Observer<i64>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let observer = {
        let seen = Rc::clone(&seen);
        Observer::new(move |n: &i64| seen.borrow_mut().push(*n))
    };
    (seen, observer)
}

#[test]
fn test_observer_receives_emitted_value() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let (seen, observer) = recording();

    source.subscribe(&observer);
    source.emit(10).unwrap();
    assert_eq!(*seen.borrow(), vec![10]);
}

#[test]
fn test_subscribe_is_idempotent() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let (seen, observer) = recording();

    source.subscribe(&observer);
    source.subscribe(&observer);
    source.subscribe(&observer);
    assert_eq!(source.sink_count(), 1);

    source.emit(10).unwrap();
    assert_eq!(*seen.borrow(), vec![10]);
}

#[test]
fn test_sinks_are_notified_in_subscription_order() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let first = {
        let seen = Rc::clone(&seen);
        Observer::new(move |n: &i64| seen.borrow_mut().push(*n))
    };
    let second = {
        let seen = Rc::clone(&seen);
        Observer::new(move |n: &i64| seen.borrow_mut().push(*n * 2))
    };

    source.subscribe(&first);
    source.subscribe(&second);
    source.emit(10).unwrap();
    assert_eq!(*seen.borrow(), vec![10, 20]);
}

#[test]
fn test_emit_all_traverses_per_item() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let plain = {
        let seen = Rc::clone(&seen);
        Observer::new(move |n: &i64| seen.borrow_mut().push(*n))
    };
    let doubled = {
        let seen = Rc::clone(&seen);
        Observer::new(move |n: &i64| seen.borrow_mut().push(*n * 2))
    };

    source.subscribe(&plain);
    source.subscribe(&doubled);
    source.emit_all([1, 2, 3]).unwrap();

    // Each item reaches every sink before the next item starts.
    assert_eq!(*seen.borrow(), vec![1, 2, 2, 4, 3, 6]);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let (seen, observer) = recording();

    source.subscribe(&observer);
    source.emit(10).unwrap();
    source.unsubscribe(&observer);
    source.emit(20).unwrap();
    assert_eq!(*seen.borrow(), vec![10]);
}

#[test]
fn test_unsubscribe_unknown_observer_is_noop() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let (seen, observer) = recording();
    let stranger = Observer::new(|_: &i64| {});

    source.subscribe(&observer);
    source.unsubscribe(&stranger);
    source.emit(10).unwrap();
    assert_eq!(*seen.borrow(), vec![10]);
}

#[test]
fn test_unhandled_delivery_error_skips_remaining_sinks() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let (seen_first, first) = recording();
    let failing = Observer::fallible(|_: &i64| Err(CascadeError::delivery("boom")));
    let (seen_last, last) = recording();

    source.subscribe(&first);
    source.subscribe(&failing);
    source.subscribe(&last);

    let err = source.emit(10).unwrap_err();
    assert_eq!(err.to_string(), "delivery failed: boom");

    // Sinks already notified are unaffected; sinks not yet reached are
    // skipped for that item.
    assert_eq!(*seen_first.borrow(), vec![10]);
    assert!(seen_last.borrow().is_empty());
}

#[test]
fn test_handled_delivery_error_does_not_abort_emit() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let errors = Rc::new(RefCell::new(Vec::new()));
    let failing = {
        let errors = Rc::clone(&errors);
        Observer::with_handler(
            |_: &i64| Err(CascadeError::delivery("boom")),
            move |err| errors.borrow_mut().push(err.to_string()),
        )
    };
    let (seen, last) = recording();

    source.subscribe(&failing);
    source.subscribe(&last);

    source.emit(10).unwrap();
    assert_eq!(*errors.borrow(), vec!["delivery failed: boom"]);
    assert_eq!(*seen.borrow(), vec![10]);
}

#[test]
fn test_self_unsubscribe_during_emit_takes_effect_next_item() {
    let registry = SubscriptionRegistry::new();
    let source = Rc::new(Observable::new(&registry));
    let slot: Rc<RefCell<Option<Rc<Observer<i64>>>>> = Rc::new(RefCell::new(None));
    let seen_once = Rc::new(RefCell::new(Vec::new()));
    let one_shot = {
        let seen = Rc::clone(&seen_once);
        let slot = Rc::clone(&slot);
        let source = Rc::clone(&source);
        Observer::new(move |n: &i64| {
            seen.borrow_mut().push(*n);
            if let Some(me) = slot.borrow().as_ref() {
                source.unsubscribe(me);
            }
        })
    };
    *slot.borrow_mut() = Some(Rc::clone(&one_shot));
    let (seen_rest, steady) = recording();

    source.subscribe(&one_shot);
    source.subscribe(&steady);
    source.emit_all([1, 2, 3]).unwrap();

    // The item in flight still reaches every sink in the snapshot; the
    // removal is observed from the next item onward.
    assert_eq!(*seen_once.borrow(), vec![1]);
    assert_eq!(*seen_rest.borrow(), vec![1, 2, 3]);
    assert_eq!(source.sink_count(), 1);
}

#[test]
fn test_subscribe_during_emit_takes_effect_next_item() {
    let registry = SubscriptionRegistry::new();
    let source = Rc::new(Observable::new(&registry));
    let (seen_late, latecomer) = recording();
    let seen_first = Rc::new(RefCell::new(Vec::new()));
    let first = {
        let seen = Rc::clone(&seen_first);
        let source = Rc::clone(&source);
        let latecomer = Rc::clone(&latecomer);
        Observer::new(move |n: &i64| {
            seen.borrow_mut().push(*n);
            if *n == 1 {
                source.subscribe(&latecomer);
            }
        })
    };

    source.subscribe(&first);
    source.emit_all([1, 2, 3]).unwrap();

    // The sink added mid-item misses the item in flight and receives
    // everything from the next item onward.
    assert_eq!(*seen_first.borrow(), vec![1, 2, 3]);
    assert_eq!(*seen_late.borrow(), vec![2, 3]);
}

#[test]
fn test_pipe_applies_stages_in_order() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let (seen, observer) = recording();

    let tail = source
        .pipe([map(|n: i64| n * 2), map(|n: i64| n * 3)])
        .unwrap();
    tail.subscribe(&observer);

    source.emit(10).unwrap();
    assert_eq!(*seen.borrow(), vec![60]);

    // The head holds only its internal forwarder.
    assert_eq!(source.sink_count(), 1);
}

#[test]
fn test_empty_pipe_is_rejected() {
    let registry = SubscriptionRegistry::new();
    let source: Observable<i64> = Observable::new(&registry);

    let err = source.pipe(Vec::new()).unwrap_err();
    assert!(matches!(err, CascadeError::EmptyPipe));
}

#[test]
fn test_destroy_clears_sinks() {
    let registry = SubscriptionRegistry::new();
    let source = Observable::new(&registry);
    let (seen, observer) = recording();

    source.subscribe(&observer);
    source.destroy();
    assert_eq!(source.sink_count(), 0);

    source.emit(10).unwrap();
    assert!(seen.borrow().is_empty());
}
