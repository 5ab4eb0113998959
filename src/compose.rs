//! Plain function composition, unrelated to `Observable::pipe`.
//!
//! Useful for building an observer's deliver logic out of small steps:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use cascade::{inspect, pipe};
//!
//! let seen: Rc<RefCell<Vec<i64>>> = Rc::new(RefCell::new(Vec::new()));
//! let deliver = pipe(vec![
//!     Box::new(|n: i64| n * 4),
//!     inspect({
//!         let seen = Rc::clone(&seen);
//!         move |n| seen.borrow_mut().push(*n)
//!     }),
//! ]);
//! assert_eq!(deliver(10), 40);
//! assert_eq!(*seen.borrow(), vec![40]);
//! ```

#[cfg(test)]
#[path = "compose_test.rs"]
mod tests;

/// Compose functions left to right into a single `item -> item` function.
pub fn pipe<T>(fns: Vec<Box<dyn Fn(T) -> T>>) -> impl Fn(T) -> T {
    move |item| fns.iter().fold(item, |acc, f| f(acc))
}

/// Wrap a side effect into a pass-through step for [`pipe`].
pub fn inspect<T>(f: impl Fn(&T) + 'static) -> Box<dyn Fn(T) -> T> {
    Box::new(move |item| {
        f(&item);
        item
    })
}
