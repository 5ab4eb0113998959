//! Observer: the terminal delivery target of the pipeline.
//!
//! An [`Observer`] owns a required deliver callback and an optional error
//! handler. Observers are shared via `Rc` and may be attached to any number
//! of sources at the same time; every observer carries a process-unique id
//! so sources can deduplicate subscriptions and unsubscribe by identity.
//!
//! Delivery errors are routed to the error handler when one is present.
//! Without a handler the error propagates out of the emitting source,
//! skipping sinks not yet reached for that item.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::{CascadeError, Result};

#[cfg(test)]
#[path = "observer_test.rs"]
mod tests;

/// Counter for generating unique observer ids.
static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    fn next() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type DeliverFn<T> = Box<dyn FnMut(&T) -> Result<()>>;
type ErrorFn = Box<dyn FnMut(CascadeError)>;

/// A delivery target with a required deliver callback and an optional
/// error handler.
pub struct Observer<T> {
    id: ObserverId,
    deliver: RefCell<DeliverFn<T>>,
    on_error: Option<RefCell<ErrorFn>>,
}

impl<T: 'static> Observer<T> {
    /// Create an observer from an infallible deliver callback.
    pub fn new(mut deliver: impl FnMut(&T) + 'static) -> Rc<Self> {
        Self::build(
            Box::new(move |item| {
                deliver(item);
                Ok(())
            }),
            None,
        )
    }

    /// Create an observer whose deliver callback may fail. Failures
    /// propagate out of the emitting source.
    pub fn fallible(deliver: impl FnMut(&T) -> Result<()> + 'static) -> Rc<Self> {
        Self::build(Box::new(deliver), None)
    }

    /// Create an observer with an error handler. Failures from the deliver
    /// callback are routed to the handler and never abort the emit.
    pub fn with_handler(
        deliver: impl FnMut(&T) -> Result<()> + 'static,
        on_error: impl FnMut(CascadeError) + 'static,
    ) -> Rc<Self> {
        Self::build(Box::new(deliver), Some(Box::new(on_error)))
    }

    fn build(deliver: DeliverFn<T>, on_error: Option<ErrorFn>) -> Rc<Self> {
        Rc::new(Self {
            id: ObserverId::next(),
            deliver: RefCell::new(deliver),
            on_error: on_error.map(RefCell::new),
        })
    }

    /// Identity of this observer.
    #[inline]
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Whether this observer recovers its own delivery errors.
    #[inline]
    pub fn handles_errors(&self) -> bool {
        self.on_error.is_some()
    }

    /// Deliver one item, routing any failure to the error handler.
    pub(crate) fn notify(&self, item: &T) -> Result<()> {
        let result = {
            let mut deliver = self.deliver.borrow_mut();
            (&mut **deliver)(item)
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => match &self.on_error {
                Some(handler) => {
                    debug!(observer = %self.id, error = err.as_label(), "delivery error routed to handler");
                    let mut handler = handler.borrow_mut();
                    (&mut **handler)(err);
                    Ok(())
                }
                None => Err(err),
            },
        }
    }
}
