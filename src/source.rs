//! Observable: the emitting source at the head of a pipeline.
//!
//! An [`Observable`] holds an ordered set of observer sinks and delivers
//! every emitted item to all of them, synchronously and in subscription
//! order. `pipe` chains operator stages onto the source and returns the
//! terminal stage; `multicast` attaches several observers to a sealed pipe
//! in one call, recording provenance in the caller-owned
//! [`SubscriptionRegistry`] so the pipe can later be torn down from the
//! head.
//!
//! # Delivery model
//!
//! Fully synchronous and single-threaded: `emit` performs a depth-first
//! traversal of the sink graph and returns only after every reachable
//! observer has been invoked or has had its failure routed. The sink list
//! is snapshotted per item, so callbacks may subscribe or unsubscribe
//! without aborting the emit; such mutations take effect from the next
//! item onward. Re-entrant `emit` into a stage that is currently applying
//! its own policy is unspecified.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::error::{CascadeError, Result};
use crate::observer::{Observer, ObserverId};
use crate::registry::{PipeId, SubscriptionRegistry};
use crate::stage::{Stage, StageCore};

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;

/// Counter for generating unique source ids.
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an emitting source or stage fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared fan-out state behind both [`Observable`] and the inner source of
/// every operator stage.
pub(crate) struct SourceCore<T> {
    id: SourceId,
    sinks: RefCell<Vec<Rc<Observer<T>>>>,
    registry: RefCell<Option<Weak<SubscriptionRegistry<T>>>>,
    pipe: Cell<Option<PipeId>>,
}

impl<T: 'static> SourceCore<T> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            id: SourceId::next(),
            sinks: RefCell::new(Vec::new()),
            registry: RefCell::new(None),
            pipe: Cell::new(None),
        })
    }

    #[inline]
    pub(crate) fn id(&self) -> SourceId {
        self.id
    }

    pub(crate) fn bind_registry(&self, registry: Weak<SubscriptionRegistry<T>>) {
        *self.registry.borrow_mut() = Some(registry);
    }

    fn registry(&self) -> Option<Rc<SubscriptionRegistry<T>>> {
        self.registry.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Stamp this core as the terminal fan-out of a sealed pipe.
    pub(crate) fn seal(&self, pipe: PipeId) {
        self.pipe.set(Some(pipe));
    }

    /// Append the observer unless one with the same id is already present.
    pub(crate) fn subscribe(&self, observer: &Rc<Observer<T>>) {
        let mut sinks = self.sinks.borrow_mut();
        if sinks.iter().any(|o| o.id() == observer.id()) {
            return;
        }
        debug!(
            observer = %observer.id(),
            source = %self.id,
            handles_errors = observer.handles_errors(),
            "observer subscribed"
        );
        sinks.push(Rc::clone(observer));
    }

    /// Detach the observer. If the registry holds multicast entries for it,
    /// each entry's pipe terminal is cleaned up instead of this source's own
    /// sink list; otherwise the observer is removed from the sinks directly.
    pub(crate) fn unsubscribe(&self, observer: &Rc<Observer<T>>) {
        if let Some(registry) = self.registry() {
            if registry.detach(observer.id()) {
                debug!(observer = %observer.id(), source = %self.id, "piped observer detached");
                return;
            }
        }
        let mut sinks = self.sinks.borrow_mut();
        let before = sinks.len();
        sinks.retain(|o| o.id() != observer.id());
        if sinks.len() != before {
            debug!(observer = %observer.id(), source = %self.id, "observer unsubscribed");
        }
    }

    pub(crate) fn remove_sink(&self, id: ObserverId) {
        self.sinks.borrow_mut().retain(|o| o.id() != id);
    }

    /// Deliver one item to every sink in subscription order.
    pub(crate) fn emit(&self, item: &T) -> Result<()> {
        let sinks: Vec<Rc<Observer<T>>> = self.sinks.borrow().clone();
        trace!(source = %self.id, sinks = sinks.len(), "delivering item");
        for sink in sinks {
            if let Err(err) = sink.notify(item) {
                debug!(
                    source = %self.id,
                    observer = %sink.id(),
                    error = err.as_label(),
                    "delivery failed; remaining sinks skipped for this item"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Subscribe each observer and, when this core is the terminal fan-out
    /// of a sealed pipe, record a registry entry per observer.
    pub(crate) fn multicast(&self, observers: &[Rc<Observer<T>>]) {
        for observer in observers {
            self.subscribe(observer);
            if let Some(pipe) = self.pipe.get() {
                if let Some(registry) = self.registry() {
                    registry.record(Rc::clone(observer), self.id, pipe);
                    debug!(observer = %observer.id(), pipe = %pipe, "multicast attachment recorded");
                }
            }
        }
    }

    /// Clear all sinks and purge every registry pipe that references this
    /// source, entries included.
    pub(crate) fn destroy(&self) {
        self.sinks.borrow_mut().clear();
        if let Some(registry) = self.registry() {
            registry.purge_source(self.id);
        }
        debug!(source = %self.id, "source destroyed");
    }

    pub(crate) fn sink_count(&self) -> usize {
        self.sinks.borrow().len()
    }
}

/// An emitting source bound to a caller-owned [`SubscriptionRegistry`].
pub struct Observable<T> {
    core: Rc<SourceCore<T>>,
    registry: Rc<SubscriptionRegistry<T>>,
}

impl<T: 'static> Observable<T> {
    /// Create a source with no sinks, bound to the given registry.
    pub fn new(registry: &Rc<SubscriptionRegistry<T>>) -> Self {
        let core = SourceCore::new();
        core.bind_registry(Rc::downgrade(registry));
        Self {
            core,
            registry: Rc::clone(registry),
        }
    }

    /// Subscribe an observer. Idempotent: subscribing the same observer
    /// twice is a no-op.
    pub fn subscribe(&self, observer: &Rc<Observer<T>>) {
        self.core.subscribe(observer);
    }

    /// Unsubscribe an observer, taking the registry path when multicast
    /// entries exist for it.
    pub fn unsubscribe(&self, observer: &Rc<Observer<T>>) {
        self.core.unsubscribe(observer);
    }

    /// Emit a single item through every sink, cascading through any piped
    /// stages before returning.
    pub fn emit(&self, item: T) -> Result<()> {
        self.core.emit(&item)
    }

    /// Emit a sequence of items in order. Each item fully traverses all
    /// sinks before the next item starts.
    pub fn emit_all(&self, items: impl IntoIterator<Item = T>) -> Result<()> {
        for item in items {
            self.core.emit(&item)?;
        }
        Ok(())
    }

    /// Build a linear chain of operator stages from this source and return
    /// the terminal stage. Pipes are single-shot: the returned stage cannot
    /// itself be piped again.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::EmptyPipe`] when called with zero stages.
    pub fn pipe(&self, stages: impl IntoIterator<Item = Stage<T>>) -> Result<Stage<T>>
    where
        T: Clone,
    {
        let stages: Vec<Stage<T>> = stages.into_iter().collect();
        if stages.is_empty() {
            return Err(CascadeError::EmptyPipe);
        }

        let registry = Rc::downgrade(&self.registry);
        let mut upstream: Rc<SourceCore<T>> = Rc::clone(&self.core);
        for stage in &stages {
            let next = stage.core_handle();
            let forward = Observer::fallible(move |item: &T| next.emit(item.clone()));
            upstream.subscribe(&forward);
            stage.bind_registry(registry.clone());
            upstream = stage.fanout();
        }

        let chain: Vec<Rc<StageCore<T>>> = stages.iter().map(Stage::core_handle).collect();
        let pipe = self.registry.register_pipe(self.core.id(), chain);
        let tail = stages.last().expect("pipe has at least one stage").clone();
        tail.seal(pipe);
        debug!(source = %self.core.id(), pipe = %pipe, stages = stages.len(), "pipe sealed");
        Ok(tail)
    }

    /// Subscribe several observers in one call. On a bare source this is
    /// plain subscription; provenance is recorded only by the terminal
    /// stage of a sealed pipe.
    pub fn multicast(&self, observers: &[Rc<Observer<T>>]) {
        self.core.multicast(observers);
    }

    /// Clear all sinks and purge registry state for pipes fed by this
    /// source.
    pub fn destroy(&self) {
        self.core.destroy();
    }

    /// Identity of this source.
    #[inline]
    pub fn id(&self) -> SourceId {
        self.core.id()
    }

    /// Number of currently attached sinks, internal forwarders included.
    #[inline]
    pub fn sink_count(&self) -> usize {
        self.core.sink_count()
    }
}
