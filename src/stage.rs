//! Operator stage: a source that applies a delivery policy before
//! re-forwarding.
//!
//! A [`Stage`] composes two parts instead of subclassing a source type: a
//! boxed [`Operator`] policy deciding what, and whether, to forward, and an
//! inner fan-out [`SourceCore`] holding the stage's real sinks. `subscribe`
//! delegates to the inner fan-out; `emit` applies the policy and forwards
//! the result. Concrete policies live in [`crate::operators`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{CascadeError, Result};
use crate::observer::{Observer, ObserverId};
use crate::operators::Operator;
use crate::registry::{PipeId, SubscriptionRegistry};
use crate::source::{SourceCore, SourceId};

#[cfg(test)]
#[path = "stage_test.rs"]
mod tests;

/// Shared state of one operator stage.
pub(crate) struct StageCore<T> {
    op: RefCell<Box<dyn Operator<T>>>,
    fanout: Rc<SourceCore<T>>,
}

impl<T: 'static> StageCore<T> {
    /// Apply the delivery policy and forward the result to this stage's
    /// own sinks. A `None` from the policy drops the item silently.
    pub(crate) fn emit(&self, item: T) -> Result<()> {
        let forwarded = self.op.borrow_mut().apply(item);
        match forwarded {
            Some(out) => self.fanout.emit(&out),
            None => Ok(()),
        }
    }

    pub(crate) fn fanout_id(&self) -> SourceId {
        self.fanout.id()
    }

    pub(crate) fn remove_sink(&self, id: ObserverId) {
        self.fanout.remove_sink(id);
    }
}

/// A pipeable operator stage. Cheap to clone; clones share the same policy
/// and sink list.
pub struct Stage<T> {
    core: Rc<StageCore<T>>,
}

impl<T> Clone for Stage<T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T: 'static> std::fmt::Debug for Stage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("operator", &self.operator_name())
            .field("id", &self.id())
            .finish()
    }
}

impl<T: 'static> Stage<T> {
    /// Wrap a delivery policy into a ready-to-pipe stage.
    pub(crate) fn from_operator(op: Box<dyn Operator<T>>) -> Self {
        Self {
            core: Rc::new(StageCore {
                op: RefCell::new(op),
                fanout: SourceCore::new(),
            }),
        }
    }

    /// Subscribe an observer to this stage's own sinks. Idempotent.
    pub fn subscribe(&self, observer: &Rc<Observer<T>>) {
        self.core.fanout.subscribe(observer);
    }

    /// Unsubscribe an observer, taking the registry path when multicast
    /// entries exist for it.
    pub fn unsubscribe(&self, observer: &Rc<Observer<T>>) {
        self.core.fanout.unsubscribe(observer);
    }

    /// Push an item into this stage directly: apply the policy, then
    /// forward to the stage's sinks.
    pub fn emit(&self, item: T) -> Result<()> {
        self.core.emit(item)
    }

    /// Emit a sequence of items in order.
    pub fn emit_all(&self, items: impl IntoIterator<Item = T>) -> Result<()> {
        for item in items {
            self.core.emit(item)?;
        }
        Ok(())
    }

    /// Stages cannot head a new pipe.
    ///
    /// # Errors
    ///
    /// Always returns [`CascadeError::NestedPipe`].
    pub fn pipe(&self, _stages: impl IntoIterator<Item = Stage<T>>) -> Result<Stage<T>> {
        Err(CascadeError::NestedPipe)
    }

    /// Subscribe several observers in one call, recording provenance when
    /// this stage is the sealed terminal of a pipe.
    pub fn multicast(&self, observers: &[Rc<Observer<T>>]) {
        self.core.fanout.multicast(observers);
    }

    /// Clear this stage's sinks and purge registry state for pipes that
    /// reference it.
    pub fn destroy(&self) {
        self.core.fanout.destroy();
    }

    /// Name of the delivery policy driving this stage.
    pub fn operator_name(&self) -> &'static str {
        self.core.op.borrow().name()
    }

    /// Identity of this stage's fan-out source.
    #[inline]
    pub fn id(&self) -> SourceId {
        self.core.fanout.id()
    }

    /// Number of currently attached sinks, internal forwarders included.
    #[inline]
    pub fn sink_count(&self) -> usize {
        self.core.fanout.sink_count()
    }

    pub(crate) fn core_handle(&self) -> Rc<StageCore<T>> {
        Rc::clone(&self.core)
    }

    pub(crate) fn fanout(&self) -> Rc<SourceCore<T>> {
        Rc::clone(&self.core.fanout)
    }

    pub(crate) fn bind_registry(&self, registry: Weak<SubscriptionRegistry<T>>) {
        self.core.fanout.bind_registry(registry);
    }

    pub(crate) fn seal(&self, pipe: PipeId) {
        self.core.fanout.seal(pipe);
    }
}
