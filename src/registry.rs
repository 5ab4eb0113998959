//! Subscription registry: multicast provenance and pipe bookkeeping.
//!
//! The registry is caller-owned and passed into every [`Observable`] at
//! construction, so multiple isolated pipelines can coexist in one process.
//! It holds two tables:
//!
//! - an arena of sealed pipes, `PipeId -> PipeChain`, recording the
//!   originating source and the ordered stage chain;
//! - multicast entries, one per `(observer, terminal stage, pipe)`
//!   attachment made through `multicast` on a sealed pipe's terminal.
//!
//! An entry exists if and only if the observer was attached via `multicast`
//! to a sealed pipe terminal. Plain `subscribe` never records an entry;
//! this asymmetry is part of the unsubscribe contract.
//!
//! [`Observable`]: crate::source::Observable

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::observer::{Observer, ObserverId};
use crate::source::SourceId;
use crate::stage::StageCore;

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

/// Identity of a sealed pipe within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipeId(u64);

impl fmt::Display for PipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sealed pipe: the originating source and its stage chain, head to
/// tail. Chains are straight lines, never branching, never cyclic.
struct PipeChain<T> {
    origin: SourceId,
    stages: Vec<Rc<StageCore<T>>>,
}

impl<T: 'static> PipeChain<T> {
    fn references(&self, source: SourceId) -> bool {
        self.origin == source || self.stages.iter().any(|s| s.fanout_id() == source)
    }
}

/// One multicast attachment.
struct RegistryEntry<T> {
    observer: Rc<Observer<T>>,
    terminal: SourceId,
    pipe: PipeId,
}

/// Caller-owned table of multicast attachments and sealed pipes.
pub struct SubscriptionRegistry<T> {
    pipes: RefCell<HashMap<PipeId, PipeChain<T>>>,
    entries: RefCell<Vec<RegistryEntry<T>>>,
    next_pipe: Cell<u64>,
}

impl<T: 'static> SubscriptionRegistry<T> {
    /// Create an empty registry, shared by reference with the sources that
    /// use it.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            pipes: RefCell::new(HashMap::new()),
            entries: RefCell::new(Vec::new()),
            next_pipe: Cell::new(1),
        })
    }

    /// Number of live multicast entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the registry holds no multicast entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Number of sealed pipes in the arena.
    pub fn pipe_count(&self) -> usize {
        self.pipes.borrow().len()
    }

    /// Number of multicast entries held for one observer.
    pub fn entries_for(&self, observer: ObserverId) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.observer.id() == observer)
            .count()
    }

    /// Add a sealed pipe to the arena and hand back its id.
    pub(crate) fn register_pipe(
        &self,
        origin: SourceId,
        stages: Vec<Rc<StageCore<T>>>,
    ) -> PipeId {
        let id = PipeId(self.next_pipe.get());
        self.next_pipe.set(id.0 + 1);
        self.pipes.borrow_mut().insert(id, PipeChain { origin, stages });
        id
    }

    /// Record one multicast attachment.
    pub(crate) fn record(&self, observer: Rc<Observer<T>>, terminal: SourceId, pipe: PipeId) {
        self.entries.borrow_mut().push(RegistryEntry {
            observer,
            terminal,
            pipe,
        });
    }

    /// Remove every entry held for the observer and detach it from each
    /// entry's terminal stage. Returns false when no entries existed, in
    /// which case the calling source falls back to its own sink list.
    pub(crate) fn detach(&self, observer: ObserverId) -> bool {
        let matched: Vec<RegistryEntry<T>> = {
            let mut entries = self.entries.borrow_mut();
            let (matched, remaining) = entries
                .drain(..)
                .partition(|e| e.observer.id() == observer);
            *entries = remaining;
            matched
        };
        if matched.is_empty() {
            return false;
        }

        let pipes = self.pipes.borrow();
        for entry in &matched {
            if let Some(chain) = pipes.get(&entry.pipe) {
                if let Some(stage) = chain
                    .stages
                    .iter()
                    .find(|s| s.fanout_id() == entry.terminal)
                {
                    stage.remove_sink(observer);
                }
            }
        }
        debug!(observer = %observer, entries = matched.len(), "multicast entries removed");
        true
    }

    /// Drop every pipe that references the source, along with all entries
    /// recorded for those pipes. Invoked by `destroy`.
    pub(crate) fn purge_source(&self, source: SourceId) {
        let doomed: Vec<PipeId> = self
            .pipes
            .borrow()
            .iter()
            .filter(|(_, chain)| chain.references(source))
            .map(|(id, _)| *id)
            .collect();
        if doomed.is_empty() {
            return;
        }
        self.entries.borrow_mut().retain(|e| !doomed.contains(&e.pipe));
        let mut pipes = self.pipes.borrow_mut();
        for id in &doomed {
            pipes.remove(id);
        }
        debug!(source = %source, pipes = doomed.len(), "pipes purged");
    }
}
