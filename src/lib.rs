//! # Cascade
//!
//! In-process, push-based event pipeline: an [`Observable`] source emits
//! items synchronously to registered [`Observer`] sinks, optionally through
//! a linear chain of operator [`Stage`]s, with [`multicast`] attaching
//! several terminal observers at once and a caller-owned
//! [`SubscriptionRegistry`] recording provenance so the pipe can be torn
//! down from either end.
//!
//! # Design
//!
//! - **Synchronous**: every item is delivered through the whole pipe before
//!   `emit` returns; there is no scheduler, no time, no back-pressure.
//! - **Composition over inheritance**: one generic [`Stage`] parameterized
//!   by an [`Operator`] delivery policy; `map`, `filter`, `take`, `pluck`
//!   and `tap` are policies, not subclasses.
//! - **No hidden globals**: subscription provenance lives in a registry the
//!   caller owns and injects, so isolated pipelines can coexist.
//! - **Single-threaded**: sinks, stages and the registry are `Rc`-shared
//!   with interior mutability; the crate is not `Send` or `Sync`.
//!
//! # Architecture
//!
//! ```text
//! emit(item)
//!     │
//!     ▼
//! [Observable] ─► forwarder ─► [Stage: map] ─► forwarder ─► [Stage: filter]
//!     │                                                          │
//!     └─► direct sinks                       multicast sinks ◄───┘
//!                                                  │
//!                             SubscriptionRegistry (observer, terminal, pipe)
//! ```
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use cascade::{filter, map, Observable, Observer, SubscriptionRegistry};
//!
//! # fn main() -> cascade::Result<()> {
//! let registry = SubscriptionRegistry::new();
//! let source = Observable::new(&registry);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = {
//!     let seen = Rc::clone(&seen);
//!     Observer::new(move |n: &i64| seen.borrow_mut().push(*n))
//! };
//!
//! let tail = source.pipe([map(|n: i64| n * 2), filter(|n: &i64| *n > 10)])?;
//! tail.subscribe(&sink);
//!
//! source.emit(4)?;
//! source.emit(10)?;
//! assert_eq!(*seen.borrow(), vec![20]);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`source`](Observable) - emitting source, pipe building, multicast
//! - [`stage`](Stage) - policy-driven operator stage
//! - [`operators`] - the delivery policies and their factories
//! - [`registry`](SubscriptionRegistry) - multicast provenance bookkeeping
//! - [`compose`](pipe()) - plain function composition for deliver logic
//!
//! [`multicast`]: Observable::multicast

mod compose;
mod error;
mod observer;
mod registry;
mod source;
mod stage;

pub mod operators;

pub use compose::{inspect, pipe};
pub use error::{CascadeError, Result};
pub use observer::{Observer, ObserverId};
pub use operators::{filter, map, pluck, take, tap, Keyed, Operator};
pub use registry::{PipeId, SubscriptionRegistry};
pub use source::{Observable, SourceId};
pub use stage::Stage;
