//! Delivery policies and the factory helpers that wrap them into stages.
//!
//! An [`Operator`] receives one upstream item and decides what, and
//! whether, to forward: `Some(item)` re-emits through the stage's sinks,
//! `None` drops the item silently. Policies may hold per-stage state (see
//! [`take`]). Factories return ready-to-pipe [`Stage`]s.
//!
//! [`Stage`]: crate::stage::Stage

mod filter;
mod map;
mod pluck;
mod take;
mod tap;

pub use filter::filter;
pub use map::map;
pub use pluck::{pluck, Keyed};
pub use take::take;
pub use tap::tap;

/// A delivery policy: receive an upstream item, decide what to forward.
pub trait Operator<T> {
    /// Apply the policy. `Some` forwards the returned item, `None` drops
    /// the incoming one.
    fn apply(&mut self, item: T) -> Option<T>;

    /// Policy name, for logs and diagnostics.
    fn name(&self) -> &'static str;
}
