//! Tap: run a side effect per item, forward the original unchanged.

use crate::operators::Operator;
use crate::stage::Stage;

#[cfg(test)]
#[path = "tap_test.rs"]
mod tests;

struct TapOperator<T> {
    f: Box<dyn FnMut(&T)>,
}

impl<T> Operator<T> for TapOperator<T> {
    fn apply(&mut self, item: T) -> Option<T> {
        (self.f)(&item);
        Some(item)
    }

    fn name(&self) -> &'static str {
        "tap"
    }
}

/// Stage that invokes `f(&item)` for its side effect and forwards the
/// original item unmodified.
pub fn tap<T: 'static>(f: impl FnMut(&T) + 'static) -> Stage<T> {
    Stage::from_operator(Box::new(TapOperator { f: Box::new(f) }))
}
