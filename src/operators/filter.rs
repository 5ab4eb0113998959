//! Filter: forward an item only when the predicate holds.

use crate::operators::Operator;
use crate::stage::Stage;

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

struct FilterOperator<T> {
    predicate: Box<dyn FnMut(&T) -> bool>,
}

impl<T> Operator<T> for FilterOperator<T> {
    fn apply(&mut self, item: T) -> Option<T> {
        if (self.predicate)(&item) {
            Some(item)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}

/// Stage that forwards an item iff `predicate(&item)` is true.
pub fn filter<T: 'static>(predicate: impl FnMut(&T) -> bool + 'static) -> Stage<T> {
    Stage::from_operator(Box::new(FilterOperator {
        predicate: Box::new(predicate),
    }))
}
