//! Take: forward the first `n` items, then silently drop the rest.
//!
//! Dropping does not unsubscribe anything; the stage keeps receiving and
//! discarding items for the lifetime of the pipe.

use crate::operators::Operator;
use crate::stage::Stage;

#[cfg(test)]
#[path = "take_test.rs"]
mod tests;

struct TakeOperator {
    limit: usize,
    seen: usize,
}

impl<T> Operator<T> for TakeOperator {
    fn apply(&mut self, item: T) -> Option<T> {
        self.seen += 1;
        if self.seen <= self.limit {
            Some(item)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "take"
    }
}

/// Stage that forwards only the first `limit` items it receives, counted
/// across every emit that reaches it.
pub fn take<T: 'static>(limit: usize) -> Stage<T> {
    Stage::from_operator(Box::new(TakeOperator { limit, seen: 0 }))
}
