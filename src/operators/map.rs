//! Map: apply a function to every item and forward the result.

use crate::operators::Operator;
use crate::stage::Stage;

#[cfg(test)]
#[path = "map_test.rs"]
mod tests;

struct MapOperator<T> {
    f: Box<dyn FnMut(T) -> T>,
}

impl<T> Operator<T> for MapOperator<T> {
    fn apply(&mut self, item: T) -> Option<T> {
        Some((self.f)(item))
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

/// Stage that forwards `f(item)` for every incoming item.
pub fn map<T: 'static>(f: impl FnMut(T) -> T + 'static) -> Stage<T> {
    Stage::from_operator(Box::new(MapOperator { f: Box::new(f) }))
}
