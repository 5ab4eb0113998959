//! Pluck: extract one named property from every item and forward it.

use serde_json::Value;

use crate::error::{CascadeError, Result};
use crate::operators::Operator;
use crate::stage::Stage;

#[cfg(test)]
#[path = "pluck_test.rs"]
mod tests;

/// Items that support extraction of a named property.
///
/// Extraction is total: a missing key yields the type's empty value rather
/// than failing, so a pluck stage never drops items.
pub trait Keyed: Sized {
    /// Extract the property named `key` from this item.
    fn extract(&self, key: &str) -> Self;
}

impl Keyed for Value {
    fn extract(&self, key: &str) -> Self {
        self.get(key).cloned().unwrap_or(Value::Null)
    }
}

struct PluckOperator {
    key: String,
}

impl<T: Keyed> Operator<T> for PluckOperator {
    fn apply(&mut self, item: T) -> Option<T> {
        Some(item.extract(&self.key))
    }

    fn name(&self) -> &'static str {
        "pluck"
    }
}

/// Stage that forwards `item[key]` for every incoming item.
///
/// # Errors
///
/// Returns [`CascadeError::EmptyPluckKey`] when `key` is empty.
pub fn pluck<T: Keyed + 'static>(key: impl Into<String>) -> Result<Stage<T>> {
    let key = key.into();
    if key.is_empty() {
        return Err(CascadeError::EmptyPluckKey);
    }
    Ok(Stage::from_operator(Box::new(PluckOperator { key })))
}
