//! Error types for the event pipeline.
//!
//! One enum covers the three failure classes the pipeline distinguishes:
//! construction errors (`EmptyPluckKey`), usage errors (`EmptyPipe`,
//! `NestedPipe`), and per-observer delivery failures (`Delivery`).
//! Construction and usage errors are returned synchronously from the call
//! that violates the contract. Delivery errors are routed to the failing
//! observer's error handler when one exists; otherwise they propagate out
//! of `emit`.

use thiserror::Error;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Errors produced by pipeline construction and delivery.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// `pipe` was called with zero stages.
    #[error("empty pipes are unsupported")]
    EmptyPipe,

    /// `pipe` was called on an operator stage; pipes are linear and built
    /// only from a bare source.
    #[error("nested pipes are unsupported")]
    NestedPipe,

    /// `pluck` was constructed with an empty property name.
    #[error("pluck operator expects a property name")]
    EmptyPluckKey,

    /// An observer's deliver callback failed for one item.
    #[error("delivery failed: {message}")]
    Delivery {
        /// What went wrong, as reported by the observer.
        message: String,
    },
}

impl CascadeError {
    /// Create a delivery error.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::EmptyPipe => "empty_pipe",
            Self::NestedPipe => "nested_pipe",
            Self::EmptyPluckKey => "empty_pluck_key",
            Self::Delivery { .. } => "delivery_failed",
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CascadeError>;
