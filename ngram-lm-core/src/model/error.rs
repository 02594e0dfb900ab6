//! Error types for language model operations.

use thiserror::Error;

/// Errors that can occur when building or querying an n-gram model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LmError {
	/// The model order must be between 1 and `MAX_ORDER`.
	#[error("Invalid order: {order}, n must be between 1 and {max}", max = super::ngram_model::MAX_ORDER)]
	InvalidOrder { order: usize },

	/// An n-gram tuple does not have exactly `n` tokens.
	#[error("Order mismatch: expected {expected} tokens, got {got}")]
	OrderMismatch { expected: usize, got: usize },
}
