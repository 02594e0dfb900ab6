//! Top-level module for the n-gram language model.
//!
//! This module provides a word-level language model, including:
//! - The fixed-order model itself (`NGramModel`)
//! - Internal per-context state (`State`)
//! - Error reporting (`LmError`)

/// Fixed-order, add-one smoothed n-gram model (`n >= 1`).
///
/// Handles training, probability estimation, greedy and sampled
/// generation, and sentence scoring.
pub mod ngram_model;

/// Internal representation of a single n-gram context.
///
/// Tracks outgoing transitions in first-seen order.
/// This module is not exposed publicly.
mod state;

/// Errors reported by the model.
pub mod error;

pub use error::LmError;
pub use ngram_model::{END_TOKEN, MAX_ORDER, ModelSummary, NGramModel, START_TOKEN};
