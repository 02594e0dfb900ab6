//! N-gram language modeling library.
//!
//! This crate provides a word-level language model including:
//! - Laplace-smoothed n-gram counting
//! - Greedy and sampled text generation
//! - Sentence probability scoring
//! - Corpus providers and a text cleaner feeding the model
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core n-gram model and generation logic.
///
/// This module exposes the model interface while keeping
/// internal state representations private.
pub mod model;

/// Corpus acquisition: the provider trait, built-in providers
/// and the text cleaner.
pub mod corpus;

/// I/O utilities (file loading).
///
/// Not exposed
pub(crate) mod io;
