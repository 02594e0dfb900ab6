//! Corpus acquisition for the language model.
//!
//! This module defines the **trait** ([`CorpusProvider`]), the built-in
//! providers ([`StaticCorpus`], [`FileCorpus`]), the text cleaner
//! ([`clean_text`], [`fit_to_length`]) and the **error** ([`CorpusError`]).
//! The model never fetches anything itself: callers hand it the tokens a
//! provider produced, so remote sources live outside this crate.

mod cleaner;
mod error;

pub use cleaner::{clean_text, fit_to_length};
pub use error::CorpusError;

use crate::io::read_file;
use std::path::PathBuf;

/// Trait for anything able to produce a training token sequence.
pub trait CorpusProvider {
	/// Produces the tokens, in order. Returns a [`CorpusError`] on failure.
	fn tokens(&self) -> Result<Vec<String>, CorpusError>;
}

/// A fixed, already tokenized corpus.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
	tokens: Vec<String>,
}

impl StaticCorpus {
	pub fn new<S: AsRef<str>>(tokens: &[S]) -> Self {
		Self { tokens: tokens.iter().map(|token| token.as_ref().to_owned()).collect() }
	}
}

impl CorpusProvider for StaticCorpus {
	fn tokens(&self) -> Result<Vec<String>, CorpusError> {
		Ok(self.tokens.clone())
	}
}

/// A corpus read from a local text file and passed through [`clean_text`].
///
/// With `min_words` set, the cleaned tokens are repeated and truncated to
/// that exact length (see [`fit_to_length`]).
#[derive(Debug, Clone)]
pub struct FileCorpus {
	path: PathBuf,
	min_words: Option<usize>,
}

impl FileCorpus {
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self { path: path.into(), min_words: None }
	}

	/// Sets the exact number of tokens to produce.
	pub fn with_min_words(mut self, min_words: usize) -> Self {
		self.min_words = Some(min_words);
		self
	}
}

impl CorpusProvider for FileCorpus {
	fn tokens(&self) -> Result<Vec<String>, CorpusError> {
		let tokens = clean_text(&read_file(&self.path)?);
		match self.min_words {
			Some(min_words) => fit_to_length(tokens, min_words),
			None => Ok(tokens),
		}
	}
}
