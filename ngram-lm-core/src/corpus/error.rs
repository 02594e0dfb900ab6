//! Errors produced while acquiring a corpus.

use thiserror::Error;

/// Errors that can occur while producing a token sequence.
///
/// # Variants
///
/// - **Io**: the corpus source could not be read.
/// - **Empty**: cleaning left no token, so the corpus cannot reach its length.
/// - **Fetch**: a remote source could not be retrieved.
#[derive(Debug, Error)]
pub enum CorpusError {
	/// Reading the source failed.
	#[error("corpus: {0}")]
	Io(#[from] std::io::Error),

	/// No usable token survived cleaning.
	#[error("corpus: no usable token in source")]
	Empty,

	/// Retrieving a remote source failed.
	#[error("corpus: failed to fetch {url}: {source}")]
	Fetch {
		url: String,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}
