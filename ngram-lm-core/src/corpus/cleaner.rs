use std::sync::LazyLock;

use regex::Regex;

use super::error::CorpusError;

/// A markup tag; `.` stops at line breaks, so a tag never spans lines.
static MARKUP: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<.*?>").expect("MARKUP pattern must compile"));

/// Anything but ASCII letters, Romanian letters and spaces.
static FOREIGN_CHAR: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^a-zA-ZăîâșțĂÎÂȘȚ ]").expect("FOREIGN_CHAR pattern must compile"));

/// Turns raw page text into lowercase word tokens.
///
/// - Every `<...>` tag on a single line becomes a space
/// - Characters other than ASCII letters, Romanian letters and spaces become spaces
/// - Tokens are lowercased, split on whitespace, and one-letter tokens are dropped
pub fn clean_text(raw: &str) -> Vec<String> {
	let untagged = MARKUP.replace_all(raw, " ");
	let filtered = FOREIGN_CHAR.replace_all(&untagged, " ");

	filtered
		.to_lowercase()
		.split_whitespace()
		.filter(|token| token.chars().count() > 1)
		.map(str::to_owned)
		.collect()
}

/// Repeats `tokens` until it holds at least `min_words` entries, then
/// truncates it to exactly `min_words`.
///
/// The list doubles on every round (the whole list is appended to itself).
///
/// # Errors
/// Returns `CorpusError::Empty` if `tokens` is empty and `min_words > 0`.
pub fn fit_to_length(mut tokens: Vec<String>, min_words: usize) -> Result<Vec<String>, CorpusError> {
	if tokens.is_empty() && min_words > 0 {
		return Err(CorpusError::Empty);
	}
	while tokens.len() < min_words {
		tokens.extend_from_within(..);
	}
	tokens.truncate(min_words);
	Ok(tokens)
}
