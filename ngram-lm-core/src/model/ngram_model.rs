use super::error::LmError;
use super::state::State;
use log::{debug, trace};
use rand::Rng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Sentinel padded in front of every sequence (`n-1` times).
pub const START_TOKEN: &str = "<s>";

/// Sentinel appended once at the end of every sequence.
pub const END_TOKEN: &str = "</s>";

/// Largest accepted order. Every training window and generation step
/// allocates an `n-1` token context, so `n` stays small.
pub const MAX_ORDER: usize = 64;

/// Represents a word-level n-gram language model with add-one smoothing.
///
/// The `NGramModel` stores one `State` per observed context (the first
/// `n-1` tokens of an n-gram) and estimates the probability of the next
/// token from the counts collected during training.
///
/// # Responsibilities
/// - Build the count tables from a token sequence
/// - Compute Laplace-smoothed n-gram probabilities
/// - Generate sequences greedily or by weighted sampling
/// - Score whole sentences
///
/// # Invariants
/// - `n` is always >= 1
/// - Each state in `states` corresponds to a unique context of length `n-1`
/// - The context count of a state equals the sum of its n-gram counts
/// - `vocabulary` never contains `START_TOKEN` or `END_TOKEN`
#[derive(Clone, Debug)]
pub struct NGramModel {
	/// The order of the model (number of tokens in an n-gram)
	n: usize, // must be >= 1

	/// States in the order their context was first observed
	states: Vec<State>,

	/// Mapping from a context to its position in `states`
	index: HashMap<Vec<String>, usize>,

	/// Distinct training tokens, sentinels excluded
	vocabulary: HashSet<String>,
}

/// Read-only overview of a trained model.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
	pub order: usize,
	pub vocabulary_size: usize,
	pub contexts: usize,
	pub ngrams: usize,
}

impl NGramModel {
	/// Creates a new, untrained n-gram model of order `n`.
	///
	/// # Errors
	/// Returns `LmError::InvalidOrder` if `n < 1` or `n > MAX_ORDER`.
	pub fn new(n: usize) -> Result<Self, LmError> {
		if !(1..=MAX_ORDER).contains(&n) {
			return Err(LmError::InvalidOrder { order: n });
		}
		Ok(Self {
			n,
			states: Vec::new(),
			index: HashMap::new(),
			vocabulary: HashSet::new(),
		})
	}

	/// Returns the order `n` of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Returns `true` once `train` has been called.
	pub fn is_trained(&self) -> bool {
		!self.states.is_empty()
	}

	/// Trains the model on a token sequence.
	///
	/// # Behavior
	/// - Pads the corpus with `n-1` start sentinels and one end sentinel.
	/// - Records the vocabulary as the distinct input tokens.
	/// - For every window of length `n`, increments the n-gram count and
	///   the count of its context.
	///
	/// # Notes
	/// - Any previous training is discarded.
	/// - Tokens are used as given, no normalization is applied.
	pub fn train<S: AsRef<str>>(&mut self, corpus: &[S]) {
		self.states.clear();
		self.index.clear();
		self.vocabulary = corpus
			.iter()
			.map(|token| token.as_ref())
			.filter(|token| *token != START_TOKEN && *token != END_TOKEN)
			.map(str::to_owned)
			.collect();

		let padded = self.pad(corpus.iter().map(|token| token.as_ref()));
		for window in padded.windows(self.n) {
			let (context, next) = window.split_at(self.n - 1);
			let position = match self.index.get(context) {
				Some(&position) => position,
				None => {
					self.index.insert(context.to_vec(), self.states.len());
					self.states.push(State::new(context));
					self.states.len() - 1
				}
			};
			self.states[position].add_transition(&next[0]);
		}

		debug!(
			"trained {}-gram model: {} tokens, {} types, {} contexts",
			self.n,
			corpus.len(),
			self.vocabulary.len(),
			self.states.len()
		);
	}

	/// Returns the Laplace-smoothed probability of an n-gram.
	///
	/// `(count(ngram) + 1) / (count(context) + |V|)`, where the context is
	/// the first `n-1` tokens of `ngram`. Unseen n-grams and contexts get a
	/// small nonzero value. The vocabulary size is counted as at least 1, so
	/// an untrained model answers 1.0 and the result never exceeds 1.
	///
	/// # Errors
	/// Returns `LmError::OrderMismatch` if `ngram` does not hold `n` tokens.
	pub fn prob<S: AsRef<str>>(&self, ngram: &[S]) -> Result<f64, LmError> {
		if ngram.len() != self.n {
			return Err(LmError::OrderMismatch { expected: self.n, got: ngram.len() });
		}
		Ok(self.smoothed(&to_owned_tokens(ngram)))
	}

	/// Occurrences of `ngram` in the training data (0 for any other length).
	pub fn ngram_count<S: AsRef<str>>(&self, ngram: &[S]) -> usize {
		if ngram.len() != self.n {
			return 0;
		}
		let (context, next) = ngram.split_at(self.n - 1);
		self.state(&to_owned_tokens(context))
			.map_or(0, |state| state.count(next[0].as_ref()))
	}

	/// Occurrences of `context` as the first `n-1` tokens of an n-gram.
	pub fn context_count<S: AsRef<str>>(&self, context: &[S]) -> usize {
		self.state(&to_owned_tokens(context)).map_or(0, State::total)
	}

	/// Next tokens observed after `context`, in first-seen order, with counts.
	pub fn candidates<S: AsRef<str>>(&self, context: &[S]) -> Vec<(&str, usize)> {
		self.state(&to_owned_tokens(context))
			.map(|state| state.transitions().collect())
			.unwrap_or_default()
	}

	/// Iterates over every observed context with its count, in first-seen order.
	pub fn contexts(&self) -> impl Iterator<Item = (&[String], usize)> {
		self.states.iter().map(|state| (state.context(), state.total()))
	}

	/// Distinct training tokens (sentinels excluded).
	pub fn vocabulary(&self) -> &HashSet<String> {
		&self.vocabulary
	}

	pub fn vocabulary_size(&self) -> usize {
		self.vocabulary.len()
	}

	pub fn summary(&self) -> ModelSummary {
		ModelSummary {
			order: self.n,
			vocabulary_size: self.vocabulary.len(),
			contexts: self.states.len(),
			ngrams: self.states.iter().map(|state| state.transitions().count()).sum(),
		}
	}

	/// Generates up to `max_len` tokens greedily.
	///
	/// # Behavior
	/// - Starts from `n-1` start sentinels.
	/// - At each step, picks the candidate with the highest smoothed
	///   probability for the trailing `n-1` tokens. Within one context the
	///   denominator is shared, so this is the most frequent candidate;
	///   ties go to the candidate seen first during training.
	/// - Stops when the end sentinel is chosen or the context is unknown.
	///
	/// The returned sequence never includes the leading sentinels.
	pub fn generate(&self, max_len: usize) -> Vec<String> {
		self.walk(max_len, |state| state.best())
	}

	/// Generates greedily and joins the tokens with single spaces.
	pub fn generate_text(&self, max_len: usize) -> String {
		self.generate(max_len).join(" ")
	}

	/// Generates up to `max_len` tokens by weighted random sampling.
	///
	/// Each next token is drawn with a probability proportional to its
	/// count in the current context. Termination rules match `generate`.
	pub fn sample<R: Rng>(&self, max_len: usize, rng: &mut R) -> Vec<String> {
		self.walk(max_len, |state| state.sample(&mut *rng))
	}

	/// Returns the probability of a sentence under the model.
	///
	/// The sentence is lowercased and split on whitespace, padded as in
	/// training, and the smoothed probabilities of every window are
	/// multiplied. Long sentences may underflow toward 0.
	pub fn sentence_prob(&self, sentence: &str) -> f64 {
		self.windows_of(sentence)
			.iter()
			.map(|window| self.smoothed(window))
			.product()
	}

	/// Natural log of `sentence_prob`, summed window by window.
	///
	/// Always finite, since every smoothed probability is strictly positive.
	pub fn sentence_log_prob(&self, sentence: &str) -> f64 {
		self.windows_of(sentence)
			.iter()
			.map(|window| self.smoothed(window).ln())
			.sum()
	}

	/// Lowercases `sentence` and splits it on whitespace.
	pub fn tokenize(sentence: &str) -> Vec<String> {
		sentence
			.to_lowercase()
			.split_whitespace()
			.map(str::to_owned)
			.collect()
	}

	/// Shared generation loop, `pick` chooses the next token of a state.
	fn walk<'s, F>(&'s self, max_len: usize, mut pick: F) -> Vec<String>
	where
		F: FnMut(&'s State) -> Option<&'s str>,
	{
		let context_len = self.n - 1;
		let mut result: Vec<String> = vec![START_TOKEN.to_owned(); context_len];

		for _ in 0..max_len {
			let context = &result[result.len() - context_len..];
			let next = match self.state(context).and_then(&mut pick) {
				Some(next) => next,
				None => break,
			};
			trace!("{:?} -> {}", context, next);
			if next == END_TOKEN {
				break;
			}
			result.push(next.to_owned());
		}

		result.split_off(context_len)
	}

	/// Smoothed probability of a window already known to hold `n` tokens.
	fn smoothed(&self, window: &[String]) -> f64 {
		let (context, next) = window.split_at(self.n - 1);
		let (ngram_count, context_count) = match self.state(context) {
			Some(state) => (state.count(&next[0]), state.total()),
			None => (0, 0),
		};
		(ngram_count + 1) as f64 / (context_count + self.vocabulary.len().max(1)) as f64
	}

	fn state(&self, context: &[String]) -> Option<&State> {
		self.index.get(context).map(|&position| &self.states[position])
	}

	fn pad<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Vec<String> {
		let mut padded: Vec<String> = vec![START_TOKEN.to_owned(); self.n - 1];
		padded.extend(tokens.into_iter().map(str::to_owned));
		padded.push(END_TOKEN.to_owned());
		padded
	}

	/// Every `n`-token window of the padded, tokenized sentence.
	fn windows_of(&self, sentence: &str) -> Vec<Vec<String>> {
		let tokens = Self::tokenize(sentence);
		let padded = self.pad(tokens.iter().map(String::as_str));
		padded.windows(self.n).map(<[String]>::to_vec).collect()
	}
}

fn to_owned_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
	tokens.iter().map(|token| token.as_ref().to_owned()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn trained(n: usize, corpus: &[&str]) -> NGramModel {
		let mut model = NGramModel::new(n).unwrap();
		model.train(corpus);
		model
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-12
	}

	#[test]
	fn order_zero_is_rejected() {
		assert_eq!(NGramModel::new(0).unwrap_err(), LmError::InvalidOrder { order: 0 });
		assert!(NGramModel::new(1).is_ok());
	}

	#[test]
	fn order_above_max_is_rejected() {
		assert!(NGramModel::new(MAX_ORDER).is_ok());
		assert_eq!(
			NGramModel::new(MAX_ORDER + 1).unwrap_err(),
			LmError::InvalidOrder { order: MAX_ORDER + 1 }
		);
		assert!(NGramModel::new(usize::MAX).is_err());
	}

	#[test]
	fn bigram_counts_on_alternating_corpus() {
		let model = trained(2, &["a", "b", "a", "b", "a"]);

		assert_eq!(model.ngram_count(&["<s>", "a"]), 1);
		assert_eq!(model.ngram_count(&["a", "b"]), 2);
		assert_eq!(model.ngram_count(&["b", "a"]), 2);
		assert_eq!(model.ngram_count(&["a", "</s>"]), 1);
		assert_eq!(model.ngram_count(&["b", "b"]), 0);
		assert_eq!(model.context_count(&["a"]), 3);
		assert_eq!(model.context_count(&["b"]), 2);
		assert_eq!(model.vocabulary_size(), 2);
		assert!(model.vocabulary().contains("a"));
		assert!(!model.vocabulary().contains(START_TOKEN));
	}

	#[test]
	fn bigram_probability_is_add_one_smoothed() {
		let model = trained(2, &["a", "b", "a", "b", "a"]);
		assert!(close(model.prob(&["a", "b"]).unwrap(), 0.6));
		// unseen pair in a seen context: (0 + 1) / (3 + 2)
		assert!(close(model.prob(&["a", "a"]).unwrap(), 0.2));
		// unseen context: (0 + 1) / (0 + 2)
		assert!(close(model.prob(&["zz", "a"]).unwrap(), 0.5));
	}

	#[test]
	fn prob_rejects_wrong_length() {
		let model = trained(3, &["a", "b", "c"]);
		assert_eq!(
			model.prob(&["a", "b"]).unwrap_err(),
			LmError::OrderMismatch { expected: 3, got: 2 }
		);
		assert_eq!(model.ngram_count(&["a"]), 0);
	}

	#[test]
	fn untrained_model_answers_smoothing_only_values() {
		let model = NGramModel::new(2).unwrap();
		assert!(!model.is_trained());
		assert!(close(model.prob(&["a", "b"]).unwrap(), 1.0));
		assert!(model.generate(5).is_empty());
		assert!(close(model.sentence_prob("anything at all"), 1.0));
	}

	#[test]
	fn empty_corpus_keeps_probabilities_in_range() {
		let model = trained(2, &[]);
		assert!(model.is_trained());
		assert_eq!(model.vocabulary_size(), 0);
		assert_eq!(model.ngram_count(&["<s>", "</s>"]), 1);
		let p = model.prob(&["<s>", "</s>"]).unwrap();
		assert!(p > 0.0 && p <= 1.0);
		assert!(model.generate(3).is_empty());
	}

	#[test]
	fn retraining_replaces_previous_tables() {
		let mut model = trained(2, &["a", "b"]);
		model.train(&["x", "y"]);
		assert_eq!(model.ngram_count(&["a", "b"]), 0);
		assert_eq!(model.ngram_count(&["x", "y"]), 1);
		assert_eq!(model.vocabulary_size(), 2);
		assert!(!model.vocabulary().contains("a"));
	}

	#[test]
	fn generate_follows_most_frequent_transition() {
		let model = trained(2, &["the", "cat", "sat", "the", "cat", "ran", "the", "dog"]);
		// "the" -> "cat" (2) beats "dog" (1); "cat" -> "sat" wins the tie over "ran"
		assert_eq!(model.generate(3), ["the", "cat", "sat"]);
		assert_eq!(model.generate_text(3), "the cat sat");
	}

	#[test]
	fn generate_stops_on_end_sentinel() {
		let model = trained(2, &["hello", "world"]);
		assert_eq!(model.generate(10), ["hello", "world"]);
	}

	#[test]
	fn generate_respects_max_len() {
		let model = trained(2, &["a", "b", "a", "b", "a"]);
		assert_eq!(model.generate(0), Vec::<String>::new());
		assert_eq!(model.generate(4), ["a", "b", "a", "b"]);
	}

	#[test]
	fn generate_with_trigrams() {
		let model = trained(3, &["one", "two", "three", "one", "two", "four"]);
		assert_eq!(model.generate(10), ["one", "two", "three", "one", "two", "three", "one", "two", "three", "one"]);
	}

	#[test]
	fn unigram_model_repeats_most_frequent_token() {
		let model = trained(1, &["x", "y", "y"]);
		assert_eq!(model.context_count::<&str>(&[]), 4);
		assert_eq!(model.generate(3), ["y", "y", "y"]);
		assert!(close(model.prob(&["y"]).unwrap(), 3.0 / 6.0));
	}

	#[test]
	fn sample_is_reproducible_with_seed() {
		let model = trained(2, &["a", "b", "a", "c", "a", "b", "c", "a"]);
		let first = model.sample(8, &mut StdRng::seed_from_u64(42));
		let second = model.sample(8, &mut StdRng::seed_from_u64(42));
		assert_eq!(first, second);
		assert!(first.len() <= 8);
		assert!(first.iter().all(|token| model.vocabulary().contains(token)));
	}

	#[test]
	fn sentence_prob_multiplies_windows() {
		let model = trained(2, &["a", "b", "a", "b", "a"]);
		// P(a|<s>) * P(b|a) * P(</s>|b) = 2/3 * 3/5 * 1/4
		let expected = (2.0 / 3.0) * (3.0 / 5.0) * (1.0 / 4.0);
		assert!(close(model.sentence_prob("A  b"), expected));
		assert!(close(model.sentence_log_prob("a b"), expected.ln()));
	}

	#[test]
	fn sentence_of_unseen_tokens_is_small_but_positive() {
		let model = trained(2, &["a", "b", "a", "b", "a"]);
		let p = model.sentence_prob("never seen words");
		assert!(p > 0.0 && p < 1.0);
	}

	#[test]
	fn tokenize_lowercases_and_splits() {
		assert_eq!(NGramModel::tokenize("  Bună  ZIUA\tlume "), ["bună", "ziua", "lume"]);
	}

	#[test]
	fn summary_reports_table_sizes() {
		let model = trained(2, &["a", "b", "a", "b", "a"]);
		assert_eq!(
			model.summary(),
			ModelSummary { order: 2, vocabulary_size: 2, contexts: 3, ngrams: 4 }
		);
	}

	#[test]
	fn candidates_and_contexts_keep_training_order() {
		let model = trained(2, &["a", "c", "a", "b"]);
		assert_eq!(model.candidates(&["a"]), [("c", 1), ("b", 1)]);
		assert!(model.candidates(&["zz"]).is_empty());
		let contexts: Vec<String> = model.contexts().map(|(context, _)| context.join(" ")).collect();
		assert_eq!(contexts, ["<s>", "a", "c", "b"]);
	}
}
