use std::collections::HashMap;

use rand::Rng;

/// Represents a context in an n-gram model.
///
/// A `State` corresponds to a fixed (n-1)-token context and stores every
/// token observed right after it, together with how often it was seen.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Pick the most frequent next token (greedy generation)
/// - Draw the next token by weighted random sampling
///
/// ## Invariants
/// - `total` equals the sum of all transition counts
/// - Each transition occurrence count is strictly positive
/// - `transitions` keeps first-seen order, `index` points into it
#[derive(Clone, Debug)]
pub(crate) struct State {
	/// The (n-1) tokens preceding every transition of this state.
	context: Vec<String>,
	/// Number of times the context was observed.
	total: usize,
	/// Outgoing transitions in the order they were first observed.
	/// Example: [("b", 42), ("</s>", 3)]
	transitions: Vec<(String, usize)>,
	/// Position of each token inside `transitions`.
	index: HashMap<String, usize>,
}

impl State {
	/// Creates a new empty state for the given context.
	pub(crate) fn new(context: &[String]) -> Self {
		Self {
			context: context.to_vec(),
			total: 0,
			transitions: Vec::new(),
			index: HashMap::new(),
		}
	}

	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with an initial count of 1.
	pub(crate) fn add_transition(&mut self, next: &str) {
		match self.index.get(next) {
			Some(&position) => self.transitions[position].1 += 1,
			None => {
				self.index.insert(next.to_owned(), self.transitions.len());
				self.transitions.push((next.to_owned(), 1));
			}
		}
		self.total += 1;
	}

	pub(crate) fn context(&self) -> &[String] {
		&self.context
	}

	/// Number of times the context was observed.
	pub(crate) fn total(&self) -> usize {
		self.total
	}

	/// Occurrences of `next` after this context, 0 if never observed.
	pub(crate) fn count(&self, next: &str) -> usize {
		self.index
			.get(next)
			.map_or(0, |&position| self.transitions[position].1)
	}

	/// Iterates over transitions in first-seen order.
	pub(crate) fn transitions(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Returns the most frequent next token.
	///
	/// Ties go to the token observed first during training.
	/// Returns `None` if the state has no transitions.
	pub(crate) fn best(&self) -> Option<&str> {
		let mut best: Option<(&str, usize)> = None;
		for (token, count) in self.transitions() {
			match best {
				Some((_, best_count)) if count <= best_count => (),
				_ => best = Some((token, count)),
			}
		}
		best.map(|(token, _)| token)
	}

	/// Draws the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count. Returns `None` if the state has no transitions.
	pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		if self.total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..self.total);
		for (token, occurrence) in self.transitions() {
			if r < occurrence {
				return Some(token);
			}
			r -= occurrence;
		}

		// Unreachable while `total` matches the transition counts
		self.transitions.last().map(|(token, _)| token.as_str())
	}
}
