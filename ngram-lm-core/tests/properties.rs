//! Property tests for the n-gram model over random small corpora.

use ngram_lm_core::model::{END_TOKEN, NGramModel, START_TOKEN};
use proptest::prelude::*;

/// Corpora over a tiny alphabet, so contexts repeat often.
fn corpus() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 0..40)
		.prop_map(|tokens| tokens.into_iter().map(str::to_owned).collect())
}

fn any_token() -> impl Strategy<Value = String> {
	prop::sample::select(vec!["a", "b", "c", "d", "zz", START_TOKEN, END_TOKEN]).prop_map(str::to_owned)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn context_count_is_sum_of_ngram_counts(tokens in corpus(), n in 1usize..5) {
		let mut model = NGramModel::new(n).unwrap();
		model.train(&tokens);

		for (context, total) in model.contexts() {
			let sum: usize = model.candidates(context).iter().map(|(_, count)| count).sum();
			prop_assert_eq!(sum, total);
			for (next, count) in model.candidates(context) {
				let mut ngram = context.to_vec();
				ngram.push(next.to_owned());
				prop_assert_eq!(model.ngram_count(&ngram), count);
				prop_assert!(count <= model.context_count(context));
			}
		}

		// n + k - n + 1 windows over the padded corpus
		let windows: usize = model.contexts().map(|(_, total)| total).sum();
		prop_assert_eq!(windows, tokens.len() + 1);
	}

	#[test]
	fn prob_stays_in_unit_interval(
		tokens in corpus(),
		n in 1usize..4,
		ngram in prop::collection::vec(any_token(), 1..4),
	) {
		let mut model = NGramModel::new(n).unwrap();
		prop_assume!(ngram.len() == n);

		let untrained = model.prob(&ngram).unwrap();
		prop_assert!(untrained > 0.0 && untrained <= 1.0);

		model.train(&tokens);
		let p = model.prob(&ngram).unwrap();
		prop_assert!(p > 0.0 && p <= 1.0, "p = {}", p);
	}

	#[test]
	fn generate_never_exceeds_max_len(tokens in corpus(), n in 1usize..4, max_len in 0usize..30) {
		let mut model = NGramModel::new(n).unwrap();
		model.train(&tokens);

		let generated = model.generate(max_len);
		prop_assert!(generated.len() <= max_len);
		prop_assert!(generated.iter().all(|token| token != START_TOKEN && token != END_TOKEN));
	}

	#[test]
	fn generate_is_deterministic(tokens in corpus(), n in 1usize..4) {
		let mut first = NGramModel::new(n).unwrap();
		let mut second = NGramModel::new(n).unwrap();
		first.train(&tokens);
		second.train(&tokens);
		prop_assert_eq!(first.generate(15), second.generate(15));
	}

	#[test]
	fn unseen_sentence_is_positive(tokens in corpus(), n in 1usize..4, words in 1usize..6) {
		let mut model = NGramModel::new(n).unwrap();
		model.train(&tokens);

		let sentence = vec!["unseen"; words].join(" ");
		let p = model.sentence_prob(&sentence);
		prop_assert!(p > 0.0 && p < 1.0);
		prop_assert!(model.sentence_log_prob(&sentence).is_finite());
	}
}

#[test]
fn alternating_bigram_scenario() {
	let mut model = NGramModel::new(2).unwrap();
	model.train(&["a", "b", "a", "b", "a"]);

	assert_eq!(model.ngram_count(&["<s>", "a"]), 1);
	assert_eq!(model.ngram_count(&["a", "b"]), 2);
	assert_eq!(model.ngram_count(&["b", "a"]), 2);
	assert_eq!(model.ngram_count(&["a", "</s>"]), 1);
	assert_eq!(model.vocabulary_size(), 2);
	assert_eq!(model.context_count(&["a"]), 3);
	assert!((model.prob(&["a", "b"]).unwrap() - 0.6).abs() < 1e-12);
}
