use std::sync::Arc;

use super::knowledge_base::KnowledgeBase;

/// Outcome of scoring a token against the knowledge base.
///
/// Only `Scored` carries statistical evidence. The other two variants are
/// tokens the model knows nothing about, and both count as real words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
	/// Fewer than two characters: there is no digraph to score.
	TooShort,
	/// The token contains a character outside the model alphabet.
	OutOfAlphabet(char),
	/// Geometric mean of the digraph probabilities, `exp(mean(log p))`.
	Scored { probability: f64 },
}

impl Verdict {
	/// Collapses the verdict to the word / gibberish decision.
	///
	/// A scored token is gibberish iff its probability is `<= threshold`.
	pub fn is_word(&self, threshold: f64) -> bool {
		match self {
			Verdict::TooShort | Verdict::OutOfAlphabet(_) => true,
			Verdict::Scored { probability } => *probability > threshold,
		}
	}
}

/// Scores tokens with the character-transition model.
///
/// Pure and deterministic: the same token always yields the same verdict.
/// Cheap to clone, the model is shared.
#[derive(Debug, Clone)]
pub struct WordClassifier {
	knowledge_base: Arc<KnowledgeBase>,
}

impl WordClassifier {
	pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
		Self { knowledge_base }
	}

	pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
		&self.knowledge_base
	}

	/// Scores `token`.
	///
	/// Walks the characters once, summing the log score of every adjacent
	/// pair; stops at the first character missing from the alphabet.
	pub fn score(&self, token: &str) -> Verdict {
		let mut chars = token.chars();
		let first = match chars.next() {
			Some(c) if token.chars().nth(1).is_some() => c,
			_ => return Verdict::TooShort,
		};

		let kb = &self.knowledge_base;
		let mut previous = match kb.position(first) {
			Some(position) => position,
			None => return Verdict::OutOfAlphabet(first),
		};

		let mut total = 0.0;
		let mut digraphs = 0usize;
		for c in chars {
			let Some(current) = kb.position(c) else {
				return Verdict::OutOfAlphabet(c);
			};
			let Some(score) = kb.transition(previous, current) else {
				return Verdict::OutOfAlphabet(c);
			};
			total += score;
			digraphs += 1;
			previous = current;
		}

		Verdict::Scored { probability: (total / digraphs as f64).exp() }
	}

	/// Returns `true` if `token` looks like a real word.
	pub fn is_word(&self, token: &str) -> bool {
		self.score(token).is_word(self.knowledge_base.threshold())
	}
}
