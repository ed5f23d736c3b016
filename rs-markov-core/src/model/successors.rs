use rand::Rng;
use rand::seq::IndexedRandom;

use serde::Serialize;


/// Represents the successor sequence of one word-key in the chain.
///
/// A `Successors` stores every token observed to follow its key, in the
/// order the observations were made. A token that follows its key several
/// times appears several times; frequency is encoded by repetition, not
/// by counts.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by how often each successor was recorded.
///
/// ## Responsibilities:
/// - Accumulate successor observations during ingestion
/// - Pick the next token using uniform random sampling over the sequence
///
/// ## Invariants
/// - Insertion order is preserved (inspection and tests rely on it)
/// - Uniform sampling over the sequence yields frequency-proportional
///   selection, since duplicates are kept
#[derive(Serialize, Clone, Debug, Default)]
#[serde(transparent)]
pub struct Successors {
	/// Observed successor tokens, duplicates allowed.
	/// Example: ["the", "the", "a"]
	tokens: Vec<String>
}

impl Successors {
	/// Records an observation of `token` following this key.
	pub fn record(&mut self, token: &str) {
		self.tokens.push(token.to_owned());
	}

	/// Picks one successor uniformly at random from the sequence.
	///
	/// Because duplicates are kept, the probability of selecting a token
	/// is proportional to how often it was recorded.
	///
	/// Every call samples independently; nothing is memoized or exhausted.
	///
	/// Returns `None` if the sequence is empty.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		self.tokens.choose(rng).map(String::as_str)
	}

	/// Read-only view of the sequence, in insertion order.
	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Number of recorded observations (duplicates included).
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// True if nothing has been recorded yet.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}
