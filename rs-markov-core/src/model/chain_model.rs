use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;

use rand::Rng;

use serde::Serialize;

use super::generation_input::GenerationInput;
use super::successors::Successors;
use crate::source::LineSource;

/// Reserved word-key marking the start of a new sentence.
///
/// Always present in the transition mapping. The constant is treated as
/// reserved: a corpus is not expected to contain it as a literal token.
pub const BEGINS_SENTENCE: &str = "__$";

/// Characters that terminate a sentence when they end a token.
pub const SENTENCE_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Returns true if the final character of `token` is sentence punctuation.
///
/// An empty token has no final character and is never terminating. Pure
/// function with no failure mode.
pub fn ends_with_sentence_punctuation(token: &str) -> bool {
	token
		.chars()
		.last()
		.is_some_and(|last| SENTENCE_PUNCTUATION.contains(&last))
}

/// First-order word-level Markov chain over a text corpus.
///
/// The model maps each word-key (a token, or [`BEGINS_SENTENCE`]) to the
/// ordered sequence of tokens observed to follow it. Tokens are
/// whitespace-delimited, so punctuation stays attached to its word and a
/// token like `"end."` carries its own terminator.
///
/// ## Responsibilities
/// - Fold corpus lines and words into the transition mapping
/// - Track the sentence boundary through the `prev_word` cursor
/// - Generate sentences by a uniform-random walk from the sentinel key
/// - Expose the mapping read-only for inspection
///
/// ## Invariants
/// - The sentinel key is present from construction on
/// - Every ingested token is reachable as a key or a value; a token with
///   no observed successor has no key entry (end of chain)
/// - `prev_word` is updated exactly once per ingested token, after that
///   token has been recorded
/// - The model grows monotonically; there is no deletion operation
///
/// Not thread-safe: simultaneous ingestion and generation from multiple
/// threads must be excluded by the caller (wrap the model in a lock if
/// concurrent use is required).
#[derive(Serialize, Clone, Debug)]
pub struct ChainModel {
	/// Word-key to observed successor sequence.
	transitions: HashMap<String, Successors>,
	/// Most recently ingested token, or the sentinel at a sentence
	/// boundary.
	prev_word: String,
}

impl ChainModel {
	/// Creates an empty model containing only the sentinel key.
	pub fn new() -> Self {
		let mut transitions = HashMap::new();
		transitions.insert(BEGINS_SENTENCE.to_owned(), Successors::default());
		Self {
			transitions,
			prev_word: BEGINS_SENTENCE.to_owned(),
		}
	}

	/// Ingests one line of text.
	///
	/// The line is split on runs of whitespace and each token is folded
	/// into the mapping in left-to-right order. A blank or whitespace-only
	/// line is a no-op.
	pub fn ingest_line(&mut self, line: &str) {
		for token in line.split_whitespace() {
			self.ingest_word(token);
		}
	}

	/// Ingests a single token.
	///
	/// If the previous token ended a sentence, the token is recorded under
	/// the sentinel key; otherwise it is recorded as a successor of the
	/// previous token, creating that key on first use. The cursor then
	/// moves to the token.
	///
	/// The initial sentinel cursor never ends with punctuation, so the
	/// very first token is recorded under the sentinel through the
	/// ordinary previous-word branch.
	///
	/// An empty token is a no-op: nothing is recorded and the cursor does
	/// not move.
	pub fn ingest_word(&mut self, token: &str) {
		if token.is_empty() {
			return;
		}

		let key = if ends_with_sentence_punctuation(&self.prev_word) {
			// The previous word closed a sentence; this token opens the next
			BEGINS_SENTENCE.to_owned()
		} else {
			self.prev_word.clone()
		};
		self.transitions.entry(key).or_default().record(token);

		self.prev_word = token.to_owned();
	}

	/// Ingests every line produced by a line source, best-effort.
	///
	/// # Behavior
	/// - A source that cannot be opened contributes nothing: a diagnostic
	///   is emitted and the call returns.
	/// - A read failure mid-stream stops ingestion at that point: lines
	///   already drained stay in the model, a diagnostic is emitted and
	///   the call returns.
	///
	/// No failure propagates to the caller and none aborts the process; a
	/// partially read source simply yields a partially built model.
	pub fn ingest_source<S: LineSource>(&mut self, source: &mut S) {
		let lines = match source.open() {
			Ok(lines) => lines,
			Err(error) if error.kind() == ErrorKind::NotFound => {
				log::warn!("line source not found, nothing ingested: {error}");
				return;
			}
			Err(error) => {
				log::warn!("failed to open line source, nothing ingested: {error}");
				return;
			}
		};

		for line in lines {
			match line {
				Ok(line) => self.ingest_line(&line),
				Err(error) => {
					log::warn!("read failure while draining line source, ingestion stopped: {error}");
					return;
				}
			}
		}
	}

	/// Picks one successor of `key` uniformly at random.
	///
	/// Acquires a fresh thread-local randomness source on every call.
	/// Returns `None` if the key has no entry or its sequence is empty.
	pub fn pick_successor(&self, key: &str) -> Option<&str> {
		self.pick_successor_with(key, &mut rand::rng())
	}

	/// Picks one successor of `key` uniformly at random using `rng`.
	///
	/// Selection is independent on every call; nothing is memoized and
	/// already-chosen elements are not exhausted. Seed the `rng` for
	/// reproducible walks.
	pub fn pick_successor_with<R: Rng + ?Sized>(&self, key: &str, rng: &mut R) -> Option<&str> {
		self.transitions.get(key)?.pick(rng)
	}

	/// Generates one sentence as a single string.
	///
	/// Equivalent to [`ChainModel::generate_sentence_with`] with a fresh
	/// thread-local randomness source.
	pub fn generate_sentence(&self, input: &GenerationInput) -> String {
		self.generate_sentence_with(input, &mut rand::rng())
	}

	/// Generates one sentence as a single string using `rng`.
	///
	/// # Behavior
	/// - The first token is picked from the sentinel's sequence; if that
	///   sequence is empty the result is the empty string (no sentence can
	///   be formed, not an error).
	/// - Tokens are appended separated by single spaces, with no leading
	///   space, until a sentence-terminating token is emitted or the
	///   current token has no recorded successor (a sentence ending
	///   without punctuation is a valid outcome).
	/// - If `input.max_words` is non-zero, the walk additionally stops
	///   once that many words have been emitted; the truncation is
	///   reported as a diagnostic. A corpus in which every token has a
	///   non-punctuation successor makes the uncapped walk unbounded,
	///   which is an inherited property of the algorithm.
	pub fn generate_sentence_with<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> String {
		let mut sentence = String::new();

		let mut current = match self.pick_successor_with(BEGINS_SENTENCE, rng) {
			Some(token) => token.to_owned(),
			None => return sentence,
		};

		let mut emitted = 0;
		loop {
			if !sentence.is_empty() {
				sentence.push(' ');
			}
			sentence.push_str(&current);
			emitted += 1;

			if ends_with_sentence_punctuation(&current) {
				break;
			}
			if input.max_words != 0 && emitted >= input.max_words {
				log::warn!("sentence truncated at the {emitted}-word cap");
				break;
			}

			current = match self.pick_successor_with(&current, rng) {
				Some(token) => token.to_owned(),
				None => break,
			};
		}

		sentence
	}

	/// Read-only view of the successor sequence recorded for `key`.
	///
	/// Returns `None` for a key with no entry (a terminal token, or a
	/// token never ingested).
	pub fn successors_of(&self, key: &str) -> Option<&[String]> {
		self.transitions.get(key).map(Successors::tokens)
	}

	/// Read-only view of the full transition mapping.
	///
	/// Key order is unspecified; the order within each sequence is the
	/// insertion order.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.transitions
			.iter()
			.map(|(key, successors)| (key.as_str(), successors.tokens()))
	}

	/// Number of word-keys in the mapping, sentinel included.
	pub fn key_count(&self) -> usize {
		self.transitions.len()
	}
}

impl Default for ChainModel {
	fn default() -> Self {
		Self::new()
	}
}

/// Textual rendering of the transition mapping, one key per line.
///
/// Keys are sorted so the rendering is stable across runs.
impl fmt::Display for ChainModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<&str> = self.transitions.keys().map(String::as_str).collect();
		keys.sort_unstable();

		for key in keys {
			// Every iterated key is present by construction
			if let Some(successors) = self.transitions.get(key) {
				writeln!(f, "{} -> [{}]", key, successors.tokens().join(", "))?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::{BEGINS_SENTENCE, ChainModel, ends_with_sentence_punctuation};
	use crate::model::generation_input::GenerationInput;
	use crate::source::{FileSource, LineSource, MemorySource};
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::io;

	/// Yields one good line, then fails mid-stream.
	struct FlakySource;

	impl LineSource for FlakySource {
		type Lines = std::vec::IntoIter<io::Result<String>>;

		fn open(&mut self) -> io::Result<Self::Lines> {
			Ok(vec![
				Ok("Solid ground.".to_owned()),
				Err(io::Error::new(io::ErrorKind::BrokenPipe, "wire cut")),
				Ok("Never reached.".to_owned()),
			]
			.into_iter())
		}
	}

	#[test]
	fn new_model_holds_only_an_empty_sentinel() {
		let model = ChainModel::new();
		assert_eq!(model.key_count(), 1);
		assert_eq!(model.successors_of(BEGINS_SENTENCE), Some(&[][..]));
		assert_eq!(model.prev_word, BEGINS_SENTENCE);
	}

	#[test]
	fn blank_lines_are_a_noop() {
		let mut model = ChainModel::new();
		model.ingest_line("");
		model.ingest_line("   \t  ");
		assert_eq!(model.key_count(), 1);
		assert_eq!(model.successors_of(BEGINS_SENTENCE), Some(&[][..]));
		assert_eq!(model.prev_word, BEGINS_SENTENCE);
	}

	#[test]
	fn empty_token_is_a_noop() {
		let mut model = ChainModel::new();
		model.ingest_word("one");
		model.ingest_word("");
		assert_eq!(model.prev_word, "one");
		assert_eq!(model.successors_of(BEGINS_SENTENCE), Some(&["one".to_owned()][..]));
	}

	#[test]
	fn punctuation_classification() {
		assert!(ends_with_sentence_punctuation("stop."));
		assert!(ends_with_sentence_punctuation("wait!"));
		assert!(ends_with_sentence_punctuation("really?"));
		assert!(!ends_with_sentence_punctuation("stop"));
		assert!(!ends_with_sentence_punctuation(""));
		assert!(!ends_with_sentence_punctuation(BEGINS_SENTENCE));
	}

	#[test]
	fn single_line_builds_the_expected_transitions() {
		let mut model = ChainModel::new();
		model.ingest_line("Hello world. Bye.");

		// "Bye." follows a terminating token, so it seeds the sentinel
		assert_eq!(
			model.successors_of(BEGINS_SENTENCE),
			Some(&["Hello".to_owned(), "Bye.".to_owned()][..])
		);
		assert_eq!(model.successors_of("Hello"), Some(&["world.".to_owned()][..]));
		assert_eq!(model.successors_of("world."), None);
		assert_eq!(model.successors_of("Bye."), None);
		assert_eq!(model.prev_word, "Bye.");
	}

	#[test]
	fn generation_never_walks_past_a_terminator() {
		let mut model = ChainModel::new();
		model.ingest_line("Hello world. Bye.");

		let input = GenerationInput::default();
		for seed in 0..200 {
			let mut rng = StdRng::seed_from_u64(seed);
			let sentence = model.generate_sentence_with(&input, &mut rng);
			assert!(
				sentence == "Hello world." || sentence == "Bye.",
				"unexpected sentence: {sentence:?}"
			);
		}
	}

	#[test]
	fn sentence_starts_are_recorded_in_ingestion_order() {
		let mut model = ChainModel::new();
		model.ingest_line("A b. C d.");

		assert_eq!(
			model.successors_of(BEGINS_SENTENCE),
			Some(&["A".to_owned(), "C".to_owned()][..])
		);
		assert_eq!(model.successors_of("A"), Some(&["b.".to_owned()][..]));
		assert_eq!(model.successors_of("C"), Some(&["d.".to_owned()][..]));
	}

	#[test]
	fn cursor_carries_across_lines() {
		let mut model = ChainModel::new();
		model.ingest_line("one two");
		model.ingest_line("three");

		// "three" continues the unterminated sentence from the first line
		assert_eq!(model.successors_of("two"), Some(&["three".to_owned()][..]));
		assert_eq!(model.prev_word, "three");
	}

	#[test]
	fn pick_successor_frequency_follows_repetition() {
		let mut model = ChainModel::new();
		// Builds k -> [x, x, y]
		model.ingest_line("k x");
		model.ingest_line("k x");
		model.ingest_line("k y");
		assert_eq!(
			model.successors_of("k"),
			Some(&["x".to_owned(), "x".to_owned(), "y".to_owned()][..])
		);

		let mut rng = StdRng::seed_from_u64(7);
		let trials = 3_000;
		let mut x_count = 0;
		for _ in 0..trials {
			if model.pick_successor_with("k", &mut rng) == Some("x") {
				x_count += 1;
			}
		}

		// Expect ~2/3 within a 5% tolerance band
		let expected = trials * 2 / 3;
		let tolerance = trials * 5 / 100;
		assert!(
			(expected - tolerance..=expected + tolerance).contains(&x_count),
			"x picked {x_count} times out of {trials}"
		);
	}

	#[test]
	fn pick_successor_on_unknown_key_is_none() {
		let model = ChainModel::new();
		assert_eq!(model.pick_successor("missing"), None);
	}

	#[test]
	fn empty_model_generates_the_empty_string() {
		let model = ChainModel::new();
		assert_eq!(model.generate_sentence(&GenerationInput::default()), "");
	}

	#[test]
	fn word_cap_halts_a_punctuation_free_cycle() {
		let mut model = ChainModel::new();
		// "a" is its own successor and never terminates
		model.ingest_line("a a");

		let input = GenerationInput { max_words: 8 };
		let mut rng = StdRng::seed_from_u64(11);
		let sentence = model.generate_sentence_with(&input, &mut rng);
		assert_eq!(sentence.split_whitespace().count(), 8);
		assert!(sentence.split_whitespace().all(|word| word == "a"));
	}

	#[test]
	fn ingest_source_drains_lines_in_order() {
		let mut model = ChainModel::new();
		model.ingest_source(&mut MemorySource::new(["Hello world.", "Bye."]));

		assert_eq!(
			model.successors_of(BEGINS_SENTENCE),
			Some(&["Hello".to_owned(), "Bye.".to_owned()][..])
		);
		assert_eq!(model.successors_of("Hello"), Some(&["world.".to_owned()][..]));
	}

	#[test]
	fn missing_file_leaves_the_model_unchanged() {
		let mut model = ChainModel::new();
		model.ingest_source(&mut FileSource::new("no/such/corpus.txt"));

		assert_eq!(model.key_count(), 1);
		assert_eq!(model.successors_of(BEGINS_SENTENCE), Some(&[][..]));
		assert_eq!(model.prev_word, BEGINS_SENTENCE);
	}

	#[test]
	fn read_failure_keeps_already_drained_lines() {
		let mut model = ChainModel::new();
		model.ingest_source(&mut FlakySource);

		assert_eq!(model.successors_of(BEGINS_SENTENCE), Some(&["Solid".to_owned()][..]));
		assert_eq!(model.successors_of("Solid"), Some(&["ground.".to_owned()][..]));
		assert_eq!(model.successors_of("Never"), None);
	}

	#[test]
	fn transitions_view_exposes_the_full_mapping() {
		let mut model = ChainModel::new();
		model.ingest_line("a b.");

		let view: std::collections::HashMap<&str, &[String]> = model.transitions().collect();
		assert_eq!(view.len(), model.key_count());
		assert_eq!(view["a"], &["b.".to_owned()][..]);
		assert!(view.contains_key(BEGINS_SENTENCE));
	}

	#[test]
	fn display_renders_sorted_keys() {
		let mut model = ChainModel::new();
		model.ingest_line("b a.");

		let rendering = model.to_string();
		assert!(rendering.contains("__$ -> [b]"));
		assert!(rendering.contains("b -> [a.]"));
	}
}
