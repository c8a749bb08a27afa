use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc;
use std::thread;

use log::{debug, info};

use crate::error::{ChainError, Result};
use super::prefix::Prefix;
use super::random::RandomSource;
use super::state::State;

/// Word-level Markov chain.
///
/// This struct manages:
/// - `states`: a map from a serialized [`Prefix`] to the suffixes observed after it.
/// - `words`: every distinct word seen during training, first-seen order.
/// - `vocabulary`: membership index over `words`.
/// - `start`: the all-empty prefix every build and generation starts from.
///
/// # Invariants
/// - Every key in `states` is the key of a prefix of `prefix_len()` words
/// - Entries only ever grow: nothing is removed or rewritten
#[derive(Clone, Debug)]
pub struct Chain {
	states: HashMap<String, State>,
	words: Vec<String>,
	vocabulary: HashSet<String>,
	start: Prefix,
}

impl Chain {
	/// Creates an empty chain whose prefixes hold `prefix_len` words.
	///
	/// # Errors
	/// Returns [`ChainError::InvalidPrefixLength`] if `prefix_len == 0`.
	pub fn new(prefix_len: usize) -> Result<Self> {
		Ok(Self {
			states: HashMap::new(),
			words: Vec::new(),
			vocabulary: HashSet::new(),
			start: Prefix::new(prefix_len)?,
		})
	}

	/// Number of words of context per prefix.
	pub fn prefix_len(&self) -> usize {
		self.start.len()
	}

	/// Number of distinct prefix keys.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// `true` until at least one word has been built.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Total number of recorded suffixes, which is the number of words read.
	pub fn suffix_count(&self) -> usize {
		self.states.values().map(State::total).sum()
	}

	/// Returns `true` if at least one suffix follows `key`.
	pub fn contains_key(&self, key: &str) -> bool {
		self.states.contains_key(key)
	}

	/// Suffixes recorded after `key`, one entry per occurrence.
	///
	/// Duplicates are grouped by first occurrence: after training on
	/// `a b a`, the list is `[a, a, b]`. Unknown keys yield an empty list.
	pub fn suffixes(&self, key: &str) -> Vec<&str> {
		self.states
			.get(key)
			.map(|state| {
				state
					.transitions()
					.iter()
					.flat_map(|(word, count)| std::iter::repeat_n(word.as_str(), *count))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Distinct words seen during training.
	///
	/// Callers should not rely on the order.
	pub fn words(&self) -> Vec<&str> {
		self.words.iter().map(String::as_str).collect()
	}

	/// Picks one distinct word uniformly, or `None` on an untrained chain.
	pub fn random_word<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		if self.words.is_empty() {
			return None;
		}
		let index = rng.next_index(self.words.len());
		self.words.get(index).map(String::as_str)
	}

	/// Reads whitespace-separated words from `reader` and records, for each
	/// word, the prefix it followed.
	///
	/// The window restarts empty on every call, so separate sources never
	/// link into each other. Invalid UTF-8 is decoded as U+FFFD. Reading
	/// stops at end of input or on the first IO error; the bytes received
	/// before the error are still built.
	///
	/// Returns the number of words read.
	pub fn build<R: Read>(&mut self, reader: R) -> usize {
		let mut reader = BufReader::new(reader);
		let mut prefix = self.start.clone();
		let mut line = Vec::new();
		let mut count = 0;

		loop {
			line.clear();
			let failed = match reader.read_until(b'\n', &mut line) {
				Ok(0) => break,
				Ok(_) => false,
				Err(e) => {
					debug!("stopping build after {} bytes of the current line: {e}", line.len());
					true
				}
			};

			for word in String::from_utf8_lossy(&line).split_whitespace() {
				self.add_word(&mut prefix, word);
				count += 1;
			}

			if failed {
				break;
			}
		}

		count
	}

	/// Records `word` as a suffix of `prefix`, then advances the window.
	fn add_word(&mut self, prefix: &mut Prefix, word: &str) {
		self.remember(word);
		self.states
			.entry(prefix.key())
			.or_insert_with(State::new)
			.add_transition(word, 1);
		prefix.shift(word);
	}

	fn remember(&mut self, word: &str) {
		if !self.vocabulary.contains(word) {
			self.vocabulary.insert(word.to_owned());
			self.words.push(word.to_owned());
		}
	}

	/// Builds once per chunk, so every chunk (usually a corpus line)
	/// starts from the empty prefix.
	///
	/// Returns the total number of words read.
	pub fn build_corpus<I, S>(&mut self, chunks: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut total = 0;
		let mut sources = 0;
		for chunk in chunks {
			total += self.build(chunk.as_ref().as_bytes());
			sources += 1;
		}
		info!("built {total} words from {sources} chunks ({} keys)", self.len());
		total
	}

	/// Same result as [`build_corpus`](Self::build_corpus), computed on
	/// worker threads.
	///
	/// # Behavior
	/// - Splits `chunks` into `num_cpus * 8` groups.
	/// - Spawns one thread per group, each building a partial chain.
	/// - Merges partial chains in group order once all are back.
	///
	/// Merging in group order makes the result identical to a sequential
	/// build, first-seen order included, so a seeded generation gives the
	/// same text either way.
	///
	/// # Errors
	/// Returns [`ChainError::Worker`] if a worker died before reporting.
	pub fn build_parallel(&mut self, chunks: &[String]) -> Result<usize> {
		if chunks.is_empty() {
			return Ok(0);
		}

		let groups = num_cpus::get() * 8;
		let group_size = chunks.len().div_ceil(groups).max(1);

		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for (index, group) in chunks.chunks(group_size).enumerate() {
			let tx = tx.clone();
			let group: Vec<String> = group.to_vec();
			let mut partial = self.empty_like();

			thread::spawn(move || {
				let count: usize = group.iter().map(|line| partial.build(line.as_bytes())).sum();
				let _ = tx.send((index, partial, count));
			});
			spawned += 1;
		}
		drop(tx);

		let mut partials: Vec<(usize, Chain, usize)> = rx.iter().collect();
		if partials.len() != spawned {
			return Err(ChainError::Worker(format!(
				"{} of {spawned} build workers did not report",
				spawned - partials.len()
			)));
		}
		partials.sort_unstable_by_key(|(index, _, _)| *index);

		let mut total = 0;
		for (_, partial, count) in &partials {
			self.merge(partial)?;
			total += count;
		}

		info!("parallel build: {total} words over {spawned} workers ({} keys)", self.len());
		Ok(total)
	}

	/// Merges another chain into this one.
	///
	/// Suffix counts are summed per key and word sets are unioned.
	///
	/// # Errors
	/// Returns [`ChainError::PrefixLengthMismatch`] if both chains do not
	/// use the same prefix length.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.prefix_len() != other.prefix_len() {
			return Err(ChainError::PrefixLengthMismatch {
				expected: self.prefix_len(),
				got: other.prefix_len(),
			});
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state);
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}
		for word in &other.words {
			self.remember(word);
		}

		Ok(())
	}

	/// Generates at most `n` words, joined by single spaces.
	///
	/// Starts from the empty prefix and, at each step, picks a suffix of
	/// the current prefix with probability proportional to how often it
	/// was observed. Stops early as soon as a prefix has no known suffix;
	/// an untrained chain yields an empty string.
	pub fn generate<R: RandomSource + ?Sized>(&self, n: usize, rng: &mut R) -> String {
		let mut prefix = self.start.clone();
		let mut words: Vec<&str> = Vec::new();

		for _ in 0..n {
			let Some(state) = self.states.get(&prefix.key()) else { break };
			let Some(next) = state.predict(rng) else { break };
			words.push(next);
			prefix.shift(next);
		}

		words.join(" ")
	}

	/// An empty chain with the same prefix length.
	fn empty_like(&self) -> Self {
		Self {
			states: HashMap::new(),
			words: Vec::new(),
			vocabulary: HashSet::new(),
			start: self.start.clone(),
		}
	}
}
