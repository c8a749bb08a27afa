use std::collections::HashMap;

use super::random::RandomSource;

/// Suffix distribution of a single prefix key.
///
/// Conceptually, this is a node in the Markov chain where outgoing edges
/// are weighted by their number of observations. Distinct suffixes are
/// kept in first-seen order so that sampling is reproducible for a given
/// random source.
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - `positions[word]` is the index of `word` in `transitions`
/// - `total` is the sum of all occurrence counts
#[derive(Clone, Debug, Default)]
pub(crate) struct State {
	/// Distinct suffixes and how many times each was observed.
	/// Example: [("cat", 2), ("dog", 1)]
	transitions: Vec<(String, usize)>,
	positions: HashMap<String, usize>,
	total: usize,
}

impl State {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `count` occurrences of a transition toward `word`.
	pub fn add_transition(&mut self, word: &str, count: usize) {
		if count == 0 {
			return;
		}
		match self.positions.get(word) {
			Some(&i) => self.transitions[i].1 += count,
			None => {
				self.positions.insert(word.to_owned(), self.transitions.len());
				self.transitions.push((word.to_owned(), count));
			}
		}
		self.total += count;
	}

	/// Total number of recorded suffix occurrences.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Distinct suffixes with their occurrence counts, first-seen order.
	pub fn transitions(&self) -> &[(String, usize)] {
		&self.transitions
	}

	/// Picks a suffix with probability proportional to its count.
	///
	/// Draws one index in `0..total` and walks the cumulative counts, so an
	/// index maps to the same word it would in the expanded suffix list.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		if self.total == 0 {
			return None;
		}

		let mut r = rng.next_index(self.total);
		for (word, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(word);
			}
			r -= occurrence;
		}

		// Out-of-range index from a misbehaving source
		self.transitions.last().map(|(word, _)| word.as_str())
	}

	/// Adds all transitions of `other` into this state, summing counts.
	pub fn merge(&mut self, other: &Self) {
		for (word, occurrence) in &other.transitions {
			self.add_transition(word, *occurrence);
		}
	}
}
