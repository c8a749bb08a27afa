use std::fmt;

use crate::error::{ChainError, Result};

/// A fixed-width window over the most recent words.
///
/// A `Prefix` is both the lookup key of a [`Chain`](super::chain::Chain)
/// and the sliding window advanced while training or generating.
///
/// # Invariants
/// - The length is fixed at construction and is always >= 1
/// - A fresh prefix holds only empty words (start of sequence)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prefix {
	words: Vec<String>,
}

impl Prefix {
	/// Creates an all-empty prefix of `len` words.
	///
	/// # Errors
	/// Returns [`ChainError::InvalidPrefixLength`] if `len == 0`.
	pub fn new(len: usize) -> Result<Self> {
		if len == 0 {
			return Err(ChainError::InvalidPrefixLength(len));
		}
		Ok(Self { words: vec![String::new(); len] })
	}

	/// Number of words in the window.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// Always `false`: a prefix cannot be built empty.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Words of the window, oldest first.
	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Drops the first word and appends `word` at the end, in place.
	///
	/// The evicted slot is reused for the new word, so no allocation
	/// happens beyond the new word's own buffer.
	pub fn shift(&mut self, word: &str) {
		self.words.rotate_left(1);
		if let Some(last) = self.words.last_mut() {
			last.clear();
			last.push_str(word);
		}
	}

	/// Serializes the window into a map key (words joined by one space).
	pub fn key(&self) -> String {
		self.words.join(" ")
	}
}

impl fmt::Display for Prefix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.key())
	}
}
