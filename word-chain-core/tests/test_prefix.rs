use std::collections::HashSet;

use word_chain_core::error::ChainError;
use word_chain_core::model::prefix::Prefix;

#[test]
fn test_shift_preserves_length_and_order() {
	let mut prefix = Prefix::new(3).unwrap();
	for word in ["one", "two", "three", "four"] {
		let mut expected: Vec<String> = prefix.words()[1..].to_vec();
		expected.push(word.to_owned());

		prefix.shift(word);
		assert_eq!(prefix.len(), 3);
		assert_eq!(prefix.words(), expected.as_slice());
	}
	assert_eq!(prefix.key(), "two three four");
}

#[test]
fn test_keys_are_distinct_for_distinct_windows() {
	let words = ["a", "b", "a", "c", "b", "b", "a", "a", "c"];
	let mut prefix = Prefix::new(2).unwrap();
	let mut windows = HashSet::new();
	let mut keys = HashSet::new();

	for word in words {
		prefix.shift(word);
		windows.insert(prefix.words().to_vec());
		keys.insert(prefix.key());
	}

	assert_eq!(windows.len(), keys.len());
}

#[test]
fn test_start_key_differs_from_single_word_windows() {
	let start = Prefix::new(1).unwrap();
	let mut shifted = Prefix::new(1).unwrap();
	shifted.shift("word");

	assert_eq!(start.key(), "");
	assert_ne!(start.key(), shifted.key());
}

#[test]
fn test_zero_length_prefix_is_rejected() {
	let err = Prefix::new(0).unwrap_err();
	assert!(matches!(err, ChainError::InvalidPrefixLength(0)));
	assert!(err.to_string().contains("must be >= 1"));
}
