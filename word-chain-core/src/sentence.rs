use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::model::chain::Chain;
use crate::model::random::RandomSource;

static SENTENCES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(.+[.!?])").expect("Failed to build regex"));

/// Keeps the longest leading part of `text` that ends a sentence.
///
/// The cut happens after the last `.`, `!` or `?`; surrounding whitespace
/// is trimmed. Text without any terminator yields an empty string.
pub fn trim_to_sentence(text: &str) -> &str {
	SENTENCES
		.find(text)
		.map(|m| m.as_str().trim())
		.unwrap_or_default()
}

/// Generates text of at most `n` words that ends on a complete sentence.
///
/// Calls [`Chain::generate`] until [`trim_to_sentence`] keeps something,
/// giving up after `tries` attempts.
pub fn generate_sentence<R: RandomSource + ?Sized>(
	chain: &Chain,
	n: usize,
	tries: usize,
	rng: &mut R,
) -> Option<String> {
	for attempt in 1..=tries {
		let text = chain.generate(n, rng);
		let sentence = trim_to_sentence(&text);
		if !sentence.is_empty() {
			debug!("sentence found after {attempt} attempts");
			return Some(sentence.to_owned());
		}
	}
	debug!("no sentence found in {tries} attempts");
	None
}
