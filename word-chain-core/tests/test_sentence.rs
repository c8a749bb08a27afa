use rand::SeedableRng;
use rand::rngs::StdRng;

use word_chain_core::model::chain::Chain;
use word_chain_core::sentence::generate_sentence;

#[test]
fn test_sentence_is_cut_at_terminator() {
	let mut chain = Chain::new(2).unwrap();
	chain.build("Hello there. General Kenobi".as_bytes());
	let mut rng = StdRng::seed_from_u64(11);

	assert_eq!(generate_sentence(&chain, 30, 5, &mut rng).as_deref(), Some("Hello there."));
}

#[test]
fn test_no_terminator_gives_up() {
	let mut chain = Chain::new(1).unwrap();
	chain.build("no end in sight".as_bytes());
	let mut rng = StdRng::seed_from_u64(11);

	assert_eq!(generate_sentence(&chain, 30, 5, &mut rng), None);
}

#[test]
fn test_too_few_words_for_a_sentence() {
	let mut chain = Chain::new(1).unwrap();
	chain.build("one two three.".as_bytes());
	let mut rng = StdRng::seed_from_u64(11);

	assert_eq!(generate_sentence(&chain, 2, 3, &mut rng), None);
	assert_eq!(generate_sentence(&chain, 3, 3, &mut rng).as_deref(), Some("one two three."));
}
