//! Markov chain model over words.
//!
//! - `Prefix`: the sliding window of the last N words
//! - `Chain`: prefix → suffix table, training and generation
//! - `RandomSource`: randomness capability passed to generation
//! - `State`: per-key suffix distribution (internal)

/// Fixed-length word window, serialized as the chain's map key.
pub mod prefix;

/// The chain itself: build, merge and generate.
pub mod chain;

/// Randomness capability used for suffix sampling.
pub mod random;

/// Weighted suffix distribution of one prefix.
///
/// Not exposed publicly.
mod state;
