//! Word-level Markov chain text generation.
//!
//! This crate provides:
//! - A fixed-width word window (`Prefix`) used as lookup key
//! - A chain model (`Chain`) trained from whitespace-separated text
//! - Frequency-proportional generation driven by a caller-owned random source
//! - Corpus loading and sentence trimming helpers
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use word_chain_core::model::chain::Chain;
//!
//! let mut chain = Chain::new(2)?;
//! chain.build("I am not a number! I am a free man!".as_bytes());
//! let text = chain.generate(10, &mut StdRng::seed_from_u64(7));
//! assert!(text.starts_with("I am"));
//! # Ok::<(), word_chain_core::error::ChainError>(())
//! ```

/// Chain model, prefix window and random source.
pub mod model;

/// Error type shared by the crate.
pub mod error;

/// Corpus file helpers (loading, listing, path handling).
pub mod io;

/// Trimming generated text down to complete sentences.
pub mod sentence;
