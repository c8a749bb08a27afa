use thiserror::Error;

/// Errors produced by the chain model and its corpus helpers.
///
/// Building from a token source never fails: a read failure only ends
/// ingestion for that source. The variants below cover construction,
/// merging and corpus loading.
#[derive(Error, Debug)]
pub enum ChainError {
	#[error("Invalid prefix length: {0} (must be >= 1)")]
	InvalidPrefixLength(usize),

	#[error("Prefix length mismatch: expected {expected}, got {got}")]
	PrefixLengthMismatch {
		expected: usize,
		got: usize,
	},

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Worker error: {0}")]
	Worker(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;
