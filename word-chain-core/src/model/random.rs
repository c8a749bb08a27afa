use rand::Rng;

/// Source of randomness used when sampling a suffix.
///
/// Generation never touches a global generator: the caller owns the
/// source and passes it in. Every [`rand::Rng`] is a `RandomSource`.
pub trait RandomSource {
	/// Returns an index uniformly drawn from `0..bound`.
	///
	/// `bound` is always > 0 when called by the chain.
	fn next_index(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
	fn next_index(&mut self, bound: usize) -> usize {
		self.random_range(0..bound)
	}
}
