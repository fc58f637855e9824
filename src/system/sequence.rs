//! Memoized stake sequence.
//!
//! The Fibonacci-progression system sizes its bet after `n` consecutive
//! losses as the n-th term of this sequence. The cache is filled
//! iteratively, so a deep loss streak costs a few pushes rather than a
//! recursion per term.

/// Fibonacci-like integer sequence with `value(1) == value(2) == 1`.
///
/// One instance is owned by each Fibonacci-progression system, scoping the
/// cache to a single run. The cache only ever grows — one `u64` per
/// loss-streak depth reached.
#[derive(Debug, Clone)]
pub struct StakeSequence {
    cache: Vec<u64>,
}

impl Default for StakeSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl StakeSequence {
    pub fn new() -> Self {
        Self { cache: vec![1, 1] }
    }

    /// The n-th term, 1-based.
    ///
    /// Panics on `n == 0` — that is a caller bug, not a runtime condition.
    pub fn value(&mut self, n: usize) -> u64 {
        assert!(n >= 1, "stake sequence is 1-based");
        while self.cache.len() < n {
            let len = self.cache.len();
            self.cache.push(self.cache[len - 1] + self.cache[len - 2]);
        }
        self.cache[n - 1]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
