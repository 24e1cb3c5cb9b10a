//! Best score tracking
//!
//! One number survives across restarts and process lifetimes: the highest
//! score reached at any game over.

/// Highest score seen so far. Never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Check if a score would replace the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a final score. Returns true if it became the new best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New best score: {} (was {})", score, self.value);
        self.value = score;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_raises() {
        let mut best = BestScore::new(12);
        assert!(!best.record(3));
        assert!(!best.record(12));
        assert_eq!(best.get(), 12);

        assert!(best.record(13));
        assert_eq!(best.get(), 13);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let best = BestScore::default();
        assert!(!best.qualifies(0));
        assert!(best.qualifies(1));
    }
}
