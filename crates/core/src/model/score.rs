/// Storage key under which the best-ever score is persisted.
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Final result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    correct: u32,
    total: u32,
}

impl Score {
    pub(crate) fn new(correct: u32, total: u32) -> Self {
        debug_assert!(correct <= total);
        Self { correct, total }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }
}
