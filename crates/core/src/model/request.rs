use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The provider refuses batches larger than this.
pub const MAX_BATCH_SIZE: u32 = 50;

/// Default batch size for one session.
pub const DEFAULT_BATCH_SIZE: u32 = 10;

/// Default Open Trivia DB category (Entertainment: Video Games).
pub const DEFAULT_CATEGORY: u32 = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RequestError {
    #[error("batch size must be between 1 and {max}, got {amount}")]
    InvalidAmount { amount: u32, max: u32 },

    #[error("unknown difficulty: {0}")]
    InvalidDifficulty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(RequestError::InvalidDifficulty(s.to_owned())),
        }
    }
}

/// Answer format requested from the provider. Only multiple choice is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionKind {
    #[default]
    Multiple,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Multiple => "multiple",
        }
    }
}

/// Parameters for one question-batch fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    amount: u32,
    category: Option<u32>,
    difficulty: Option<Difficulty>,
    kind: QuestionKind,
}

impl BatchRequest {
    /// # Errors
    ///
    /// Returns `RequestError::InvalidAmount` if `amount` is zero or above `MAX_BATCH_SIZE`.
    pub fn new(amount: u32) -> Result<Self, RequestError> {
        if amount == 0 || amount > MAX_BATCH_SIZE {
            return Err(RequestError::InvalidAmount {
                amount,
                max: MAX_BATCH_SIZE,
            });
        }
        Ok(Self {
            amount,
            category: None,
            difficulty: None,
            kind: QuestionKind::Multiple,
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<u32>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    #[must_use]
    pub fn category(&self) -> Option<u32> {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self {
            amount: DEFAULT_BATCH_SIZE,
            category: Some(DEFAULT_CATEGORY),
            difficulty: Some(Difficulty::Medium),
            kind: QuestionKind::Multiple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_amounts() {
        assert!(matches!(
            BatchRequest::new(0),
            Err(RequestError::InvalidAmount { amount: 0, .. })
        ));
        assert!(BatchRequest::new(MAX_BATCH_SIZE + 1).is_err());
        assert_eq!(BatchRequest::new(MAX_BATCH_SIZE).unwrap().amount(), 50);
    }

    #[test]
    fn default_matches_video_game_medium_batch() {
        let req = BatchRequest::default();
        assert_eq!(req.amount(), 10);
        assert_eq!(req.category(), Some(15));
        assert_eq!(req.difficulty(), Some(Difficulty::Medium));
        assert_eq!(req.kind().as_str(), "multiple");
    }

    #[test]
    fn parses_difficulty_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("legendary".parse::<Difficulty>().is_err());
    }
}
