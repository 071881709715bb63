use serde::{Deserialize, Serialize};

//
// ─── RAW QUESTION ─────────────────────────────────────────────────────────────
//

/// A question record exactly as the question bank returns it.
///
/// Text fields may still carry HTML entities; see `crate::text::decode_entities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

impl RawQuestion {
    /// Convenience constructor used by test doubles and seeding.
    #[must_use]
    pub fn multiple(
        question: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            category: String::new(),
            kind: "multiple".into(),
            difficulty: String::new(),
            question: question.into(),
            correct_answer: correct_answer.into(),
            incorrect_answers: incorrect_answers.into_iter().map(Into::into).collect(),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A playable question with its answer options in display order.
///
/// `options` holds every incorrect answer plus the correct one, permuted once when the
/// question is built and never reordered afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    correct_answer: String,
    options: Vec<String>,
    category: String,
    difficulty: String,
}

impl Question {
    pub(crate) fn new(
        text: String,
        correct_answer: String,
        options: Vec<String>,
        category: String,
        difficulty: String,
    ) -> Self {
        Self {
            text,
            correct_answer,
            options,
            category,
            difficulty,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// True when `option` matches the correct answer text.
    ///
    /// Matching is plain string equality, so an incorrect answer whose text duplicates the
    /// correct one is also accepted.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_question_deserializes_provider_shape() {
        let json = r#"{
            "type": "multiple",
            "difficulty": "medium",
            "category": "Entertainment: Video Games",
            "question": "Which studio made Halo?",
            "correct_answer": "Bungie",
            "incorrect_answers": ["Valve", "id Software", "Epic"]
        }"#;

        let raw: RawQuestion = serde_json::from_str(json).unwrap();

        assert_eq!(raw.kind, "multiple");
        assert_eq!(raw.correct_answer, "Bungie");
        assert_eq!(raw.incorrect_answers.len(), 3);
    }

    #[test]
    fn raw_question_requires_question_and_answer() {
        let json = r#"{ "question": "Q?", "incorrect_answers": [] }"#;
        assert!(serde_json::from_str::<RawQuestion>(json).is_err());
    }

    #[test]
    fn duplicate_correct_text_is_accepted() {
        let q = Question::new(
            "Q".into(),
            "B".into(),
            vec!["A".into(), "B".into(), "B".into()],
            String::new(),
            String::new(),
        );
        assert_eq!(q.options().iter().filter(|o| q.is_correct(o)).count(), 2);
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("A"));
    }
}
