//! Turns provider records into playable questions.

use rand::Rng;

use crate::error::LoadFailure;
use crate::model::{Question, RawQuestion};
use crate::shuffle::shuffled;
use crate::text::decode_entities;

/// Normalize a whole batch, keeping input order.
///
/// Each question's options are its incorrect answers followed by the correct answer,
/// shuffled once here.
///
/// # Errors
///
/// Returns `LoadFailure::Empty` for an empty batch, or `LoadFailure::Malformed` if any record
/// lacks question text or a correct answer. No partial batch is returned.
pub fn normalize_batch<R: Rng + ?Sized>(
    raw: Vec<RawQuestion>,
    rng: &mut R,
) -> Result<Vec<Question>, LoadFailure> {
    if raw.is_empty() {
        return Err(LoadFailure::Empty);
    }

    for (index, record) in raw.iter().enumerate() {
        if record.question.trim().is_empty() {
            return Err(LoadFailure::Malformed {
                index,
                field: "question",
            });
        }
        if record.correct_answer.trim().is_empty() {
            return Err(LoadFailure::Malformed {
                index,
                field: "correct_answer",
            });
        }
    }

    Ok(raw
        .into_iter()
        .map(|record| normalize_question(record, &mut *rng))
        .collect())
}

fn normalize_question<R: Rng + ?Sized>(raw: RawQuestion, rng: &mut R) -> Question {
    let correct = decode_entities(&raw.correct_answer);

    let mut options: Vec<String> = raw
        .incorrect_answers
        .iter()
        .map(|a| decode_entities(a))
        .collect();
    options.push(correct.clone());
    let options = shuffled(options, rng);

    Question::new(
        decode_entities(&raw.question),
        correct,
        options,
        decode_entities(&raw.category),
        raw.difficulty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample(n: usize) -> Vec<RawQuestion> {
        (0..n)
            .map(|i| {
                RawQuestion::multiple(
                    format!("Question {i}?"),
                    format!("right {i}"),
                    [format!("wrong {i}a"), format!("wrong {i}b"), format!("wrong {i}c")],
                )
            })
            .collect()
    }

    #[test]
    fn keeps_order_and_permutes_options() {
        let mut rng = StdRng::seed_from_u64(1);
        let raw = sample(5);
        let questions = normalize_batch(raw.clone(), &mut rng).unwrap();

        assert_eq!(questions.len(), 5);
        for (q, r) in questions.iter().zip(&raw) {
            assert_eq!(q.text(), r.question);
            assert_eq!(q.options().len(), r.incorrect_answers.len() + 1);
            assert!(q.options().contains(&r.correct_answer));

            let mut got = q.options().to_vec();
            let mut want = r.incorrect_answers.clone();
            want.push(r.correct_answer.clone());
            got.sort();
            want.sort();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn three_incorrect_answers_give_four_options() {
        let mut rng = StdRng::seed_from_u64(9);
        let questions = normalize_batch(sample(3), &mut rng).unwrap();
        assert!(questions.iter().all(|q| q.options().len() == 4));
    }

    #[test]
    fn empty_batch_is_a_failure() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(normalize_batch(Vec::new(), &mut rng), Err(LoadFailure::Empty));
    }

    #[test]
    fn blank_field_fails_whole_batch() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut raw = sample(3);
        raw[2].correct_answer = "  ".into();

        assert_eq!(
            normalize_batch(raw, &mut rng),
            Err(LoadFailure::Malformed {
                index: 2,
                field: "correct_answer"
            })
        );
    }

    #[test]
    fn decodes_entities_in_text_and_answers() {
        let mut rng = StdRng::seed_from_u64(1);
        let raw = vec![RawQuestion::multiple(
            "Who said &quot;It&#039;s-a me&quot;?",
            "Mario &amp; Luigi",
            ["Wario"],
        )];
        let q = &normalize_batch(raw, &mut rng).unwrap()[0];

        assert_eq!(q.text(), "Who said \"It's-a me\"?");
        assert_eq!(q.correct_answer(), "Mario & Luigi");
        assert!(q.options().iter().any(|o| o == "Mario & Luigi"));
    }
}
