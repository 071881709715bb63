//! Quiz session state machine.
//!
//! `Loading → Ready → Finished`, with `Loading → Failed → Loading` on retry. Loads are two-phase:
//! `begin_load` hands out a `LoadTicket` and `commit` applies the fetched batch only if that
//! ticket still belongs to the newest load. Everything here is synchronous; the caller owns
//! the fetch.

use crate::error::{LOAD_FAILURE_MESSAGE, LoadFailure};
use crate::model::{Question, Score};

//
// ─── STATES ───────────────────────────────────────────────────────────────────
//

/// Answer lifecycle of the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Answered { selected: String, correct: bool },
}

impl AnswerState {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        matches!(self, AnswerState::Answered { .. })
    }
}

/// A loaded batch being played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    questions: Vec<Question>,
    index: usize,
    score: u32,
    answer: AnswerState,
}

impl Round {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            index: 0,
            score: 0,
            answer: AnswerState::Unanswered,
        }
    }

    fn current(&self) -> &Question {
        &self.questions[self.index]
    }

    fn final_score(&self) -> Score {
        Score::new(self.score, count_u32(self.questions.len()))
    }
}

/// Top-level state. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Loading,
    Failed { message: String },
    Ready(Round),
    Finished(Score),
}

//
// ─── TRANSITION RESULTS ───────────────────────────────────────────────────────
//

/// Proof that a load was started; required to commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Ready { total: usize },
    Failed(LoadFailure),
    /// The ticket belongs to a superseded load; nothing changed.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Correct,
    Incorrect,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Finished(Score),
    Ignored,
}

/// Snapshot for "Question i/n" style displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub answered: bool,
}

impl Progress {
    /// 1-based position of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

//
// ─── MACHINE ──────────────────────────────────────────────────────────────────
//

/// Single owner of one quiz session's mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizMachine {
    state: QuizState,
    generation: u64,
}

impl Default for QuizMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: QuizState::Loading,
            generation: 0,
        }
    }

    /// A fresh machine whose first load is numbered after `generation`.
    ///
    /// Lets a replacement session keep outranking tickets issued by the one it replaces.
    #[must_use]
    pub fn with_generation(generation: u64) -> Self {
        Self {
            state: QuizState::Loading,
            generation,
        }
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, QuizState::Loading)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, QuizState::Failed { .. })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, QuizState::Finished(_))
    }

    /// Message for the retry screen, when failed.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match &self.state {
            QuizState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Start a new load, discarding whatever state was active.
    ///
    /// Any ticket handed out before this call becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.state = QuizState::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of the load identified by `ticket`.
    ///
    /// An empty batch is treated as a failure, never as a playable round.
    pub fn commit(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Question>, LoadFailure>,
    ) -> Commit {
        if ticket.generation != self.generation || !self.is_loading() {
            return Commit::Stale;
        }

        match result {
            Ok(questions) if !questions.is_empty() => {
                let total = questions.len();
                self.state = QuizState::Ready(Round::new(questions));
                Commit::Ready { total }
            }
            Ok(_) => self.fail(LoadFailure::Empty),
            Err(failure) => self.fail(failure),
        }
    }

    fn fail(&mut self, failure: LoadFailure) -> Commit {
        self.state = QuizState::Failed {
            message: LOAD_FAILURE_MESSAGE.to_owned(),
        };
        Commit::Failed(failure)
    }

    /// Restart loading after a failure. Returns `None` outside `Failed`.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        if self.is_failed() {
            Some(self.begin_load())
        } else {
            None
        }
    }

    /// Answer the current question.
    ///
    /// Only the first selection per question counts; later ones are ignored.
    pub fn select_option(&mut self, option: &str) -> Selection {
        let QuizState::Ready(round) = &mut self.state else {
            return Selection::Ignored;
        };
        if round.answer.is_answered() {
            return Selection::Ignored;
        }

        let correct = round.current().is_correct(option);
        if correct {
            round.score = round.score.saturating_add(1);
        }
        round.answer = AnswerState::Answered {
            selected: option.to_owned(),
            correct,
        };

        if correct {
            Selection::Correct
        } else {
            Selection::Incorrect
        }
    }

    /// Move past an answered question, finishing after the last one.
    pub fn advance(&mut self) -> Advance {
        let QuizState::Ready(round) = &mut self.state else {
            return Advance::Ignored;
        };
        if !round.answer.is_answered() {
            return Advance::Ignored;
        }

        if round.index + 1 < round.questions.len() {
            round.index += 1;
            round.answer = AnswerState::Unanswered;
            return Advance::Next { index: round.index };
        }

        let score = round.final_score();
        self.state = QuizState::Finished(score);
        Advance::Finished(score)
    }

    fn round(&self) -> Option<&Round> {
        match &self.state {
            QuizState::Ready(round) => Some(round),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.round().map(Round::current)
    }

    #[must_use]
    pub fn answer_state(&self) -> Option<&AnswerState> {
        self.round().map(|r| &r.answer)
    }

    /// 0-based index of the current question while playing.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.round().map(|r| r.index)
    }

    /// Number of questions in the batch, once loaded.
    #[must_use]
    pub fn total(&self) -> Option<usize> {
        match &self.state {
            QuizState::Ready(round) => Some(round.questions.len()),
            QuizState::Finished(score) => usize::try_from(score.total()).ok(),
            _ => None,
        }
    }

    /// Running score while playing, final score once finished.
    #[must_use]
    pub fn score(&self) -> Option<u32> {
        match &self.state {
            QuizState::Ready(round) => Some(round.score),
            QuizState::Finished(score) => Some(score.correct()),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        self.round().map(|r| Progress {
            index: r.index,
            total: r.questions.len(),
            score: r.score,
            answered: r.answer.is_answered(),
        })
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Score> {
        match self.state {
            QuizState::Finished(score) => Some(score),
            _ => None,
        }
    }
}

fn count_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
