use std::sync::Arc;

use trivia_core::LoadFailure;
use trivia_core::model::{Question, Score};
use trivia_core::session::{Advance, Commit, LoadTicket, QuizMachine, Selection};

use super::ledger::ScoreLedger;
use super::workflow::{QuizLoopService, log_commit};

/// Values shown on the score summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryView {
    pub score: u32,
    pub total: u32,
    pub high_score: u32,
}

/// Screen currently shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home { high_score: u32 },
    Quiz(QuizMachine),
    Summary(SummaryView),
}

/// Routes between home, quiz, and summary screens and owns the active session.
///
/// Entering the quiz always builds a fresh session and fetches a new batch. Leaving it drops
/// the session; any fetch still in flight for it is discarded when it lands.
pub struct Navigator {
    quiz_loop: Arc<QuizLoopService>,
    ledger: Arc<ScoreLedger>,
    screen: Screen,
    // Highest load generation handed out so far, carried across torn-down sessions.
    last_generation: u64,
}

impl Navigator {
    /// Open on the home screen, showing the stored high score.
    pub async fn new(quiz_loop: Arc<QuizLoopService>, ledger: Arc<ScoreLedger>) -> Self {
        let high_score = ledger.high_score().await;
        Self {
            quiz_loop,
            ledger,
            screen: Screen::Home { high_score },
            last_generation: 0,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizMachine> {
        match &self.screen {
            Screen::Quiz(machine) => Some(machine),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz().and_then(QuizMachine::current_question)
    }

    #[must_use]
    pub fn summary(&self) -> Option<SummaryView> {
        match self.screen {
            Screen::Summary(view) => Some(view),
            _ => None,
        }
    }

    /// Enter the quiz with a fresh session and load its batch.
    pub async fn start_quiz(&mut self) -> Commit {
        let ticket = self.begin_fetch();
        let result = self.quiz_loop.load_batch().await;
        self.complete_fetch(ticket, result)
    }

    /// Summary "play again": a brand-new session with a newly fetched batch.
    pub async fn play_again(&mut self) -> Commit {
        self.start_quiz().await
    }

    /// Reload a failed quiz. Returns `None` when there is nothing to retry.
    pub async fn retry(&mut self) -> Option<Commit> {
        let Screen::Quiz(machine) = &mut self.screen else {
            return None;
        };
        let ticket = machine.retry()?;
        self.last_generation = ticket.generation();

        let result = self.quiz_loop.load_batch().await;
        Some(self.complete_fetch(ticket, result))
    }

    /// Replace the current screen with a fresh, loading quiz and return its load ticket.
    ///
    /// Pair with [`Navigator::complete_fetch`] when the fetch runs outside this type.
    pub fn begin_fetch(&mut self) -> LoadTicket {
        let mut machine = QuizMachine::with_generation(self.last_generation);
        let ticket = machine.begin_load();
        self.last_generation = ticket.generation();
        self.screen = Screen::Quiz(machine);
        ticket
    }

    /// Deliver a fetch result. Results for torn-down or superseded sessions are dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Question>, LoadFailure>,
    ) -> Commit {
        let commit = match &mut self.screen {
            Screen::Quiz(machine) => machine.commit(ticket, result),
            _ => Commit::Stale,
        };
        log_commit(ticket, &commit);
        commit
    }

    pub fn select_option(&mut self, option: &str) -> Selection {
        match &mut self.screen {
            Screen::Quiz(machine) => machine.select_option(option),
            _ => Selection::Ignored,
        }
    }

    /// Advance the quiz; finishing moves to the summary after reconciling the high score.
    pub async fn advance(&mut self) -> Advance {
        let Screen::Quiz(machine) = &mut self.screen else {
            return Advance::Ignored;
        };

        let step = machine.advance();
        if let Advance::Finished(score) = step {
            self.show_summary(score).await;
        }
        step
    }

    async fn show_summary(&mut self, score: Score) {
        let high_score = self.ledger.reconcile(score.correct()).await;
        tracing::info!(score = score.correct(), total = score.total(), high_score, "quiz finished");
        self.screen = Screen::Summary(SummaryView {
            score: score.correct(),
            total: score.total(),
            high_score,
        });
    }

    /// Leave for the home screen, discarding any session.
    pub async fn go_home(&mut self) {
        let high_score = self.ledger.high_score().await;
        self.screen = Screen::Home { high_score };
    }
}
