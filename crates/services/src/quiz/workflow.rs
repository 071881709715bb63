use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;

use trivia_core::model::{BatchRequest, Question};
use trivia_core::session::{Commit, LoadTicket, QuizMachine};
use trivia_core::{LoadFailure, normalize_batch};

use crate::question_bank::QuestionBank;

/// Fetches and normalizes question batches, and drives the load half of a `QuizMachine`.
#[derive(Clone)]
pub struct QuizLoopService {
    bank: Arc<dyn QuestionBank>,
    request: BatchRequest,
    rng: Arc<Mutex<StdRng>>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(bank: Arc<dyn QuestionBank>, request: BatchRequest) -> Self {
        Self {
            bank,
            request,
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    /// Use a fixed seed so option order is reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    /// Fetch one batch and turn it into playable questions.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailure::Fetch` when the question bank fails, and the normalizer's
    /// `Empty`/`Malformed` failures otherwise.
    pub async fn load_batch(&self) -> Result<Vec<Question>, LoadFailure> {
        let raw = self.bank.fetch(&self.request).await?;
        tracing::debug!(received = raw.len(), "question batch fetched");

        // The RNG holds no invariants a panic could break.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        normalize_batch(raw, &mut *rng)
    }

    /// Begin a fresh load on `machine`, fetch, and commit the result.
    pub async fn start_session(&self, machine: &mut QuizMachine) -> Commit {
        let ticket = machine.begin_load();
        tracing::info!(generation = ticket.generation(), "starting quiz session");
        self.complete(machine, ticket).await
    }

    /// Reload after a failure. Returns `None` unless `machine` is in the failed state.
    pub async fn retry(&self, machine: &mut QuizMachine) -> Option<Commit> {
        let ticket = machine.retry()?;
        tracing::info!(generation = ticket.generation(), "retrying question load");
        Some(self.complete(machine, ticket).await)
    }

    async fn complete(&self, machine: &mut QuizMachine, ticket: LoadTicket) -> Commit {
        let result = self.load_batch().await;
        let commit = machine.commit(ticket, result);
        log_commit(ticket, &commit);
        commit
    }
}

pub(crate) fn log_commit(ticket: LoadTicket, commit: &Commit) {
    match commit {
        Commit::Ready { total } => {
            tracing::info!(generation = ticket.generation(), total, "quiz ready");
        }
        Commit::Failed(failure) => {
            tracing::warn!(generation = ticket.generation(), error = %failure, "question load failed");
        }
        Commit::Stale => {
            tracing::debug!(generation = ticket.generation(), "discarded stale question batch");
        }
    }
}
