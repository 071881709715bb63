use std::sync::Arc;

use storage::repository::Storage;
use trivia_core::model::BatchRequest;

use crate::error::AppServicesError;
use crate::question_bank::{OpenTdbClient, QuestionBank};
use crate::quiz::{Navigator, QuizLoopService, ScoreLedger};

/// Assembles app-facing services from a question bank and a storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    ledger: Arc<ScoreLedger>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the Open Trivia DB client.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        request: BatchRequest,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let bank: Arc<dyn QuestionBank> = Arc::new(OpenTdbClient::from_env()?);
        Ok(Self::from_parts(bank, &storage, request, seed))
    }

    /// Build services from explicit parts; used by tests and alternate frontends.
    #[must_use]
    pub fn from_parts(
        bank: Arc<dyn QuestionBank>,
        storage: &Storage,
        request: BatchRequest,
        seed: Option<u64>,
    ) -> Self {
        let mut quiz_loop = QuizLoopService::new(bank, request);
        if let Some(seed) = seed {
            quiz_loop = quiz_loop.with_seed(seed);
        }
        let ledger = ScoreLedger::new(Arc::clone(&storage.high_scores));

        Self {
            quiz_loop: Arc::new(quiz_loop),
            ledger: Arc::new(ledger),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<ScoreLedger> {
        Arc::clone(&self.ledger)
    }

    /// Navigator opened on the home screen.
    pub async fn navigator(&self) -> Navigator {
        Navigator::new(self.quiz_loop(), self.ledger()).await
    }
}
