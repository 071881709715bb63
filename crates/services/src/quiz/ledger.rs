use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use storage::repository::{HighScoreRepository, StorageError};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use trivia_core::model::HIGH_SCORE_KEY;

/// How long a caller waits on a high-score read before falling back to 0.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_millis(500);

/// Keeps the persisted best score in step with finished sessions.
///
/// Storage problems never surface to the caller. Reads are bounded by `io_timeout` and an
/// unreadable value counts as 0. Writes run in the background, one at a time and in call
/// order, and their failures are only logged. The best score seen by this process is kept in
/// memory, so the home screen agrees with the last summary while its write is still running.
#[derive(Clone)]
pub struct ScoreLedger {
    repo: Arc<dyn HighScoreRepository>,
    io_timeout: Duration,
    known_best: Arc<Mutex<Option<u32>>>,
    pending_write: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ScoreLedger {
    #[must_use]
    pub fn new(repo: Arc<dyn HighScoreRepository>) -> Self {
        Self {
            repo,
            io_timeout: DEFAULT_IO_TIMEOUT,
            known_best: Arc::new(Mutex::new(None)),
            pending_write: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    /// Current best score, or 0 when missing or unreadable.
    ///
    /// Only the first successful read touches the store; later calls answer from memory. A
    /// read that outlives `io_timeout` keeps running and fills in the remembered value when it
    /// lands.
    pub async fn high_score(&self) -> u32 {
        if let Some(best) = self.known_best() {
            return best;
        }

        let repo = Arc::clone(&self.repo);
        let known_best = Arc::clone(&self.known_best);
        let read = tokio::spawn(async move {
            let score = repo.get_score(HIGH_SCORE_KEY).await?.unwrap_or(0);
            remember(&known_best, score);
            Ok::<_, StorageError>(score)
        });

        match timeout(self.io_timeout, read).await {
            Ok(Ok(Ok(score))) => score,
            Ok(Ok(Err(err))) => {
                tracing::warn!(error = %err, "high score read failed; using 0");
                0
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "high score read task failed; using 0");
                0
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.io_timeout, "high score read timed out; using 0");
                0
            }
        }
    }

    /// Record `final_score` if it beats the stored best, returning the best score to display.
    ///
    /// Returns as soon as the comparison is made. A new best is written by a background task;
    /// use [`ScoreLedger::flush`] to wait for it.
    pub async fn reconcile(&self, final_score: u32) -> u32 {
        let stored = self.high_score().await;
        if final_score <= stored {
            return stored;
        }

        tracing::info!(previous = stored, new = final_score, "new high score");
        remember(&self.known_best, final_score);
        self.persist(final_score);
        final_score
    }

    /// Wait for the queued high-score write, if any, to finish.
    pub async fn flush(&self) {
        let pending = self
            .pending_write
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "high score write task failed");
            }
        }
    }

    fn known_best(&self) -> Option<u32> {
        *self.known_best.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, score: u32) {
        let repo = Arc::clone(&self.repo);
        let mut pending = self
            .pending_write
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = pending.take();

        *pending = Some(tokio::spawn(async move {
            // Writes land in call order; a failed predecessor does not stop this one.
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            match repo.set_score(HIGH_SCORE_KEY, score).await {
                Ok(()) => tracing::debug!(score, "high score saved"),
                Err(err) => tracing::warn!(error = %err, score, "high score write failed"),
            }
        }));
    }
}

fn remember(known_best: &Mutex<Option<u32>>, score: u32) {
    let mut best = known_best.lock().unwrap_or_else(PoisonError::into_inner);
    *best = Some(best.map_or(score, |prev| prev.max(score)));
}
