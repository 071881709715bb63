use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use services::{AppServices, Navigator, QuestionBank, QuestionBankError, Screen, SummaryView};
use storage::repository::{HighScoreRepository, InMemoryRepository, Storage, StorageError};
use trivia_core::LoadFailure;
use trivia_core::model::{BatchRequest, HIGH_SCORE_KEY, RawQuestion};
use trivia_core::session::{Advance, Commit, Selection};

/// Serves scripted batches in order, then repeats the last one.
struct ScriptedBank {
    batches: Mutex<VecDeque<Vec<RawQuestion>>>,
    calls: AtomicUsize,
}

impl ScriptedBank {
    fn new(batches: Vec<Vec<RawQuestion>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionBank for ScriptedBank {
    async fn fetch(&self, _request: &BatchRequest) -> Result<Vec<RawQuestion>, QuestionBankError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut batches = self.batches.lock().unwrap();
        let batch = if batches.len() > 1 {
            batches.pop_front().unwrap()
        } else {
            batches.front().cloned().unwrap_or_default()
        };
        Ok(batch)
    }
}

fn batch(tag: &str, n: usize) -> Vec<RawQuestion> {
    (0..n)
        .map(|i| {
            RawQuestion::multiple(
                format!("{tag} question {i}"),
                format!("{tag} right {i}"),
                [
                    format!("{tag} wrong {i}a"),
                    format!("{tag} wrong {i}b"),
                    format!("{tag} wrong {i}c"),
                ],
            )
        })
        .collect()
}

/// Store that answers reads at once but takes its time to save.
struct SlowSavingStore {
    value: Mutex<Option<u32>>,
    write_delay: Duration,
}

#[async_trait]
impl HighScoreRepository for SlowSavingStore {
    async fn get_score(&self, _key: &str) -> Result<Option<u32>, StorageError> {
        Ok(*self.value.lock().unwrap())
    }

    async fn set_score(&self, _key: &str, score: u32) -> Result<(), StorageError> {
        tokio::time::sleep(self.write_delay).await;
        *self.value.lock().unwrap() = Some(score);
        Ok(())
    }
}

fn app_services(bank: Arc<ScriptedBank>, repo: &InMemoryRepository) -> AppServices {
    let storage = Storage {
        high_scores: Arc::new(repo.clone()),
    };
    AppServices::from_parts(bank, &storage, BatchRequest::new(3).unwrap(), Some(7))
}

async fn navigator(bank: Arc<ScriptedBank>, repo: &InMemoryRepository) -> Navigator {
    app_services(bank, repo).navigator().await
}

async fn answer_all(nav: &mut Navigator, correct: bool) -> Advance {
    loop {
        let question = nav.current_question().expect("question on screen").clone();
        let option = question
            .options()
            .iter()
            .find(|o| question.is_correct(o) == correct)
            .unwrap()
            .clone();
        nav.select_option(&option);
        match nav.advance().await {
            Advance::Next { .. } => continue,
            other => return other,
        }
    }
}

#[tokio::test]
async fn perfect_round_reaches_summary_and_sets_high_score() {
    let repo = InMemoryRepository::new();
    let services = app_services(ScriptedBank::new(vec![batch("a", 3)]), &repo);
    let mut nav = services.navigator().await;
    assert_eq!(nav.screen(), &Screen::Home { high_score: 0 });

    assert_eq!(nav.start_quiz().await, Commit::Ready { total: 3 });
    assert_eq!(nav.current_question().unwrap().options().len(), 4);

    let last = answer_all(&mut nav, true).await;
    let Advance::Finished(score) = last else {
        panic!("expected finish, got {last:?}");
    };
    assert_eq!((score.correct(), score.total()), (3, 3));
    assert_eq!(
        nav.summary(),
        Some(SummaryView {
            score: 3,
            total: 3,
            high_score: 3
        })
    );
    services.ledger().flush().await;
    assert_eq!(repo.get_score(HIGH_SCORE_KEY).await.unwrap(), Some(3));

    // Nothing left to advance once on the summary.
    assert_eq!(nav.advance().await, Advance::Ignored);
}

#[tokio::test]
async fn lower_score_keeps_previous_high_score() {
    let repo = InMemoryRepository::new();
    repo.set_score(HIGH_SCORE_KEY, 3).await.unwrap();
    let mut nav = navigator(ScriptedBank::new(vec![batch("a", 3)]), &repo).await;
    assert_eq!(nav.screen(), &Screen::Home { high_score: 3 });

    nav.start_quiz().await;
    answer_all(&mut nav, false).await;

    assert_eq!(
        nav.summary(),
        Some(SummaryView {
            score: 0,
            total: 3,
            high_score: 3
        })
    );
    assert_eq!(repo.get_score(HIGH_SCORE_KEY).await.unwrap(), Some(3));
}

#[tokio::test]
async fn double_selection_scores_once() {
    let repo = InMemoryRepository::new();
    let mut nav = navigator(ScriptedBank::new(vec![batch("a", 1)]), &repo).await;
    nav.start_quiz().await;

    let right = nav.current_question().unwrap().correct_answer().to_owned();
    assert_eq!(nav.select_option(&right), Selection::Correct);
    assert_eq!(nav.select_option(&right), Selection::Ignored);

    let Advance::Finished(score) = nav.advance().await else {
        panic!("single question batch should finish");
    };
    assert_eq!(score.correct(), 1);
}

#[tokio::test]
async fn empty_batch_fails_and_retry_fetches_again() {
    let repo = InMemoryRepository::new();
    let bank = ScriptedBank::new(vec![Vec::new(), batch("b", 2)]);
    let mut nav = navigator(bank.clone(), &repo).await;

    assert_eq!(nav.start_quiz().await, Commit::Failed(LoadFailure::Empty));
    let machine = nav.quiz().unwrap();
    assert!(machine.is_failed());
    assert!(machine.current_question().is_none());

    assert_eq!(nav.retry().await, Some(Commit::Ready { total: 2 }));
    assert_eq!(bank.calls(), 2);
    assert_eq!(nav.retry().await, None);
}

#[tokio::test]
async fn stale_response_is_discarded_after_reentry() {
    let repo = InMemoryRepository::new();
    let bank = ScriptedBank::new(vec![batch("old", 5), batch("new", 2)]);
    let services = AppServices::from_parts(
        bank,
        &Storage {
            high_scores: Arc::new(repo.clone()),
        },
        BatchRequest::new(3).unwrap(),
        Some(1),
    );
    let mut nav = services.navigator().await;
    let quiz_loop = services.quiz_loop();

    let first = nav.begin_fetch();
    let second = nav.begin_fetch();
    let old_batch = quiz_loop.load_batch().await;
    let new_batch = quiz_loop.load_batch().await;

    assert_eq!(nav.complete_fetch(second, new_batch), Commit::Ready { total: 2 });
    assert_eq!(nav.complete_fetch(first, old_batch), Commit::Stale);

    let machine = nav.quiz().unwrap();
    assert_eq!(machine.total(), Some(2));
    assert!(
        machine
            .current_question()
            .unwrap()
            .text()
            .starts_with("new")
    );
}

#[tokio::test]
async fn going_home_discards_outstanding_fetch() {
    let repo = InMemoryRepository::new();
    let mut nav = navigator(ScriptedBank::new(vec![batch("a", 2)]), &repo).await;

    let ticket = nav.begin_fetch();
    nav.go_home().await;

    let late = Ok(Vec::new());
    assert_eq!(nav.complete_fetch(ticket, late), Commit::Stale);
    assert_eq!(nav.screen(), &Screen::Home { high_score: 0 });

    // A later session must not accept the abandoned ticket either.
    let fresh = nav.begin_fetch();
    assert_ne!(fresh, ticket);
    assert_eq!(
        nav.complete_fetch(ticket, Err(LoadFailure::Fetch("late".into()))),
        Commit::Stale
    );
    assert!(nav.quiz().unwrap().is_loading());
}

#[tokio::test]
async fn play_again_fetches_a_fresh_batch() {
    let repo = InMemoryRepository::new();
    let bank = ScriptedBank::new(vec![batch("first", 1), batch("second", 2)]);
    let mut nav = navigator(bank.clone(), &repo).await;

    nav.start_quiz().await;
    answer_all(&mut nav, true).await;
    assert!(nav.summary().is_some());

    assert_eq!(nav.play_again().await, Commit::Ready { total: 2 });
    assert_eq!(bank.calls(), 2);

    let machine = nav.quiz().unwrap();
    assert_eq!(machine.index(), Some(0));
    assert_eq!(machine.score(), Some(0));
    assert!(
        nav.current_question()
            .unwrap()
            .text()
            .starts_with("second")
    );

    nav.go_home().await;
    assert_eq!(nav.screen(), &Screen::Home { high_score: 1 });
    assert!(nav.quiz().is_none());
}

#[tokio::test]
async fn slow_store_does_not_hold_up_the_summary() {
    let store = Arc::new(SlowSavingStore {
        value: Mutex::new(None),
        write_delay: Duration::from_millis(700),
    });
    let services = AppServices::from_parts(
        ScriptedBank::new(vec![batch("a", 1)]),
        &Storage {
            high_scores: store.clone(),
        },
        BatchRequest::new(1).unwrap(),
        Some(3),
    );
    let mut nav = services.navigator().await;
    nav.start_quiz().await;

    let right = nav.current_question().unwrap().correct_answer().to_owned();
    nav.select_option(&right);

    let started = Instant::now();
    assert!(matches!(nav.advance().await, Advance::Finished(_)));
    assert!(started.elapsed() < Duration::from_millis(400));
    assert_eq!(
        nav.summary(),
        Some(SummaryView {
            score: 1,
            total: 1,
            high_score: 1
        })
    );

    // The save is still running, but home already shows the new best.
    nav.go_home().await;
    assert_eq!(nav.screen(), &Screen::Home { high_score: 1 });
    assert_eq!(*store.value.lock().unwrap(), None);

    services.ledger().flush().await;
    assert_eq!(*store.value.lock().unwrap(), Some(1));
}
