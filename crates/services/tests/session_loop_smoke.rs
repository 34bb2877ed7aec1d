use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use quiz_core::model::{
    Card, CardDraft, DeckFileName, DeckScope, MasteryRecord, Progress, SessionOutcome, SubjectName,
};
use quiz_core::time::fixed_clock;
use services::{
    CatalogService, Clock, QuizLoopService, Selection, SessionError, SessionEvent,
    SessionObserver, SessionState, Step, Transition,
};
use storage::repository::{InMemoryRepository, ProgressStore, StorageError};

fn subject() -> SubjectName {
    SubjectName::new("geo").unwrap()
}

fn card(question: &str) -> Card {
    CardDraft::new(question, ["right", "wrong", "other"], "right")
        .validate()
        .unwrap()
}

fn repo_with(questions: &[&str]) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    repo.insert_file(
        subject(),
        DeckFileName::new("capitals.json").unwrap(),
        questions.iter().map(|q| card(q)).collect(),
    )
    .unwrap();
    repo
}

fn loop_service(repo: &InMemoryRepository) -> QuizLoopService {
    QuizLoopService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
    .with_shuffle(false)
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&self, event: &SessionEvent<'_>) {
        let line = match event {
            SessionEvent::Started { cards, .. } => format!("start {cards}"),
            SessionEvent::QuestionShown { round, question } => format!("show {round} {question}"),
            SessionEvent::Answered { question, correct } => format!("answer {question} {correct}"),
            SessionEvent::RoundStarted { round, cards } => format!("round {round} {cards}"),
            SessionEvent::Ended { summary, .. } => format!(
                "end {}/{}",
                summary.mastered_count(),
                summary.total_count()
            ),
        };
        self.events.lock().unwrap().push(line);
    }
}

#[tokio::test]
async fn all_correct_finishes_in_one_round() {
    let repo = repo_with(&["Q1", "Q2", "Q3"]);
    let service = loop_service(&repo);

    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();
    while active.session().is_running() {
        service.present_current(&mut active).unwrap();
        service.answer(&mut active, &Selection::choice("right")).unwrap();
    }
    assert_eq!(active.session().round_number(), 1);

    let report = service.finish(&mut active).await.unwrap();
    assert!(report.is_saved());
    assert_eq!(report.summary.outcome(), SessionOutcome::Finished);
    assert_eq!(report.summary.mastered_count(), 3);
    assert_eq!(report.summary.total_count(), 3);
    assert_eq!(repo.save_count(), 1);
}

#[tokio::test]
async fn missed_card_is_retried_in_round_two() {
    let repo = repo_with(&["Q1", "Q2"]);
    let observer = Arc::new(RecordingObserver::default());
    let service = loop_service(&repo).with_observer(observer.clone());

    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();

    service.present_current(&mut active).unwrap();
    service.answer(&mut active, &Selection::choice("wrong")).unwrap();
    service.present_current(&mut active).unwrap();
    let step = service.answer(&mut active, &Selection::choice("right")).unwrap();
    let Step::Answered(outcome) = step else {
        panic!("expected an answer");
    };
    assert_eq!(
        outcome.transition,
        Transition::RoundComplete {
            next_round: 2,
            cards: 1
        }
    );

    let shown = service.present_current(&mut active).unwrap();
    assert_eq!(shown.question(), "Q1");
    service.answer(&mut active, &Selection::choice("right")).unwrap();
    assert_eq!(active.session().state(), SessionState::Finished);

    let report = service.finish(&mut active).await.unwrap();
    assert_eq!(report.summary.mastered_count(), 2);
    assert_eq!(report.summary.total_count(), 2);
    assert_eq!(
        observer.events(),
        vec![
            "start 2",
            "show 1 Q1",
            "answer Q1 false",
            "show 1 Q2",
            "answer Q2 true",
            "round 2 1",
            "show 2 Q1",
            "answer Q1 true",
            "end 2/2",
        ]
    );
}

#[tokio::test]
async fn empty_deck_finishes_immediately() {
    let repo = repo_with(&[]);
    let service = loop_service(&repo);

    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();
    assert_eq!(active.session().state(), SessionState::Finished);
    assert!(service.present_current(&mut active).is_none());

    let report = service.finish(&mut active).await.unwrap();
    assert_eq!(report.summary.mastered_count(), 0);
    assert_eq!(report.summary.total_count(), 0);

    let catalog = CatalogService::new(Arc::new(repo.clone()), Arc::new(repo.clone()));
    let options = catalog.file_options(&subject()).await.unwrap();
    assert!(options.iter().all(|o| o.percentage == 0.0));
}

#[tokio::test]
async fn quitting_saves_partial_progress_and_time() {
    let repo = repo_with(&["Q1", "Q2", "Q3"]);
    let mut progress = Progress::new();
    progress.insert(subject(), MasteryRecord::from_persisted(Vec::new(), 60));
    repo.save(&progress).await.unwrap();

    let service = loop_service(&repo);
    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();
    service.present_current(&mut active).unwrap();
    service.answer(&mut active, &Selection::choice("right")).unwrap();

    let mut clock = fixed_clock();
    clock.advance(Duration::seconds(90));
    let later = service.clone().with_clock(clock);
    let report = later.quit(&mut active).await.unwrap();
    assert_eq!(report.summary.outcome(), SessionOutcome::Aborted);
    assert_eq!(report.summary.mastered_count(), 1);
    assert_eq!(report.summary.total_count(), 3);
    assert_eq!(report.summary.cards_left(), 2);
    assert_eq!(report.summary.time_this_session_secs(), 90);
    assert_eq!(report.summary.time_total_secs(), 150);

    let stored = repo.load().await.unwrap();
    let record = stored.get(&subject()).unwrap();
    assert!(record.is_mastered("Q1"));
    assert_eq!(record.time_spent_secs(), 150);
    assert_eq!(repo.save_count(), 2);
}

#[tokio::test]
async fn out_of_range_selection_leaves_session_unchanged() {
    let repo = repo_with(&["Q1", "Q2", "Q3"]);
    let service = loop_service(&repo);
    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();

    let shown = service.present_current(&mut active).unwrap();
    assert_eq!(shown.len(), 3);
    assert!(shown.select(5).is_none());

    let before = active.session().progress();
    let err = service
        .answer(&mut active, &Selection::choice("not a choice"))
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidSelection { .. }));
    assert_eq!(active.session().progress(), before);
}

#[tokio::test]
async fn finish_is_idempotent() {
    let repo = repo_with(&["Q1"]);
    let service = loop_service(&repo);
    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();
    service.answer(&mut active, &Selection::choice("right")).unwrap();

    let first = service.finish(&mut active).await.unwrap();
    let again = service
        .clone()
        .with_clock(Clock::fixed(fixed_clock().now() + Duration::seconds(500)))
        .finish(&mut active)
        .await
        .unwrap();
    assert_eq!(first.summary, again.summary);
    assert_eq!(repo.save_count(), 1);
}

#[tokio::test]
async fn missing_subject_never_starts() {
    let repo = repo_with(&["Q1"]);
    let err = loop_service(&repo)
        .start_session(&SubjectName::new("nope").unwrap(), &DeckScope::AllFiles)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn quitting_one_subject_leaves_others_untouched() {
    let repo = repo_with(&["Q1"]);
    let other = SubjectName::new("history").unwrap();
    let mut progress = Progress::new();
    progress.insert(
        other.clone(),
        MasteryRecord::from_persisted(["H1".to_string()], 7),
    );
    repo.save(&progress).await.unwrap();

    let service = loop_service(&repo);
    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();
    service.quit(&mut active).await.unwrap();

    let stored = repo.load().await.unwrap();
    assert_eq!(
        stored.get(&other),
        Some(&MasteryRecord::from_persisted(["H1".to_string()], 7))
    );
}

/// Progress store whose saves fail until `heal` is called.
struct FlakyStore {
    inner: InMemoryRepository,
    broken: AtomicBool,
}

#[async_trait]
impl ProgressStore for FlakyStore {
    async fn load(&self) -> Result<Progress, StorageError> {
        self.inner.load().await
    }

    async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.save(progress).await
    }
}

#[tokio::test]
async fn failed_save_keeps_summary_and_can_be_retried() {
    let repo = repo_with(&["Q1"]);
    let store = Arc::new(FlakyStore {
        inner: repo.clone(),
        broken: AtomicBool::new(true),
    });
    let service = QuizLoopService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        store.clone(),
    )
    .with_shuffle(false);

    let mut active = service
        .start_session(&subject(), &DeckScope::AllFiles)
        .await
        .unwrap();
    service.answer(&mut active, &Selection::choice("right")).unwrap();

    let failed = service.finish(&mut active).await.unwrap();
    assert!(!failed.is_saved());
    assert_eq!(failed.summary.mastered_count(), 1);
    assert_eq!(repo.save_count(), 0);

    store.broken.store(false, Ordering::SeqCst);
    let retried = service.finish(&mut active).await.unwrap();
    assert!(retried.is_saved());
    assert_eq!(retried.summary, failed.summary);
    assert_eq!(repo.save_count(), 1);
    assert!(repo.load().await.unwrap().get(&subject()).unwrap().is_mastered("Q1"));
}
