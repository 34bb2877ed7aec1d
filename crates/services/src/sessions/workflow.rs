use std::sync::Arc;

use quiz_core::model::{Deck, DeckScope, SessionSummary, SubjectName};
use storage::repository::{DeckSource, ProgressStore, StorageError};
use tracing::{debug, warn};

use super::observer::{SessionEvent, SessionObserver, TracingObserver};
use super::plan::shuffle_deck;
use super::presentation::PresentedCard;
use super::service::{QuizSession, Selection, Step, Transition};
use crate::Clock;
use crate::error::SessionError;

/// Outcome of finishing a session.
///
/// The summary is always available; `save_error` is set when the final save
/// failed, so the caller can still show results and offer a retry.
#[derive(Debug)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub save_error: Option<StorageError>,
}

impl SessionReport {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// A running session together with the card currently on screen.
#[derive(Debug)]
pub struct ActiveSession {
    session: QuizSession,
    presented: Option<PresentedCard>,
    ended_reported: bool,
}

impl ActiveSession {
    fn new(session: QuizSession) -> Self {
        Self {
            session,
            presented: None,
            ended_reported: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }
}

/// Orchestrates session start, answering and the persisted finish.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    decks: Arc<dyn DeckSource>,
    progress: Arc<dyn ProgressStore>,
    observer: Arc<dyn SessionObserver>,
    shuffle: bool,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, decks: Arc<dyn DeckSource>, progress: Arc<dyn ProgressStore>) -> Self {
        Self {
            clock,
            decks,
            progress,
            observer: Arc::new(TracingObserver),
            shuffle: true,
        }
    }

    /// Shuffle the deck at start and the choices of every shown card.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Load the deck and prior progress, then start a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the subject or file does not exist,
    /// the deck is invalid, or progress cannot be loaded.
    pub async fn start_session(
        &self,
        subject: &SubjectName,
        scope: &DeckScope,
    ) -> Result<ActiveSession, SessionError> {
        let deck = self.decks.load_deck(subject, scope).await?;
        self.start_with_deck(deck).await
    }

    /// Start a session over an already-loaded deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if progress cannot be loaded.
    pub async fn start_with_deck(&self, deck: Deck) -> Result<ActiveSession, SessionError> {
        let progress = self.progress.load().await?;
        let prior = progress.record_or_default(deck.subject());

        let deck = if self.shuffle {
            shuffle_deck(deck, &mut rand::rng())
        } else {
            deck
        };

        let session = QuizSession::start(deck, &prior, self.clock.now());
        self.observer.on_event(&SessionEvent::Started {
            subject: session.subject(),
            cards: session.total_cards(),
        });
        Ok(ActiveSession::new(session))
    }

    /// Present the current card with a fresh choice order.
    ///
    /// Returns `None` once the session has ended.
    pub fn present_current<'a>(&self, active: &'a mut ActiveSession) -> Option<&'a PresentedCard> {
        let presented = {
            let card = active.session.current_card()?;
            if self.shuffle {
                PresentedCard::shuffled(card, &mut rand::rng())
            } else {
                PresentedCard::in_deck_order(card)
            }
        };

        self.observer.on_event(&SessionEvent::QuestionShown {
            round: active.session.round_number(),
            question: presented.question(),
        });
        active.presented = Some(presented);
        active.presented.as_ref()
    }

    /// Apply one input to the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidSelection` for a choice the card does not
    /// offer, and `SessionError::Completed` once the session has ended.
    pub fn answer(
        &self,
        active: &mut ActiveSession,
        selection: &Selection,
    ) -> Result<Step, SessionError> {
        let step = active.session.answer(selection)?;
        active.presented = None;

        if let Step::Answered(outcome) = &step {
            self.observer.on_event(&SessionEvent::Answered {
                question: &outcome.question,
                correct: outcome.correct,
            });
            if let Transition::RoundComplete { next_round, cards } = &outcome.transition {
                self.observer.on_event(&SessionEvent::RoundStarted {
                    round: *next_round,
                    cards: *cards,
                });
            }
        }
        Ok(step)
    }

    /// Quit at the current card boundary and finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session already ended.
    pub async fn quit(&self, active: &mut ActiveSession) -> Result<SessionReport, SessionError> {
        active.session.quit()?;
        active.presented = None;
        self.finish(active).await
    }

    /// Finalize the session and save the subject's record.
    ///
    /// The first call stops the timer. Later calls return the same summary and
    /// only save again if the previous save failed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` while the session is still running.
    /// Save failures are reported in `SessionReport::save_error` instead.
    pub async fn finish(&self, active: &mut ActiveSession) -> Result<SessionReport, SessionError> {
        let summary = active.session.finalize(self.clock.now())?.clone();

        if !active.ended_reported {
            active.ended_reported = true;
            self.observer.on_event(&SessionEvent::Ended {
                subject: active.session.subject(),
                summary: &summary,
            });
        }

        let Some(record) = active.session.take_commit() else {
            return Ok(SessionReport {
                summary,
                save_error: None,
            });
        };

        let subject = active.session.subject().clone();
        let saved = match self.progress.load().await {
            Ok(mut progress) => {
                progress.insert(subject.clone(), record.clone());
                self.progress.save(&progress).await
            }
            Err(err) => Err(err),
        };

        match saved {
            Ok(()) => {
                debug!(%subject, "session progress saved");
                Ok(SessionReport {
                    summary,
                    save_error: None,
                })
            }
            Err(err) => {
                warn!(%subject, error = %err, "failed to save session progress");
                active.session.restore_commit(record);
                Ok(SessionReport {
                    summary,
                    save_error: Some(err),
                })
            }
        }
    }
}
