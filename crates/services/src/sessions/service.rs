use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{
    Card, Deck, MasteryRecord, SessionOutcome, SessionSummary, SubjectName,
};
use quiz_core::time::elapsed_secs_between;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── INPUTS AND OUTCOMES ───────────────────────────────────────────────────────
//

/// One input event for the current card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Choice(String),
    Quit,
}

impl Selection {
    pub fn choice(choice: impl Into<String>) -> Self {
        Self::Choice(choice.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Finished,
    Aborted,
}

/// What happened to the session after a card was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// More cards remain in the current round.
    NextCard,
    /// The round ended with mistakes; they form the next round.
    RoundComplete { next_round: u32, cards: usize },
    /// The round ended without mistakes.
    Finished,
}

/// Result of answering a single card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: String,
    pub correct: bool,
    /// True only the first time the question is mastered for this subject.
    pub newly_mastered: bool,
    pub transition: Transition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Answered(AnswerOutcome),
    Aborted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Round-based quiz over one deck.
///
/// Round 1 is the whole deck in the order given; every later round holds the
/// cards answered wrong in the round before, in the order they were missed.
/// The session ends `Finished` after a round with no mistakes, or `Aborted`
/// when the user quits between cards. Mastery only ever grows.
pub struct QuizSession {
    subject: SubjectName,
    total_cards: usize,
    round: Vec<Card>,
    current: usize,
    wrong: Vec<Card>,
    round_number: u32,
    correct_so_far: usize,
    working: MasteryRecord,
    started_at: DateTime<Utc>,
    state: SessionState,
    summary: Option<SessionSummary>,
    pending_commit: Option<MasteryRecord>,
}

impl QuizSession {
    /// Start a session over an already-shuffled deck.
    ///
    /// `prior` is copied; the caller's record is never mutated. An empty deck
    /// yields a session that is already `Finished`.
    #[must_use]
    pub fn start(deck: Deck, prior: &MasteryRecord, started_at: DateTime<Utc>) -> Self {
        let (subject, _scope, cards) = deck.into_parts();
        let state = if cards.is_empty() {
            SessionState::Finished
        } else {
            SessionState::Running
        };

        Self {
            subject,
            total_cards: cards.len(),
            round: cards,
            current: 0,
            wrong: Vec::new(),
            round_number: 1,
            correct_so_far: 0,
            working: prior.clone(),
            started_at,
            state,
            summary: None,
            pending_commit: None,
        }
    }

    #[must_use]
    pub fn subject(&self) -> &SubjectName {
        &self.subject
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Cards in the current round, answered or not.
    #[must_use]
    pub fn round_cards(&self) -> &[Card] {
        &self.round
    }

    /// Cards answered wrong so far in the current round.
    #[must_use]
    pub fn missed_this_round(&self) -> &[Card] {
        &self.wrong
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.total_cards
    }

    /// Working mastery, including what this session has added.
    #[must_use]
    pub fn mastery(&self) -> &MasteryRecord {
        &self.working
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        if self.is_running() {
            self.round.get(self.current)
        } else {
            None
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            round: self.round_number,
            round_size: self.round.len(),
            answered_in_round: self.current,
            remaining_in_round: self.round.len().saturating_sub(self.current),
            correct_so_far: self.correct_so_far,
            mastered: self.working.mastered_count(),
            total: self.total_cards,
            is_complete: !self.is_running(),
        }
    }

    /// The summary, once the session has been finalized.
    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Apply one input to the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session has ended and
    /// `SessionError::InvalidSelection` for a choice the card does not offer;
    /// neither changes any state.
    pub fn answer(&mut self, selection: &Selection) -> Result<Step, SessionError> {
        if !self.is_running() {
            return Err(SessionError::Completed);
        }

        let choice = match selection {
            Selection::Quit => {
                self.state = SessionState::Aborted;
                return Ok(Step::Aborted);
            }
            Selection::Choice(choice) => choice,
        };

        let card = self.round.get(self.current).ok_or(SessionError::Completed)?;
        if !card.has_choice(choice) {
            return Err(SessionError::InvalidSelection {
                selection: choice.clone(),
            });
        }

        let question = card.question().to_owned();
        let correct = card.is_correct(choice);
        let newly_mastered = if correct {
            self.correct_so_far += 1;
            self.working.mark_mastered(&question)
        } else {
            self.wrong.push(card.clone());
            false
        };

        self.current += 1;
        let transition = if self.current < self.round.len() {
            Transition::NextCard
        } else {
            self.end_round()
        };

        Ok(Step::Answered(AnswerOutcome {
            question,
            correct,
            newly_mastered,
            transition,
        }))
    }

    /// Quit at the current card boundary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session already ended.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        self.answer(&Selection::Quit).map(|_| ())
    }

    fn end_round(&mut self) -> Transition {
        self.current = 0;
        if self.wrong.is_empty() {
            self.round.clear();
            self.state = SessionState::Finished;
            return Transition::Finished;
        }

        self.round = std::mem::take(&mut self.wrong);
        self.round_number += 1;
        Transition::RoundComplete {
            next_round: self.round_number,
            cards: self.round.len(),
        }
    }

    /// Stop the timer and compute the summary.
    ///
    /// Only the first call measures elapsed time; later calls return the same
    /// summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InProgress` while the session is still running.
    pub fn finalize(&mut self, finished_at: DateTime<Utc>) -> Result<&SessionSummary, SessionError> {
        if self.summary.is_none() {
            let outcome = match self.state {
                SessionState::Running => return Err(SessionError::InProgress),
                SessionState::Finished => SessionOutcome::Finished,
                SessionState::Aborted => SessionOutcome::Aborted,
            };

            let elapsed = elapsed_secs_between(self.started_at, finished_at);
            let mut committed = self.working.clone();
            committed.add_time(elapsed);

            self.summary = Some(SessionSummary::new(
                outcome,
                committed.mastered_count(),
                self.total_cards,
                elapsed,
                committed.time_spent_secs(),
            ));
            self.pending_commit = Some(committed);
        }

        self.summary.as_ref().ok_or(SessionError::InProgress)
    }

    /// Hands out the finalized record to persist, exactly once.
    pub(crate) fn take_commit(&mut self) -> Option<MasteryRecord> {
        self.pending_commit.take()
    }

    /// Puts back a record whose save failed so a later attempt can retry.
    pub(crate) fn restore_commit(&mut self, record: MasteryRecord) {
        self.pending_commit = Some(record);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("subject", &self.subject)
            .field("state", &self.state)
            .field("round_number", &self.round_number)
            .field("round_len", &self.round.len())
            .field("current", &self.current)
            .field("wrong_len", &self.wrong.len())
            .field("correct_so_far", &self.correct_so_far)
            .field("mastered", &self.working.mastered_count())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{CardDraft, DeckScope};
    use quiz_core::time::fixed_now;

    fn build_deck(questions: &[&str]) -> Deck {
        let drafts = questions
            .iter()
            .map(|q| CardDraft::new(*q, ["right", "wrong", "other"], "right"));
        Deck::from_drafts(SubjectName::new("test").unwrap(), DeckScope::AllFiles, drafts).unwrap()
    }

    fn start(questions: &[&str]) -> QuizSession {
        QuizSession::start(build_deck(questions), &MasteryRecord::new(), fixed_now())
    }

    fn right() -> Selection {
        Selection::choice("right")
    }

    fn wrong() -> Selection {
        Selection::choice("wrong")
    }

    fn answered(step: Step) -> AnswerOutcome {
        match step {
            Step::Answered(outcome) => outcome,
            Step::Aborted => panic!("expected an answer, got abort"),
        }
    }

    #[test]
    fn all_correct_finishes_after_one_round() {
        let mut session = start(&["Q1", "Q2", "Q3"]);

        for _ in 0..2 {
            let outcome = answered(session.answer(&right()).unwrap());
            assert_eq!(outcome.transition, Transition::NextCard);
        }
        let last = answered(session.answer(&right()).unwrap());
        assert_eq!(last.transition, Transition::Finished);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.round_number(), 1);

        let summary = session.finalize(fixed_now()).unwrap();
        assert_eq!(summary.outcome(), SessionOutcome::Finished);
        assert_eq!(summary.mastered_count(), 3);
        assert_eq!(summary.total_count(), 3);
    }

    #[test]
    fn missed_card_comes_back_in_the_next_round() {
        let mut session = start(&["Q1", "Q2"]);

        let first = answered(session.answer(&wrong()).unwrap());
        assert!(!first.correct);
        assert_eq!(first.question, "Q1");

        let second = answered(session.answer(&right()).unwrap());
        assert_eq!(
            second.transition,
            Transition::RoundComplete {
                next_round: 2,
                cards: 1
            }
        );
        assert_eq!(session.current_card().unwrap().question(), "Q1");

        let retry = answered(session.answer(&right()).unwrap());
        assert_eq!(retry.transition, Transition::Finished);
        assert_eq!(session.round_number(), 2);

        let summary = session.finalize(fixed_now()).unwrap();
        assert_eq!(summary.mastered_count(), 2);
        assert_eq!(summary.total_count(), 2);
    }

    #[test]
    fn next_round_is_exactly_the_missed_cards_in_answer_order() {
        let mut session = start(&["A", "B", "C", "D"]);
        let before: Vec<Card> = session.round_cards().to_vec();

        session.answer(&wrong()).unwrap(); // A
        session.answer(&right()).unwrap(); // B
        session.answer(&wrong()).unwrap(); // C
        session.answer(&wrong()).unwrap(); // D

        let next: Vec<&str> = session.round_cards().iter().map(Card::question).collect();
        assert_eq!(next, vec!["A", "C", "D"]);
        assert!(session.round_cards().iter().all(|c| before.contains(c)));
        assert!(session.missed_this_round().is_empty());
    }

    #[test]
    fn empty_deck_is_finished_immediately() {
        let mut session = start(&[]);
        assert_eq!(session.state(), SessionState::Finished);
        assert!(session.current_card().is_none());
        assert!(matches!(
            session.answer(&right()),
            Err(SessionError::Completed)
        ));

        let summary = session.finalize(fixed_now()).unwrap();
        assert_eq!(summary.mastered_count(), 0);
        assert_eq!(summary.total_count(), 0);
        assert_eq!(summary.time_this_session_secs(), 0);
    }

    #[test]
    fn quitting_keeps_partial_mastery_and_elapsed_time() {
        let prior = MasteryRecord::from_persisted(Vec::new(), 100);
        let mut session = QuizSession::start(build_deck(&["Q1", "Q2", "Q3"]), &prior, fixed_now());

        session.answer(&right()).unwrap();
        assert_eq!(session.answer(&Selection::Quit).unwrap(), Step::Aborted);
        assert_eq!(session.state(), SessionState::Aborted);

        let summary = session
            .finalize(fixed_now() + Duration::milliseconds(42_700))
            .unwrap()
            .clone();
        assert_eq!(summary.outcome(), SessionOutcome::Aborted);
        assert_eq!(summary.mastered_count(), 1);
        assert_eq!(summary.total_count(), 3);
        assert_eq!(summary.time_this_session_secs(), 42);
        assert_eq!(summary.time_total_secs(), 142);

        let committed = session.take_commit().unwrap();
        assert!(committed.is_mastered("Q1"));
        assert_eq!(committed.time_spent_secs(), 142);
        assert_eq!(prior.time_spent_secs(), 100);
    }

    #[test]
    fn invalid_selection_changes_nothing() {
        let mut session = start(&["Q1", "Q2"]);
        let before = session.progress();

        let err = session.answer(&Selection::choice("not offered")).unwrap_err();
        assert!(matches!(err, SessionError::InvalidSelection { .. }));
        assert_eq!(session.progress(), before);
        assert_eq!(session.current_card().unwrap().question(), "Q1");
    }

    #[test]
    fn mastery_never_shrinks_across_steps() {
        let prior = MasteryRecord::from_persisted(["B".to_string()], 0);
        let mut session = QuizSession::start(build_deck(&["A", "B", "C"]), &prior, fixed_now());

        let mut last = session.mastery().mastered_count();
        let inputs = [wrong(), wrong(), right(), wrong(), right(), right()];
        for input in &inputs {
            if !session.is_running() {
                break;
            }
            session.answer(input).unwrap();
            let now = session.mastery().mastered_count();
            assert!(now >= last);
            last = now;
        }
        // "B" answered wrong here stays mastered from the earlier session.
        assert!(session.mastery().is_mastered("B"));
    }

    #[test]
    fn already_mastered_question_is_not_newly_mastered() {
        let prior = MasteryRecord::from_persisted(["Q1".to_string()], 0);
        let mut session = QuizSession::start(build_deck(&["Q1"]), &prior, fixed_now());

        let outcome = answered(session.answer(&right()).unwrap());
        assert!(outcome.correct);
        assert!(!outcome.newly_mastered);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut session = start(&["Q1"]);
        session.answer(&right()).unwrap();

        let first = session
            .finalize(fixed_now() + Duration::seconds(10))
            .unwrap()
            .clone();
        let second = session
            .finalize(fixed_now() + Duration::seconds(99))
            .unwrap()
            .clone();
        assert_eq!(first, second);
        assert_eq!(second.time_total_secs(), 10);

        assert!(session.take_commit().is_some());
        assert!(session.take_commit().is_none());
    }

    #[test]
    fn finalize_while_running_is_rejected() {
        let mut session = start(&["Q1"]);
        assert!(matches!(
            session.finalize(fixed_now()),
            Err(SessionError::InProgress)
        ));
        assert!(session.summary().is_none());
    }

    #[test]
    fn duplicate_questions_share_one_mastery_entry() {
        let mut session = start(&["Same", "Same"]);
        session.answer(&right()).unwrap();
        session.answer(&right()).unwrap();

        let summary = session.finalize(fixed_now()).unwrap();
        assert_eq!(summary.mastered_count(), 1);
        assert_eq!(summary.total_count(), 2);
    }
}
