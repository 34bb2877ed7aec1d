use crossterm::event::KeyCode;
use services::{
    ActiveSession, PresentedCard, QuizLoopService, SessionError, SessionProgress, SessionReport,
    Step,
};

/// Input on the question screen, already mapped from keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    /// 1-based choice number as typed; may be out of range.
    Pick(usize),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Prompt,
    Feedback { picked: usize, correct: bool },
}

/// How a choice line is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceMark {
    Plain,
    Correct,
    Wrong,
}

/// Question screen state over an active session.
pub struct SessionVm {
    active: ActiveSession,
    shown: Option<PresentedCard>,
    asked: Option<SessionProgress>,
    phase: SessionPhase,
    typed: String,
}

impl SessionVm {
    #[must_use]
    pub fn new(active: ActiveSession) -> Self {
        Self {
            active,
            shown: None,
            asked: None,
            phase: SessionPhase::Prompt,
            typed: String::new(),
        }
    }

    #[must_use]
    pub fn active(&self) -> &ActiveSession {
        &self.active
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn card(&self) -> Option<&PresentedCard> {
        self.shown.as_ref()
    }

    /// Digits typed so far when a card has more than nine choices.
    #[must_use]
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Show the next card. Returns `false` once the session has ended.
    pub fn present(&mut self, service: &QuizLoopService) -> bool {
        self.phase = SessionPhase::Prompt;
        self.typed.clear();
        self.shown = service.present_current(&mut self.active).cloned();
        self.asked = self.shown.as_ref().map(|_| self.active.session().progress());
        self.shown.is_some()
    }

    /// Map a key to an intent. Cards with up to nine choices take a single
    /// digit; longer ones collect digits until Enter.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<SessionIntent> {
        let choices = self.shown.as_ref().map_or(0, PresentedCard::len);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(SessionIntent::Quit),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if choices <= 9 {
                    let digit = c.to_digit(10).and_then(|d| usize::try_from(d).ok())?;
                    return Some(SessionIntent::Pick(digit));
                }
                self.typed.push(c);
                None
            }
            KeyCode::Backspace => {
                self.typed.pop();
                None
            }
            KeyCode::Enter if !self.typed.is_empty() => {
                let number = self.typed.parse().ok();
                self.typed.clear();
                number.map(SessionIntent::Pick)
            }
            _ => None,
        }
    }

    /// Answer with the choice shown at `number`.
    ///
    /// Returns `Ok(None)` and changes nothing when `number` is out of range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session rejects the answer.
    pub fn pick(
        &mut self,
        service: &QuizLoopService,
        number: usize,
    ) -> Result<Option<Step>, SessionError> {
        if self.phase != SessionPhase::Prompt {
            return Ok(None);
        }
        let Some(selection) = self.shown.as_ref().and_then(|card| card.select(number)) else {
            return Ok(None);
        };

        let step = service.answer(&mut self.active, &selection)?;
        if let Step::Answered(outcome) = &step {
            self.phase = SessionPhase::Feedback {
                picked: number,
                correct: outcome.correct,
            };
        }
        Ok(Some(step))
    }

    /// Marks for each shown choice: the answer green and a wrong pick red
    /// during feedback, plain otherwise.
    #[must_use]
    pub fn marks(&self) -> Vec<ChoiceMark> {
        let Some(card) = &self.shown else {
            return Vec::new();
        };
        let SessionPhase::Feedback { picked, .. } = self.phase else {
            return vec![ChoiceMark::Plain; card.len()];
        };

        (1..=card.len())
            .map(|number| {
                if number == card.answer_position() {
                    ChoiceMark::Correct
                } else if number == picked {
                    ChoiceMark::Wrong
                } else {
                    ChoiceMark::Plain
                }
            })
            .collect()
    }

    /// `Round 2 | card 1/3 | mastered 4/10`
    ///
    /// Round and card number are those the current card was asked in, also
    /// while its feedback is shown after the session has moved on.
    #[must_use]
    pub fn status_line(&self) -> String {
        let now = self.active.session().progress();
        let asked = self.asked.as_ref().unwrap_or(&now);
        format!(
            "Round {} | card {}/{} | mastered {}/{}",
            asked.round,
            asked.answered_in_round + 1,
            asked.round_size,
            now.mastered,
            now.total
        )
    }

    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session already ended.
    pub async fn quit(&mut self, service: &QuizLoopService) -> Result<SessionReport, SessionError> {
        self.shown = None;
        self.asked = None;
        service.quit(&mut self.active).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::InProgress` while cards remain.
    pub async fn finish(
        &mut self,
        service: &QuizLoopService,
    ) -> Result<SessionReport, SessionError> {
        self.shown = None;
        self.asked = None;
        service.finish(&mut self.active).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use quiz_core::model::{Card, CardDraft, DeckFileName, DeckScope, SubjectName};
    use services::{NoopObserver, QuizLoopService};
    use storage::repository::InMemoryRepository;

    use super::SessionVm;

    pub(crate) fn subject() -> SubjectName {
        SubjectName::new("s").unwrap()
    }

    /// Cards offering `right` as choice 1 and `wrong` as choice 2.
    pub(crate) fn cards(questions: &[&str]) -> Vec<Card> {
        questions
            .iter()
            .map(|q| {
                CardDraft::new(*q, ["right", "wrong"], "right")
                    .validate()
                    .unwrap()
            })
            .collect()
    }

    /// Unshuffled session over `cards` with the first card already shown.
    pub(crate) async fn session_over(
        cards: Vec<Card>,
    ) -> (InMemoryRepository, QuizLoopService, SessionVm) {
        let repo = InMemoryRepository::new();
        repo.insert_file(subject(), DeckFileName::new("f.json").unwrap(), cards)
            .unwrap();

        let service = QuizLoopService::new(
            quiz_core::time::fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
        .with_shuffle(false)
        .with_observer(Arc::new(NoopObserver));
        let active = service
            .start_session(&subject(), &DeckScope::AllFiles)
            .await
            .unwrap();
        let mut vm = SessionVm::new(active);
        vm.present(&service);
        (repo, service, vm)
    }
}
