use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── CARD TYPES ────────────────────────────────────────────────────────────────
//

/// Unvalidated card as it appears in a deck file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub question: String,
    pub choices: Vec<String>,
    pub answer: String,
}

impl CardDraft {
    pub fn new(
        question: impl Into<String>,
        choices: impl IntoIterator<Item = impl Into<String>>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            answer: answer.into(),
        }
    }

    /// Check the card invariants and produce an immutable `Card`.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if the question is blank, there are fewer than two
    /// choices, a choice repeats, or the answer is not one of the choices.
    pub fn validate(self) -> Result<Card, CardError> {
        if self.question.trim().is_empty() {
            return Err(CardError::EmptyQuestion);
        }
        if self.choices.len() < 2 {
            return Err(CardError::TooFewChoices {
                count: self.choices.len(),
            });
        }
        for (i, choice) in self.choices.iter().enumerate() {
            if self.choices[..i].contains(choice) {
                return Err(CardError::DuplicateChoice {
                    choice: choice.clone(),
                });
            }
        }
        if !self.choices.contains(&self.answer) {
            return Err(CardError::AnswerNotInChoices {
                answer: self.answer,
            });
        }

        Ok(Card {
            question: self.question,
            choices: self.choices,
            answer: self.answer,
        })
    }
}

/// A multiple-choice card. The question text is its identity for mastery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    question: String,
    choices: Vec<String>,
    answer: String,
}

impl Card {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Choices in the order the deck file lists them.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn has_choice(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }

    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.answer == choice
    }
}

//
// ─── CARD VALIDATION ERRORS ────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error("a card needs at least 2 choices, found {count}")]
    TooFewChoices { count: usize },

    #[error("choice listed more than once: {choice}")]
    DuplicateChoice { choice: String },

    #[error("answer is not one of the choices: {answer}")]
    AnswerNotInChoices { answer: String },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
