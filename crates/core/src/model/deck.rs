use std::fmt;

use thiserror::Error;

use crate::model::card::{Card, CardDraft, CardError};
use crate::model::ids::{DeckFileName, SubjectName};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("card #{index} is invalid: {source}")]
    InvalidCard {
        index: usize,
        #[source]
        source: CardError,
    },
}

//
// ─── SCOPE ─────────────────────────────────────────────────────────────────────
//

/// Which files of a subject a deck was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeckScope {
    AllFiles,
    File(DeckFileName),
}

impl DeckScope {
    #[must_use]
    pub fn file(&self) -> Option<&DeckFileName> {
        match self {
            DeckScope::AllFiles => None,
            DeckScope::File(name) => Some(name),
        }
    }
}

impl fmt::Display for DeckScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckScope::AllFiles => f.write_str("All files"),
            DeckScope::File(name) => write!(f, "{name}"),
        }
    }
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// Ordered cards of one subject/scope, loaded once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    subject: SubjectName,
    scope: DeckScope,
    cards: Vec<Card>,
}

impl Deck {
    #[must_use]
    pub fn new(subject: SubjectName, scope: DeckScope, cards: Vec<Card>) -> Self {
        Self {
            subject,
            scope,
            cards,
        }
    }

    /// Validate every draft, failing on the first broken card.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::InvalidCard` with the zero-based index of the card.
    pub fn from_drafts(
        subject: SubjectName,
        scope: DeckScope,
        drafts: impl IntoIterator<Item = CardDraft>,
    ) -> Result<Self, DeckError> {
        let cards = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| DeckError::InvalidCard { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(subject, scope, cards))
    }

    #[must_use]
    pub fn subject(&self) -> &SubjectName {
        &self.subject
    }

    #[must_use]
    pub fn scope(&self) -> &DeckScope {
        &self.scope
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (SubjectName, DeckScope, Vec<Card>) {
        (self.subject, self.scope, self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> SubjectName {
        SubjectName::new("geo").unwrap()
    }

    #[test]
    fn from_drafts_reports_failing_index() {
        let drafts = vec![
            CardDraft::new("Q1", ["a", "b"], "a"),
            CardDraft::new("Q2", ["a", "b"], "z"),
        ];

        let err = Deck::from_drafts(subject(), DeckScope::AllFiles, drafts).unwrap_err();
        assert!(matches!(err, DeckError::InvalidCard { index: 1, .. }));
    }

    #[test]
    fn scope_display_matches_menu_labels() {
        let file = DeckScope::File(DeckFileName::new("capitals.json").unwrap());
        assert_eq!(DeckScope::AllFiles.to_string(), "All files");
        assert_eq!(file.to_string(), "capitals.json");
        assert_eq!(file.file().map(DeckFileName::as_str), Some("capitals.json"));
    }
}
