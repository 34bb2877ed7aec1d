use std::collections::BTreeSet;

use crate::model::deck::Deck;

/// Per-subject mastery: which questions were answered correctly at least once
/// since the last reset, and how long the subject has been studied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasteryRecord {
    mastered: BTreeSet<String>,
    time_spent_secs: u64,
}

impl MasteryRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a record from persisted storage.
    #[must_use]
    pub fn from_persisted(mastered: impl IntoIterator<Item = String>, time_spent_secs: u64) -> Self {
        Self {
            mastered: mastered.into_iter().collect(),
            time_spent_secs,
        }
    }

    #[must_use]
    pub fn mastered(&self) -> &BTreeSet<String> {
        &self.mastered
    }

    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.mastered.len()
    }

    #[must_use]
    pub fn is_mastered(&self, question: &str) -> bool {
        self.mastered.contains(question)
    }

    /// Marks a question as mastered. Returns `true` if it was not mastered before.
    pub fn mark_mastered(&mut self, question: &str) -> bool {
        if self.mastered.contains(question) {
            return false;
        }
        self.mastered.insert(question.to_owned())
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent_secs
    }

    pub fn add_time(&mut self, secs: u64) {
        self.time_spent_secs = self.time_spent_secs.saturating_add(secs);
    }

    /// Clears mastery and zeroes the study time.
    pub fn reset(&mut self) {
        self.mastered.clear();
        self.time_spent_secs = 0;
    }

    /// Number of deck cards whose question is mastered.
    #[must_use]
    pub fn mastered_in(&self, deck: &Deck) -> usize {
        deck.cards()
            .iter()
            .filter(|card| self.is_mastered(card.question()))
            .count()
    }

    /// Share of the deck that is mastered, in percent with one decimal.
    ///
    /// Returns 0 for an empty deck.
    #[must_use]
    pub fn percentage_mastered(&self, deck: &Deck) -> f64 {
        if deck.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.mastered_in(deck) as f64 / deck.len() as f64;
        round_one_decimal(ratio * 100.0)
    }
}

/// Exact halves round to even, so 6.25 becomes 6.2.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
