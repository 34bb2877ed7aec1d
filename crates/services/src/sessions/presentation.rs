use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Card;

use super::service::Selection;

/// A card as shown to the user: choices in display order, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedCard {
    question: String,
    choices: Vec<String>,
    answer_index: usize,
}

impl PresentedCard {
    /// Present a card with its choices shuffled. Each showing gets a fresh order.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(card: &Card, rng: &mut R) -> Self {
        let mut choices = card.choices().to_vec();
        choices.as_mut_slice().shuffle(rng);
        Self::from_order(card, choices)
    }

    /// Present a card with its choices in deck order.
    #[must_use]
    pub fn in_deck_order(card: &Card) -> Self {
        Self::from_order(card, card.choices().to_vec())
    }

    fn from_order(card: &Card, choices: Vec<String>) -> Self {
        // Card validation guarantees the answer is among the choices.
        let answer_index = choices
            .iter()
            .position(|c| c == card.answer())
            .unwrap_or_default();
        Self {
            question: card.question().to_owned(),
            choices,
            answer_index,
        }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Choice shown at 1-based `number`.
    #[must_use]
    pub fn choice_at(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
    }

    /// Turn a 1-based number into a selection, or `None` when out of range.
    #[must_use]
    pub fn select(&self, number: usize) -> Option<Selection> {
        self.choice_at(number).map(Selection::choice)
    }

    /// 1-based position of the correct answer.
    #[must_use]
    pub fn answer_position(&self) -> usize {
        self.answer_index + 1
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        self.choices
            .get(self.answer_index)
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::CardDraft;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card() -> Card {
        CardDraft::new("2+2?", ["3", "4", "5", "22"], "4")
            .validate()
            .unwrap()
    }

    #[test]
    fn deck_order_numbers_from_one() {
        let shown = PresentedCard::in_deck_order(&card());
        assert_eq!(shown.choice_at(1), Some("3"));
        assert_eq!(shown.choice_at(4), Some("22"));
        assert_eq!(shown.choice_at(0), None);
        assert_eq!(shown.choice_at(5), None);
        assert_eq!(shown.answer_position(), 2);
    }

    #[test]
    fn shuffled_keeps_choices_and_tracks_answer() {
        let card = card();
        let shown = PresentedCard::shuffled(&card, &mut StdRng::seed_from_u64(3));

        let mut choices = shown.choices().to_vec();
        choices.sort();
        assert_eq!(choices, vec!["22", "3", "4", "5"]);
        assert_eq!(shown.choice_at(shown.answer_position()), Some("4"));
        assert_eq!(shown.answer(), "4");
        assert_eq!(shown.question(), "2+2?");
    }

    #[test]
    fn select_maps_numbers_to_choices() {
        let shown = PresentedCard::in_deck_order(&card());
        assert_eq!(shown.select(2), Some(Selection::choice("4")));
        assert_eq!(shown.select(9), None);
    }
}
