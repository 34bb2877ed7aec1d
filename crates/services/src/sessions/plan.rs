use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Deck;

/// Returns the deck with its cards in a uniformly random order.
///
/// Subject and scope are kept; the card multiset is unchanged.
#[must_use]
pub fn shuffle_deck<R: Rng + ?Sized>(deck: Deck, rng: &mut R) -> Deck {
    let (subject, scope, mut cards) = deck.into_parts();
    cards.as_mut_slice().shuffle(rng);
    Deck::new(subject, scope, cards)
}
