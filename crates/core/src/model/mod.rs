mod card;
mod deck;
mod ids;
mod mastery;
mod progress;
mod session;

pub use ids::{DeckFileName, NameError, SubjectName};

pub use card::{Card, CardDraft, CardError};
pub use deck::{Deck, DeckError, DeckScope};
pub use mastery::MasteryRecord;
pub use progress::Progress;
pub use session::{SessionOutcome, SessionSummary};
