mod observer;
mod plan;
mod presentation;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use observer::{NoopObserver, SessionEvent, SessionObserver, TracingObserver};
pub use plan::shuffle_deck;
pub use presentation::PresentedCard;
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, QuizSession, Selection, SessionState, Step, Transition};
pub use workflow::{ActiveSession, QuizLoopService, SessionReport};
