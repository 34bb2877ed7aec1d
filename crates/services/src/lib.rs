#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use catalog_service::{CatalogService, FileOption};
pub use error::{CatalogError, SessionError};

pub use sessions::{
    ActiveSession, AnswerOutcome, NoopObserver, PresentedCard, QuizLoopService, QuizSession,
    Selection, SessionEvent, SessionObserver, SessionProgress, SessionReport, SessionState, Step,
    TracingObserver, Transition,
};
