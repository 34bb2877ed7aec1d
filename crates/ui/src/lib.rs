pub mod app;
pub mod context;
pub mod error;
pub mod terminal;
pub mod views;
pub mod vm;

pub use app::{StudyOutcome, StudyRequest, TerminalApp};
pub use context::{AppContext, UiApp, build_app_context};
pub use error::UiError;
