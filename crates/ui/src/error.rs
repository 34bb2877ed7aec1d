use std::io;

use services::{CatalogError, SessionError};
use thiserror::Error;

/// Errors that end an interactive study run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UiError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
