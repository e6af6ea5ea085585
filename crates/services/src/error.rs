//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::RoundError;
use drill_core::pools::Band;
use storage::repository::StorageError;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("catalog response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors emitted while drawing a round.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DrawError {
    /// A weighted band held no candidate even after every fallback stage.
    /// The dataset lacks coverage for that band; retrying cannot help.
    #[error("no drawable item in the {0:?} band")]
    EmptyBand(Band),
    #[error("catalog has fewer than two drawable items")]
    CatalogTooSmall,
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Errors emitted by the quiz loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no active round")]
    NoActiveRound,
    #[error("round is already graded")]
    AlreadyGraded,
    #[error("current round has not been graded yet")]
    RoundNotGraded,
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
