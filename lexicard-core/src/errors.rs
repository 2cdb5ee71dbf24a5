use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid rating: {0} (expected -1, 0 or 1)")]
    InvalidRating(i64),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("migration error: {0}")]
    Migration(String),
}
