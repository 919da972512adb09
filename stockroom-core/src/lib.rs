pub mod repository;

pub use repository::{CreateOutcome, ProductRepository, WriteOutcome};

/// Infrastructure failures surfaced by repositories. Soft outcomes such as a
/// duplicate name or a missing row are reported through the outcome enums
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("could not connect to the product store: {0}")]
    Connection(String),
    #[error("product store operation failed: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
