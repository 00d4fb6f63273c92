mod pg_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::submissions::models::{LocationSubmission, NewLocationSubmission};

pub use pg_store::PgSubmissionStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The donor id is already taken; the caller should pick another one
    #[error("donor id already exists: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for location submissions.
///
/// Implementations must enforce donor id uniqueness at insert time and report a
/// duplicate as [`StoreError::UniqueViolation`]. An insert either stores the
/// whole record or nothing.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn exists(&self, donor_id: &str) -> Result<bool, StoreError>;

    async fn insert(
        &self,
        submission: NewLocationSubmission,
    ) -> Result<LocationSubmission, StoreError>;
}
