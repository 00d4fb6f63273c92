use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::submissions::models::{LocationSubmission, NewLocationSubmission};
use crate::features::submissions::store::{StoreError, SubmissionStore};

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Map a database error, surfacing unique constraint violations on `donor_id`
fn handle_db_error(e: sqlx::Error, donor_id: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::UniqueViolation(donor_id.to_string());
        }
    }
    StoreError::Database(e)
}

pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn exists(&self, donor_id: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM location_submissions WHERE donor_id = $1)",
        )
        .bind(donor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(
        &self,
        submission: NewLocationSubmission,
    ) -> Result<LocationSubmission, StoreError> {
        sqlx::query_as::<_, LocationSubmission>(
            r#"
            INSERT INTO location_submissions (
                id, donor_id, address, latitude, longitude, accuracy,
                mobile_number, request_id, token
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, donor_id, address, latitude, longitude, accuracy,
                mobile_number, request_id, token, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&submission.donor_id)
        .bind(&submission.address)
        .bind(submission.latitude)
        .bind(submission.longitude)
        .bind(submission.accuracy)
        .bind(&submission.mobile_number)
        .bind(&submission.request_id)
        .bind(&submission.token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, &submission.donor_id))
    }
}
