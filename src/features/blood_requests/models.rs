use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloodRequestStatus {
    Active,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Error)]
pub enum BloodRequestError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("directory returned HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}
