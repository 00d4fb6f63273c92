mod donor_id;
mod submission_service;

pub use donor_id::{DonorIdGenerator, RandomDonorIdGenerator};
pub use submission_service::SubmissionService;
