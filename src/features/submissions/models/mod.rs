mod location_submission;

pub use location_submission::{LocationSubmission, NewLocationSubmission};
