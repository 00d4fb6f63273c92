use rand::Rng;

use crate::shared::constants::{DONOR_ID_ALPHABET, DONOR_ID_PREFIX, DONOR_ID_RANDOM_LEN};

/// Source of candidate donor ids. Candidates are not guaranteed unique; the
/// store decides.
pub trait DonorIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// `DON` followed by 8 random characters from `[A-Z0-9]`
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDonorIdGenerator;

impl DonorIdGenerator for RandomDonorIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut id = String::with_capacity(DONOR_ID_PREFIX.len() + DONOR_ID_RANDOM_LEN);
        id.push_str(DONOR_ID_PREFIX);
        for _ in 0..DONOR_ID_RANDOM_LEN {
            let idx = rng.gen_range(0..DONOR_ID_ALPHABET.len());
            id.push(DONOR_ID_ALPHABET[idx] as char);
        }
        id
    }
}
