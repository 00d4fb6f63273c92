use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for donor ids: "DON" followed by 8 uppercase alphanumeric characters
    /// - Valid: "DON4B7X9K2A", "DON00000000"
    /// - Invalid: "DON4b7x9k2a", "DON4B7X9K2", "XYZ4B7X9K2A"
    pub static ref DONOR_ID_REGEX: Regex = Regex::new(r"^DON[A-Z0-9]{8}$").unwrap();
}
