use thiserror::Error;

/// Result of a successful provider lookup
#[derive(Debug, Clone, PartialEq)]
pub struct IpLookup {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub proxy: bool,
    pub hosting: bool,
}

#[derive(Debug, Error)]
pub enum IpLookupError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("provider returned HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("lookup unsuccessful: {0}")]
    Unsuccessful(String),

    #[error("timed out after {0} ms")]
    Timeout(u128),
}

/// Outcome of the cross-check for one submission
#[derive(Debug, Clone, PartialEq)]
pub enum IpVerdict {
    /// No lookup was attempted
    Skipped(&'static str),
    /// Lookup failed; the submission proceeds
    Unavailable(String),
    /// Lookup succeeded and nothing was flagged
    Clean { distance_km: Option<f64> },
    /// Provider flagged the address as a proxy or hosting range
    ProxyDetected { proxy: bool, hosting: bool },
    /// IP location is too far from the GPS location (only when enforced)
    Mismatch { distance_km: f64 },
}

impl IpVerdict {
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            IpVerdict::ProxyDetected { .. } | IpVerdict::Mismatch { .. }
        )
    }
}
