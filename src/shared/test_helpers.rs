use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::features::blood_requests::clients::BloodRequestDirectory;
use crate::features::blood_requests::models::{BloodRequestError, BloodRequestStatus};
use crate::features::ip_check::clients::IpGeolocationProvider;
use crate::features::ip_check::models::{IpLookup, IpLookupError};
use crate::features::submissions::models::{LocationSubmission, NewLocationSubmission};
use crate::features::submissions::services::{DonorIdGenerator, RandomDonorIdGenerator};
use crate::features::submissions::store::{StoreError, SubmissionStore};

// =============================================================================
// STORE
// =============================================================================

/// In-memory submission store with the same uniqueness contract as Postgres
#[derive(Default)]
pub struct InMemorySubmissionStore {
    records: RwLock<HashMap<String, LocationSubmission>>,
    /// When set, `exists` always answers false (simulates a lost probe race)
    blind_probe: bool,
    /// When set, `exists` always fails with a connection error
    failing_probe: bool,
    /// When set, `insert` hands back a record under a different donor id
    mismatched_records: bool,
    /// Number of upcoming inserts that fail with a connection error
    failing_inserts: AtomicU32,
    insert_attempts: AtomicUsize,
}

impl InMemorySubmissionStore {
    pub fn with_blind_probe(mut self) -> Self {
        self.blind_probe = true;
        self
    }

    pub fn failing_probe(mut self) -> Self {
        self.failing_probe = true;
        self
    }

    pub fn with_mismatched_records(mut self) -> Self {
        self.mismatched_records = true;
        self
    }

    pub fn failing_first_inserts(self, count: u32) -> Self {
        self.failing_inserts.store(count, Ordering::SeqCst);
        self
    }

    pub async fn get(&self, donor_id: &str) -> Option<LocationSubmission> {
        self.records.read().await.get(donor_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn records(&self) -> Vec<LocationSubmission> {
        self.records.read().await.values().cloned().collect()
    }

    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn exists(&self, donor_id: &str) -> Result<bool, StoreError> {
        if self.failing_probe {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        if self.blind_probe {
            return Ok(false);
        }
        Ok(self.records.read().await.contains_key(donor_id))
    }

    async fn insert(
        &self,
        submission: NewLocationSubmission,
    ) -> Result<LocationSubmission, StoreError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failing_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        // Let concurrent inserts interleave
        tokio::task::yield_now().await;

        let mut records = self.records.write().await;
        if records.contains_key(&submission.donor_id) {
            return Err(StoreError::UniqueViolation(submission.donor_id));
        }

        let record = LocationSubmission {
            id: Uuid::now_v7(),
            donor_id: submission.donor_id,
            address: submission.address,
            latitude: submission.latitude,
            longitude: submission.longitude,
            accuracy: submission.accuracy,
            mobile_number: submission.mobile_number,
            request_id: submission.request_id,
            token: submission.token,
            created_at: Utc::now(),
        };
        records.insert(record.donor_id.clone(), record.clone());

        if self.mismatched_records {
            return Ok(LocationSubmission {
                donor_id: "DONXXXXXXXX".to_string(),
                ..record
            });
        }
        Ok(record)
    }
}

// =============================================================================
// DONOR IDS
// =============================================================================

/// Hands out scripted donor ids, then falls back to random ones (or repeats)
pub struct ScriptedDonorIds {
    queue: Mutex<VecDeque<String>>,
    repeat: Option<String>,
    cycle: Option<(Vec<String>, AtomicUsize)>,
}

impl ScriptedDonorIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(ids.into_iter().map(Into::into).collect()),
            repeat: None,
            cycle: None,
        }
    }

    /// Always the same id
    pub fn repeating(id: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            repeat: Some(id.to_string()),
            cycle: None,
        }
    }

    /// Cycle through `ids` forever, shared between all callers
    pub fn shared_cycle(ids: Vec<String>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            repeat: None,
            cycle: Some((ids, AtomicUsize::new(0))),
        }
    }
}

impl DonorIdGenerator for ScriptedDonorIds {
    fn generate(&self) -> String {
        if let Some(id) = &self.repeat {
            return id.clone();
        }
        if let Some((ids, next)) = &self.cycle {
            let idx = next.fetch_add(1, Ordering::SeqCst) % ids.len();
            return ids[idx].clone();
        }
        self.queue
            .lock()
            .expect("queue lock poisoned")
            .pop_front()
            .unwrap_or_else(|| RandomDonorIdGenerator.generate())
    }
}

// =============================================================================
// IP GEOLOCATION
// =============================================================================

enum FakeIpBehavior {
    Return(IpLookup),
    Fail,
    Hang,
}

/// Scripted IP geolocation provider
pub struct FakeIpProvider {
    behavior: FakeIpBehavior,
    calls: Arc<AtomicUsize>,
    last_ip: Arc<Mutex<Option<IpAddr>>>,
}

impl FakeIpProvider {
    fn with(behavior: FakeIpBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
            last_ip: Arc::new(Mutex::new(None)),
        }
    }

    pub fn returning(lookup: IpLookup) -> Self {
        Self::with(FakeIpBehavior::Return(lookup))
    }

    pub fn failing() -> Self {
        Self::with(FakeIpBehavior::Fail)
    }

    /// Never answers within any reasonable timeout
    pub fn hanging() -> Self {
        Self::with(FakeIpBehavior::Hang)
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn last_ip(&self) -> Arc<Mutex<Option<IpAddr>>> {
        self.last_ip.clone()
    }
}

#[async_trait]
impl IpGeolocationProvider for FakeIpProvider {
    async fn lookup(&self, ip: IpAddr) -> Result<IpLookup, IpLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_ip.lock().expect("ip lock poisoned") = Some(ip);

        match &self.behavior {
            FakeIpBehavior::Return(lookup) => Ok(lookup.clone()),
            FakeIpBehavior::Fail => Err(IpLookupError::Request("connection refused".to_string())),
            FakeIpBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(IpLookupError::Timeout(30_000))
            }
        }
    }
}

// =============================================================================
// BLOOD REQUESTS
// =============================================================================

/// In-memory blood request directory
#[derive(Default)]
pub struct FakeBloodRequestDirectory {
    statuses: HashMap<String, BloodRequestStatus>,
    failing: bool,
}

impl FakeBloodRequestDirectory {
    pub fn with(mut self, reference: &str, status: BloodRequestStatus) -> Self {
        self.statuses.insert(reference.to_string(), status);
        self
    }

    pub fn failing() -> Self {
        Self {
            statuses: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl BloodRequestDirectory for FakeBloodRequestDirectory {
    async fn status(
        &self,
        reference: &str,
    ) -> Result<Option<BloodRequestStatus>, BloodRequestError> {
        if self.failing {
            return Err(BloodRequestError::HttpStatus(503));
        }
        Ok(self.statuses.get(reference).copied())
    }
}
