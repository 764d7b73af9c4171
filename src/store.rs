//! Store interfaces and their in-memory implementations.
//!
//! The backends (MongoDB for samples, Redis for the registry) sit behind these
//! traits so the service logic can run against in-memory stores in tests and
//! single-process development.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::samples::Sample;

#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Bulk-insert a batch of samples in one write.
    async fn insert_many(&self, samples: &[Sample]) -> Result<(), StoreError>;

    /// All samples for one user with timestamp in `[start, end)`, in insertion
    /// order.
    async fn samples_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sample>, StoreError>;

    /// Every distinct `YYYY-MM-DD` UTC day the user has data for, ascending.
    async fn distinct_days(&self, user_id: &str) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Record that this user has submitted data. Idempotent.
    async fn mark_registered(&self, user_id: &str) -> Result<(), StoreError>;

    async fn is_registered(&self, user_id: &str) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemorySampleStore {
    samples: RwLock<Vec<Sample>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SampleStore for MemorySampleStore {
    async fn insert_many(&self, samples: &[Sample]) -> Result<(), StoreError> {
        self.samples.write().extend_from_slice(samples);
        Ok(())
    }

    async fn samples_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sample>, StoreError> {
        Ok(self
            .samples
            .read()
            .iter()
            .filter(|s| s.user_id == user_id && s.timestamp >= start && s.timestamp < end)
            .cloned()
            .collect())
    }

    async fn distinct_days(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let days: BTreeSet<String> = self
            .samples
            .read()
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.timestamp.format("%Y-%m-%d").to_string())
            .collect();

        Ok(days.into_iter().collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMembershipStore {
    users: RwLock<BTreeSet<String>>,
}

impl MemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn mark_registered(&self, user_id: &str) -> Result<(), StoreError> {
        self.users.write().insert(user_id.to_string());
        Ok(())
    }

    async fn is_registered(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.users.read().contains(user_id))
    }
}
