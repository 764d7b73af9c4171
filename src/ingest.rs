//! Batch ingestion: validate, persist, record membership.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::samples::parse_batch;
use crate::store::{MembershipStore, SampleStore};

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: usize,
}

/// Ingests one record or an array of records. All records in one call belong
/// to the same user; the user id is taken from the first valid record.
///
/// Both writes are awaited before the caller is acknowledged. The registry
/// write happens only after the batch insert succeeds, so a failure in
/// between can leave samples without a registry key but never a registry key
/// without samples; the next ingest for that user repairs the key.
pub async fn ingest(
    samples: &dyn SampleStore,
    registry: &dyn MembershipStore,
    payload: &Value,
) -> Result<IngestReport, AppError> {
    let (batch, rejected) = parse_batch(payload);

    let Some(first) = batch.first() else {
        return Err(AppError::NoValidSamples);
    };
    let user_id = first.user_id.clone();

    samples.insert_many(&batch).await?;
    registry.mark_registered(&user_id).await?;

    let report = IngestReport {
        accepted: batch.len(),
        rejected,
    };
    info!(
        "ingested {} samples for {user_id} ({} rejected)",
        report.accepted, report.rejected
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::query::samples_for_day;
    use crate::samples::Sample;
    use crate::store::{MemoryMembershipStore, MemorySampleStore};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    struct FailingSampleStore;

    #[async_trait]
    impl SampleStore for FailingSampleStore {
        async fn insert_many(&self, _samples: &[Sample]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("insert_many"))
        }

        async fn samples_between(
            &self,
            _user_id: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<Sample>, StoreError> {
            Err(StoreError::Unavailable("samples_between"))
        }

        async fn distinct_days(&self, _user_id: &str) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("distinct_days"))
        }
    }

    #[tokio::test]
    async fn mixed_batch_persists_valid_records_and_registers_user() {
        let samples = MemorySampleStore::new();
        let registry = MemoryMembershipStore::new();

        let report = ingest(
            &samples,
            &registry,
            &json!([
                { "userId": "u1", "date": "2024-03-01T10:00:00Z", "accData": 1.0 },
                { "userId": "u1", "date": "broken", "accData": 2.0 },
            ]),
        )
        .await
        .unwrap();

        assert_eq!(report, IngestReport { accepted: 1, rejected: 1 });

        let stored = samples
            .samples_between(
                "u1",
                "2024-03-01T00:00:00Z".parse().unwrap(),
                "2024-03-02T00:00:00Z".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert!(registry.is_registered("u1").await.unwrap());
    }

    #[tokio::test]
    async fn all_invalid_batch_writes_nothing_and_registers_nobody() {
        let samples = MemorySampleStore::new();
        let registry = MemoryMembershipStore::new();

        let result = ingest(
            &samples,
            &registry,
            &json!([{ "userId": "", "date": "2024-03-01T10:00:00Z", "accData": 1.0 }]),
        )
        .await;

        assert!(matches!(result, Err(AppError::NoValidSamples)));
        assert!(samples.distinct_days("u1").await.unwrap().is_empty());
        assert!(!registry.is_registered("u1").await.unwrap());
        assert!(!registry.is_registered("").await.unwrap());
    }

    #[tokio::test]
    async fn insert_failure_surfaces_and_skips_registration() {
        let registry = MemoryMembershipStore::new();

        let result = ingest(
            &FailingSampleStore,
            &registry,
            &json!({ "userId": "u1", "date": "2024-03-01T10:00:00Z", "accData": 1.0 }),
        )
        .await;

        assert!(matches!(
            result,
            Err(AppError::Store(StoreError::Unavailable("insert_many")))
        ));
        assert!(!registry.is_registered("u1").await.unwrap());
    }

    #[tokio::test]
    async fn ingested_sample_is_registered_and_queryable() {
        let samples = MemorySampleStore::new();
        let registry = MemoryMembershipStore::new();

        ingest(
            &samples,
            &registry,
            &json!([{ "userId": "u1", "date": "2024-03-01T10:00:00Z", "accData": 1.5 }]),
        )
        .await
        .unwrap();

        assert!(registry.is_registered("u1").await.unwrap());

        let day = samples_for_day(&samples, "u1", "2024-03-01".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].value, 1.5);
    }
}
