//! # MongoDB
//!
//! Document database holding every accelerometer reading.
//!
//! ## Requirements
//!
//! - Insert-only workload, batches of up to a few hundred readings per request
//! - Day-window reads: all readings for one user within one UTC calendar day
//! - Distinct-day listing: which days have data for a user, paged 7 at a time
//!
//! ## Implementation
//!
//! - One `samples` collection, one document per reading
//! - Wire field names are kept as document field names (`userId`, `date`,
//!   `accData`); `date` is stored as a BSON datetime
//! - Day windows are a plain filtered `find`
//! - Distinct days are an aggregation: `$match` on the user, `$group` on
//!   `$dateToString`, `$sort` ascending; no group for an unknown user simply
//!   yields an empty cursor

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{self, Document, doc},
};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::samples::Sample;
use crate::store::SampleStore;

pub const DATABASE: &str = "recordaccel";
pub const SAMPLE_COLLECTION: &str = "samples";

#[derive(Debug, Serialize, Deserialize)]
struct SampleDocument {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(
        rename = "date",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    timestamp: DateTime<Utc>,
    #[serde(rename = "accData")]
    value: f64,
}

impl From<&Sample> for SampleDocument {
    fn from(sample: &Sample) -> Self {
        Self {
            user_id: sample.user_id.clone(),
            timestamp: sample.timestamp,
            value: sample.value,
        }
    }
}

impl From<SampleDocument> for Sample {
    fn from(document: SampleDocument) -> Self {
        Self {
            user_id: document.user_id,
            timestamp: document.timestamp,
            value: document.value,
        }
    }
}

pub struct MongoSampleStore {
    samples: Collection<SampleDocument>,
}

impl MongoSampleStore {
    pub async fn connect(mongo_url: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(mongo_url).await?;
        let samples = client.database(DATABASE).collection(SAMPLE_COLLECTION);

        Ok(Self { samples })
    }
}

fn window_filter(user_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Document {
    doc! {
        "userId": user_id,
        "date": {
            "$gte": bson::DateTime::from_chrono(start),
            "$lt": bson::DateTime::from_chrono(end),
        },
    }
}

fn distinct_days_pipeline(user_id: &str) -> Vec<Document> {
    vec![
        doc! { "$match": { "userId": user_id } },
        doc! { "$group": {
            "_id": { "$dateToString": { "format": "%Y-%m-%d", "date": "$date" } },
        } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

#[async_trait]
impl SampleStore for MongoSampleStore {
    async fn insert_many(&self, samples: &[Sample]) -> Result<(), StoreError> {
        let documents: Vec<SampleDocument> = samples.iter().map(SampleDocument::from).collect();
        self.samples.insert_many(documents).await?;

        Ok(())
    }

    async fn samples_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sample>, StoreError> {
        let mut cursor = self.samples.find(window_filter(user_id, start, end)).await?;

        let mut samples = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            samples.push(document.into());
        }

        Ok(samples)
    }

    async fn distinct_days(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let mut cursor = self.samples.aggregate(distinct_days_pipeline(user_id)).await?;

        let mut days = Vec::new();
        while let Some(group) = cursor.try_next().await? {
            if let Ok(day) = group.get_str("_id") {
                days.push(day.to_string());
            }
        }

        Ok(days)
    }
}
