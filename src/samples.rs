//! Incoming payload validation.
//!
//! A reading arrives as loose JSON, either one record or an array of records.
//! A record is kept iff all three fields are present and well typed: `userId`
//! a non-empty string, `date` an ISO-8601 instant, `accData` a finite number.
//! Anything else is dropped without failing the rest of the batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One accelerometer reading. Insert-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "accData")]
    pub value: f64,
}

pub fn parse_sample(candidate: &Value) -> Option<Sample> {
    let record = candidate.as_object()?;

    let user_id = record.get("userId")?.as_str()?;
    if user_id.is_empty() {
        return None;
    }

    let date = record.get("date")?.as_str()?;
    let timestamp = DateTime::parse_from_rfc3339(date).ok()?.with_timezone(&Utc);

    let value = record.get("accData")?.as_f64()?;
    if !value.is_finite() {
        return None;
    }

    Some(Sample {
        user_id: user_id.to_string(),
        timestamp,
        value,
    })
}

/// Normalizes a single record or an array of records into the valid samples,
/// in input order, plus the number of candidates that were dropped.
pub fn parse_batch(payload: &Value) -> (Vec<Sample>, usize) {
    let candidates = match payload {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    let samples: Vec<Sample> = candidates.iter().filter_map(parse_sample).collect();
    let rejected = candidates.len() - samples.len();

    (samples, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_record() {
        let sample = parse_sample(&json!({
            "userId": "u1",
            "date": "2024-03-01T10:00:00Z",
            "accData": 1.5,
        }))
        .unwrap();

        assert_eq!(sample.user_id, "u1");
        assert_eq!(
            sample.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(sample.value, 1.5);
    }

    #[test]
    fn rejects_record_missing_any_field() {
        for candidate in [
            json!({ "date": "2024-03-01T10:00:00Z", "accData": 1.5 }),
            json!({ "userId": "u1", "accData": 1.5 }),
            json!({ "userId": "u1", "date": "2024-03-01T10:00:00Z" }),
        ] {
            assert!(parse_sample(&candidate).is_none());
        }
    }

    #[test]
    fn rejects_mistyped_or_empty_fields() {
        for candidate in [
            json!({ "userId": 7, "date": "2024-03-01T10:00:00Z", "accData": 1.5 }),
            json!({ "userId": "", "date": "2024-03-01T10:00:00Z", "accData": 1.5 }),
            json!({ "userId": "u1", "date": "yesterday", "accData": 1.5 }),
            json!({ "userId": "u1", "date": "2024-03-01T10:00:00Z", "accData": "1.5" }),
            json!({ "userId": "u1", "date": "2024-03-01T10:00:00Z", "accData": null }),
        ] {
            assert!(parse_sample(&candidate).is_none());
        }
    }

    #[test]
    fn single_record_becomes_batch_of_one() {
        let (samples, rejected) = parse_batch(&json!({
            "userId": "u1",
            "date": "2024-03-01T10:00:00Z",
            "accData": 0.25,
        }));

        assert_eq!(samples.len(), 1);
        assert_eq!(rejected, 0);
    }

    #[test]
    fn array_drops_invalid_entries_and_keeps_order() {
        let (samples, rejected) = parse_batch(&json!([
            { "userId": "u1", "date": "2024-03-01T10:00:00Z", "accData": 1.0 },
            { "userId": "u1", "date": "not a date", "accData": 2.0 },
            { "userId": "u1", "date": "2024-03-01T11:00:00Z", "accData": 3.0 },
        ]));

        assert_eq!(rejected, 1);
        assert_eq!(
            samples.iter().map(|s| s.value).collect::<Vec<_>>(),
            vec![1.0, 3.0]
        );
    }

    #[test]
    fn scalar_payload_counts_as_one_reject() {
        let (samples, rejected) = parse_batch(&json!("not a record"));

        assert!(samples.is_empty());
        assert_eq!(rejected, 1);
    }
}
