//! Day-window reads and distinct-day pagination over the sample store.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::StoreError;
use crate::samples::Sample;
use crate::store::SampleStore;

pub const PAGE_SIZE: usize = 7;

/// UTC window for one calendar day. The end bound is 23:59:59.000 and the
/// filter is `[start, end)`, so the final second of the day is excluded; this
/// matches the recorded behavior of the service and is pinned by tests.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = day.and_hms_opt(23, 59, 59).expect("valid wall time").and_utc();

    (start, end)
}

pub async fn samples_for_day(
    store: &dyn SampleStore,
    user_id: &str,
    day: NaiveDate,
) -> Result<Vec<Sample>, StoreError> {
    let (start, end) = day_bounds(day);
    store.samples_between(user_id, start, end).await
}

pub fn page_slice(days: &[String], page: u32) -> Vec<String> {
    let start = (page as usize).saturating_mul(PAGE_SIZE);

    days.iter().skip(start).take(PAGE_SIZE).cloned().collect()
}

/// One page of the user's distinct days with data, sorted ascending.
/// Out-of-range pages and users with no data yield an empty page.
pub async fn list_days(
    store: &dyn SampleStore,
    user_id: &str,
    page: u32,
) -> Result<Vec<String>, StoreError> {
    let days = store.distinct_days(user_id).await?;

    Ok(page_slice(&days, page))
}
