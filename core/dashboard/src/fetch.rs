//! FILENAME: core/dashboard/src/fetch.rs
//! Fetch plumbing - response envelope, status handling, timeout, batching.
//!
//! The HTTP client itself lives outside this crate. It is reached through
//! `NotificationSource`, one `limit`/`offset` page at a time.

use std::future::Future;
use std::time::Duration;

use engine::NotificationRecord;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// `{data, count}` as returned by every notification endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchEnvelope {
    #[serde(default)]
    pub data: Vec<NotificationRecord>,
    /// Total rows available on the server, not the length of `data`.
    #[serde(default)]
    pub count: usize,
}

/// Turns a raw response into an envelope.
///
/// Non-2xx responses use the body text as the error message when there is
/// one, otherwise `"{context}: {status}"`. A 2xx response must declare a JSON
/// content type.
pub fn interpret_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
    context: &str,
) -> Result<FetchEnvelope, FetchError> {
    if !(200..300).contains(&status) {
        let message = if body.trim().is_empty() {
            format!("{}: {}", context, status)
        } else {
            body.to_string()
        };
        return Err(FetchError::Http { status, message });
    }

    if !content_type.is_some_and(|ct| ct.contains("application/json")) {
        return Err(FetchError::NonJson);
    }

    Ok(serde_json::from_str(body)?)
}

/// Runs `future` with a hard deadline.
pub async fn with_timeout<F, T>(limit: Duration, future: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("[FETCH] timed out after {}s", limit.as_secs());
            Err(FetchError::Timeout {
                seconds: limit.as_secs(),
            })
        }
    }
}

/// One paged notification endpoint.
pub trait NotificationSource {
    fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = Result<FetchEnvelope, FetchError>> + Send;
}

/// Offsets of the batched requests needed to read `count` rows.
pub fn batch_offsets(count: usize, batch_size: usize) -> Vec<usize> {
    if batch_size == 0 {
        return Vec::new();
    }
    (0..count).step_by(batch_size).collect()
}

/// Reads the whole feed: a `limit=1` probe for the total, then one request
/// per batch. `request_timeout` bounds each request on its own.
pub async fn fetch_all<S: NotificationSource>(
    source: &S,
    batch_size: usize,
    request_timeout: Duration,
) -> Result<FetchEnvelope, FetchError> {
    let probe = with_timeout(request_timeout, source.fetch_page(1, 0)).await?;
    let count = probe.count;
    let offsets = batch_offsets(count, batch_size);
    log::debug!("[FETCH] {} rows in {} batches", count, offsets.len());

    let mut data = Vec::with_capacity(count);
    for offset in offsets {
        let batch = with_timeout(request_timeout, source.fetch_page(batch_size, offset)).await?;
        data.extend(batch.data);
    }
    Ok(FetchEnvelope { data, count })
}
