use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::shipment::Shipment;

/// Container keys checked for the shipment collection, in priority order.
const CONTAINER_KEYS: [&str; 3] = ["shipments", "results", "data"];

const BODY_EXCERPT_LEN: usize = 500;

/// Recoverable failures of one feed read. None of these abort the poll loop;
/// the tick that hit the failure finishes with zero shipments.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("feed body is not valid JSON: {0}")]
    Body(#[source] serde_json::Error),
}

/// Source of the current shipment collection.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Shipment>, FetchError>;
}

/// Fetches listings from the shipment feed with a bearer credential.
pub struct FeedFetcher {
    client: reqwest::Client,
    feed_url: String,
    bearer_token: String,
}

impl FeedFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            feed_url: config.feed_url.clone(),
            bearer_token: config.auth_bearer_token.clone(),
        }
    }
}

#[async_trait]
impl ListingSource for FeedFetcher {
    async fn fetch(&self) -> Result<Vec<Shipment>, FetchError> {
        let response = self
            .client
            .get(&self.feed_url)
            .header("Authorization", format!("Bearer {}", self.bearer_token))
            .send()
            .await?;

        let status = response.status();
        debug!("Feed status: {}", status);

        let body = response.text().await?;
        debug!(
            "Feed body (first {} bytes): {}",
            BODY_EXCERPT_LEN,
            excerpt(&body, BODY_EXCERPT_LEN)
        );

        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let parsed: Value = serde_json::from_str(&body).map_err(FetchError::Body)?;
        Ok(extract_shipments(&parsed))
    }
}

/// Locate the shipment collection under the first recognized container key.
/// A body with no recognized key is an empty collection, not an error.
pub fn extract_shipments(body: &Value) -> Vec<Shipment> {
    for key in CONTAINER_KEYS {
        let Some(found) = body.get(key) else {
            continue;
        };
        debug!("Shipments pulled from key: '{}'", key);

        let Some(items) = found.as_array() else {
            warn!("Container key '{}' does not hold an array", key);
            return Vec::new();
        };

        return items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(shipment) => Some(shipment),
                Err(e) => {
                    warn!("Skipping malformed shipment record: {}", e);
                    None
                }
            })
            .collect();
    }

    warn!("No recognizable shipment key in feed response");
    Vec::new()
}

/// Truncate to at most `max_len` bytes without splitting a UTF-8 char.
fn excerpt(body: &str, max_len: usize) -> &str {
    if body.len() <= max_len {
        return body;
    }
    let mut end = max_len;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shipments_key_takes_priority() {
        let body = json!({
            "shipments": [{ "id": 1 }],
            "results": [{ "id": 2 }],
            "data": [{ "id": 3 }]
        });

        let shipments = extract_shipments(&body);
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_results_key_used_when_shipments_absent() {
        let body = json!({ "results": [{ "id": 2 }], "data": [{ "id": 3 }] });

        let shipments = extract_shipments(&body);
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_data_key_collection_returned_exactly() {
        let body = json!({ "data": [{ "id": 3 }, { "id": 4 }, {}] });

        let shipments = extract_shipments(&body);
        assert_eq!(shipments.len(), 3);
        assert_eq!(shipments[0].id.as_deref(), Some("3"));
        assert_eq!(shipments[1].id.as_deref(), Some("4"));
        assert!(shipments[2].id.is_none());
    }

    #[test]
    fn test_unrecognized_shape_is_empty() {
        let body = json!({ "items": [{ "id": 5 }] });
        assert!(extract_shipments(&body).is_empty());
    }

    #[test]
    fn test_non_array_container_is_empty() {
        let body = json!({ "shipments": { "id": 5 } });
        assert!(extract_shipments(&body).is_empty());
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let body = "ab\u{1F4E6}cd";
        // The emoji starts at byte 2 and is 4 bytes wide.
        assert_eq!(excerpt(body, 3), "ab");
        assert_eq!(excerpt(body, 6), "ab\u{1F4E6}");
        assert_eq!(excerpt(body, 100), body);
    }
}
