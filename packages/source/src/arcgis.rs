//! `ArcGIS` REST feature query fetcher.
//!
//! Issues a single `FeatureServer` query by default. When a page size is
//! configured the fetcher pages with `resultOffset`/`resultRecordCount`
//! until the service stops setting `exceededTransferLimit`.

use async_trait::async_trait;
use frog_map_sighting_models::{FeatureQueryResponse, RawFeature};

use crate::{FeatureSource, SourceError};

/// Configuration for an `ArcGIS` feature query.
#[derive(Debug, Clone)]
pub struct ArcGisConfig {
    /// Full query URL including `where`, `outFields`, `outSR` and `f=json`.
    pub query_url: String,
    /// Records per page. `None` issues one unpaged request.
    pub page_size: Option<u64>,
    /// Label for log messages (e.g. `"Frog census"`).
    pub label: String,
}

/// [`FeatureSource`] backed by an `ArcGIS` `FeatureServer` layer.
pub struct ArcGisSource {
    client: reqwest::Client,
    config: ArcGisConfig,
}

impl ArcGisSource {
    /// Creates a source that queries through `client`.
    #[must_use]
    pub const fn new(client: reqwest::Client, config: ArcGisConfig) -> Self {
        Self { client, config }
    }

    async fn fetch_page(
        &self,
        offset: u64,
        page_size: Option<u64>,
    ) -> Result<FeatureQueryResponse, SourceError> {
        let mut request = self.client.get(&self.config.query_url);
        if let Some(size) = page_size {
            request = request.query(&[("resultOffset", offset), ("resultRecordCount", size)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;
        parse_query_response(body)
    }
}

#[async_trait]
impl FeatureSource for ArcGisSource {
    fn label(&self) -> &str {
        &self.config.label
    }

    async fn fetch_features(&self) -> Result<Vec<RawFeature>, SourceError> {
        let label = &self.config.label;
        let Some(page_size) = self.config.page_size else {
            log::info!("{label}: fetching {}", self.config.query_url);
            let page = self.fetch_page(0, None).await?;
            if page.exceeded_transfer_limit {
                log::warn!(
                    "{label}: service truncated the result at {} records; set a page size to fetch the rest",
                    page.features.len()
                );
            }
            return Ok(page.features.into_iter().map(|f| f.attributes).collect());
        };

        let mut all_features: Vec<RawFeature> = Vec::new();
        let mut offset: u64 = 0;

        loop {
            log::info!("{label}: offset={offset}, limit={page_size}");
            let page = self.fetch_page(offset, Some(page_size)).await?;

            let count = page.features.len() as u64;
            all_features.extend(page.features.into_iter().map(|f| f.attributes));
            offset += count;

            if count == 0 || !page.exceeded_transfer_limit {
                break;
            }
        }

        log::info!("{label}: download complete — {} records", all_features.len());
        Ok(all_features)
    }
}

/// Validates a query response body and converts it to typed features.
///
/// `ArcGIS` reports query failures as HTTP 200 with an `error` object, so
/// that shape is checked before the feature envelope.
///
/// # Errors
///
/// Returns [`SourceError::Service`] for an `ArcGIS` error body and
/// [`SourceError::MalformedData`] when the envelope or any feature's
/// attributes do not match the expected schema.
pub fn parse_query_response(body: serde_json::Value) -> Result<FeatureQueryResponse, SourceError> {
    if let Some(error) = body.get("error") {
        return Err(SourceError::Service {
            code: error
                .get("code")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or_default(),
            message: error
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    serde_json::from_value(body).map_err(|e| SourceError::MalformedData {
        message: format!("unexpected feature query response: {e}"),
    })
}
