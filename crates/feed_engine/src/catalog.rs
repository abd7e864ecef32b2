use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE};
use serde::Serialize;

use feed_core::{ItemId, Wallpaper};
use feed_logging::feed_debug;

use crate::{CountSource, FailureKind, FetchError, RandomSampleSource};

const RANDOM_RPC_PATH: &str = "rest/v1/rpc/get_random_wallpapers";
const COUNT_PATH: &str = "rest/v1/wallpapers?select=id";

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Project root, e.g. `https://xyz.example.co`.
    pub base_url: String,
    /// Public (anon) key sent as `apikey` and bearer token.
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    /// Cap on exclusion ids forwarded in one RPC call.
    pub max_exclusions: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            max_exclusions: 500,
        }
    }
}

#[derive(Serialize)]
struct SampleRequest<'a> {
    batch_size: usize,
    excluded_ids: &'a [ItemId],
}

/// Catalog backed by the hosted REST/RPC endpoints.
#[derive(Debug, Clone)]
pub struct RestCatalog {
    settings: CatalogSettings,
    client: reqwest::Client,
    rpc_url: reqwest::Url,
    count_url: reqwest::Url,
}

impl RestCatalog {
    pub fn new(settings: CatalogSettings) -> Result<Self, FetchError> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = reqwest::Url::parse(&base)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let rpc_url = base
            .join(RANDOM_RPC_PATH)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let count_url = base
            .join(COUNT_PATH)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let client = build_client(&settings)?;
        Ok(Self {
            settings,
            client,
            rpc_url,
            count_url,
        })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl RandomSampleSource for RestCatalog {
    async fn sample(
        &self,
        count: usize,
        exclude_hint: &[ItemId],
    ) -> Result<Vec<Wallpaper>, FetchError> {
        let skip = exclude_hint
            .len()
            .saturating_sub(self.settings.max_exclusions);
        let body = serde_json::to_vec(&SampleRequest {
            batch_size: count,
            excluded_ids: &exclude_hint[skip..],
        })
        .map_err(|err| FetchError::new(FailureKind::InvalidRequest, err.to_string()))?;

        let response = self
            .client
            .post(self.rpc_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(&response)?;

        let bytes = self.read_body(response).await?;
        // The RPC answers `null` when nothing matches.
        let rows: Option<Vec<Wallpaper>> = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        let rows = rows.unwrap_or_default();
        feed_debug!(
            "Random sample asked {} excluding {} got {}",
            count,
            exclude_hint.len() - skip,
            rows.len()
        );
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl CountSource for RestCatalog {
    async fn total(&self) -> Result<u64, FetchError> {
        let response = self
            .client
            .head(self.count_url.clone())
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(&response)?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| FetchError::new(FailureKind::Decode, "missing Content-Range"))?;
        parse_content_range_total(range)
            .ok_or_else(|| FetchError::new(FailureKind::Decode, format!("bad Content-Range {range:?}")))
    }
}

/// Extracts the total from `0-24/573` or `*/573`.
fn parse_content_range_total(range: &str) -> Option<u64> {
    let (_, total) = range.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

fn build_client(settings: &CatalogSettings) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(&settings.api_key)
        .map_err(|err| FetchError::new(FailureKind::InvalidRequest, err.to_string()))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
        .map_err(|err| FetchError::new(FailureKind::InvalidRequest, err.to_string()))?;
    headers.insert("apikey", key);
    headers.insert(AUTHORIZATION, bearer);

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .default_headers(headers)
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

fn ensure_success(response: &reqwest::Response) -> Result<(), FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_content_range_total;

    #[test]
    fn content_range_total_forms() {
        assert_eq!(parse_content_range_total("0-24/573"), Some(573));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("573"), None);
    }
}
