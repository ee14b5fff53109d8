//! HTTP client for the conditions/route endpoint.
//!
//! One GET per fetch, keyed on the vehicle's location, bearing and lookahead
//! distance. Transport failures are retried with exponential backoff; HTTP
//! error statuses are returned to the caller as-is.

use log::{debug, info, warn};
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::session::Conditions;
use crate::{conditions, GeoPoint, GeofenceError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.mogolinc.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;
const BACKOFF_BASE_MS: u64 = 200;

/// Connection settings for [`ConditionsClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Scheme and host, without a trailing slash.
    pub base_url: String,
    /// Sent as the `x-api-key` header.
    pub api_key: String,
    pub timeout_secs: u64,
    /// Retries after the first attempt, transport errors only.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

pub struct ConditionsClient {
    client: Client,
    config: ClientConfig,
}

impl ConditionsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeofenceError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request URL for conditions ahead of `location`. A missing bearing is
    /// sent as 0.
    pub fn request_url(&self, location: &GeoPoint, lookahead_meters: f64) -> String {
        format!(
            "{}/conditions/route?location={:.6},{:.6}&bearing={:.6}&distance={:.0}&f=coordinates",
            self.config.base_url.trim_end_matches('/'),
            location.latitude,
            location.longitude,
            location.bearing.unwrap_or(0.0),
            lookahead_meters
        )
    }

    /// Fetch route and advisories ahead of `location`.
    pub async fn fetch(&self, location: &GeoPoint, lookahead_meters: f64) -> Result<Conditions> {
        let url = self.request_url(location, lookahead_meters);
        let mut retries = 0;
        let req_start = Instant::now();
        debug!("[Conditions] GET {}", url);

        loop {
            let response = self
                .client
                .get(&url)
                .header("x-api-key", &self.config.api_key)
                .header("Content-Type", "application/json")
                .send()
                .await;

            let resp = match response {
                Ok(resp) => resp,
                Err(e) => {
                    retries += 1;
                    if retries > self.config.max_retries {
                        warn!("[Conditions] Giving up after {} retries: {}", self.config.max_retries, e);
                        return Err(e.into());
                    }

                    let wait = Duration::from_millis(BACKOFF_BASE_MS * (1 << retries));
                    warn!("[Conditions] Error: {}, retry {} after {:?}", e, retries, wait);
                    tokio::time::sleep(wait).await;
                    continue;
                }
            };

            let status = resp.status();
            let bytes = resp.bytes().await?;

            if !status.is_success() {
                let body = String::from_utf8_lossy(&bytes).into_owned();
                warn!("[Conditions] HTTP {} after {:?}", status, req_start.elapsed());
                return Err(GeofenceError::Status { status: status.as_u16(), body });
            }

            let decode_start = Instant::now();
            let conditions = conditions::decode(&bytes)?;

            info!(
                "[Conditions] total={:?} decode={:?} body={:.1}KB route_points={} advisories={}",
                req_start.elapsed(),
                decode_start.elapsed(),
                bytes.len() as f64 / 1024.0,
                conditions.route.as_ref().map_or(0, Vec::len),
                conditions.advisories.len()
            );
            return Ok(conditions);
        }
    }
}

/// Synchronous wrapper for FFI - runs the fetch on a current-thread runtime
#[cfg(feature = "ffi")]
pub fn fetch_conditions_sync(
    config: ClientConfig,
    location: GeoPoint,
    lookahead_meters: f64,
) -> Result<Conditions> {
    use tokio::runtime::Builder;

    debug!("[FFI] fetch_conditions_sync base_url={}", config.base_url);

    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| GeofenceError::Client(format!("Runtime error: {}", e)))?;

    let client = ConditionsClient::new(config)?;
    rt.block_on(client.fetch(&location, lookahead_meters))
}
