//! PSA Car Controller HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use psacc_core::{ApiError, ApiResult, VehicleApi};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use url::Url;

use crate::endpoints;
use crate::error::classify;

/// Total request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// PSA Car Controller REST client
///
/// Holds no mutable state beyond its configuration, so one instance can be
/// cloned and shared across concurrent command handlers.
#[derive(Debug, Clone)]
pub struct PsaccClient {
    client: Client,
    api_url: String,
}

impl PsaccClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_url` - Base URL of the service (e.g., "http://localhost:5000").
    ///   A trailing slash is ignored.
    pub fn new(api_url: &str) -> ApiResult<Self> {
        Self::with_config(api_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        api_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> ApiResult<Self> {
        Url::parse(api_url)
            .map_err(|e| ApiError::generic(format!("Invalid API URL '{}': {}", api_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ApiError::generic(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL with any trailing slash removed
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue one request and return the parsed JSON body.
    ///
    /// No schema validation happens here; the body is returned as received.
    /// An empty body parses as `null`.
    #[instrument(skip(self, data))]
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.api_url, endpoint);
        debug!(%method, %url, ?data, "Request");

        let mut builder = self.client.request(method, &url);
        if let Some(body) = data {
            builder = builder.json(body);
        }

        let result = async {
            let response = builder.send().await?.error_for_status()?;
            response.bytes().await
        }
        .await
        .map_err(|e| {
            let err = classify(e);
            error!(%url, error = %err, "Error calling PSACC API");
            err
        })?;

        if result.is_empty() {
            debug!("Response: <empty>");
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_slice(&result).map_err(|e| {
            error!(%url, error = %e, "Unexpected response body");
            ApiError::generic(format!("Invalid JSON response: {}", e))
        })?;
        debug!(response = %value, "Response");

        Ok(value)
    }

    /// Run a command request, logging and swallowing any failure
    async fn command(
        &self,
        action: &'static str,
        method: Method,
        endpoint: &str,
        data: Option<&Value>,
    ) -> bool {
        match self.request(method, endpoint, data).await {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Failed to {}", action);
                false
            }
        }
    }
}

#[async_trait]
impl VehicleApi for PsaccClient {
    #[instrument(skip(self))]
    async fn list_vehicles(&self) -> ApiResult<Vec<Value>> {
        match self.request(Method::GET, endpoints::VEHICLES, None).await? {
            Value::Array(vehicles) => Ok(vehicles),
            other => {
                debug!(response = %other, "Vehicle listing is not a list");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_vehicle_status(&self, vin: &str) -> ApiResult<Value> {
        self.request(Method::GET, &endpoints::status(vin), None)
            .await
    }

    async fn start_charge(&self, vin: &str) -> bool {
        let endpoint = endpoints::charge_now(vin, true);
        self.command("start charge", Method::POST, &endpoint, None)
            .await
    }

    async fn stop_charge(&self, vin: &str) -> bool {
        let endpoint = endpoints::charge_now(vin, false);
        self.command("stop charge", Method::POST, &endpoint, None)
            .await
    }

    async fn set_charge_threshold(&self, vin: &str, threshold: u8) -> bool {
        let data = json!({ "vin": vin, "percentage": threshold });
        self.command(
            "set charge threshold",
            Method::POST,
            endpoints::CHARGE_THRESHOLD,
            Some(&data),
        )
        .await
    }

    async fn set_charge_schedule(&self, vin: &str, start_time: &str, end_time: &str) -> bool {
        let data = json!({ "vin": vin, "start": start_time, "end": end_time });
        self.command(
            "set charge schedule",
            Method::POST,
            endpoints::CHARGE_HOUR,
            Some(&data),
        )
        .await
    }

    async fn start_climate(&self, vin: &str, temperature: f64) -> bool {
        let endpoint = endpoints::climate_start(vin, temperature);
        self.command("start climate", Method::POST, &endpoint, None)
            .await
    }

    async fn stop_climate(&self, vin: &str) -> bool {
        let endpoint = endpoints::climate_stop(vin);
        self.command("stop climate", Method::POST, &endpoint, None)
            .await
    }

    async fn wakeup(&self, vin: &str) -> bool {
        let endpoint = endpoints::wakeup(vin);
        self.command("wake up vehicle", Method::POST, &endpoint, None)
            .await
    }

    async fn horn(&self, vin: &str, count: u8) -> bool {
        let endpoint = endpoints::horn(vin, count);
        self.command("sound horn", Method::POST, &endpoint, None)
            .await
    }

    async fn flash_lights(&self, vin: &str, count: u8) -> bool {
        let endpoint = endpoints::lights(vin, count);
        self.command("flash lights", Method::POST, &endpoint, None)
            .await
    }

    async fn lock_doors(&self, vin: &str) -> bool {
        let endpoint = endpoints::lock(vin);
        self.command("lock doors", Method::POST, &endpoint, None)
            .await
    }

    async fn unlock_doors(&self, vin: &str) -> bool {
        let endpoint = endpoints::unlock(vin);
        self.command("unlock doors", Method::POST, &endpoint, None)
            .await
    }
}
