// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::airbyte::traits::{AirbyteError, JobApi};
use crate::config::settings::AirbyteSettings;
use crate::utils::json::remove_nested_attribute;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

/// Airbyte HTTP 客户端
///
/// 所有调用均为 POST，超时由配置决定（默认 30 秒）
pub struct AirbyteClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AirbyteClient {
    pub fn new(settings: &AirbyteSettings) -> Result<Self, AirbyteError> {
        Self::with_base_url(
            settings.base_url(),
            settings.token.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    /// 指定根路径创建客户端
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AirbyteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AirbyteError::Connectivity(e.to_string()))?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    fn record_failure(endpoint: &str) {
        metrics::counter!("airbyte_request_failures_total", "endpoint" => endpoint.to_string())
            .increment(1);
    }
}

#[async_trait]
impl JobApi for AirbyteClient {
    async fn request(&self, endpoint: &str, payload: Value) -> Result<Value, AirbyteError> {
        let endpoint = endpoint.trim_start_matches('/');
        info!("Making request to Airbyte server: {}", endpoint);
        metrics::counter!("airbyte_requests_total", "endpoint" => endpoint.to_string())
            .increment(1);

        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .header(AUTHORIZATION, format!("Basic {}", self.token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Error connecting to Airbyte server: {}", e);
                Self::record_failure(endpoint);
                AirbyteError::Connectivity(e.to_string())
            })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        let text = response.text().await.map_err(|e| {
            Self::record_failure(endpoint);
            AirbyteError::Connectivity(e.to_string())
        })?;

        let body = serde_json::from_str::<Value>(&text).ok();
        match &body {
            Some(value) => debug!(
                "Response from Airbyte server: {}",
                remove_nested_attribute(value.clone(), "icon")
            ),
            None => debug!("Response from Airbyte server: {}", text),
        }

        if !status.is_success() {
            Self::record_failure(endpoint);
            let message = body
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            error!("Airbyte {} failed with status {}: {}", endpoint, status, message);
            return Err(AirbyteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if !is_json {
            return Ok(json!({}));
        }
        body.ok_or_else(|| {
            AirbyteError::UnexpectedResponse(format!("{} returned malformed JSON", endpoint))
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
