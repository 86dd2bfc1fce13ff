// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Typed HTTP client for the backend API.
//!
//! The client is stateless aside from its configuration: it composes the
//! absolute URL, attaches headers and a per-request correlation id, sends
//! the request with bounded timeouts, classifies the status code into the
//! [`ApiError`] taxonomy, and decodes successful bodies into typed records.
//!
//! There is deliberately no retry logic and no circuit breaking here;
//! token refresh on 401 is the session manager's responsibility, not the
//! client's.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::telemetry::{redacted, CorrelationId};

use super::decode::decode_json;
use super::endpoint::Endpoint;

/// Message substituted when an error body is empty or unreadable.
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Header carrying the per-request correlation id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Typed client for the backend API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from the resolved configuration.
    ///
    /// The per-request timeout bounds connection establishment and reads;
    /// the whole-resource timeout bounds the complete exchange.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.request_timeout_secs))
            .read_timeout(Duration::from_secs(config.request_timeout_secs))
            .timeout(Duration::from_secs(config.resource_timeout_secs))
            .build()
            .map_err(|err| ApiError::NetworkError(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured base address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and decode the response body as `T`.
    pub async fn request<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ApiError> {
        let base = endpoint
            .base_url
            .as_deref()
            .unwrap_or(&self.base_url)
            .trim_end_matches('/');
        let raw_url = format!("{}{}", base, endpoint.path);
        let url =
            Url::parse(&raw_url).map_err(|_| ApiError::InvalidUrl(raw_url.clone()))?;

        let correlation_id = CorrelationId::new();
        debug!(
            correlation_id = %correlation_id,
            category = endpoint.category,
            metadata = %redacted(endpoint.log_metadata()),
            "API request start"
        );

        let mut builder = self
            .http
            .request(endpoint.method.into(), url)
            .header(REQUEST_ID_HEADER, correlation_id.to_string());

        for (name, value) in &endpoint.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &endpoint.body {
            match serde_json::to_vec(body) {
                Ok(bytes) => builder = builder.body(bytes),
                // A body that fails to serialize is dropped and the
                // request goes out bodyless.
                Err(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "request body dropped")
                }
            }
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status().as_u16();
        debug!(correlation_id = %correlation_id, status, "API response");

        match status {
            200..=299 => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|err| ApiError::NetworkError(err.to_string()))?;
                let value = decode_json::<T>(&bytes);
                debug!(
                    correlation_id = %correlation_id,
                    decoded = value.is_ok(),
                    "API response decode"
                );
                value
            }
            401 => Err(ApiError::Unauthorized),
            _ => {
                let text = response.text().await.unwrap_or_default();
                let message = if text.is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    text
                };
                Err(ApiError::server(status, message))
            }
        }
    }
}
