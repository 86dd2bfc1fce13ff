// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the Nosh client layer.
//!
//! This module provides strongly-typed errors for different parts of the
//! client, using `thiserror` for ergonomic error definitions and `anyhow`
//! for error propagation at the binary boundary.

use thiserror::Error;

/// Errors that can occur while talking to the backend API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response")]
    InvalidResponse,

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Unauthorized")]
    Unauthorized,
}

impl ApiError {
    /// Create a server error from a status code and message body.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error came back as HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this error is a transport-level failure (DNS, connect,
    /// TLS, timeout) rather than a response the server produced.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkError(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::NetworkError(err.to_string())
        } else if err.is_decode() {
            Self::DecodingError(err.to_string())
        } else {
            Self::InvalidResponse
        }
    }
}

/// Errors that can occur in the token store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Errors that can occur during session operations.
///
/// Session errors carry a numeric domain code alongside the message, the
/// way the backend's own error payloads do.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Session expired")]
    SessionExpired,

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Domain code for this error.
    pub fn code(&self) -> u16 {
        match self {
            Self::NotSignedIn => 401,
            Self::SessionExpired => 440,
            Self::NotImplemented(_) => 501,
            Self::Api(_) => 502,
            Self::Store(_) => 500,
        }
    }

    /// Create a not-implemented error for a named operation.
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented(operation.into())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
