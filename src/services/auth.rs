// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Authentication backend seam.
//!
//! Credential verification and token issuance belong to an external
//! authentication backend. The session manager only depends on this trait;
//! the bundled implementation is a stub that returns placeholder
//! identifiers and issues a fixed one-hour token bundle.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::types::AuthTokens;

/// Lifetime of a stub-issued token bundle, in seconds.
pub const PLACEHOLDER_TOKEN_TTL_SECS: i64 = 3600;

/// Sign-up payload for `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub country_code: String,
}

/// External authentication collaborator.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Verify credentials and return the user id to sign in as.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, SessionError>;

    /// Register a new account and return the created user id.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, SessionError>;

    /// Issue a token bundle for a signed-in user.
    fn issue_tokens(&self, user_id: &str) -> AuthTokens;
}

/// Stub backend returning placeholder identifiers.
#[derive(Debug, Default)]
pub struct StubAuthBackend;

impl StubAuthBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthBackend for StubAuthBackend {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<String, SessionError> {
        // TODO: verify credentials against the auth backend once it exists.
        Ok("dummy_user_id".to_string())
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> Result<String, SessionError> {
        // TODO: register through the auth backend once it exists.
        Ok("dummy_user_id".to_string())
    }

    fn issue_tokens(&self, _user_id: &str) -> AuthTokens {
        AuthTokens {
            access_token: format!("stub-access-{}", Uuid::new_v4()),
            refresh_token: format!("stub-refresh-{}", Uuid::new_v4()),
            expires_at: Utc::now() + Duration::seconds(PLACEHOLDER_TOKEN_TTL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_sign_in_returns_placeholder_id() {
        let backend = StubAuthBackend::new();
        let id = backend.sign_in("ann@example.com", "pw").await.unwrap();
        assert_eq!(id, "dummy_user_id");
    }

    #[test]
    fn test_issued_tokens_expire_in_one_hour() {
        let backend = StubAuthBackend::new();
        let tokens = backend.issue_tokens("u1");

        let ttl = tokens.expires_at - Utc::now();
        assert!(ttl > Duration::seconds(PLACEHOLDER_TOKEN_TTL_SECS - 5));
        assert!(ttl <= Duration::seconds(PLACEHOLDER_TOKEN_TTL_SECS));
        assert!(!tokens.is_expired());
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let backend = StubAuthBackend::new();
        let a = backend.issue_tokens("u1");
        let b = backend.issue_tokens("u1");
        assert_ne!(a.access_token, b.access_token);
        assert_ne!(a.refresh_token, b.refresh_token);
    }

    #[test]
    fn test_sign_up_request_wire_keys() {
        let request = SignUpRequest {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            phone_number: "+15550100".to_string(),
            country_code: "+1".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["firstName"], "Ann");
        assert_eq!(value["phoneNumber"], "+15550100");
    }
}
