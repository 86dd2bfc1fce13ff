// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! User fetch and creation against the backend.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiClient, Endpoint};
use crate::error::ApiError;
use crate::services::auth::SignUpRequest;
use crate::types::User;

/// The user-fetch operation the session manager depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Fetch a user record by id.
    async fn fetch_user(&self, id: &str) -> Result<User, ApiError>;
}

/// Backend-backed implementation of [`UserApi`].
pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Create a user record (sign-up) and return the created record.
    pub async fn create_user(&self, request: &SignUpRequest) -> Result<User, ApiError> {
        self.client.request(&Endpoint::create_user(request)).await
    }
}

#[async_trait]
impl UserApi for UserService {
    async fn fetch_user(&self, id: &str) -> Result<User, ApiError> {
        self.client.request(&Endpoint::get_user(id)).await
    }
}
