// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Profile updates and photo upload-URL retrieval.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, Endpoint};
use crate::error::{ApiError, SessionError};
use crate::types::User;

/// A pre-signed upload ticket from the image gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    /// URL to PUT the image bytes to.
    pub upload_url: String,
    /// Public URL the image will be served from once uploaded.
    #[serde(default)]
    pub public_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate<'a> {
    first_name: &'a str,
    last_name: &'a str,
    phone: &'a str,
}

/// Profile operations against the backend and the image gateway.
pub struct ProfileService {
    client: Arc<ApiClient>,
    gateway_base_url: String,
}

impl ProfileService {
    pub fn new(client: Arc<ApiClient>, gateway_base_url: impl Into<String>) -> Self {
        Self {
            client,
            gateway_base_url: gateway_base_url.into(),
        }
    }

    /// Update the user's editable profile fields and return the updated
    /// record.
    pub async fn update_user_profile(
        &self,
        user_id: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<User, ApiError> {
        let payload = ProfileUpdate {
            first_name,
            last_name,
            phone,
        };
        self.client
            .request(&Endpoint::update_user(user_id, &payload))
            .await
    }

    /// Fetch a pre-signed upload URL from the image gateway.
    pub async fn fetch_photo_upload_url(&self) -> Result<UploadTicket, ApiError> {
        self.client
            .request(&Endpoint::image_upload_url(&self.gateway_base_url))
            .await
    }

    /// Delete the user's profile photo.
    pub async fn delete_profile_photo(&self) -> Result<(), SessionError> {
        // TODO: wire up once the backend exposes a photo-delete route.
        Err(SessionError::not_implemented("profile photo deletion"))
    }
}
