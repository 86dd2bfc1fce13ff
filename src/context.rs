// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Application context: every long-lived object, constructed once.
//!
//! There are no global singletons in this crate. The context wires the
//! config, API client, token store, services, and session manager
//! together at process start; consumers receive what they need by
//! reference or clone of the shared handles.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::services::{
    AddressService, AuthBackend, ProfileService, StubAuthBackend, UserService,
};
use crate::session::SessionManager;
use crate::store::{FileTokenStore, TokenStore};

/// The wired-up client layer.
pub struct AppContext {
    pub config: ClientConfig,
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionManager>,
    pub users: Arc<UserService>,
    pub addresses: AddressService,
    pub profile: ProfileService,
}

impl AppContext {
    /// Build the context with the file-backed token store at its default
    /// per-user location.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let store = Arc::new(FileTokenStore::open()?);
        Self::with_store(config, store)
    }

    /// Build the context over a specific token store (useful for tests).
    pub fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config)?);
        let users = Arc::new(UserService::new(api.clone()));
        let auth: Arc<dyn AuthBackend> = Arc::new(StubAuthBackend::new());

        let session = SessionManager::new(users.clone(), auth, store, &config);
        let addresses = AddressService::new(api.clone());
        let profile = ProfileService::new(api.clone(), config.gateway_base_url.clone());

        Ok(Self {
            config,
            api,
            session,
            users,
            addresses,
            profile,
        })
    }
}
