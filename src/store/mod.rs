// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Secure key-value persistence for the credential bundle and cached user.
//!
//! The store holds opaque byte blobs under fixed keys; it carries no
//! business logic. Two implementations are provided:
//!
//! - [`FileTokenStore`] — owner-only files under the per-user app
//!   directory; this is the hardened backend used by the application
//! - [`MemoryTokenStore`] — an in-memory map for tests

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::StoreError;

/// Key under which the JSON-encoded token bundle is persisted.
pub const AUTH_TOKENS_KEY: &str = "auth_tokens";

/// Key under which the serialized cached user record is persisted.
pub const CACHED_USER_KEY: &str = "cached_user";

/// A secure key-value persistence abstraction for opaque blobs.
pub trait TokenStore: Send + Sync {
    /// Persist `bytes` under `key`, replacing any previous value.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Load the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete the value stored under `key`. Deleting an absent key is not
    /// an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
