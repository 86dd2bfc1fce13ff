// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Core domain types shared across the client layer.
//!
//! These records mirror the backend's JSON wire schema: Mongo-style `_id`
//! keys, camelCase field names, ISO-8601 timestamps, and a `__v` version
//! counter maintained by the backend.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long before expiry a token bundle counts as expiring soon.
const EXPIRY_GRACE_SECS: i64 = 300;

/// A geographic point in GeoJSON form: `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

impl GeoLocation {
    /// Create a point location from a longitude/latitude pair.
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: vec![longitude, latitude],
        }
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }
}

/// A saved delivery address. Immutable once received; the list on [`User`]
/// is replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub street: String,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub entry_code: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default)]
    pub drop_off_option: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub address_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Profile photo URLs as served by the image gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhoto {
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// The signed-in user's identity record.
///
/// Owned by the session manager once signed in and replaced wholesale on
/// every successful fetch; there is no partial merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<ProfilePhoto>,
    #[serde(default)]
    pub delivery_addresses: Vec<DeliveryAddress>,
    #[serde(default)]
    pub payment_methods: Vec<String>,
    #[serde(default)]
    pub order_history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Backend-maintained monotonically increasing version counter.
    #[serde(rename = "__v", default)]
    pub version: u64,
}

impl User {
    /// The user's default delivery address, if one is marked.
    pub fn default_address(&self) -> Option<&DeliveryAddress> {
        self.delivery_addresses.iter().find(|a| a.is_default)
    }
}

/// An opaque credential bundle for backend calls.
///
/// Created at sign-in, replaced at refresh, deleted at sign-out. Persisted
/// exclusively in the token store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthTokens {
    /// True once the current time has reached the expiry instant.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// True if the bundle expires within the next five minutes.
    pub fn will_expire_soon(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_GRACE_SECS) >= self.expires_at
    }
}

/// A chat message as carried over the chat WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The authoritative in-memory representation of whether a user is
/// signed in. Exactly one state holds at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    SignedOut,
    Loading,
    SignedIn(User),
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    /// The current user, when signed in.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignedOut => write!(f, "signed_out"),
            Self::Loading => write!(f, "loading"),
            Self::SignedIn(user) => write!(f, "signed_in({})", user.id),
        }
    }
}
