// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Backend route descriptions.
//!
//! An [`Endpoint`] is a plain value describing one call: path, method,
//! headers, an optional JSON body map, and a logical category label used
//! in logs. Route constructors live here so the services stay thin.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A description of one backend call.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Path relative to the base address, e.g. `/users/u1`.
    pub path: String,
    pub method: Method,
    pub headers: HashMap<String, String>,
    /// Optional JSON body as a string-keyed map.
    pub body: Option<Map<String, Value>>,
    /// Logical category label for log correlation.
    pub category: &'static str,
    /// Base-address override, used by routes on the image gateway.
    pub base_url: Option<String>,
}

impl Endpoint {
    /// Create a GET endpoint with JSON headers.
    pub fn get(path: impl Into<String>, category: &'static str) -> Self {
        Self {
            path: path.into(),
            method: Method::Get,
            headers: json_headers(),
            body: None,
            category,
            base_url: None,
        }
    }

    /// Metadata describing this endpoint for structured logs. The caller
    /// is expected to pass the result through redaction before emission.
    pub fn log_metadata(&self) -> Value {
        let mut metadata = Map::new();
        metadata.insert("path".to_string(), Value::String(self.path.clone()));
        metadata.insert(
            "method".to_string(),
            Value::String(self.method.as_str().to_string()),
        );
        metadata.insert(
            "category".to_string(),
            Value::String(self.category.to_string()),
        );
        if let Some(body) = &self.body {
            metadata.insert("body".to_string(), Value::Object(body.clone()));
        }
        if let Some(base_url) = &self.base_url {
            metadata.insert("baseUrl".to_string(), Value::String(base_url.clone()));
        }
        Value::Object(metadata)
    }
}

// ============================================================================
// Route constructors
// ============================================================================

impl Endpoint {
    /// `GET /users/{id}` - fetch a user record.
    pub fn get_user(id: &str) -> Self {
        Self::get(format!("/users/{id}"), "User")
    }

    /// `POST /users` - create a user (sign-up).
    pub fn create_user(payload: &impl Serialize) -> Self {
        Self {
            path: "/users".to_string(),
            method: Method::Post,
            headers: json_headers(),
            body: to_body_map(payload),
            category: "User",
            base_url: None,
        }
    }

    /// `PUT /users/{id}` - update a user's profile fields.
    pub fn update_user(id: &str, payload: &impl Serialize) -> Self {
        Self {
            path: format!("/users/{id}"),
            method: Method::Put,
            headers: json_headers(),
            body: to_body_map(payload),
            category: "Profile",
            base_url: None,
        }
    }

    /// `POST /addresses/from-places` - save an address resolved from a
    /// places lookup. Authorized by identity via the `x-user-id` header.
    pub fn save_address_from_place(user_id: &str, payload: &impl Serialize) -> Self {
        let mut headers = json_headers();
        headers.insert("x-user-id".to_string(), user_id.to_string());

        Self {
            path: "/addresses/from-places".to_string(),
            method: Method::Post,
            headers,
            body: to_body_map(payload),
            category: "Address",
            base_url: None,
        }
    }

    /// `GET /images/upload` - fetch a pre-signed upload URL from the image
    /// gateway (separate base address).
    pub fn image_upload_url(gateway_base_url: &str) -> Self {
        let mut endpoint = Self::get("/images/upload", "Media");
        endpoint.base_url = Some(gateway_base_url.to_string());
        endpoint
    }

    /// Chat WebSocket address for a user: `ws://…/?userId={id}`.
    pub fn chat_socket_url(ws_base_url: &str, user_id: &str) -> String {
        format!("{}/?userId={}", ws_base_url.trim_end_matches('/'), user_id)
    }
}

fn json_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ])
}

/// Encode a payload to a JSON object map. An encoding failure or a
/// non-object payload yields `None` and the request goes out bodyless.
fn to_body_map(payload: &impl Serialize) -> Option<Map<String, Value>> {
    serde_json::to_value(payload)
        .ok()
        .and_then(|value| value.as_object().cloned())
}
