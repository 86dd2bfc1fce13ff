// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Redaction of sensitive keys in log metadata.

use serde_json::Value;

/// Keys whose values are never emitted in logs. Matching is exact on the
/// lowercased key, recursively through nested maps.
pub const SENSITIVE_KEYS: &[&str] = &["password", "token", "secret", "key", "authorization"];

/// Marker substituted for redacted values.
pub const REDACTED_MARKER: &str = "***REDACTED***";

/// Redact sensitive entries in a metadata value, in place.
pub fn redact_metadata(value: &mut Value) {
    if let Value::Object(map) = value {
        for (key, entry) in map.iter_mut() {
            if SENSITIVE_KEYS.contains(&key.to_lowercase().as_str()) {
                *entry = Value::String(REDACTED_MARKER.to_string());
            } else {
                redact_metadata(entry);
            }
        }
    }
}

/// Redact a metadata value, returning the sanitized copy.
pub fn redacted(mut value: Value) -> Value {
    redact_metadata(&mut value);
    value
}
