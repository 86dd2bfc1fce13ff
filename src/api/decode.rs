// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pure decoding of response bytes into typed domain records.
//!
//! Dates on the wire are ISO-8601; `chrono`'s serde support handles them
//! directly, so decoding is a single `serde_json` pass with the error
//! mapped into the client taxonomy.

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a JSON body into `T`, mapping failures to
/// [`ApiError::DecodingError`].
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::DecodingError(err.to_string()))
}
