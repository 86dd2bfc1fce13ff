// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP access to the backend API.
//!
//! This module provides the typed request path the rest of the client is
//! built on:
//!
//! - [`endpoint::Endpoint`] - a value describing one backend route (path,
//!   method, headers, optional JSON body, category label)
//! - [`client::ApiClient`] - issues requests against a configured base
//!   address and classifies responses into [`crate::error::ApiError`]
//! - [`decode`] - pure bytes-to-record decoding against the wire schema
//!
//! # Example
//!
//! ```rust,ignore
//! use nosh::api::{ApiClient, Endpoint};
//! use nosh::types::User;
//!
//! let client = ApiClient::new(&config)?;
//! let user: User = client.request(&Endpoint::get_user("u1")).await?;
//! ```

pub mod client;
pub mod decode;
pub mod endpoint;

pub use client::ApiClient;
pub use decode::decode_json;
pub use endpoint::{Endpoint, Method};
