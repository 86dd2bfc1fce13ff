// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Nosh - client-side session and API access layer.
//!
//! The Rust implementation of the session core shared by the Nosh
//! food-delivery clients: a typed HTTP client, a secure token store, a
//! session state machine with cached user data, and the background
//! refresh schedule that keeps it fresh.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`types`] - Core domain records (User, DeliveryAddress, AuthTokens, SessionState)
//! - [`error`] - Error types and result aliases
//! - [`config`] - Configuration loading and env overrides
//! - [`api`] - Typed HTTP client, endpoint descriptions, response decoding
//! - [`store`] - Secure key-value persistence for credentials and cache
//! - [`session`] - The session state machine and its refresh schedule
//! - [`services`] - Thin backend services (users, addresses, profile, auth)
//! - [`telemetry`] - Tracing, correlation ids, and log redaction
//! - [`context`] - One-shot wiring of everything above
//!
//! # Example
//!
//! ```rust,ignore
//! use nosh::config::load_config;
//! use nosh::context::AppContext;
//!
//! let ctx = AppContext::new(load_config()?)?;
//! ctx.session.restore_session().await?;
//! if !ctx.session.is_signed_in().await {
//!     ctx.session.sign_in("u1").await?;
//! }
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod services;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{ApiClient, Endpoint, Method};
pub use context::AppContext;
pub use error::{ApiError, ConfigError, Result, SessionError, StoreError};
pub use session::SessionManager;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{AuthTokens, DeliveryAddress, SessionState, User};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
