// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session management: the signed-in/out state machine, persisted
//! credentials, and the background refresh schedule.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     SessionManager                       │
//! │  (sign_in, restore_session, refresh_user_data, sign_out) │
//! └──────────────────────────────────────────────────────────┘
//!            │                  │                  │
//!            ▼                  ▼                  ▼
//!   ┌────────────────┐  ┌──────────────┐  ┌────────────────┐
//!   │    UserApi     │  │  TokenStore  │  │  RefreshTimer  │
//!   │ (user fetches) │  │ (credentials │  │ (5-min ticks)  │
//!   │                │  │  + cache)    │  │                │
//!   └────────────────┘  └──────────────┘  └────────────────┘
//! ```
//!
//! State transitions are serialized on one internal lock, so concurrent
//! operations observe the state left by the previously completed
//! transition. Every transition is published on a broadcast channel;
//! subscribers that fall behind a full buffer miss intermediate states,
//! so consumers that need every transition should size the buffer up.
//!
//! # Example
//!
//! ```rust,ignore
//! use nosh::session::SessionManager;
//!
//! let session = SessionManager::new(users, auth, store, &config);
//! session.restore_session().await?;
//! if !session.is_signed_in().await {
//!     session.sign_in("u1").await?;
//! }
//! println!("hello, {:?}", session.user_first_name().await);
//! ```

mod manager;
mod refresh;

pub use manager::SessionManager;
