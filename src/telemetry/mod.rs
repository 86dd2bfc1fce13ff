// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry and structured logging infrastructure.
//!
//! This module provides the client's observability plumbing:
//!
//! - **Tracing**: structured logging via `tracing` with env-filter control
//! - **Correlation IDs**: per-request identifiers linking a request to its
//!   response or error across async boundaries
//! - **Redaction**: sensitive metadata keys are scrubbed before emission
//!
//! Initialize once at process start:
//!
//! ```rust,ignore
//! use nosh::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::default())?;
//! ```

mod correlation;
mod init;
mod redact;

pub use correlation::CorrelationId;
pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
pub use redact::{redact_metadata, redacted, REDACTED_MARKER, SENSITIVE_KEYS};
