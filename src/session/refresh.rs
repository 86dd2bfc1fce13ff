// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Background user-data refresh schedule.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use super::manager::SessionManager;

/// Spawn the recurring refresh task.
///
/// Each tick invokes [`SessionManager::refresh_user_data`]; a failed tick
/// is logged and does not stop the schedule. The task holds only a weak
/// reference, so it exits once the manager is gone, and the manager aborts
/// it explicitly on sign-out.
pub(super) fn spawn(manager: Weak<SessionManager>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        // tokio rejects a zero period; clamp for pathological configs.
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so the first
        // refresh happens one full period after sign-in.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(manager) = manager.upgrade() else {
                break;
            };
            if let Err(err) = manager.refresh_user_data().await {
                warn!(error = %err, "background refresh failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::services::{StubAuthBackend, UserApi};
    use crate::store::MemoryTokenStore;
    use crate::types::User;

    struct CountingApi {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl UserApi for CountingApi {
        async fn fetch_user(&self, id: &str) -> Result<User, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(User {
                id: id.to_string(),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                email: "ann@example.com".to_string(),
                phone: "+15550100".to_string(),
                country_code: None,
                profile_photo: None,
                delivery_addresses: Vec::new(),
                payment_methods: Vec::new(),
                order_history: Vec::new(),
                created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
                updated_at: "2025-01-01T00:00:00Z".parse().unwrap(),
                version: 1,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_refresh_until_manager_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = ClientConfig::default();
        let manager = SessionManager::new(
            Arc::new(CountingApi {
                calls: calls.clone(),
            }),
            Arc::new(StubAuthBackend::new()),
            Arc::new(MemoryTokenStore::new()),
            &config,
        );
        manager.sign_in("u1").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // One full period later the refresh window has lapsed and a tick
        // fetches again.
        tokio::time::advance(Duration::from_secs(301)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(calls.load(Ordering::SeqCst) >= 2);

        let handle = spawn(Arc::downgrade(&manager), Duration::from_secs(300));
        drop(manager);
        tokio::time::advance(Duration::from_secs(301)).await;
        // The weak reference no longer upgrades, so the task exits.
        let _ = tokio::time::timeout(Duration::from_secs(600), handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_stops_the_schedule() {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = ClientConfig {
            refresh_interval_secs: 1,
            ..ClientConfig::default()
        };
        let manager = SessionManager::new(
            Arc::new(CountingApi {
                calls: calls.clone(),
            }),
            Arc::new(StubAuthBackend::new()),
            Arc::new(MemoryTokenStore::new()),
            &config,
        );

        manager.sign_in("u1").await.unwrap();
        manager.sign_out().await;
        let after_sign_out = calls.load(Ordering::SeqCst);

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;

        // No further fetches once the task is torn down.
        assert_eq!(calls.load(Ordering::SeqCst), after_sign_out);
    }
}
