//! # Store Status
//!
//! The `loading` and `errors` fields every store exposes, and the wrapper
//! that maintains them around a request.
//!
//! ```text
//! track("login", fut)
//!   loading = true, errors = None  ──► Loading
//!   fut.await
//!     Ok   ──────────────────────────► Settled
//!     Err  with server payload ──► errors = payload ──► Failed
//!     Err  without payload  ────► error! log ───────► Failed
//!   loading = false, error handed back to the caller
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::error::{ClientResult, ErrorPayload};
use crate::events::{Change, StoreEvent, StoreObserver};

/// Loading flag and last error payload of a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStatus {
    pub loading: bool,
    /// Server-provided payload of the last failed operation.
    pub errors: Option<ErrorPayload>,
}

/// Maintains a [`StoreStatus`] and reports changes to the observer.
pub(crate) struct StatusTracker {
    store: &'static str,
    status: RwLock<StoreStatus>,
    observer: Arc<dyn StoreObserver>,
}

impl StatusTracker {
    pub(crate) fn new(store: &'static str, observer: Arc<dyn StoreObserver>) -> Self {
        StatusTracker {
            store,
            status: RwLock::new(StoreStatus::default()),
            observer,
        }
    }

    pub(crate) async fn snapshot(&self) -> StoreStatus {
        self.status.read().await.clone()
    }

    fn notify(&self, operation: &'static str, change: Change) {
        self.observer.state_changed(&StoreEvent {
            store: self.store,
            operation,
            change,
        });
    }

    /// Runs `fut` with the loading flag raised. Failures are recorded and
    /// returned unchanged.
    pub(crate) async fn track<T, F>(&self, operation: &'static str, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        {
            let mut status = self.status.write().await;
            status.loading = true;
            status.errors = None;
        }
        self.notify(operation, Change::Loading);

        let result = fut.await;

        let change = {
            let mut status = self.status.write().await;
            status.loading = false;
            match &result {
                Ok(_) => Change::Settled,
                Err(e) => {
                    match e.payload() {
                        Some(payload) => {
                            debug!(store = self.store, operation, error = %e, "Request rejected");
                            status.errors = Some(payload.clone());
                        }
                        None => {
                            error!(store = self.store, operation, error = %e, "Request failed");
                        }
                    }
                    Change::Failed
                }
            }
        };
        self.notify(operation, change);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::events::testing::RecordingObserver;

    fn tracker() -> (StatusTracker, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::default());
        (StatusTracker::new("book", observer.clone()), observer)
    }

    #[tokio::test]
    async fn test_success_clears_flags() {
        let (tracker, observer) = tracker();
        let value = tracker.track("list", async { Ok(7) }).await.unwrap();

        assert_eq!(value, 7);
        assert_eq!(tracker.snapshot().await, StoreStatus::default());
        assert_eq!(observer.changes(), vec![Change::Loading, Change::Settled]);
        assert_eq!(observer.events()[0].operation, "list");
    }

    #[tokio::test]
    async fn test_loading_is_visible_while_running() {
        let (tracker, _) = tracker();
        let seen = tracker
            .track("create", async { Ok(tracker.snapshot().await.loading) })
            .await
            .unwrap();
        assert!(seen);
    }

    #[tokio::test]
    async fn test_api_failure_records_payload() {
        let (tracker, observer) = tracker();
        let err = tracker
            .track::<(), _>("create", async {
                Err(ClientError::from_status(
                    422,
                    r#"{"message":"invalid","errors":{"title":["required"]}}"#,
                ))
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        let status = tracker.snapshot().await;
        assert!(!status.loading);
        assert_eq!(status.errors.unwrap().errors["title"], vec!["required"]);
        assert_eq!(observer.changes(), vec![Change::Loading, Change::Failed]);
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_errors_empty() {
        let (tracker, _) = tracker();
        let err = tracker
            .track::<(), _>("list", async { Err(ClientError::Timeout) })
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(tracker.snapshot().await.errors.is_none());
    }

    #[tokio::test]
    async fn test_new_operation_resets_errors() {
        let (tracker, _) = tracker();
        let _ = tracker
            .track::<(), _>("create", async { Err(ClientError::from_status(400, "{}")) })
            .await;
        assert!(tracker.snapshot().await.errors.is_some());

        tracker.track("list", async { Ok(()) }).await.unwrap();
        assert!(tracker.snapshot().await.errors.is_none());
    }
}
