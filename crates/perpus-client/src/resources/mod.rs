//! # Resource Stores
//!
//! One generic store drives every REST collection. A collection only has to
//! say where it lives, whether reads need a token, and how it is updated.
//!
//! ## Collections
//! ```text
//! ┌──────────────┬─────────────┬──────────────┬────────────────────────────┐
//! │ Store        │ Collection  │ Reads        │ Update                     │
//! ├──────────────┼─────────────┼──────────────┼────────────────────────────┤
//! │ BookStore    │ /book       │ public       │ POST /book/{id}?_method=PUT│
//! │              │             │              │ (multipart)                │
//! │ CategoryStore│ /category   │ public       │ PUT /category/{id}         │
//! │ RoleStore    │ /role       │ bearer       │ PUT /role/{id}             │
//! │ BorrowStore  │ /borrow     │ bearer       │ PUT /borrow/{id}           │
//! └──────────────┴─────────────┴──────────────┴────────────────────────────┘
//! ```
//!
//! Mutations always carry the session's bearer token. Every response wraps
//! its payload in `{ "data": ... }`. Successful mutations patch the cached
//! list in place (push, replace by id, or filter out by id); nothing is
//! re-fetched.

pub mod books;
pub mod borrows;
pub mod categories;
pub mod roles;

pub use books::{BookDraft, BookStore, ImageUpload};
pub use borrows::{BorrowDraft, BorrowStore};
pub use categories::{CategoryDraft, CategoryStore};
pub use roles::{RoleDraft, RoleStore};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use perpus_core::Id;

use crate::error::{ClientError, ClientResult};
use crate::events::{NoOpObserver, StoreObserver};
use crate::http::{Acknowledgement, DataEnvelope, RequestBody};
use crate::session::SessionStore;
use crate::status::{StatusTracker, StoreStatus};

// =============================================================================
// Resource Description
// =============================================================================

/// How a collection accepts updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    /// `PUT {collection}/{id}`.
    Put,
    /// `POST {collection}/{id}?_method=PUT`, for payloads that must be
    /// multipart.
    PostOverride,
}

/// A create/update payload.
pub trait ResourceDraft: Send {
    fn into_body(self) -> ClientResult<RequestBody>;
}

/// One REST collection.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Store name used in events and logs.
    const STORE: &'static str;

    /// Collection path relative to the API base URL.
    const COLLECTION: &'static str;

    /// Whether `list`/`get_by_id` may be called without a token.
    const PUBLIC_READS: bool;

    const UPDATE: UpdateMethod = UpdateMethod::Put;

    type Draft: ResourceDraft;

    fn id(&self) -> &Id;
}

// =============================================================================
// Resource Store
// =============================================================================

/// CRUD store over one collection.
pub struct ResourceStore<R: Resource> {
    session: SessionStore,
    items: RwLock<Vec<R>>,
    current: RwLock<Option<R>>,
    tracker: StatusTracker,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(session: SessionStore) -> Self {
        Self::with_observer(session, Arc::new(NoOpObserver))
    }

    pub fn with_observer(session: SessionStore, observer: Arc<dyn StoreObserver>) -> Self {
        ResourceStore {
            session,
            items: RwLock::new(Vec::new()),
            current: RwLock::new(None),
            tracker: StatusTracker::new(R::STORE, observer),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The collection as last listed and patched.
    pub async fn items(&self) -> Vec<R> {
        self.items.read().await.clone()
    }

    /// The record last fetched with [`get_by_id`](Self::get_by_id).
    pub async fn current(&self) -> Option<R> {
        self.current.read().await.clone()
    }

    pub async fn status(&self) -> StoreStatus {
        self.tracker.snapshot().await
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// `GET {collection}`. Replaces the cached list.
    pub async fn list(&self) -> ClientResult<Vec<R>> {
        let token = self.read_token().await?;

        self.tracker
            .track("list", async {
                let envelope: DataEnvelope<Vec<R>> = self
                    .session
                    .api()
                    .get(R::COLLECTION, token.as_deref())
                    .await?;
                debug!(store = R::STORE, count = envelope.data.len(), "Collection loaded");
                *self.items.write().await = envelope.data.clone();
                Ok(envelope.data)
            })
            .await
    }

    /// `GET {collection}/{id}`. Sets [`current`](Self::current).
    pub async fn get_by_id(&self, id: &Id) -> ClientResult<R> {
        let token = self.read_token().await?;

        self.tracker
            .track("get_by_id", async {
                let envelope: DataEnvelope<R> = self
                    .session
                    .api()
                    .get(&Self::member_path(id), token.as_deref())
                    .await?;
                *self.current.write().await = Some(envelope.data.clone());
                Ok(envelope.data)
            })
            .await
    }

    /// `POST {collection}`. Appends the created record.
    pub async fn create(&self, draft: R::Draft) -> ClientResult<R> {
        let token = self.write_token().await?;

        self.tracker
            .track("create", async {
                let body = draft.into_body()?;
                let envelope: DataEnvelope<R> = self
                    .session
                    .api()
                    .post(R::COLLECTION, Some(&token), body)
                    .await?;
                self.items.write().await.push(envelope.data.clone());
                Ok(envelope.data)
            })
            .await
    }

    /// Updates a record and replaces it in the cached list.
    pub async fn update(&self, id: &Id, draft: R::Draft) -> ClientResult<R> {
        let token = self.write_token().await?;

        self.tracker
            .track("update", async {
                let body = draft.into_body()?;
                let path = Self::member_path(id);
                let api = self.session.api();
                let envelope: DataEnvelope<R> = match R::UPDATE {
                    UpdateMethod::Put => api.put(&path, Some(&token), body).await?,
                    UpdateMethod::PostOverride => {
                        api.post_with_query(&path, &[("_method", "PUT")], Some(&token), body)
                            .await?
                    }
                };

                let updated = envelope.data;
                if let Some(slot) = self.items.write().await.iter_mut().find(|r| r.id() == id) {
                    *slot = updated.clone();
                }
                let mut current = self.current.write().await;
                if current.as_ref().is_some_and(|r| r.id() == id) {
                    *current = Some(updated.clone());
                }
                Ok(updated)
            })
            .await
    }

    /// `DELETE {collection}/{id}`. Drops the record from the cached list.
    pub async fn delete(&self, id: &Id) -> ClientResult<()> {
        let token = self.write_token().await?;

        self.tracker
            .track("delete", async {
                let _: Option<Acknowledgement> = self
                    .session
                    .api()
                    .delete(&Self::member_path(id), Some(&token))
                    .await?;
                self.items.write().await.retain(|r| r.id() != id);
                let mut current = self.current.write().await;
                if current.as_ref().is_some_and(|r| r.id() == id) {
                    *current = None;
                }
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn member_path(id: &Id) -> String {
        format!("{}/{}", R::COLLECTION, id)
    }

    async fn read_token(&self) -> ClientResult<Option<String>> {
        if R::PUBLIC_READS {
            Ok(None)
        } else {
            self.write_token().await.map(Some)
        }
    }

    async fn write_token(&self) -> ClientResult<String> {
        self.session
            .token()
            .await
            .ok_or(ClientError::NotAuthenticated)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::cache::{KeyValueCache, MemoryCache, TOKEN_KEY, USER_KEY};
    use crate::http::ApiClient;
    use wiremock::MockServer;

    /// A session signed in as `role` with token `tok`, against `server`.
    pub fn signed_in(server: &MockServer, role: &str) -> SessionStore {
        let cache = Arc::new(MemoryCache::new());
        cache.set(TOKEN_KEY, "tok").unwrap();
        cache
            .set(
                USER_KEY,
                &serde_json::json!({ "id": 1, "name": "Admin", "role": { "name": role } })
                    .to_string(),
            )
            .unwrap();
        SessionStore::restore(ApiClient::with_base_url(&server.uri()).unwrap(), cache)
    }

    pub fn anonymous(server: &MockServer) -> SessionStore {
        SessionStore::restore(
            ApiClient::with_base_url(&server.uri()).unwrap(),
            Arc::new(MemoryCache::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{anonymous, signed_in};
    use super::*;
    use crate::events::testing::RecordingObserver;
    use crate::events::Change;
    use perpus_core::Category;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_list(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/category"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": 1, "name": "Novel" },
                    { "id": 2, "name": "Sejarah" }
                ]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_list_replaces_items() {
        let server = MockServer::start().await;
        mount_list(&server).await;

        let store: CategoryStore = ResourceStore::new(anonymous(&server));
        let items = store.list().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(store.items().await, items);
        assert!(!store.status().await.loading);
    }

    #[tokio::test]
    async fn test_get_by_id_sets_current() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/category/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": 2, "name": "Sejarah" }
            })))
            .mount(&server)
            .await;

        let store: CategoryStore = ResourceStore::new(anonymous(&server));
        let category = store.get_by_id(&Id::from("2")).await.unwrap();

        assert_eq!(category.name, "Sejarah");
        assert_eq!(store.current().await, Some(category));
    }

    #[tokio::test]
    async fn test_create_appends() {
        let server = MockServer::start().await;
        mount_list(&server).await;
        Mock::given(method("POST"))
            .and(path("/category"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({ "name": "Puisi" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "id": 3, "name": "Puisi" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store: CategoryStore = ResourceStore::new(signed_in(&server, "owner"));
        store.list().await.unwrap();
        store.create(CategoryDraft::new("Puisi")).await.unwrap();

        let names: Vec<String> = store.items().await.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Novel", "Sejarah", "Puisi"]);
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let server = MockServer::start().await;
        mount_list(&server).await;
        Mock::given(method("PUT"))
            .and(path("/category/2"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": 2, "name": "Sejarah Dunia" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store: CategoryStore = ResourceStore::new(signed_in(&server, "owner"));
        store.list().await.unwrap();
        let updated = store
            .update(&Id::from("2"), CategoryDraft::new("Sejarah Dunia"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Sejarah Dunia");
        let items = store.items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], updated);
    }

    #[tokio::test]
    async fn test_delete_filters_out() {
        let server = MockServer::start().await;
        mount_list(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/category/1"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Category deleted"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store: CategoryStore = ResourceStore::new(signed_in(&server, "owner"));
        store.list().await.unwrap();
        store.delete(&Id::from("1")).await.unwrap();

        let items: Vec<Category> = store.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "2");
    }

    #[tokio::test]
    async fn test_mutation_without_token() {
        let server = MockServer::start().await;
        let store: CategoryStore = ResourceStore::new(anonymous(&server));

        assert!(matches!(
            store.create(CategoryDraft::new("x")).await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            store.delete(&Id::from("1")).await,
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_items_and_sets_errors() {
        let server = MockServer::start().await;
        mount_list(&server).await;
        Mock::given(method("POST"))
            .and(path("/category"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "The name field is required.",
                "errors": { "name": ["The name field is required."] }
            })))
            .mount(&server)
            .await;

        let observer = Arc::new(RecordingObserver::default());
        let store: CategoryStore =
            ResourceStore::with_observer(signed_in(&server, "owner"), observer.clone());
        store.list().await.unwrap();

        let err = store.create(CategoryDraft::new("")).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation { .. }));
        assert_eq!(store.items().await.len(), 2);
        let status = store.status().await;
        assert!(!status.loading);
        assert!(status.errors.unwrap().errors.contains_key("name"));
        assert_eq!(
            observer.changes(),
            vec![Change::Loading, Change::Settled, Change::Loading, Change::Failed]
        );
        assert!(observer.events().iter().all(|e| e.store == "category"));
    }
}
