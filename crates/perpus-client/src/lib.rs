//! # perpus-client: HTTP Collaborator and Stores
//!
//! The I/O half of the library client. It owns the configured HTTP client,
//! the persisted session and the stores that mirror API collections.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          perpus-client                                  │
//! │                                                                         │
//! │  ┌───────────────┐      token (read-only)     ┌──────────────────────┐ │
//! │  │ SessionStore  │◄───────────────────────────│  ResourceStore<R>    │ │
//! │  │ login/logout  │                            │  Book / Category     │ │
//! │  │ refresh/profile│                           │  Role / Borrow       │ │
//! │  └──┬─────────┬──┘                            └──────────┬───────────┘ │
//! │     │         │                                          │             │
//! │     │         ▼                                          ▼             │
//! │     │   ┌───────────────┐                   ┌──────────────────────┐   │
//! │     │   │ KeyValueCache │                   │      ApiClient       │   │
//! │     │   │ token / user  │                   │  reqwest, JSON       │   │
//! │     │   └───────────────┘                   └──────────────────────┘   │
//! │     │                                                   ▲               │
//! │     └───────────────────────────────────────────────────┘               │
//! │                                                                         │
//! │  snapshot() ──► perpus_core::evaluate (navigation guard)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Base URL, timeout and cache location
//! - [`http`] - The one configured HTTP client
//! - [`cache`] - Persistent key-value session cache
//! - [`session`] - Session Store
//! - [`resources`] - Resource Stores
//! - [`status`] / [`events`] - Store state flags and observers
//! - [`error`] - Error taxonomy

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod resources;
pub mod session;
pub mod status;

pub use cache::{FileCache, KeyValueCache, MemoryCache, TOKEN_KEY, USER_KEY};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult, ErrorPayload};
pub use events::{Change, NoOpObserver, StoreEvent, StoreObserver};
pub use http::{ApiClient, RequestBody};
pub use resources::{
    BookDraft, BookStore, BorrowDraft, BorrowStore, CategoryDraft, CategoryStore, ImageUpload,
    Resource, ResourceStore, RoleDraft, RoleStore, UpdateMethod,
};
pub use session::SessionStore;
pub use status::StoreStatus;
