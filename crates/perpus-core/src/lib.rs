//! # perpus-core: Pure Logic for the Perpus Library Client
//!
//! This crate holds everything in the client that can be decided without
//! touching the network or the disk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Perpus Client Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   perpus-cli / web views                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           perpus-client (HTTP, session cache, stores)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Session snapshots                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ perpus-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌────────────┐  ┌────────────┐   │   │
//! │  │   │  types   │  │  routes  │  │   guard    │  │ pagination │   │   │
//! │  │   │ Session  │  │ RouteName│  │ evaluate() │  │ PAGE_SIZE  │   │   │
//! │  │   │ Book ... │  │ resolve  │  │ Navigator  │  │            │   │   │
//! │  │   └──────────┘  └──────────┘  └────────────┘  └────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Session, User, Book, ...)
//! - [`routes`] - Named route table and path matching
//! - [`guard`] - The navigation authorization guard
//! - [`navigation`] - Router state around the guard (redirects, after-each hooks)
//! - [`pagination`] - Search keyword and page counters
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use perpus_core::guard::{evaluate, GuardDecision, RouteRequest};
//! use perpus_core::routes::RouteName;
//! use perpus_core::Session;
//!
//! let anonymous = Session::empty();
//! let request = RouteRequest::resolve("/admin/manage-books", None);
//!
//! assert_eq!(
//!     evaluate(&anonymous, &request),
//!     GuardDecision::RedirectTo(RouteName::Home)
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod guard;
pub mod navigation;
pub mod pagination;
pub mod routes;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use guard::{evaluate, GuardDecision, RouteRequest};
pub use navigation::{AfterEach, Navigation, Navigator, ScrollToTop, Viewport};
pub use pagination::{PaginationState, PAGE_SIZE};
pub use routes::{normalize_path, RouteArea, RouteLocation, RouteMatch, RouteName};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Role name that grants access to the admin area.
pub const OWNER_ROLE: &str = "owner";

/// Role name of regular library members.
pub const USER_ROLE: &str = "user";
