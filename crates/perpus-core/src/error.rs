//! # Error Types
//!
//! Domain-specific error types for perpus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  perpus-core errors (this file)                                        │
//! │  └── CoreError        - Route table / navigation failures              │
//! │                                                                         │
//! │  perpus-client errors (separate crate)                                 │
//! │  └── ClientError      - Transport, API, validation, cache failures     │
//! │                                                                         │
//! │  The guard itself never fails: it always yields a decision.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Core logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A route name that is not part of the route table.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// Redirects kept bouncing between guarded routes.
    ///
    /// ## When This Occurs
    /// Only if the rule table is changed so that two redirects point at each
    /// other. Nothing is committed when this is returned.
    #[error("Navigation to {path} exceeded {limit} redirects")]
    RedirectLoop { path: String, limit: usize },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
