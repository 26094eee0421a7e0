//! # Navigation Guard
//!
//! Decides, before every route transition, whether the transition may go
//! ahead or must be redirected.
//!
//! ## Decision Table
//! Rules are evaluated top to bottom; the first match wins.
//! ```text
//! ┌────┬───────────────┬─────────┬─────────────────────────────────┬──────────────────────┐
//! │ #  │ authenticated │ role    │ request                         │ decision             │
//! ├────┼───────────────┼─────────┼─────────────────────────────────┼──────────────────────┤
//! │ 1  │ yes           │ any     │ to Login or Register            │ RedirectTo(Home)     │
//! │ 2  │ yes           │ owner   │ to /admin*                      │ Proceed              │
//! │ 3  │ yes           │ user    │ to /admin*                      │ RedirectTo(Home)     │
//! │ 4  │ yes           │ owner   │ from Login, to /*               │ RedirectTo(Dashboard)│
//! │ 5  │ no            │ -       │ to /admin* or to UserProfile    │ RedirectTo(Home)     │
//! │ 6  │ otherwise     │         │                                 │ Proceed              │
//! └────┴───────────────┴─────────┴─────────────────────────────────┴──────────────────────┘
//! ```
//!
//! Roles other than `owner` and `user` have no admin rule and fall through
//! to rule 6, including on admin paths.
//!
//! The guard is a pure function of a [`Session`] snapshot and a
//! [`RouteRequest`]. It never fails.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::routes::{self, RouteArea, RouteName};
use crate::types::{RoleKind, Session};

// =============================================================================
// Request and Decision
// =============================================================================

/// The navigation being attempted.
///
/// Both constructors store `target_path` in normalized form, so
/// `admin/x`, `//admin/x` and `/admin/x?y` are the same admin path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RouteRequest {
    pub target_path: String,
    pub target_name: Option<RouteName>,
    /// Name of the route being left, if any.
    pub origin_name: Option<RouteName>,
}

impl RouteRequest {
    pub fn new(
        target_path: impl Into<String>,
        target_name: Option<RouteName>,
        origin_name: Option<RouteName>,
    ) -> Self {
        let target_path: String = target_path.into();
        RouteRequest {
            target_path: routes::normalize_path(&target_path),
            target_name,
            origin_name,
        }
    }

    /// Builds a request whose target name comes from the route table.
    pub fn resolve(target_path: &str, origin_name: Option<RouteName>) -> Self {
        let target_path = routes::normalize_path(target_path);
        RouteRequest {
            target_name: routes::resolve(&target_path).map(|m| m.name),
            target_path,
            origin_name,
        }
    }

    // The fields are public, so a hand-built request may carry a raw path.
    fn targets_admin(&self) -> bool {
        RouteArea::of_path(&routes::normalize_path(&self.target_path)) == RouteArea::Admin
    }

    fn targets(&self, name: RouteName) -> bool {
        self.target_name == Some(name)
    }
}

/// Outcome of the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GuardDecision {
    Proceed,
    RedirectTo(RouteName),
}

impl GuardDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GuardDecision::Proceed)
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates the guard for one transition.
pub fn evaluate(session: &Session, request: &RouteRequest) -> GuardDecision {
    if session.is_authenticated() {
        evaluate_authenticated(session.role_kind(), request)
    } else {
        evaluate_anonymous(request)
    }
}

fn evaluate_authenticated(role: Option<RoleKind>, request: &RouteRequest) -> GuardDecision {
    // Rule 1: no auth forms once logged in, whatever the role.
    if request.targets(RouteName::Login) || request.targets(RouteName::Register) {
        return GuardDecision::RedirectTo(RouteName::Home);
    }

    match role {
        // Rule 2
        Some(RoleKind::Owner) if request.targets_admin() => GuardDecision::Proceed,
        // Rule 3
        Some(RoleKind::User) if request.targets_admin() => {
            GuardDecision::RedirectTo(RouteName::Home)
        }
        // Rule 4: owners landing right after the login screen go to the dashboard.
        Some(RoleKind::Owner)
            if request.origin_name == Some(RouteName::Login) =>
        {
            GuardDecision::RedirectTo(RouteName::Dashboard)
        }
        // Rule 6
        _ => GuardDecision::Proceed,
    }
}

fn evaluate_anonymous(request: &RouteRequest) -> GuardDecision {
    // Rule 5
    if request.targets_admin() || request.targets(RouteName::UserProfile) {
        return GuardDecision::RedirectTo(RouteName::Home);
    }

    // Rule 6
    GuardDecision::Proceed
}

// =============================================================================
// Unit Tests
// =============================================================================
