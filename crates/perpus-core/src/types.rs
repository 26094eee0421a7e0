//! # Domain Types
//!
//! Types shared by the guard, the stores and the views.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Session      │   │      User       │   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  token?         │──►│  id             │──►│  id             │       │
//! │  │  user?          │   │  name, email    │   │  name           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │    Category     │   │     Borrow      │       │
//! │  │  id, title      │──►│  id, name       │   │  book_id        │       │
//! │  │  stock, image   │   └─────────────────┘   │  user_id        │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session Invariant
//! `token` and `user` are either both present or both absent. The fields are
//! private, and both the constructors and `Deserialize` uphold that.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::{OWNER_ROLE, USER_ROLE};

// =============================================================================
// Identifier
// =============================================================================

/// Server-assigned identifier.
///
/// The API hands out both numeric and string keys depending on the table, so
/// both are accepted on the wire and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, TS)]
#[ts(export)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Id(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id(value)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Id(s),
            Raw::Signed(n) => Id(n.to_string()),
            Raw::Unsigned(n) => Id(n.to_string()),
        })
    }
}

// =============================================================================
// Role
// =============================================================================

/// A role as returned by the API (`user.role` and the `/role` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Role {
    /// Absent when the role is embedded in a user payload.
    #[serde(default)]
    pub id: Id,
    pub name: String,
}

impl Role {
    pub fn named(name: impl Into<String>) -> Self {
        Role {
            id: Id::default(),
            name: name.into(),
        }
    }

    pub fn kind(&self) -> RoleKind {
        RoleKind::from_name(&self.name)
    }
}

/// Classification of a role name as seen by the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleKind {
    /// `"owner"`: full access to the admin area.
    Owner,
    /// `"user"`: regular member, denied the admin area.
    User,
    /// Any other name. The guard has no rule for these.
    Other(String),
}

impl RoleKind {
    /// Role names are compared exactly, as the server spells them.
    pub fn from_name(name: &str) -> Self {
        match name {
            OWNER_ROLE => RoleKind::Owner,
            USER_ROLE => RoleKind::User,
            other => RoleKind::Other(other.to_string()),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// The authenticated user's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

// =============================================================================
// Session
// =============================================================================

/// Current authentication token and user identity held client-side.
///
/// Created empty at start-up, populated by login/register/identity refresh,
/// cleared by logout, and only ever read by the navigation guard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

/// Wire shape of a session before the both-or-neither check.
#[derive(Deserialize)]
struct RawSession {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSession::deserialize(deserializer)?;
        Session::from_parts(raw.token, raw.user).ok_or_else(|| {
            serde::de::Error::custom("session token and user must be both present or both absent")
        })
    }
}

impl Session {
    /// A logged-out session.
    pub fn empty() -> Self {
        Session::default()
    }

    /// A logged-in session. Token and user always arrive together.
    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Session {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Builds a session from parts read back from storage.
    ///
    /// Returns `None` when only one half is present, so a half-written cache
    /// never produces a half-populated session.
    pub fn from_parts(token: Option<String>, user: Option<User>) -> Option<Self> {
        match (token, user) {
            (Some(token), Some(user)) => Some(Session::authenticated(token, user)),
            (None, None) => Some(Session::empty()),
            _ => None,
        }
    }

    /// Replaces the user while keeping the token.
    ///
    /// An empty session stays empty: there is no token to pair the user with.
    pub fn with_user(&self, user: User) -> Self {
        match &self.token {
            Some(token) => Session::authenticated(token.clone(), user),
            None => Session::empty(),
        }
    }

    /// Authenticated means a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The user's role name, if a user is loaded.
    pub fn role_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.role.name.as_str())
    }

    pub fn role_kind(&self) -> Option<RoleKind> {
        self.user.as_ref().map(|u| u.role.kind())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A book category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Book {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Public URL of the cover image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<Id>,
    /// Embedded by the detail endpoint.
    #[serde(default)]
    pub category: Option<Category>,
}

/// A borrowing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Borrow {
    pub id: Id,
    pub book_id: Id,
    #[serde(default)]
    pub user_id: Option<Id>,
    #[serde(default)]
    pub borrow_date: Option<String>,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default)]
    pub book: Option<Book>,
    #[serde(default)]
    pub user: Option<User>,
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /profile`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
