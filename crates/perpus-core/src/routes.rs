//! # Route Table
//!
//! The named routes the client can navigate to, grouped into three areas by
//! path prefix.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Area     Prefix    Routes                                              │
//! │  ───────  ────────  ──────────────────────────────────────────────────  │
//! │  Public   /         Home, BookDetail, BookCategory, Books,              │
//! │                     UserProfile, Search                                 │
//! │  Auth     /auth     Login, Register                                     │
//! │  Admin    /admin    Dashboard, BookEditor, CategoryEditor,              │
//! │                     RoleEditor, AdminProfile                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Prefix shared by every admin route.
pub const ADMIN_PREFIX: &str = "/admin";

/// Prefix shared by the login and registration forms.
pub const AUTH_PREFIX: &str = "/auth";

// =============================================================================
// Route Names
// =============================================================================

/// Every named route in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RouteName {
    Home,
    BookDetail,
    BookCategory,
    Books,
    UserProfile,
    Search,
    Login,
    Register,
    Dashboard,
    BookEditor,
    CategoryEditor,
    RoleEditor,
    AdminProfile,
}

impl RouteName {
    /// All routes in table order. Matching walks this list front to back.
    pub const ALL: [RouteName; 13] = [
        RouteName::Home,
        RouteName::BookDetail,
        RouteName::BookCategory,
        RouteName::Books,
        RouteName::UserProfile,
        RouteName::Search,
        RouteName::Login,
        RouteName::Register,
        RouteName::Dashboard,
        RouteName::BookEditor,
        RouteName::CategoryEditor,
        RouteName::RoleEditor,
        RouteName::AdminProfile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "Home",
            RouteName::BookDetail => "BookDetail",
            RouteName::BookCategory => "BookCategory",
            RouteName::Books => "Books",
            RouteName::UserProfile => "UserProfile",
            RouteName::Search => "Search",
            RouteName::Login => "Login",
            RouteName::Register => "Register",
            RouteName::Dashboard => "Dashboard",
            RouteName::BookEditor => "BookEditor",
            RouteName::CategoryEditor => "CategoryEditor",
            RouteName::RoleEditor => "RoleEditor",
            RouteName::AdminProfile => "AdminProfile",
        }
    }

    /// Path template; `:name` segments match any single non-empty segment.
    pub fn path_template(&self) -> &'static str {
        match self {
            RouteName::Home => "/",
            RouteName::BookDetail => "/book/:id",
            RouteName::BookCategory => "/categories/:id",
            RouteName::Books => "/books",
            RouteName::UserProfile => "/profile",
            RouteName::Search => "/search",
            RouteName::Login => "/auth/login",
            RouteName::Register => "/auth/register",
            RouteName::Dashboard => "/admin",
            RouteName::BookEditor => "/admin/manage-books",
            RouteName::CategoryEditor => "/admin/manage-categories",
            RouteName::RoleEditor => "/admin/manage-roles",
            RouteName::AdminProfile => "/admin/profile",
        }
    }

    pub fn area(&self) -> RouteArea {
        RouteArea::of_path(self.path_template())
    }

    /// Concrete location for a parameter-free route.
    ///
    /// Every redirect target of the guard is parameter-free. For the two
    /// parameterised routes the template itself is returned.
    pub fn location(&self) -> RouteLocation {
        RouteLocation {
            path: self.path_template().to_string(),
            name: Some(*self),
        }
    }
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRoute(s.to_string()))
    }
}

// =============================================================================
// Route Areas
// =============================================================================

/// The three layout areas, partitioned by path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RouteArea {
    Public,
    Auth,
    Admin,
}

impl RouteArea {
    pub fn of_path(path: &str) -> Self {
        if path.starts_with(ADMIN_PREFIX) {
            RouteArea::Admin
        } else if path.starts_with(AUTH_PREFIX) {
            RouteArea::Auth
        } else {
            RouteArea::Public
        }
    }
}

// =============================================================================
// Locations and Matching
// =============================================================================

/// A committed or requested position in the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RouteLocation {
    pub path: String,
    /// `None` when the path matches no named route.
    pub name: Option<RouteName>,
}

impl RouteLocation {
    /// Resolves `path` against the route table. The stored path is the
    /// normalized form (see [`normalize_path`]).
    pub fn from_path(path: &str) -> Self {
        let path = normalize_path(path);
        RouteLocation {
            name: resolve(&path).map(|m| m.name),
            path,
        }
    }
}

/// Canonical form of a client path: query and fragment dropped, empty
/// segments collapsed, a single leading `/` and no trailing one.
///
/// ```text
/// "admin/manage-books"     ──► "/admin/manage-books"
/// "//admin//profile/?x=1"  ──► "/admin/profile"
/// ""                       ──► "/"
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = split_segments(path);
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    normalized
}

/// Result of matching a path against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: RouteName,
    /// Captured `:param` segments, in template order.
    pub params: Vec<(String, String)>,
}

impl RouteMatch {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Matches a path (query string and fragment ignored) against the table.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = split_segments(path);

    RouteName::ALL.iter().find_map(|name| {
        let template = split_segments(name.path_template());
        if template.len() != segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (pattern, actual) in template.iter().zip(&segments) {
            match pattern.strip_prefix(':') {
                Some(key) => params.push((key.to_string(), actual.to_string())),
                None if pattern == actual => {}
                None => return None,
            }
        }

        Some(RouteMatch {
            name: *name,
            params,
        })
    })
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_static_routes() {
        assert_eq!(resolve("/").unwrap().name, RouteName::Home);
        assert_eq!(resolve("/books").unwrap().name, RouteName::Books);
        assert_eq!(resolve("/auth/login").unwrap().name, RouteName::Login);
        assert_eq!(resolve("/admin").unwrap().name, RouteName::Dashboard);
        assert_eq!(
            resolve("/admin/manage-roles").unwrap().name,
            RouteName::RoleEditor
        );
    }

    #[test]
    fn test_resolve_captures_params() {
        let m = resolve("/book/17").unwrap();
        assert_eq!(m.name, RouteName::BookDetail);
        assert_eq!(m.param("id"), Some("17"));

        let m = resolve("/categories/fiction?page=2").unwrap();
        assert_eq!(m.name, RouteName::BookCategory);
        assert_eq!(m.param("id"), Some("fiction"));
    }

    #[test]
    fn test_resolve_tolerates_trailing_slash() {
        assert_eq!(resolve("/admin/").unwrap().name, RouteName::Dashboard);
        assert_eq!(resolve("/search/").unwrap().name, RouteName::Search);
    }

    #[test]
    fn test_resolve_unknown_paths() {
        assert!(resolve("/book").is_none());
        assert!(resolve("/admin/manage-books/3").is_none());
        assert!(resolve("/nowhere").is_none());
    }

    #[test]
    fn test_every_template_resolves_to_itself() {
        for name in RouteName::ALL {
            assert_eq!(resolve(name.path_template()).unwrap().name, name);
        }
    }

    #[test]
    fn test_route_name_parsing() {
        assert_eq!("Dashboard".parse::<RouteName>().unwrap(), RouteName::Dashboard);
        assert!("dashboard".parse::<RouteName>().is_err());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/books"), "/books");
        assert_eq!(normalize_path("admin/manage-books"), "/admin/manage-books");
        assert_eq!(normalize_path("//admin//manage-books"), "/admin/manage-books");
        assert_eq!(normalize_path("/admin/profile/?tab=2#top"), "/admin/profile");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
    }

    #[test]
    fn test_location_stores_normalized_path() {
        let location = RouteLocation::from_path("admin//manage-roles?x=1");
        assert_eq!(location.path, "/admin/manage-roles");
        assert_eq!(location.name, Some(RouteName::RoleEditor));
        assert_eq!(RouteArea::of_path(&location.path), RouteArea::Admin);
    }

    #[test]
    fn test_areas() {
        assert_eq!(RouteName::Home.area(), RouteArea::Public);
        assert_eq!(RouteName::UserProfile.area(), RouteArea::Public);
        assert_eq!(RouteName::Register.area(), RouteArea::Auth);
        assert_eq!(RouteName::AdminProfile.area(), RouteArea::Admin);
    }
}
