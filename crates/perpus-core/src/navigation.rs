//! # Navigation
//!
//! Router state around the guard: the committed location, redirect
//! following, and observers that run after every committed transition.
//!
//! ## Transition Flow
//! ```text
//! navigate(session, "/")
//!      │
//!      ▼
//! ┌──────────────┐  RedirectTo(Dashboard)  ┌──────────────┐
//! │ guard("/")   │────────────────────────►│ guard("/admin")│
//! │ origin=Login │                         │ origin=Login │
//! └──────────────┘                         └──────┬───────┘
//!                                                 │ Proceed
//!                                                 ▼
//!                                     commit "/admin" (Dashboard)
//!                                                 │
//!                                                 ▼
//!                                     AfterEach observers (scroll reset)
//! ```
//!
//! A redirect is a fresh navigation that keeps the origin of the first one,
//! so every hop is checked by the guard. Observers never influence the
//! decision.

use crate::error::{CoreError, CoreResult};
use crate::guard::{self, GuardDecision, RouteRequest};
use crate::routes::{RouteLocation, RouteName};
use crate::types::Session;

/// Upper bound on redirect hops for one navigation.
pub const MAX_REDIRECTS: usize = 8;

/// Signature of a guard function.
pub type GuardFn = fn(&Session, &RouteRequest) -> GuardDecision;

// =============================================================================
// Observers
// =============================================================================

/// Runs after every committed transition, whatever the guard decided.
pub trait AfterEach: Send + Sync {
    fn after_each(&self, to: &RouteLocation, from: Option<&RouteLocation>);
}

/// Something that can be scrolled.
pub trait Viewport: Send + Sync {
    fn scroll_to(&self, x: u32, y: u32);
}

/// Resets the viewport to the top-left corner after each transition.
pub struct ScrollToTop<V> {
    viewport: V,
}

impl<V: Viewport> ScrollToTop<V> {
    pub fn new(viewport: V) -> Self {
        ScrollToTop { viewport }
    }
}

impl<V: Viewport> AfterEach for ScrollToTop<V> {
    fn after_each(&self, _to: &RouteLocation, _from: Option<&RouteLocation>) {
        self.viewport.scroll_to(0, 0);
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// A committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub from: Option<RouteLocation>,
    pub to: RouteLocation,
    /// Redirect targets taken on the way, in order.
    pub redirects: Vec<RouteName>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// Client-side router state.
pub struct Navigator {
    current: Option<RouteLocation>,
    guard: GuardFn,
    observers: Vec<Box<dyn AfterEach>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Navigator::new()
    }
}

impl Navigator {
    /// A navigator with no committed location, using the standard guard.
    pub fn new() -> Self {
        Navigator::with_guard(guard::evaluate)
    }

    /// A navigator driven by a custom guard function.
    pub fn with_guard(guard: GuardFn) -> Self {
        Navigator {
            current: None,
            guard,
            observers: Vec::new(),
        }
    }

    /// Restores a previously committed location without firing observers.
    pub fn starting_at(mut self, location: RouteLocation) -> Self {
        self.current = Some(location);
        self
    }

    pub fn add_after_each(&mut self, observer: impl AfterEach + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn current(&self) -> Option<&RouteLocation> {
        self.current.as_ref()
    }

    /// Navigates to a named, parameter-free route.
    pub fn push(&mut self, session: &Session, name: RouteName) -> CoreResult<Navigation> {
        self.navigate(session, name.path_template())
    }

    /// Attempts a transition to `path`.
    ///
    /// The session is a snapshot: whatever authentication call is still in
    /// flight is not waited for.
    pub fn navigate(&mut self, session: &Session, path: &str) -> CoreResult<Navigation> {
        let origin = self.current.as_ref().and_then(|loc| loc.name);
        let mut target = RouteLocation::from_path(path);
        let mut redirects = Vec::new();

        loop {
            let request = RouteRequest::new(target.path.clone(), target.name, origin);
            match (self.guard)(session, &request) {
                GuardDecision::Proceed => break,
                GuardDecision::RedirectTo(name) => {
                    if redirects.len() == MAX_REDIRECTS {
                        return Err(CoreError::RedirectLoop {
                            path: path.to_string(),
                            limit: MAX_REDIRECTS,
                        });
                    }
                    redirects.push(name);
                    target = name.location();
                }
            }
        }

        let from = self.current.replace(target.clone());
        for observer in &self.observers {
            observer.after_each(&target, from.as_ref());
        }

        Ok(Navigation {
            from,
            to: target,
            redirects,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Id, Role, User};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn session_with_role(role: &str) -> Session {
        Session::authenticated(
            "tok",
            User {
                id: Id::from("1"),
                name: "Tester".to_string(),
                email: None,
                role: Role::named(role),
            },
        )
    }

    #[derive(Clone, Default)]
    struct RecordingViewport {
        scrolls: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl Viewport for RecordingViewport {
        fn scroll_to(&self, x: u32, y: u32) {
            self.scrolls.lock().unwrap().push((x, y));
        }
    }

    struct CountingObserver(Arc<AtomicUsize>);

    impl AfterEach for CountingObserver {
        fn after_each(&self, _to: &RouteLocation, _from: Option<&RouteLocation>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_plain_navigation_commits_target() {
        let mut nav = Navigator::new();
        let result = nav.navigate(&Session::empty(), "/books").unwrap();

        assert_eq!(result.from, None);
        assert_eq!(result.to.name, Some(RouteName::Books));
        assert!(!result.was_redirected());
        assert_eq!(nav.current().unwrap().path, "/books");
    }

    #[test]
    fn test_anonymous_admin_redirects_home() {
        let mut nav = Navigator::new();
        let result = nav
            .navigate(&Session::empty(), "/admin/manage-books")
            .unwrap();

        assert_eq!(result.redirects, vec![RouteName::Home]);
        assert_eq!(result.to, RouteName::Home.location());
    }

    #[test]
    fn test_unnormalized_admin_paths_redirect_home() {
        for path in ["admin/manage-books", "//admin/manage-books", "admin//profile?x=1"] {
            let mut nav = Navigator::new();
            let result = nav.navigate(&Session::empty(), path).unwrap();

            assert_eq!(result.redirects, vec![RouteName::Home], "{path}");
            assert_eq!(nav.current(), Some(&RouteName::Home.location()), "{path}");
        }
    }

    #[test]
    fn test_committed_path_is_normalized() {
        let mut nav = Navigator::new();
        let result = nav.navigate(&Session::empty(), "books/?page=2").unwrap();
        assert_eq!(result.to.path, "/books");
        assert_eq!(result.to.name, Some(RouteName::Books));
    }

    #[test]
    fn test_owner_after_login_lands_on_dashboard() {
        let mut nav = Navigator::new().starting_at(RouteName::Login.location());
        let result = nav.navigate(&session_with_role("owner"), "/").unwrap();

        assert_eq!(result.redirects, vec![RouteName::Dashboard]);
        assert_eq!(result.to.name, Some(RouteName::Dashboard));
        assert_eq!(result.from.unwrap().name, Some(RouteName::Login));

        // Leaving the dashboard afterwards is no longer affected by rule 4.
        let result = nav.navigate(&session_with_role("owner"), "/").unwrap();
        assert_eq!(result.to.name, Some(RouteName::Home));
    }

    #[test]
    fn test_user_from_login_stays_home() {
        let mut nav = Navigator::new().starting_at(RouteName::Login.location());
        let result = nav.navigate(&session_with_role("user"), "/").unwrap();
        assert_eq!(result.to.name, Some(RouteName::Home));
    }

    #[test]
    fn test_scroll_reset_after_every_transition() {
        let viewport = RecordingViewport::default();
        let mut nav = Navigator::new();
        nav.add_after_each(ScrollToTop::new(viewport.clone()));

        let anonymous = Session::empty();
        nav.navigate(&anonymous, "/books").unwrap();
        nav.navigate(&anonymous, "/admin").unwrap(); // redirected
        nav.navigate(&anonymous, "/book/3").unwrap();

        assert_eq!(*viewport.scrolls.lock().unwrap(), vec![(0, 0); 3]);
    }

    #[test]
    fn test_observers_see_from_and_to() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut nav = Navigator::new();
        nav.add_after_each(CountingObserver(count.clone()));

        nav.push(&Session::empty(), RouteName::Search).unwrap();
        nav.push(&Session::empty(), RouteName::Home).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_redirect_loop_is_reported_and_not_committed() {
        fn ping_pong(_: &Session, request: &RouteRequest) -> GuardDecision {
            match request.target_name {
                Some(RouteName::Home) => GuardDecision::RedirectTo(RouteName::Books),
                _ => GuardDecision::RedirectTo(RouteName::Home),
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let mut nav = Navigator::with_guard(ping_pong);
        nav.add_after_each(CountingObserver(count.clone()));

        let err = nav.navigate(&Session::empty(), "/").unwrap_err();
        assert_eq!(
            err,
            CoreError::RedirectLoop {
                path: "/".to_string(),
                limit: MAX_REDIRECTS
            }
        );
        assert!(nav.current().is_none());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
