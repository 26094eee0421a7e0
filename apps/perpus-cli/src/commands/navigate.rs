use serde::Serialize;
use tracing::info;

use perpus_core::{Navigation, RouteName};

use crate::state::AppContext;

/// A committed transition, as printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Option<String>,
    pub to: String,
    pub route: Option<RouteName>,
    pub redirects: Vec<RouteName>,
}

impl From<Navigation> for Transition {
    fn from(navigation: Navigation) -> Self {
        Transition {
            from: navigation.from.map(|loc| loc.path),
            to: navigation.to.path,
            route: navigation.to.name,
            redirects: navigation.redirects,
        }
    }
}

pub fn describe(transition: &Transition) -> String {
    let route = transition
        .route
        .map(|name| format!(" ({})", name))
        .unwrap_or_default();
    if transition.redirects.is_empty() {
        format!("{}{}", transition.to, route)
    } else {
        format!("{}{} (redirected)", transition.to, route)
    }
}

/// Navigates from the saved route to `path` and saves where it landed.
pub async fn go(ctx: &AppContext, path: &str) -> anyhow::Result<Transition> {
    let session = ctx.session.snapshot().await;
    let mut navigator = ctx.navigator(ctx.saved_route());

    let navigation = navigator.navigate(&session, path)?;
    ctx.save_route(&navigation.to);
    info!(to = %navigation.to.path, redirects = navigation.redirects.len(), "Navigated");

    Ok(navigation.into())
}

/// Leaves the login screen for home, as the login form does once
/// authentication settles.
pub async fn leave_login(ctx: &AppContext) -> anyhow::Result<Transition> {
    let session = ctx.session.snapshot().await;
    let mut navigator = ctx.navigator(Some(RouteName::Login.location()));

    let navigation = navigator.push(&session, RouteName::Home)?;
    ctx.save_route(&navigation.to);
    Ok(navigation.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ROUTE_KEY;
    use perpus_client::{ApiClient, ClientConfig, KeyValueCache, MemoryCache, TOKEN_KEY, USER_KEY};
    use std::sync::Arc;

    fn context(role: Option<&str>) -> (AppContext, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        if let Some(role) = role {
            cache.set(TOKEN_KEY, "tok").unwrap();
            cache
                .set(
                    USER_KEY,
                    &serde_json::json!({ "id": 1, "name": "Rina", "role": { "name": role } })
                        .to_string(),
                )
                .unwrap();
        }
        let config = ClientConfig::default();
        let api = ApiClient::with_base_url("http://127.0.0.1:9/api/v1").unwrap();
        (AppContext::new(config, api, cache.clone()), cache)
    }

    #[tokio::test]
    async fn anonymous_admin_visit_lands_home() {
        let (ctx, cache) = context(None);

        let transition = go(&ctx, "/admin/manage-books").await.unwrap();

        assert_eq!(transition.to, "/");
        assert_eq!(transition.redirects, vec![RouteName::Home]);
        assert_eq!(cache.get(ROUTE_KEY).unwrap().as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn relative_admin_path_is_guarded_and_saved_normalized() {
        for path in ["admin/manage-books", "//admin/manage-books"] {
            let (ctx, cache) = context(None);

            let transition = go(&ctx, path).await.unwrap();

            assert_eq!(transition.to, "/", "{path}");
            assert_eq!(cache.get(ROUTE_KEY).unwrap().as_deref(), Some("/"), "{path}");
        }

        let (ctx, cache) = context(Some("owner"));
        let transition = go(&ctx, "admin//manage-books?page=2").await.unwrap();
        assert_eq!(transition.to, "/admin/manage-books");
        assert_eq!(
            cache.get(ROUTE_KEY).unwrap().as_deref(),
            Some("/admin/manage-books")
        );
    }

    #[tokio::test]
    async fn owner_reaches_admin_pages() {
        let (ctx, _) = context(Some("owner"));

        let transition = go(&ctx, "/admin/manage-roles").await.unwrap();

        assert_eq!(transition.route, Some(RouteName::RoleEditor));
        assert!(transition.redirects.is_empty());
    }

    #[tokio::test]
    async fn saved_route_becomes_origin() {
        let (ctx, cache) = context(Some("user"));
        cache.set(ROUTE_KEY, "/books").unwrap();

        let transition = go(&ctx, "/book/12").await.unwrap();

        assert_eq!(transition.from.as_deref(), Some("/books"));
        assert_eq!(transition.route, Some(RouteName::BookDetail));
    }

    #[tokio::test]
    async fn owner_leaving_login_goes_to_dashboard() {
        let (ctx, cache) = context(Some("owner"));

        let transition = leave_login(&ctx).await.unwrap();

        assert_eq!(transition.route, Some(RouteName::Dashboard));
        assert_eq!(cache.get(ROUTE_KEY).unwrap().as_deref(), Some("/admin"));
    }

    #[tokio::test]
    async fn member_leaving_login_goes_home() {
        let (ctx, _) = context(Some("user"));

        let transition = leave_login(&ctx).await.unwrap();

        assert_eq!(transition.route, Some(RouteName::Home));
        assert!(transition.redirects.is_empty());
    }
}
