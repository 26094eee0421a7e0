//! # Application Context
//!
//! Everything a command needs, built once at startup.
//!
//! ```text
//! ClientConfig ──► ApiClient ──┐
//!                              ├──► SessionStore ──► BookStore, CategoryStore, ...
//! cache_dir ────► FileCache ───┘
//!                     │
//!                     └── "route": last committed client route
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, warn};

use perpus_client::{
    ApiClient, BookStore, BorrowStore, CategoryStore, ClientConfig, FileCache, KeyValueCache,
    RoleStore, SessionStore,
};
use perpus_core::{Navigator, RouteLocation, ScrollToTop, Viewport};

use crate::cli::Cli;

/// Cache key of the last committed route path.
pub const ROUTE_KEY: &str = "route";

/// The terminal has nothing to scroll; the reset is only traced.
pub struct TerminalViewport;

impl Viewport for TerminalViewport {
    fn scroll_to(&self, x: u32, y: u32) {
        debug!(x, y, "Viewport reset");
    }
}

pub struct AppContext {
    pub config: ClientConfig,
    pub cache: Arc<dyn KeyValueCache>,
    pub session: SessionStore,
}

impl AppContext {
    /// Loads configuration and restores the cached session.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = ClientConfig::load_or_default(cli.config.clone());
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }

        let api = ApiClient::new(&config).context("invalid API configuration")?;
        let cache_dir = config.cache_dir()?;
        debug!(?cache_dir, "Using session cache");

        Ok(Self::new(config, api, Arc::new(FileCache::new(cache_dir))))
    }

    pub fn new(config: ClientConfig, api: ApiClient, cache: Arc<dyn KeyValueCache>) -> Self {
        let session = SessionStore::restore(api, cache.clone());
        AppContext {
            config,
            cache,
            session,
        }
    }

    pub fn books(&self) -> BookStore {
        BookStore::new(self.session.clone())
    }

    pub fn categories(&self) -> CategoryStore {
        CategoryStore::new(self.session.clone())
    }

    pub fn roles(&self) -> RoleStore {
        RoleStore::new(self.session.clone())
    }

    pub fn borrows(&self) -> BorrowStore {
        BorrowStore::new(self.session.clone())
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// The route committed by the previous invocation.
    pub fn saved_route(&self) -> Option<RouteLocation> {
        match self.cache.get(ROUTE_KEY) {
            Ok(path) => path.map(|p| RouteLocation::from_path(p.trim())),
            Err(e) => {
                warn!(error = %e, "Unreadable saved route");
                None
            }
        }
    }

    pub fn save_route(&self, location: &RouteLocation) {
        if let Err(e) = self.cache.set(ROUTE_KEY, &location.path) {
            warn!(error = %e, "Failed to save route");
        }
    }

    /// A navigator positioned at `start`, resetting the viewport after
    /// each transition.
    pub fn navigator(&self, start: Option<RouteLocation>) -> Navigator {
        let mut navigator = match start {
            Some(location) => Navigator::new().starting_at(location),
            None => Navigator::new(),
        };
        navigator.add_after_each(ScrollToTop::new(TerminalViewport));
        navigator
    }
}
