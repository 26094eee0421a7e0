//! # Perpus CLI Library
//!
//! ## Module Organization
//! ```text
//! perpus_cli/
//! ├── lib.rs          ◄─── You are here (logging init & run)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state.rs        ◄─── AppContext: config, cache, session, stores
//! ├── output.rs       ◄─── JSON / text printing
//! └── commands/
//!     ├── auth.rs     ◄─── login, register, logout, whoami, profile
//!     ├── catalog.rs  ◄─── books, categories, roles
//!     ├── borrows.rs  ◄─── borrow records
//!     └── navigate.rs ◄─── go <path> through the navigation guard
//! ```

pub mod cli;
pub mod commands;
pub mod output;
pub mod state;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use perpus_client::ClientError;

use cli::Cli;
use output::Output;
use state::AppContext;

/// Runs one command.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load config ─────── client.toml, PERPUS_* env, --api-url            │
/// │  2. Restore session ─── token + user from the session cache             │
/// │  3. Dispatch ────────── stores / navigator                              │
/// │  4. Report ──────────── validation messages are attached to the error   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(&cli)?;
    info!(api = %ctx.config.base_url(), "Perpus client ready");
    debug!(authenticated = ctx.session.is_authenticated().await, "Session state");

    commands::dispatch(&ctx, Output::new(cli.json), cli.command)
        .await
        .map_err(with_field_errors)
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=perpus_client=trace` - Trace the HTTP layer only
/// - Default: `info,perpus=debug`
///
/// Logs go to stderr so `--json` output stays parseable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,perpus=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Adds the server's field-level messages to a validation failure.
fn with_field_errors(err: anyhow::Error) -> anyhow::Error {
    let details = match err
        .downcast_ref::<ClientError>()
        .and_then(ClientError::field_errors)
    {
        Some(fields) if !fields.is_empty() => fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; "),
        _ => return err,
    };
    err.context(format!("invalid input ({})", details))
}
