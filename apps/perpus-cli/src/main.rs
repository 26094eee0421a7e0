//! # Perpus CLI Entry Point
//!
//! ```text
//! perpus login --email owner@perpus.id --password ******
//! perpus books list --search bumi --page 2
//! perpus go /admin/manage-books
//! ```
//!
//! The actual setup is in lib.rs so it can be tested.

use clap::Parser;

use perpus_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    perpus_cli::init_tracing();
    perpus_cli::run(Cli::parse()).await
}
