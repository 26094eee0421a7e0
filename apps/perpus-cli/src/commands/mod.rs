//! # Commands
//!
//! One module per area. Each command talks to the stores through
//! [`AppContext`] and prints through [`Output`].
//!
//! ```text
//! commands/
//! ├── auth.rs      login, register, logout, whoami, profile
//! ├── catalog.rs   books, categories, roles
//! ├── borrows.rs   borrows list, borrow <book-id>
//! └── navigate.rs  go <path>
//! ```

pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod navigate;

use perpus_client::{CategoryDraft, RoleDraft};

use crate::cli::{BorrowCommands, Commands};
use crate::output::Output;
use crate::state::AppContext;

pub async fn dispatch(ctx: &AppContext, out: Output, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => auth::login(ctx, out, email, password).await,
        Commands::Register {
            name,
            email,
            password,
        } => auth::register(ctx, out, name, email, password).await,
        Commands::Logout => auth::logout(ctx, out).await,
        Commands::Whoami { refresh } => auth::whoami(ctx, out, refresh).await,
        Commands::Profile {
            name,
            email,
            age,
            bio,
        } => auth::profile(ctx, out, name, email, age, bio).await,
        Commands::Books { command } => catalog::books(ctx, out, command).await,
        Commands::Categories { command } => {
            let draft = |name: String| CategoryDraft::new(name);
            catalog::named(&ctx.categories(), out, command, draft, |c| {
                format!("#{:<5} {}", c.id, c.name)
            })
            .await
        }
        Commands::Roles { command } => {
            let draft = |name: String| RoleDraft::new(name);
            catalog::named(&ctx.roles(), out, command, draft, |r| {
                format!("#{:<5} {}", r.id, r.name)
            })
            .await
        }
        Commands::Borrows {
            command: BorrowCommands::List,
        } => borrows::list(ctx, out).await,
        Commands::Borrow { book_id } => borrows::borrow(ctx, out, book_id).await,
        Commands::Go { path } => {
            let transition = navigate::go(ctx, &path).await?;
            out.emit(&transition, navigate::describe)
        }
    }
}
