use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "perpus", version, about = "Perpus library client")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Path to client.toml")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "API base URL (overrides config and PERPUS_API_URL)")]
    pub api_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami {
        #[arg(long, default_value_t = false, help = "Fetch the identity from the API")]
        refresh: bool,
    },
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        bio: Option<String>,
    },
    Books {
        #[command(subcommand)]
        command: BookCommands,
    },
    Categories {
        #[command(subcommand)]
        command: NamedCommands,
    },
    Roles {
        #[command(subcommand)]
        command: NamedCommands,
    },
    Borrows {
        #[command(subcommand)]
        command: BorrowCommands,
    },
    /// Borrow one copy of a book.
    Borrow {
        book_id: String,
    },
    /// Navigate to a client route, applying the navigation guard.
    Go {
        path: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Show {
        id: String,
    },
    Add {
        #[command(flatten)]
        fields: BookFields,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: BookFields,
    },
    Delete {
        id: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct BookFields {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub summary: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    #[arg(long = "category")]
    pub category_id: Option<String>,
    #[arg(long, help = "Cover image file to upload")]
    pub image: Option<PathBuf>,
}

/// Commands of collections whose records only carry a name.
#[derive(Subcommand, Debug)]
pub enum NamedCommands {
    List,
    Show { id: String },
    Add { name: String },
    Update { id: String, name: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum BorrowCommands {
    List,
}
