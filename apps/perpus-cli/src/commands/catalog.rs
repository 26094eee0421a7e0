use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use perpus_client::{BookDraft, ImageUpload, Resource, ResourceStore};
use perpus_core::{Book, Id, PaginationState};

use crate::cli::{BookCommands, BookFields, NamedCommands};
use crate::output::{book_line, lines, Output};
use crate::state::AppContext;

/// One page of the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct BookPage {
    pub pagination: PaginationState,
    pub books: Vec<Book>,
}

/// Filters `books` by title and cuts out `page`.
pub fn paginate(books: &[Book], search: Option<&str>, page: usize) -> BookPage {
    let mut pagination = PaginationState::new();
    if let Some(keyword) = search {
        pagination.set_search_keyword(keyword);
    }

    let matching: Vec<Book> = books
        .iter()
        .filter(|book| pagination.matches(&book.title))
        .cloned()
        .collect();
    pagination.update_total_pages(matching.len());
    pagination.set_current_page(page);

    BookPage {
        books: pagination.page_slice(&matching).to_vec(),
        pagination,
    }
}

fn describe_page(page: &BookPage) -> String {
    format!(
        "{}\n-- page {} of {}",
        lines(&page.books, book_line),
        page.pagination.current_page,
        page.pagination.total_pages
    )
}

fn read_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(file_name, bytes))
}

fn book_draft(fields: BookFields) -> anyhow::Result<BookDraft> {
    let image = fields.image.as_deref().map(read_image).transpose()?;
    Ok(BookDraft {
        title: fields.title,
        summary: fields.summary,
        stock: fields.stock,
        category_id: fields.category_id.map(|id| Id::new(id)),
        image,
    })
}

pub async fn books(ctx: &AppContext, out: Output, command: BookCommands) -> anyhow::Result<()> {
    let store = ctx.books();
    match command {
        BookCommands::List { search, page } => {
            let books = store.list().await?;
            let page = paginate(&books, search.as_deref(), page);
            out.emit(&page, describe_page)
        }
        BookCommands::Show { id } => {
            let book = store.get_by_id(&Id::new(id)).await?;
            out.emit(&book, |book| {
                let summary = book.summary.as_deref().unwrap_or("");
                format!("{}\n{}", book_line(book), summary)
            })
        }
        BookCommands::Add { fields } => {
            let book = store.create(book_draft(fields)?).await?;
            out.emit(&book, |book| format!("Added {}", book_line(book)))
        }
        BookCommands::Update { id, fields } => {
            let book = store.update(&Id::new(id), book_draft(fields)?).await?;
            out.emit(&book, |book| format!("Updated {}", book_line(book)))
        }
        BookCommands::Delete { id } => {
            let id = Id::new(id);
            store.delete(&id).await?;
            out.emit(&serde_json::json!({ "deleted": id }), |_| {
                format!("Deleted book #{}", id)
            })
        }
    }
}

/// CRUD over a collection whose drafts are just a name.
pub async fn named<R>(
    store: &ResourceStore<R>,
    out: Output,
    command: NamedCommands,
    draft: fn(String) -> R::Draft,
    line: fn(&R) -> String,
) -> anyhow::Result<()>
where
    R: Resource + Serialize,
{
    match command {
        NamedCommands::List => {
            let items = store.list().await?;
            out.emit(&items, |items| lines(items, line))
        }
        NamedCommands::Show { id } => {
            let item = store.get_by_id(&Id::new(id)).await?;
            out.emit(&item, line)
        }
        NamedCommands::Add { name } => {
            let item = store.create(draft(name)).await?;
            out.emit(&item, |item| format!("Added {}", line(item)))
        }
        NamedCommands::Update { id, name } => {
            let item = store.update(&Id::new(id), draft(name)).await?;
            out.emit(&item, |item| format!("Updated {}", line(item)))
        }
        NamedCommands::Delete { id } => {
            let id = Id::new(id);
            store.delete(&id).await?;
            out.emit(&serde_json::json!({ "deleted": id }), |_| {
                format!("Deleted {} #{}", R::STORE, id)
            })
        }
    }
}
