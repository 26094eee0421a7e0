use serde::Serialize;

use perpus_core::{Book, Borrow, User};

/// Prints results as JSON (`--json`) or as text lines.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human(value));
        }
        Ok(())
    }
}

pub fn user_line(user: &User) -> String {
    match &user.email {
        Some(email) => format!("{} <{}> ({})", user.name, email, user.role.name),
        None => format!("{} ({})", user.name, user.role.name),
    }
}

pub fn book_line(book: &Book) -> String {
    let category = book
        .category
        .as_ref()
        .map(|c| format!(" [{}]", c.name))
        .unwrap_or_default();
    format!("#{:<5} {}{} (stock: {})", book.id, book.title, category, book.stock)
}

pub fn borrow_line(borrow: &Borrow) -> String {
    let title = borrow
        .book
        .as_ref()
        .map(|b| b.title.clone())
        .unwrap_or_else(|| format!("book #{}", borrow.book_id));
    format!(
        "#{:<5} {} borrowed {} due {}",
        borrow.id,
        title,
        borrow.borrow_date.as_deref().unwrap_or("-"),
        borrow.return_date.as_deref().unwrap_or("-"),
    )
}

pub fn lines<T>(items: &[T], line: fn(&T) -> String) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}
