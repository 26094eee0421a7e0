use perpus_core::Id;

use crate::output::{borrow_line, lines, Output};
use crate::state::AppContext;

pub async fn list(ctx: &AppContext, out: Output) -> anyhow::Result<()> {
    let borrows = ctx.borrows().list().await?;
    out.emit(&borrows, |borrows| lines(borrows, borrow_line))
}

pub async fn borrow(ctx: &AppContext, out: Output, book_id: String) -> anyhow::Result<()> {
    let borrow = ctx.borrows().borrow_book(Id::new(book_id)).await?;
    out.emit(&borrow, |borrow| format!("Borrowed: {}", borrow_line(borrow)))
}
