//! Borrowing records: `/borrow`, members only.

use serde::{Deserialize, Serialize};

use perpus_core::{Borrow, Id};

use super::{Resource, ResourceDraft, ResourceStore};
use crate::error::ClientResult;
use crate::http::RequestBody;

/// Store over `/borrow`.
pub type BorrowStore = ResourceStore<Borrow>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowDraft {
    pub book_id: Id,
}

impl ResourceDraft for BorrowDraft {
    fn into_body(self) -> ClientResult<RequestBody> {
        RequestBody::json(&self)
    }
}

impl Resource for Borrow {
    const STORE: &'static str = "borrow";
    const COLLECTION: &'static str = "/borrow";
    const PUBLIC_READS: bool = false;

    type Draft = BorrowDraft;

    fn id(&self) -> &Id {
        &self.id
    }
}

impl ResourceStore<Borrow> {
    /// Borrows one copy of a book for the signed-in member.
    pub async fn borrow_book(&self, book_id: impl Into<Id>) -> ClientResult<Borrow> {
        self.create(BorrowDraft {
            book_id: book_id.into(),
        })
        .await
    }
}
