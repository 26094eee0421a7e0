//! Categories: `/category`, readable without a token.

use serde::{Deserialize, Serialize};

use perpus_core::{Category, Id};

use super::{Resource, ResourceDraft, ResourceStore};
use crate::error::ClientResult;
use crate::http::RequestBody;

/// Store over `/category`.
pub type CategoryStore = ResourceStore<Category>;

/// Create/update payload for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        CategoryDraft { name: name.into() }
    }
}

impl ResourceDraft for CategoryDraft {
    fn into_body(self) -> ClientResult<RequestBody> {
        RequestBody::json(&self)
    }
}

impl Resource for Category {
    const STORE: &'static str = "category";
    const COLLECTION: &'static str = "/category";
    const PUBLIC_READS: bool = true;

    type Draft = CategoryDraft;

    fn id(&self) -> &Id {
        &self.id
    }
}
