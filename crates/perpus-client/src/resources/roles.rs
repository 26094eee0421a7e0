//! Roles: `/role`. Every call, reads included, needs a token.

use serde::{Deserialize, Serialize};

use perpus_core::{Id, Role};

use super::{Resource, ResourceDraft, ResourceStore};
use crate::error::ClientResult;
use crate::http::RequestBody;

/// Store over `/role`.
pub type RoleStore = ResourceStore<Role>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
}

impl RoleDraft {
    pub fn new(name: impl Into<String>) -> Self {
        RoleDraft { name: name.into() }
    }
}

impl ResourceDraft for RoleDraft {
    fn into_body(self) -> ClientResult<RequestBody> {
        RequestBody::json(&self)
    }
}

impl Resource for Role {
    const STORE: &'static str = "role";
    const COLLECTION: &'static str = "/role";
    const PUBLIC_READS: bool = false;

    type Draft = RoleDraft;

    fn id(&self) -> &Id {
        &self.id
    }
}
