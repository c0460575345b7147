use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_core::payload::require_fields;
use guardpost_core::{DomainError, DomainResult, Entity, OrgId, OrgScoped, RecordId};

use crate::client::ClientId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(pub RecordId);

impl BranchId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for BranchId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A client site guards are deployed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub org_id: OrgId,
    pub client_id: ClientId,
    pub name: String,
    pub location: String,
    pub deleted: bool,
}

impl Entity for Branch {
    type Id = BranchId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for Branch {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

/// Proposed branch record, as carried in a branch-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBranch {
    pub client_id: ClientId,
    pub name: String,
    pub location: String,
}

impl NewBranch {
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["client_id", "name", "location"];

    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let new: NewBranch = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed branch payload: {e}")))?;

        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(new)
    }
}

/// Org-scoped branch persistence.
pub trait BranchRepository: Send + Sync {
    fn create(&self, org_id: OrgId, new: NewBranch) -> DomainResult<Branch>;

    fn update(&self, org_id: OrgId, branch: Branch) -> DomainResult<Branch>;

    fn get(&self, org_id: OrgId, id: BranchId) -> DomainResult<Branch>;

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Branch>>;

    /// Non-deleted branches belonging to one client.
    fn list_for_client(&self, org_id: OrgId, client_id: ClientId) -> DomainResult<Vec<Branch>>;
}
