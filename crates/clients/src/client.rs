use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_core::payload::require_fields;
use guardpost_core::{DomainError, DomainResult, Entity, OrgId, OrgScoped, RecordId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub RecordId);

impl ClientId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ClientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Suspended,
}

/// A customer organization that contracts guard services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub org_id: OrgId,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub deleted: bool,
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for Client {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

/// Proposed client record, as carried in a client-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewClient {
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["name"];

    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let new: NewClient = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed client payload: {e}")))?;

        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(new)
    }
}

/// Org-scoped client persistence.
pub trait ClientRepository: Send + Sync {
    /// Insert a new client. Fails with `Conflict` on a duplicate name.
    fn create(&self, org_id: OrgId, new: NewClient) -> DomainResult<Client>;

    fn update(&self, org_id: OrgId, client: Client) -> DomainResult<Client>;

    fn get(&self, org_id: OrgId, id: ClientId) -> DomainResult<Client>;

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Client>>;
}
