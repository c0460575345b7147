use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_core::payload::require_fields;
use guardpost_core::{DomainError, DomainResult, Entity, OrgId, OrgScoped, RecordId};

/// Guard identifier (org-scoped via `org_id` on the record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuardId(pub RecordId);

impl GuardId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for GuardId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Guard employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardStatus {
    Active,
    Suspended,
    Terminated,
}

/// A security guard on the company roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    pub id: GuardId,
    pub org_id: OrgId,
    pub badge_no: String,
    pub full_name: String,
    pub national_id: String,
    pub phone: Option<String>,
    pub branch_id: Option<RecordId>,
    pub hired_on: NaiveDate,
    /// Monthly rate in the smallest currency unit.
    pub monthly_rate: u64,
    pub status: GuardStatus,
    /// Soft-delete flag; listed queries exclude deleted rows.
    pub deleted: bool,
}

impl Guard {
    /// Terminate the guard's employment.
    ///
    /// Terminated is terminal; repeating the transition is a conflict.
    pub fn terminate(mut self) -> DomainResult<Self> {
        if self.status == GuardStatus::Terminated {
            return Err(DomainError::conflict("guard is already terminated"));
        }
        self.status = GuardStatus::Terminated;
        Ok(self)
    }

    pub fn is_active(&self) -> bool {
        self.status == GuardStatus::Active && !self.deleted
    }
}

impl Entity for Guard {
    type Id = GuardId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for Guard {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

/// Proposed guard record, as carried in an enrollment payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuard {
    pub badge_no: String,
    pub full_name: String,
    pub national_id: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub branch_id: Option<RecordId>,
    pub hired_on: NaiveDate,
    pub monthly_rate: u64,
}

impl NewGuard {
    pub const REQUIRED_FIELDS: &'static [&'static str] = &[
        "badge_no",
        "full_name",
        "national_id",
        "hired_on",
        "monthly_rate",
    ];

    /// Parse and validate an enrollment payload.
    ///
    /// Field presence is checked first so the caller gets a precise
    /// `MissingField` error rather than a serde message.
    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let new: NewGuard = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed guard payload: {e}")))?;

        if new.full_name.trim().is_empty() {
            return Err(DomainError::validation("full_name cannot be empty"));
        }
        if new.badge_no.trim().is_empty() {
            return Err(DomainError::validation("badge_no cannot be empty"));
        }

        Ok(new)
    }
}

/// Org-scoped guard persistence.
pub trait GuardRepository: Send + Sync {
    /// Insert a new guard. Fails with `Conflict` on a duplicate badge number.
    fn create(&self, org_id: OrgId, new: NewGuard) -> DomainResult<Guard>;

    /// Replace an existing guard record (same id, same org).
    fn update(&self, org_id: OrgId, guard: Guard) -> DomainResult<Guard>;

    fn get(&self, org_id: OrgId, id: GuardId) -> DomainResult<Guard>;

    /// All non-deleted guards for the org.
    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Guard>>;
}
