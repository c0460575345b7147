use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_clients::BranchId;
use guardpost_core::payload::require_fields;
use guardpost_core::{DomainError, DomainResult, Entity, OrgId, OrgScoped, RecordId};
use guardpost_guards::GuardId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(pub RecordId);

impl DeploymentId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Shift slot a guard covers at a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Day,
    Night,
    Relief,
}

/// Assignment of one guard to one branch for a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub org_id: OrgId,
    pub guard_id: GuardId,
    pub branch_id: BranchId,
    pub shift: Shift,
    pub starts_on: NaiveDate,
    /// Open-ended while `None`.
    pub ends_on: Option<NaiveDate>,
    pub deleted: bool,
}

impl Deployment {
    /// Whether the deployment covers `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        !self.deleted
            && self.starts_on <= date
            && self.ends_on.map(|end| date <= end).unwrap_or(true)
    }
}

impl Entity for Deployment {
    type Id = DeploymentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for Deployment {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

/// Proposed new deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeployment {
    pub guard_id: GuardId,
    pub branch_id: BranchId,
    pub shift: Shift,
    pub starts_on: NaiveDate,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
}

/// A deployment-change payload: either a fresh assignment or a reassignment of
/// an existing one (when `deployment_id` is present).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentChange {
    #[serde(default)]
    pub deployment_id: Option<DeploymentId>,
    #[serde(flatten)]
    pub new: NewDeployment,
}

impl DeploymentChange {
    pub const REQUIRED_FIELDS: &'static [&'static str] =
        &["guard_id", "branch_id", "shift", "starts_on"];

    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let change: DeploymentChange = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed deployment payload: {e}")))?;

        if let Some(end) = change.new.ends_on {
            if end < change.new.starts_on {
                return Err(DomainError::validation("ends_on precedes starts_on"));
            }
        }

        Ok(change)
    }
}

/// Per-branch shift coverage counts.
///
/// Aggregation happens in the repository as one grouped pass, not row-by-row
/// in the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftMatrixRow {
    pub branch_id: BranchId,
    pub day: u32,
    pub night: u32,
    pub relief: u32,
}

/// Org-scoped deployment persistence.
pub trait DeploymentRepository: Send + Sync {
    fn create(&self, org_id: OrgId, new: NewDeployment) -> DomainResult<Deployment>;

    fn update(&self, org_id: OrgId, deployment: Deployment) -> DomainResult<Deployment>;

    fn get(&self, org_id: OrgId, id: DeploymentId) -> DomainResult<Deployment>;

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Deployment>>;

    /// Shift coverage per branch on `date`, grouped in the repository.
    fn shift_counts(&self, org_id: OrgId, date: NaiveDate) -> DomainResult<Vec<ShiftMatrixRow>>;
}
