use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_core::payload::require_fields;
use guardpost_core::{DomainError, DomainResult, Entity, OrgId, OrgScoped, RecordId};
use guardpost_guards::GuardId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayrollRecordId(pub RecordId);

impl PayrollRecordId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PayrollRecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// An approved change to a guard's monthly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryAdjustment {
    pub id: PayrollRecordId,
    pub org_id: OrgId,
    pub guard_id: GuardId,
    /// New monthly rate in the smallest currency unit.
    pub new_monthly_rate: u64,
    pub effective_from: NaiveDate,
    pub reason: Option<String>,
}

impl Entity for SalaryAdjustment {
    type Id = PayrollRecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for SalaryAdjustment {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

/// An approved reimbursable expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseClaim {
    pub id: PayrollRecordId,
    pub org_id: OrgId,
    pub guard_id: Option<GuardId>,
    /// Amount in the smallest currency unit.
    pub amount: u64,
    pub category: String,
    pub incurred_on: NaiveDate,
    pub note: Option<String>,
}

impl Entity for ExpenseClaim {
    type Id = PayrollRecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for ExpenseClaim {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSalaryAdjustment {
    pub guard_id: GuardId,
    pub new_monthly_rate: u64,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

impl NewSalaryAdjustment {
    pub const REQUIRED_FIELDS: &'static [&'static str] =
        &["guard_id", "new_monthly_rate", "effective_from"];

    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let new: NewSalaryAdjustment = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed adjustment payload: {e}")))?;

        if new.new_monthly_rate == 0 {
            return Err(DomainError::validation("new_monthly_rate must be positive"));
        }

        Ok(new)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpenseClaim {
    #[serde(default)]
    pub guard_id: Option<GuardId>,
    pub amount: u64,
    pub category: String,
    pub incurred_on: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewExpenseClaim {
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["amount", "category", "incurred_on"];

    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let new: NewExpenseClaim = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed expense payload: {e}")))?;

        if new.amount == 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        if new.category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }

        Ok(new)
    }
}

/// Org-scoped payroll persistence.
pub trait PayrollRepository: Send + Sync {
    fn record_adjustment(
        &self,
        org_id: OrgId,
        new: NewSalaryAdjustment,
    ) -> DomainResult<SalaryAdjustment>;

    fn record_expense(&self, org_id: OrgId, new: NewExpenseClaim) -> DomainResult<ExpenseClaim>;

    fn list_adjustments(&self, org_id: OrgId) -> DomainResult<Vec<SalaryAdjustment>>;

    fn list_expenses(&self, org_id: OrgId) -> DomainResult<Vec<ExpenseClaim>>;
}
