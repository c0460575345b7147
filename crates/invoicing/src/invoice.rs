use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_clients::ClientId;
use guardpost_core::payload::require_fields;
use guardpost_core::{DomainError, DomainResult, Entity, OrgId, OrgScoped, RecordId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub RecordId);

impl InvoiceId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Void,
}

/// Monthly service invoice for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub org_id: OrgId,
    pub client_id: ClientId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Amount in the smallest currency unit.
    pub amount: u64,
    pub status: InvoiceStatus,
    pub deleted: bool,
}

impl Invoice {
    /// Void invoices cannot move again; everything else can.
    pub fn mark(mut self, status: InvoiceStatus) -> DomainResult<Self> {
        if self.status == InvoiceStatus::Void {
            return Err(DomainError::conflict("invoice is void"));
        }
        self.status = status;
        Ok(self)
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for Invoice {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub client_id: ClientId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount: u64,
}

impl NewInvoice {
    pub const REQUIRED_FIELDS: &'static [&'static str] =
        &["client_id", "period_start", "period_end", "amount"];

    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let new: NewInvoice = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed invoice payload: {e}")))?;

        if new.amount == 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        if new.period_end < new.period_start {
            return Err(DomainError::validation("billing period ends before it starts"));
        }

        Ok(new)
    }
}

/// Org-scoped invoice persistence.
pub trait InvoiceRepository: Send + Sync {
    fn create(&self, org_id: OrgId, new: NewInvoice) -> DomainResult<Invoice>;

    fn update(&self, org_id: OrgId, invoice: Invoice) -> DomainResult<Invoice>;

    fn get(&self, org_id: OrgId, id: InvoiceId) -> DomainResult<Invoice>;

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Invoice>>;
}
