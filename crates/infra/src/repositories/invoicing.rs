use guardpost_core::{DomainError, DomainResult, OrgId, RecordId};
use guardpost_invoicing::{Invoice, InvoiceId, InvoiceRepository, InvoiceStatus, NewInvoice};

use crate::tenant_store::{InMemoryTenantStore, TenantStore};

/// In-memory invoice register.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    store: InMemoryTenantStore<InvoiceId, Invoice>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn create(&self, org_id: OrgId, new: NewInvoice) -> DomainResult<Invoice> {
        let invoice = Invoice {
            id: InvoiceId::new(RecordId::new()),
            org_id,
            client_id: new.client_id,
            period_start: new.period_start,
            period_end: new.period_end,
            amount: new.amount,
            status: InvoiceStatus::Draft,
            deleted: false,
        };
        self.store.upsert(org_id, invoice.id, invoice.clone());
        Ok(invoice)
    }

    fn update(&self, org_id: OrgId, invoice: Invoice) -> DomainResult<Invoice> {
        if self.store.get(org_id, &invoice.id).is_none() {
            return Err(DomainError::NotFound);
        }
        self.store.upsert(org_id, invoice.id, invoice.clone());
        Ok(invoice)
    }

    fn get(&self, org_id: OrgId, id: InvoiceId) -> DomainResult<Invoice> {
        match self.store.get(org_id, &id) {
            Some(invoice) if !invoice.deleted => Ok(invoice),
            _ => Err(DomainError::NotFound),
        }
    }

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self
            .store
            .list(org_id)
            .into_iter()
            .filter(|i| !i.deleted)
            .collect();
        invoices.sort_by_key(|i| i.period_start);
        Ok(invoices)
    }
}
