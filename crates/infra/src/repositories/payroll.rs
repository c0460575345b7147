use guardpost_core::{DomainResult, OrgId, RecordId};
use guardpost_payroll::{
    ExpenseClaim, NewExpenseClaim, NewSalaryAdjustment, PayrollRecordId, PayrollRepository,
    SalaryAdjustment,
};

use crate::tenant_store::{InMemoryTenantStore, TenantStore};

/// In-memory payroll ledger.
///
/// Adjustments and expenses are append-only; both exist solely as approval
/// outcomes.
#[derive(Debug, Default)]
pub struct InMemoryPayrollRepository {
    adjustments: InMemoryTenantStore<PayrollRecordId, SalaryAdjustment>,
    expenses: InMemoryTenantStore<PayrollRecordId, ExpenseClaim>,
}

impl InMemoryPayrollRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayrollRepository for InMemoryPayrollRepository {
    fn record_adjustment(
        &self,
        org_id: OrgId,
        new: NewSalaryAdjustment,
    ) -> DomainResult<SalaryAdjustment> {
        let adjustment = SalaryAdjustment {
            id: PayrollRecordId::new(RecordId::new()),
            org_id,
            guard_id: new.guard_id,
            new_monthly_rate: new.new_monthly_rate,
            effective_from: new.effective_from,
            reason: new.reason,
        };
        self.adjustments
            .upsert(org_id, adjustment.id, adjustment.clone());
        Ok(adjustment)
    }

    fn record_expense(&self, org_id: OrgId, new: NewExpenseClaim) -> DomainResult<ExpenseClaim> {
        let claim = ExpenseClaim {
            id: PayrollRecordId::new(RecordId::new()),
            org_id,
            guard_id: new.guard_id,
            amount: new.amount,
            category: new.category,
            incurred_on: new.incurred_on,
            note: new.note,
        };
        self.expenses.upsert(org_id, claim.id, claim.clone());
        Ok(claim)
    }

    fn list_adjustments(&self, org_id: OrgId) -> DomainResult<Vec<SalaryAdjustment>> {
        let mut adjustments = self.adjustments.list(org_id);
        adjustments.sort_by_key(|a| a.effective_from);
        Ok(adjustments)
    }

    fn list_expenses(&self, org_id: OrgId) -> DomainResult<Vec<ExpenseClaim>> {
        let mut expenses = self.expenses.list(org_id);
        expenses.sort_by_key(|e| e.incurred_on);
        Ok(expenses)
    }
}
