//! Entity writers: the per-request-type adapters the approval workflow
//! dispatches to when a request is approved.
//!
//! Every writer validates the proposed payload at submission time and applies
//! it through the target repository's normal write path at approval time.
//! Repository failures are mapped to `EntityWrite` so the workflow leaves the
//! request pending.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use guardpost_approvals::{
    ApprovalError, ApprovalRequest, ApprovalResult, EntityWriter, RequestType, WriterRegistry,
};
use guardpost_attendance::{AttendanceRepository, AttendanceStatus, LeaveRange, NewAttendance};
use guardpost_clients::{BranchRepository, ClientRepository, NewBranch, NewClient};
use guardpost_core::payload::require_fields;
use guardpost_core::DomainError;
use guardpost_deployments::{Deployment, DeploymentChange, DeploymentRepository};
use guardpost_guards::{GuardId, GuardRepository, NewGuard};
use guardpost_invoicing::InvoiceRepository;
use guardpost_payroll::{NewExpenseClaim, NewSalaryAdjustment, PayrollRepository};

use crate::repositories::{
    InMemoryAttendanceRepository, InMemoryBranchRepository, InMemoryClientRepository,
    InMemoryDeploymentRepository, InMemoryGuardRepository, InMemoryInvoiceRepository,
    InMemoryPayrollRepository,
};

fn entity_write(e: DomainError) -> ApprovalError {
    ApprovalError::EntityWrite(e.to_string())
}

/// The repository set one deployment of the back office runs against.
#[derive(Clone)]
pub struct Repositories {
    pub guards: Arc<dyn GuardRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub branches: Arc<dyn BranchRepository>,
    pub deployments: Arc<dyn DeploymentRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub payroll: Arc<dyn PayrollRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
}

impl Repositories {
    /// Fresh in-memory repositories (embedded deployment, tests).
    pub fn in_memory() -> Self {
        Self {
            guards: Arc::new(InMemoryGuardRepository::new()),
            clients: Arc::new(InMemoryClientRepository::new()),
            branches: Arc::new(InMemoryBranchRepository::new()),
            deployments: Arc::new(InMemoryDeploymentRepository::new()),
            attendance: Arc::new(InMemoryAttendanceRepository::new()),
            payroll: Arc::new(InMemoryPayrollRepository::new()),
            invoices: Arc::new(InMemoryInvoiceRepository::new()),
        }
    }

}

/// Bind every request type to its writer.
///
/// Called once at startup; the workflow refuses submissions for unregistered
/// types, so this registration is the complete list of mutations the approval
/// lifecycle can carry.
pub fn standard_registry(repos: &Repositories) -> WriterRegistry {
    WriterRegistry::new()
        .register(
            RequestType::GuardEnrollment,
            Arc::new(GuardEnrollmentWriter {
                guards: repos.guards.clone(),
            }),
        )
        .register(
            RequestType::GuardTermination,
            Arc::new(GuardTerminationWriter {
                guards: repos.guards.clone(),
            }),
        )
        .register(
            RequestType::DeploymentChange,
            Arc::new(DeploymentChangeWriter {
                deployments: repos.deployments.clone(),
            }),
        )
        .register(
            RequestType::LeaveRequest,
            Arc::new(LeaveRequestWriter {
                attendance: repos.attendance.clone(),
            }),
        )
        .register(
            RequestType::ExpenseApproval,
            Arc::new(ExpenseApprovalWriter {
                payroll: repos.payroll.clone(),
            }),
        )
        .register(
            RequestType::SalaryAdjustment,
            Arc::new(SalaryAdjustmentWriter {
                guards: repos.guards.clone(),
                payroll: repos.payroll.clone(),
            }),
        )
        .register(
            RequestType::ClientCreation,
            Arc::new(ClientCreationWriter {
                clients: repos.clients.clone(),
            }),
        )
        .register(
            RequestType::ClientBranchCreation,
            Arc::new(BranchCreationWriter {
                clients: repos.clients.clone(),
                branches: repos.branches.clone(),
            }),
        )
}

struct GuardEnrollmentWriter {
    guards: Arc<dyn GuardRepository>,
}

impl EntityWriter for GuardEnrollmentWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        NewGuard::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let new = NewGuard::from_payload(&request.entity_data)?;
        self.guards
            .create(request.org_id, new)
            .map_err(entity_write)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TerminationPayload {
    guard_id: GuardId,
}

impl TerminationPayload {
    const REQUIRED_FIELDS: &'static [&'static str] = &["guard_id"];

    fn from_payload(payload: &JsonValue) -> ApprovalResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;
        let parsed: TerminationPayload = serde_json::from_value(payload.clone())
            .map_err(|e| ApprovalError::Validation(format!("malformed termination payload: {e}")))?;
        Ok(parsed)
    }
}

struct GuardTerminationWriter {
    guards: Arc<dyn GuardRepository>,
}

impl EntityWriter for GuardTerminationWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        TerminationPayload::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let payload = TerminationPayload::from_payload(&request.entity_data)?;

        // A guard that vanished between submission and approval is a write
        // failure, not a validation failure.
        let guard = self
            .guards
            .get(request.org_id, payload.guard_id)
            .map_err(entity_write)?;
        let terminated = guard.terminate().map_err(entity_write)?;
        self.guards
            .update(request.org_id, terminated)
            .map_err(entity_write)?;
        Ok(())
    }
}

struct DeploymentChangeWriter {
    deployments: Arc<dyn DeploymentRepository>,
}

impl EntityWriter for DeploymentChangeWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        DeploymentChange::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let change = DeploymentChange::from_payload(&request.entity_data)?;

        match change.deployment_id {
            Some(id) => {
                let existing = self
                    .deployments
                    .get(request.org_id, id)
                    .map_err(entity_write)?;
                let updated = Deployment {
                    guard_id: change.new.guard_id,
                    branch_id: change.new.branch_id,
                    shift: change.new.shift,
                    starts_on: change.new.starts_on,
                    ends_on: change.new.ends_on,
                    ..existing
                };
                self.deployments
                    .update(request.org_id, updated)
                    .map_err(entity_write)?;
            }
            None => {
                self.deployments
                    .create(request.org_id, change.new)
                    .map_err(entity_write)?;
            }
        }
        Ok(())
    }
}

struct LeaveRequestWriter {
    attendance: Arc<dyn AttendanceRepository>,
}

impl EntityWriter for LeaveRequestWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        LeaveRange::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let range = LeaveRange::from_payload(&request.entity_data)?;

        // Pre-check collisions so a mid-range conflict cannot leave a
        // half-written leave block behind.
        let existing = self
            .attendance
            .list_for_guard(request.org_id, range.guard_id)
            .map_err(entity_write)?;
        for day in range.days() {
            if existing.iter().any(|r| r.date == day) {
                return Err(ApprovalError::EntityWrite(format!(
                    "guard already has an attendance mark on {day}"
                )));
            }
        }

        for day in range.days() {
            self.attendance
                .mark(
                    request.org_id,
                    NewAttendance {
                        guard_id: range.guard_id,
                        date: day,
                        status: AttendanceStatus::Leave,
                        note: range.note.clone(),
                    },
                    request.requested_by,
                )
                .map_err(entity_write)?;
        }
        Ok(())
    }
}

struct ExpenseApprovalWriter {
    payroll: Arc<dyn PayrollRepository>,
}

impl EntityWriter for ExpenseApprovalWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        NewExpenseClaim::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let new = NewExpenseClaim::from_payload(&request.entity_data)?;
        self.payroll
            .record_expense(request.org_id, new)
            .map_err(entity_write)?;
        Ok(())
    }
}

struct SalaryAdjustmentWriter {
    guards: Arc<dyn GuardRepository>,
    payroll: Arc<dyn PayrollRepository>,
}

impl EntityWriter for SalaryAdjustmentWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        NewSalaryAdjustment::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let new = NewSalaryAdjustment::from_payload(&request.entity_data)?;

        // The guard's rate and the adjustment record move together.
        let mut guard = self
            .guards
            .get(request.org_id, new.guard_id)
            .map_err(entity_write)?;
        guard.monthly_rate = new.new_monthly_rate;
        self.guards
            .update(request.org_id, guard)
            .map_err(entity_write)?;

        self.payroll
            .record_adjustment(request.org_id, new)
            .map_err(entity_write)?;
        Ok(())
    }
}

struct ClientCreationWriter {
    clients: Arc<dyn ClientRepository>,
}

impl EntityWriter for ClientCreationWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        NewClient::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let new = NewClient::from_payload(&request.entity_data)?;
        self.clients
            .create(request.org_id, new)
            .map_err(entity_write)?;
        Ok(())
    }
}

struct BranchCreationWriter {
    clients: Arc<dyn ClientRepository>,
    branches: Arc<dyn BranchRepository>,
}

impl EntityWriter for BranchCreationWriter {
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        NewBranch::from_payload(payload)?;
        Ok(())
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        let new = NewBranch::from_payload(&request.entity_data)?;

        // The parent client must still exist.
        self.clients
            .get(request.org_id, new.client_id)
            .map_err(entity_write)?;
        self.branches
            .create(request.org_id, new)
            .map_err(entity_write)?;
        Ok(())
    }
}
