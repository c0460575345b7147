use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_auth::{AuthContext, Module, Role};
use guardpost_core::{Entity, OrgId, OrgScoped, RequestId, UserId};

use crate::error::{ApprovalError, ApprovalResult};

/// What kind of mutation a request proposes.
///
/// The set is closed: the workflow must know which entity writer to dispatch
/// to on approval, so every variant is registered at construction time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    GuardEnrollment,
    GuardTermination,
    DeploymentChange,
    LeaveRequest,
    ExpenseApproval,
    SalaryAdjustment,
    ClientCreation,
    ClientBranchCreation,
}

impl RequestType {
    /// The permission module an `approve` decision on this request is gated by.
    pub fn module(&self) -> Module {
        match self {
            RequestType::GuardEnrollment | RequestType::GuardTermination => Module::Guards,
            RequestType::DeploymentChange => Module::Deployments,
            RequestType::LeaveRequest => Module::Attendance,
            RequestType::ExpenseApproval | RequestType::SalaryAdjustment => Module::Payroll,
            RequestType::ClientCreation => Module::Clients,
            RequestType::ClientBranchCreation => Module::Branches,
        }
    }

    /// The target aggregate the request will mutate.
    pub fn entity_type(&self) -> &'static str {
        match self {
            RequestType::GuardEnrollment | RequestType::GuardTermination => "guard",
            RequestType::DeploymentChange => "deployment",
            RequestType::LeaveRequest => "attendance",
            RequestType::ExpenseApproval => "expense_claim",
            RequestType::SalaryAdjustment => "salary_adjustment",
            RequestType::ClientCreation => "client",
            RequestType::ClientBranchCreation => "branch",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::GuardEnrollment => "guard_enrollment",
            RequestType::GuardTermination => "guard_termination",
            RequestType::DeploymentChange => "deployment_change",
            RequestType::LeaveRequest => "leave_request",
            RequestType::ExpenseApproval => "expense_approval",
            RequestType::SalaryAdjustment => "salary_adjustment",
            RequestType::ClientCreation => "client_creation",
            RequestType::ClientBranchCreation => "client_branch_creation",
        }
    }
}

impl core::fmt::Display for RequestType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display/sort hint only; has no scheduling effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Request lifecycle status.
///
/// `Pending` is the only non-terminal state; exactly one terminal transition
/// ever happens per request, after which the status is immutable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        *self != RequestStatus::Pending
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Input to `submit`: everything the requester proposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub request_type: RequestType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Full proposed record; opaque to the workflow beyond field-presence
    /// validation at submission time.
    pub entity_data: JsonValue,
}

/// A proposed entity mutation routed through the approval lifecycle.
///
/// All fields are preserved verbatim once set (audit trail); rows are never
/// physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub id: RequestId,
    pub org_id: OrgId,
    pub request_type: RequestType,
    /// Derived from `request_type` at submission; stored for audit display.
    pub entity_type: String,
    pub entity_data: JsonValue,
    pub title: String,
    pub description: Option<String>,
    pub reason: Option<String>,
    pub priority: Priority,
    pub status: RequestStatus,
    pub requested_by: UserId,
    pub requested_by_name: String,
    pub requested_by_role: Role,
    pub requested_at: DateTime<Utc>,
    pub approved_by: Option<UserId>,
    pub approved_by_name: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl Entity for ApprovalRequest {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for ApprovalRequest {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

impl ApprovalRequest {
    /// Build a freshly submitted (pending) request.
    ///
    /// Payload validation against the target repository happens in the
    /// workflow before this is persisted.
    pub fn submitted(ctx: &AuthContext, submission: Submission, now: DateTime<Utc>) -> Self {
        Self {
            id: RequestId::new(),
            org_id: ctx.org_id,
            request_type: submission.request_type,
            entity_type: submission.request_type.entity_type().to_string(),
            entity_data: submission.entity_data,
            title: submission.title,
            description: submission.description,
            reason: submission.reason,
            priority: submission.priority,
            status: RequestStatus::Pending,
            requested_by: ctx.user_id,
            requested_by_name: ctx.display_name.clone(),
            requested_by_role: ctx.role,
            requested_at: now,
            approved_by: None,
            approved_by_name: None,
            decided_at: None,
            rejection_reason: None,
        }
    }

    fn ensure_pending(&self) -> ApprovalResult<()> {
        if self.status.is_terminal() {
            return Err(ApprovalError::InvalidState(format!(
                "request is already {}",
                self.status
            )));
        }
        Ok(())
    }

    /// Pure transition: pending → approved, stamping the decider.
    pub fn approved(mut self, decider: &AuthContext, decided_at: DateTime<Utc>) -> ApprovalResult<Self> {
        self.ensure_pending()?;
        self.status = RequestStatus::Approved;
        self.approved_by = Some(decider.user_id);
        self.approved_by_name = Some(decider.display_name.clone());
        self.decided_at = Some(decided_at);
        Ok(self)
    }

    /// Pure transition: pending → rejected. The reason is mandatory.
    pub fn rejected(
        mut self,
        decider: &AuthContext,
        reason: &str,
        decided_at: DateTime<Utc>,
    ) -> ApprovalResult<Self> {
        self.ensure_pending()?;
        if reason.trim().is_empty() {
            return Err(ApprovalError::Validation(
                "rejection reason cannot be empty".to_string(),
            ));
        }
        self.status = RequestStatus::Rejected;
        self.approved_by = Some(decider.user_id);
        self.approved_by_name = Some(decider.display_name.clone());
        self.decided_at = Some(decided_at);
        self.rejection_reason = Some(reason.trim().to_string());
        Ok(self)
    }

    /// Pure transition: pending → cancelled. No decider stamp: a cancelled
    /// request was never decided.
    pub fn cancelled(mut self) -> ApprovalResult<Self> {
        self.ensure_pending()?;
        self.status = RequestStatus::Cancelled;
        Ok(self)
    }
}
