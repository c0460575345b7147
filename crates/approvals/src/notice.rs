use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use guardpost_core::{OrgId, RequestId};
use guardpost_events::Event;

use crate::request::{ApprovalRequest, RequestStatus, RequestType};

/// Best-effort notification published after a request is persisted.
///
/// Listeners (UI badge counts, email, audit sinks) must treat delivery as
/// lossy; the request table is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalNotice {
    Submitted {
        request_id: RequestId,
        org_id: OrgId,
        request_type: RequestType,
        occurred_at: DateTime<Utc>,
    },
    Decided {
        request_id: RequestId,
        org_id: OrgId,
        request_type: RequestType,
        status: RequestStatus,
        occurred_at: DateTime<Utc>,
    },
}

impl ApprovalNotice {
    pub fn submitted(request: &ApprovalRequest) -> Self {
        Self::Submitted {
            request_id: request.id,
            org_id: request.org_id,
            request_type: request.request_type,
            occurred_at: request.requested_at,
        }
    }

    pub fn decided(request: &ApprovalRequest, occurred_at: DateTime<Utc>) -> Self {
        Self::Decided {
            request_id: request.id,
            org_id: request.org_id,
            request_type: request.request_type,
            status: request.status,
            occurred_at,
        }
    }
}

impl Event for ApprovalNotice {
    fn event_type(&self) -> &'static str {
        match self {
            ApprovalNotice::Submitted { .. } => "approvals.request.submitted",
            ApprovalNotice::Decided { .. } => "approvals.request.decided",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ApprovalNotice::Submitted { occurred_at, .. }
            | ApprovalNotice::Decided { occurred_at, .. } => *occurred_at,
        }
    }
}
