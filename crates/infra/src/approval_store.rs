use std::collections::HashMap;
use std::sync::RwLock;

use guardpost_approvals::{
    ApprovalError, ApprovalRequest, ApprovalResult, ApprovalStore, RequestFilter,
};
use guardpost_core::{OrgId, RequestId};

/// In-memory approval-request store.
///
/// One map under one lock: `decide_if_pending` holds the write lock across
/// the pending check, the transition (including the entity write the workflow
/// performs inside it), and the commit, so two concurrent deciders are
/// serialized and the loser observes the winner's terminal state.
#[derive(Debug, Default)]
pub struct InMemoryApprovalStore {
    rows: RwLock<HashMap<(OrgId, RequestId), ApprovalRequest>>,
}

impl InMemoryApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> ApprovalError {
    ApprovalError::EntityWrite("approval store lock poisoned".to_string())
}

impl ApprovalStore for InMemoryApprovalStore {
    fn insert(&self, request: ApprovalRequest) -> ApprovalResult<()> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert((request.org_id, request.id), request);
        Ok(())
    }

    fn get(&self, org_id: OrgId, id: RequestId) -> ApprovalResult<ApprovalRequest> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        rows.get(&(org_id, id)).cloned().ok_or(ApprovalError::NotFound)
    }

    fn list(&self, org_id: OrgId, filter: &RequestFilter) -> ApprovalResult<Vec<ApprovalRequest>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;

        let mut matched: Vec<ApprovalRequest> = rows
            .iter()
            .filter(|((o, _), r)| *o == org_id && filter.matches(r))
            .map(|(_, r)| r.clone())
            .collect();

        // Newest first; id as tie-break keeps the order stable.
        matched.sort_by(|a, b| {
            b.requested_at
                .cmp(&a.requested_at)
                .then_with(|| b.id.to_string().cmp(&a.id.to_string()))
        });
        matched.truncate(filter.effective_limit());

        Ok(matched)
    }

    fn decide_if_pending(
        &self,
        org_id: OrgId,
        id: RequestId,
        transition: &dyn Fn(&ApprovalRequest) -> ApprovalResult<ApprovalRequest>,
    ) -> ApprovalResult<ApprovalRequest> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        let current = rows.get(&(org_id, id)).ok_or(ApprovalError::NotFound)?;
        if current.status.is_terminal() {
            return Err(ApprovalError::InvalidState(format!(
                "request is already {}",
                current.status
            )));
        }

        let next = transition(current)?;
        rows.insert((org_id, id), next.clone());
        Ok(next)
    }
}
