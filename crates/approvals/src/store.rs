//! Approval-request persistence contract.
//!
//! `decide_if_pending` is the **sole** status-mutation path. Implementations
//! must run the transition function while holding the row's write lock with
//! the update conditioned on the row still being `pending`: of two concurrent
//! deciders exactly one wins and the loser observes `InvalidState`. Because
//! the entity write runs inside the transition function, a failed write
//! commits nothing and the request stays pending.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use guardpost_core::{OrgId, RequestId};

use crate::error::ApprovalResult;
use crate::request::{ApprovalRequest, RequestStatus, RequestType};

/// Filter for `list`: a pure in-memory predicate over the org's rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
    /// Case-insensitive free text over id, title, requester name, and
    /// description.
    pub search: Option<String>,
    /// Row cap applied after filtering and sorting; defaults to
    /// [`RequestFilter::DEFAULT_LIMIT`].
    pub limit: Option<usize>,
}

impl RequestFilter {
    pub const DEFAULT_LIMIT: usize = 500;

    pub fn matches(&self, request: &ApprovalRequest) -> bool {
        if let Some(status) = self.status {
            if request.status != status {
                return false;
            }
        }
        if let Some(request_type) = self.request_type {
            if request.request_type != request_type {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if needle.is_empty() {
                return true;
            }
            let id = request.id.to_string();
            let haystacks = [
                id.as_str(),
                request.title.as_str(),
                request.requested_by_name.as_str(),
                request.description.as_deref().unwrap_or(""),
            ];
            if !haystacks
                .iter()
                .any(|h| h.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

/// Org-scoped approval-request store.
pub trait ApprovalStore: Send + Sync {
    /// Persist a freshly submitted request.
    fn insert(&self, request: ApprovalRequest) -> ApprovalResult<()>;

    /// Fetch one request. Ids outside the caller's org are `NotFound`.
    fn get(&self, org_id: OrgId, id: RequestId) -> ApprovalResult<ApprovalRequest>;

    /// Filtered rows for the org, newest `requested_at` first, capped by the
    /// filter's limit. No other ordering is guaranteed.
    fn list(&self, org_id: OrgId, filter: &RequestFilter) -> ApprovalResult<Vec<ApprovalRequest>>;

    /// Atomically transition a pending request.
    ///
    /// The implementation must (in order, under the row's write lock):
    /// 1. resolve the row org-scoped (`NotFound` otherwise),
    /// 2. fail with `InvalidState` unless the row is `pending`,
    /// 3. run `transition` on the current row,
    /// 4. commit its result only on `Ok` — any `Err` leaves the row untouched.
    fn decide_if_pending(
        &self,
        org_id: OrgId,
        id: RequestId,
        transition: &dyn Fn(&ApprovalRequest) -> ApprovalResult<ApprovalRequest>,
    ) -> ApprovalResult<ApprovalRequest>;
}

impl<S> ApprovalStore for Arc<S>
where
    S: ApprovalStore + ?Sized,
{
    fn insert(&self, request: ApprovalRequest) -> ApprovalResult<()> {
        (**self).insert(request)
    }

    fn get(&self, org_id: OrgId, id: RequestId) -> ApprovalResult<ApprovalRequest> {
        (**self).get(org_id, id)
    }

    fn list(&self, org_id: OrgId, filter: &RequestFilter) -> ApprovalResult<Vec<ApprovalRequest>> {
        (**self).list(org_id, filter)
    }

    fn decide_if_pending(
        &self,
        org_id: OrgId,
        id: RequestId,
        transition: &dyn Fn(&ApprovalRequest) -> ApprovalResult<ApprovalRequest>,
    ) -> ApprovalResult<ApprovalRequest> {
        (**self).decide_if_pending(org_id, id, transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use guardpost_auth::{AuthContext, Role};
    use guardpost_core::UserId;
    use serde_json::json;

    use crate::request::{Priority, Submission};

    fn sample(title: &str, requester: &str) -> ApprovalRequest {
        let ctx = AuthContext::new(UserId::new(), requester, Role::HrOfficer, OrgId::new());
        ApprovalRequest::submitted(
            &ctx,
            Submission {
                request_type: RequestType::GuardEnrollment,
                title: title.to_string(),
                description: Some("night shift cover".to_string()),
                reason: None,
                priority: Priority::Normal,
                entity_data: json!({}),
            },
            Utc::now(),
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = RequestFilter::default();
        assert!(filter.matches(&sample("Enroll guard", "Amina")));
        assert_eq!(filter.effective_limit(), RequestFilter::DEFAULT_LIMIT);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_requester() {
        let request = sample("Enroll Joseph Kamau", "Amina Yusuf");

        let by_title = RequestFilter {
            search: Some("joseph".to_string()),
            ..Default::default()
        };
        assert!(by_title.matches(&request));

        let by_requester = RequestFilter {
            search: Some("YUSUF".to_string()),
            ..Default::default()
        };
        assert!(by_requester.matches(&request));

        let by_description = RequestFilter {
            search: Some("night shift".to_string()),
            ..Default::default()
        };
        assert!(by_description.matches(&request));

        let miss = RequestFilter {
            search: Some("payroll".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&request));
    }

    #[test]
    fn search_matches_the_request_id() {
        let request = sample("Enroll", "Amina");
        let filter = RequestFilter {
            search: Some(request.id.to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&request));
    }

    #[test]
    fn status_and_type_filters_are_conjunctive() {
        let request = sample("Enroll", "Amina");

        let wrong_status = RequestFilter {
            status: Some(RequestStatus::Approved),
            ..Default::default()
        };
        assert!(!wrong_status.matches(&request));

        let both = RequestFilter {
            status: Some(RequestStatus::Pending),
            request_type: Some(RequestType::GuardEnrollment),
            ..Default::default()
        };
        assert!(both.matches(&request));
    }
}
