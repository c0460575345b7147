//! Approval workflow orchestration.
//!
//! Composes the store, the writer registry, and the notice bus behind one
//! synchronous surface: submit / approve / reject / cancel / get / list. Each
//! call is a single unit of work; the caller awaits completion before
//! reporting to the UI.

use chrono::Utc;

use guardpost_auth::{Action, AuthContext};
use guardpost_events::EventBus;

use crate::error::{ApprovalError, ApprovalResult};
use crate::notice::ApprovalNotice;
use crate::registry::WriterRegistry;
use crate::request::{ApprovalRequest, Submission};
use crate::store::{ApprovalStore, RequestFilter};

use guardpost_core::RequestId;

/// The request/decision lifecycle service.
///
/// Generic over the store and bus so tests run against the in-memory
/// implementations and deployments can swap in real backends.
pub struct ApprovalWorkflow<S, B> {
    store: S,
    registry: WriterRegistry,
    bus: B,
}

impl<S, B> ApprovalWorkflow<S, B>
where
    S: ApprovalStore,
    B: EventBus<ApprovalNotice>,
{
    /// The registry is resolved once here; every request type the workflow
    /// will ever accept must already be registered.
    pub fn new(store: S, registry: WriterRegistry, bus: B) -> Self {
        Self {
            store,
            registry,
            bus,
        }
    }

    /// Record a proposed mutation as a pending request.
    ///
    /// The payload is validated against the target repository's required
    /// fields now, not at decision time.
    pub fn submit(
        &self,
        ctx: &AuthContext,
        submission: Submission,
    ) -> ApprovalResult<ApprovalRequest> {
        let writer = self.registry.get(submission.request_type)?;
        writer.validate(&submission.entity_data)?;

        let request = ApprovalRequest::submitted(ctx, submission, Utc::now());
        self.store.insert(request.clone())?;

        tracing::info!(
            request_id = %request.id,
            request_type = %request.request_type,
            requested_by = %request.requested_by,
            "approval request submitted"
        );
        self.notify(ApprovalNotice::submitted(&request));

        Ok(request)
    }

    /// Approve a pending request and apply its entity mutation.
    ///
    /// The entity write and the status transition are one atomic unit: both
    /// run under the row's write lock, and a failed write leaves the request
    /// pending with the repository error surfaced to the decider.
    pub fn approve(&self, ctx: &AuthContext, id: RequestId) -> ApprovalResult<ApprovalRequest> {
        let decided = self
            .store
            .decide_if_pending(ctx.org_id, id, &|current| {
                self.authorize_decider(ctx, current)?;
                let writer = self.registry.get(current.request_type)?;
                writer.apply(current)?;
                current.clone().approved(ctx, Utc::now())
            })?;

        tracing::info!(
            request_id = %decided.id,
            approved_by = %ctx.user_id,
            "approval request approved"
        );
        self.notify(ApprovalNotice::decided(&decided, Utc::now()));

        Ok(decided)
    }

    /// Reject a pending request. No entity mutation; the reason is mandatory.
    pub fn reject(
        &self,
        ctx: &AuthContext,
        id: RequestId,
        reason: &str,
    ) -> ApprovalResult<ApprovalRequest> {
        let decided = self
            .store
            .decide_if_pending(ctx.org_id, id, &|current| {
                self.authorize_decider(ctx, current)?;
                current.clone().rejected(ctx, reason, Utc::now())
            })?;

        tracing::info!(
            request_id = %decided.id,
            rejected_by = %ctx.user_id,
            "approval request rejected"
        );
        self.notify(ApprovalNotice::decided(&decided, Utc::now()));

        Ok(decided)
    }

    /// Withdraw a pending request.
    ///
    /// Allowed for the original requester, or for a role that could have
    /// decided it (the override: `approve` permission on the request's
    /// module).
    pub fn cancel(&self, ctx: &AuthContext, id: RequestId) -> ApprovalResult<ApprovalRequest> {
        let cancelled = self
            .store
            .decide_if_pending(ctx.org_id, id, &|current| {
                let is_requester = current.requested_by == ctx.user_id;
                let has_override = ctx.can(current.request_type.module(), Action::Approve);
                if !is_requester && !has_override {
                    return Err(ApprovalError::Authorization(
                        "only the requester or an approver may cancel this request".to_string(),
                    ));
                }
                current.clone().cancelled()
            })?;

        tracing::info!(
            request_id = %cancelled.id,
            cancelled_by = %ctx.user_id,
            "approval request cancelled"
        );
        self.notify(ApprovalNotice::decided(&cancelled, Utc::now()));

        Ok(cancelled)
    }

    pub fn get(&self, ctx: &AuthContext, id: RequestId) -> ApprovalResult<ApprovalRequest> {
        self.store.get(ctx.org_id, id)
    }

    pub fn list(
        &self,
        ctx: &AuthContext,
        filter: &RequestFilter,
    ) -> ApprovalResult<Vec<ApprovalRequest>> {
        self.store.list(ctx.org_id, filter)
    }

    fn authorize_decider(
        &self,
        ctx: &AuthContext,
        request: &ApprovalRequest,
    ) -> ApprovalResult<()> {
        let module = request.request_type.module();
        if !ctx.can(module, Action::Approve) {
            return Err(ApprovalError::Authorization(format!(
                "role '{}' may not approve {} requests",
                ctx.role, request.request_type
            )));
        }
        Ok(())
    }

    /// Best-effort: a dropped notice is recoverable by re-reading the table.
    fn notify(&self, notice: ApprovalNotice) {
        if let Err(e) = self.bus.publish(notice) {
            tracing::warn!(error = ?e, "approval notice publish failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    use serde_json::{json, Value as JsonValue};

    use guardpost_auth::Role;
    use guardpost_core::{OrgId, UserId};
    use guardpost_events::InMemoryEventBus;

    use crate::registry::EntityWriter;
    use crate::request::{Priority, RequestStatus, RequestType};

    // Minimal store double; the production in-memory store (and its
    // concurrency behavior) is exercised in guardpost-infra.
    #[derive(Default)]
    struct MapStore {
        rows: RwLock<HashMap<(OrgId, RequestId), ApprovalRequest>>,
    }

    impl ApprovalStore for MapStore {
        fn insert(&self, request: ApprovalRequest) -> ApprovalResult<()> {
            self.rows
                .write()
                .unwrap()
                .insert((request.org_id, request.id), request);
            Ok(())
        }

        fn get(&self, org_id: OrgId, id: RequestId) -> ApprovalResult<ApprovalRequest> {
            self.rows
                .read()
                .unwrap()
                .get(&(org_id, id))
                .cloned()
                .ok_or(ApprovalError::NotFound)
        }

        fn list(
            &self,
            org_id: OrgId,
            filter: &RequestFilter,
        ) -> ApprovalResult<Vec<ApprovalRequest>> {
            Ok(self
                .rows
                .read()
                .unwrap()
                .values()
                .filter(|r| r.org_id == org_id && filter.matches(r))
                .cloned()
                .collect())
        }

        fn decide_if_pending(
            &self,
            org_id: OrgId,
            id: RequestId,
            transition: &dyn Fn(&ApprovalRequest) -> ApprovalResult<ApprovalRequest>,
        ) -> ApprovalResult<ApprovalRequest> {
            let mut rows = self.rows.write().unwrap();
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

    struct StubWriter {
        required: &'static [&'static str],
        fail_apply: bool,
    }

    impl EntityWriter for StubWriter {
        fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
            guardpost_core::payload::require_fields(payload, self.required)?;
            Ok(())
        }

        fn apply(&self, _request: &ApprovalRequest) -> ApprovalResult<()> {
            if self.fail_apply {
                Err(ApprovalError::EntityWrite("duplicate badge_no".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn workflow(
        fail_apply: bool,
    ) -> ApprovalWorkflow<Arc<MapStore>, Arc<InMemoryEventBus<ApprovalNotice>>> {
        let registry = WriterRegistry::new().register(
            RequestType::GuardEnrollment,
            Arc::new(StubWriter {
                required: &["full_name", "badge_no"],
                fail_apply,
            }),
        );
        ApprovalWorkflow::new(
            Arc::new(MapStore::default()),
            registry,
            Arc::new(InMemoryEventBus::new()),
        )
    }

    fn submission(entity_data: JsonValue) -> Submission {
        Submission {
            request_type: RequestType::GuardEnrollment,
            title: "Enroll Joseph Kamau".to_string(),
            description: None,
            reason: None,
            priority: Priority::Normal,
            entity_data,
        }
    }

    fn hr(org_id: OrgId) -> AuthContext {
        AuthContext::new(UserId::new(), "Amina Yusuf", Role::HrOfficer, org_id)
    }

    fn manager(org_id: OrgId) -> AuthContext {
        AuthContext::new(UserId::new(), "Daniel Otieno", Role::RegionalManager, org_id)
    }

    #[test]
    fn submit_validates_the_payload_up_front() {
        let wf = workflow(false);
        let ctx = hr(OrgId::new());

        let err = wf
            .submit(&ctx, submission(json!({"full_name": "Joseph"})))
            .unwrap_err();
        assert!(matches!(err, ApprovalError::Validation(_)));

        let ok = wf
            .submit(
                &ctx,
                submission(json!({"full_name": "Joseph", "badge_no": "G-1"})),
            )
            .unwrap();
        assert_eq!(ok.status, RequestStatus::Pending);
    }

    #[test]
    fn approve_requires_the_module_approve_permission() {
        let wf = workflow(false);
        let org_id = OrgId::new();
        let requester = hr(org_id);

        let request = wf
            .submit(
                &requester,
                submission(json!({"full_name": "Joseph", "badge_no": "G-1"})),
            )
            .unwrap();

        // hr_officer has no approve action at all.
        let err = wf.approve(&requester, request.id).unwrap_err();
        assert!(matches!(err, ApprovalError::Authorization(_)));
        assert_eq!(
            wf.get(&requester, request.id).unwrap().status,
            RequestStatus::Pending
        );

        let decided = wf.approve(&manager(org_id), request.id).unwrap();
        assert_eq!(decided.status, RequestStatus::Approved);
    }

    #[test]
    fn failed_entity_write_leaves_the_request_pending() {
        let wf = workflow(true);
        let org_id = OrgId::new();
        let request = wf
            .submit(
                &hr(org_id),
                submission(json!({"full_name": "Joseph", "badge_no": "G-1"})),
            )
            .unwrap();

        let err = wf.approve(&manager(org_id), request.id).unwrap_err();
        assert!(matches!(err, ApprovalError::EntityWrite(_)));

        let current = wf.get(&hr(org_id), request.id).unwrap();
        assert_eq!(current.status, RequestStatus::Pending);
        assert!(current.decided_at.is_none());
    }

    #[test]
    fn cancel_is_gated_to_requester_or_override() {
        let wf = workflow(false);
        let org_id = OrgId::new();
        let requester = hr(org_id);
        let request = wf
            .submit(
                &requester,
                submission(json!({"full_name": "Joseph", "badge_no": "G-1"})),
            )
            .unwrap();

        // A different hr_officer: neither requester nor approver.
        let stranger = AuthContext::new(UserId::new(), "Grace Njeri", Role::HrOfficer, org_id);
        let err = wf.cancel(&stranger, request.id).unwrap_err();
        assert!(matches!(err, ApprovalError::Authorization(_)));

        let cancelled = wf.cancel(&requester, request.id).unwrap();
        assert_eq!(cancelled.status, RequestStatus::Cancelled);
    }

    #[test]
    fn notices_are_published_for_submit_and_decide() {
        let org_id = OrgId::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let registry = WriterRegistry::new().register(
            RequestType::GuardEnrollment,
            Arc::new(StubWriter {
                required: &[],
                fail_apply: false,
            }),
        );
        let wf = ApprovalWorkflow::new(Arc::new(MapStore::default()), registry, bus.clone());
        let sub = bus.subscribe();

        let request = wf.submit(&hr(org_id), submission(json!({}))).unwrap();
        wf.approve(&manager(org_id), request.id).unwrap();

        assert!(matches!(
            sub.try_recv().unwrap(),
            ApprovalNotice::Submitted { .. }
        ));
        assert!(matches!(
            sub.try_recv().unwrap(),
            ApprovalNotice::Decided {
                status: RequestStatus::Approved,
                ..
            }
        ));
    }
}
