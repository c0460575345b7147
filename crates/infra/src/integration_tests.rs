//! End-to-end workflow scenarios over the in-memory stack: real store, real
//! repositories, real writers, real bus.

use std::sync::Arc;
use std::thread;

use serde_json::json;

use guardpost_approvals::{
    ApprovalError, ApprovalNotice, ApprovalWorkflow, Priority, RequestFilter, RequestStatus,
    RequestType, Submission,
};
use guardpost_attendance::AttendanceStatus;
use guardpost_auth::{AuthContext, Role};
use guardpost_core::{OrgId, RecordId, UserId};
use guardpost_events::{EventBus, InMemoryEventBus};
use guardpost_guards::NewGuard;

use crate::approval_store::InMemoryApprovalStore;
use crate::writers::{standard_registry, Repositories};

type Workflow = ApprovalWorkflow<Arc<InMemoryApprovalStore>, Arc<InMemoryEventBus<ApprovalNotice>>>;

struct Harness {
    workflow: Arc<Workflow>,
    repos: Repositories,
    bus: Arc<InMemoryEventBus<ApprovalNotice>>,
    org_id: OrgId,
}

fn harness() -> Harness {
    let repos = Repositories::in_memory();
    let bus = Arc::new(InMemoryEventBus::new());
    let workflow = Arc::new(ApprovalWorkflow::new(
        Arc::new(InMemoryApprovalStore::new()),
        standard_registry(&repos),
        bus.clone(),
    ));
    Harness {
        workflow,
        repos,
        bus,
        org_id: OrgId::new(),
    }
}

fn hr_officer(org_id: OrgId) -> AuthContext {
    AuthContext::new(UserId::new(), "Amina Yusuf", Role::HrOfficer, org_id)
}

fn admin(org_id: OrgId) -> AuthContext {
    AuthContext::new(UserId::new(), "Samuel Kiprop", Role::SystemAdmin, org_id)
}

fn ops_supervisor(org_id: OrgId) -> AuthContext {
    AuthContext::new(UserId::new(), "Peter Mwangi", Role::OpsSupervisor, org_id)
}

fn enrollment(badge_no: &str) -> Submission {
    Submission {
        request_type: RequestType::GuardEnrollment,
        title: format!("Enroll guard {badge_no}"),
        description: None,
        reason: None,
        priority: Priority::Normal,
        entity_data: json!({
            "badge_no": badge_no,
            "full_name": "Joseph Kamau",
            "national_id": "28817345",
            "hired_on": "2024-03-01",
            "monthly_rate": 4_200_000u64,
        }),
    }
}

fn seeded_guard(h: &Harness, badge_no: &str) -> guardpost_guards::Guard {
    h.repos
        .guards
        .create(
            h.org_id,
            NewGuard {
                badge_no: badge_no.to_string(),
                full_name: "Joseph Kamau".to_string(),
                national_id: "28817345".to_string(),
                phone: None,
                branch_id: None,
                hired_on: "2024-03-01".parse().unwrap(),
                monthly_rate: 4_200_000,
            },
        )
        .unwrap()
}

#[test]
fn enrollment_approved_by_admin_creates_the_guard() {
    let h = harness();
    let requester = hr_officer(h.org_id);
    let decider = admin(h.org_id);
    let sub = h.bus.subscribe();

    let request = h.workflow.submit(&requester, enrollment("G-0142")).unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert!(h.repos.guards.list(h.org_id).unwrap().is_empty());

    let approved = h.workflow.approve(&decider, request.id).unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(approved.approved_by, Some(decider.user_id));
    assert_eq!(approved.approved_by_name.as_deref(), Some("Samuel Kiprop"));
    assert!(approved.decided_at.is_some());

    let guards = h.repos.guards.list(h.org_id).unwrap();
    assert_eq!(guards.len(), 1);
    assert_eq!(guards[0].badge_no, "G-0142");

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

#[test]
fn rejection_requires_a_reason() {
    let h = harness();
    let request = h
        .workflow
        .submit(&hr_officer(h.org_id), enrollment("G-0142"))
        .unwrap();
    let decider = admin(h.org_id);

    let err = h.workflow.reject(&decider, request.id, "  ").unwrap_err();
    assert!(matches!(err, ApprovalError::Validation(_)));
    assert_eq!(
        h.workflow.get(&decider, request.id).unwrap().status,
        RequestStatus::Pending
    );

    let rejected = h
        .workflow
        .reject(&decider, request.id, "badge number already in use")
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("badge number already in use")
    );
    assert!(h.repos.guards.list(h.org_id).unwrap().is_empty());
}

#[test]
fn cancel_needs_the_requester_or_an_approver() {
    let h = harness();
    let requester = hr_officer(h.org_id);
    let request = h.workflow.submit(&requester, enrollment("G-0142")).unwrap();

    // ops_supervisor is neither the requester nor an approver for guards.
    let err = h
        .workflow
        .cancel(&ops_supervisor(h.org_id), request.id)
        .unwrap_err();
    assert!(matches!(err, ApprovalError::Authorization(_)));

    let cancelled = h.workflow.cancel(&requester, request.id).unwrap();
    assert_eq!(cancelled.status, RequestStatus::Cancelled);
    assert!(cancelled.approved_by.is_none());
    assert!(cancelled.decided_at.is_none());
}

#[test]
fn an_approver_can_cancel_someone_elses_request() {
    let h = harness();
    let request = h
        .workflow
        .submit(&hr_officer(h.org_id), enrollment("G-0142"))
        .unwrap();

    let manager = AuthContext::new(
        UserId::new(),
        "Daniel Otieno",
        Role::RegionalManager,
        h.org_id,
    );
    let cancelled = h.workflow.cancel(&manager, request.id).unwrap();
    assert_eq!(cancelled.status, RequestStatus::Cancelled);
}

#[test]
fn failed_entity_write_keeps_the_request_pending_and_retryable() {
    let h = harness();
    seeded_guard(&h, "G-0142");

    let request = h
        .workflow
        .submit(&hr_officer(h.org_id), enrollment("G-0142"))
        .unwrap();
    let decider = admin(h.org_id);

    // Duplicate badge: the repository refuses, the status does not move.
    let err = h.workflow.approve(&decider, request.id).unwrap_err();
    assert!(matches!(err, ApprovalError::EntityWrite(_)));
    assert_eq!(
        h.workflow.get(&decider, request.id).unwrap().status,
        RequestStatus::Pending
    );
    assert_eq!(h.repos.guards.list(h.org_id).unwrap().len(), 1);

    // The decider can still reject it afterwards.
    let rejected = h
        .workflow
        .reject(&decider, request.id, "duplicate badge")
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
}

#[test]
fn concurrent_deciders_are_serialized_to_one_winner() {
    let h = harness();
    let request = h
        .workflow
        .submit(&hr_officer(h.org_id), enrollment("G-0142"))
        .unwrap();

    let approver = admin(h.org_id);
    let rejecter = admin(h.org_id);

    let outcomes: Vec<Result<RequestStatus, ApprovalError>> = {
        let approve = {
            let workflow = h.workflow.clone();
            let ctx = approver.clone();
            thread::spawn(move || workflow.approve(&ctx, request.id).map(|r| r.status))
        };
        let reject = {
            let workflow = h.workflow.clone();
            let ctx = rejecter.clone();
            thread::spawn(move || {
                workflow
                    .reject(&ctx, request.id, "beaten to it")
                    .map(|r| r.status)
            })
        };
        vec![approve.join().unwrap(), reject.join().unwrap()]
    };

    let wins = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(wins, 1, "exactly one decider must win: {outcomes:?}");
    assert!(outcomes
        .iter()
        .filter_map(|o| o.as_ref().err())
        .all(|e| matches!(e, ApprovalError::InvalidState(_))));

    // The entity write happened at most once.
    let guards = h.repos.guards.list(h.org_id).unwrap();
    let stored = h.workflow.get(&approver, request.id).unwrap();
    match stored.status {
        RequestStatus::Approved => assert_eq!(guards.len(), 1),
        RequestStatus::Rejected => assert!(guards.is_empty()),
        other => panic!("request ended in unexpected status {other}"),
    }
}

#[test]
fn double_decide_fails_and_leaves_the_record_untouched() {
    let h = harness();
    let request = h
        .workflow
        .submit(&hr_officer(h.org_id), enrollment("G-0142"))
        .unwrap();
    let decider = admin(h.org_id);

    let approved = h.workflow.approve(&decider, request.id).unwrap();

    let err = h.workflow.approve(&decider, request.id).unwrap_err();
    assert!(matches!(err, ApprovalError::InvalidState(_)));
    let err = h
        .workflow
        .reject(&decider, request.id, "too late")
        .unwrap_err();
    assert!(matches!(err, ApprovalError::InvalidState(_)));

    let stored = h.workflow.get(&decider, request.id).unwrap();
    assert_eq!(stored, approved);
    assert_eq!(h.repos.guards.list(h.org_id).unwrap().len(), 1);
}

#[test]
fn requests_are_invisible_across_orgs() {
    let h = harness();
    let request = h
        .workflow
        .submit(&hr_officer(h.org_id), enrollment("G-0142"))
        .unwrap();

    let outsider = admin(OrgId::new());
    assert_eq!(
        h.workflow.get(&outsider, request.id).unwrap_err(),
        ApprovalError::NotFound
    );
    assert_eq!(
        h.workflow.approve(&outsider, request.id).unwrap_err(),
        ApprovalError::NotFound
    );
    assert!(h
        .workflow
        .list(&outsider, &RequestFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn list_filters_by_status_type_and_text() {
    let h = harness();
    let requester = hr_officer(h.org_id);
    let decider = admin(h.org_id);

    let enroll = h.workflow.submit(&requester, enrollment("G-0142")).unwrap();
    h.workflow
        .submit(
            &requester,
            Submission {
                request_type: RequestType::LeaveRequest,
                title: "Leave for Joseph".to_string(),
                description: None,
                reason: None,
                priority: Priority::High,
                entity_data: json!({
                    "guard_id": RecordId::new(),
                    "from": "2024-07-01",
                    "to": "2024-07-03",
                }),
            },
        )
        .unwrap();
    h.workflow.approve(&decider, enroll.id).unwrap();

    let pending = h
        .workflow
        .list(
            &decider,
            &RequestFilter {
                status: Some(RequestStatus::Pending),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].request_type, RequestType::LeaveRequest);

    let by_type = h
        .workflow
        .list(
            &decider,
            &RequestFilter {
                request_type: Some(RequestType::GuardEnrollment),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(by_type.len(), 1);

    let by_text = h
        .workflow
        .list(
            &decider,
            &RequestFilter {
                search: Some("joseph".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].title, "Leave for Joseph");
}

#[test]
fn approved_leave_materializes_attendance_marks() {
    let h = harness();
    let guard = seeded_guard(&h, "G-0142");
    let requester = hr_officer(h.org_id);

    let request = h
        .workflow
        .submit(
            &requester,
            Submission {
                request_type: RequestType::LeaveRequest,
                title: "Annual leave".to_string(),
                description: None,
                reason: None,
                priority: Priority::Normal,
                entity_data: json!({
                    "guard_id": guard.id,
                    "from": "2024-07-01",
                    "to": "2024-07-03",
                    "note": "annual leave",
                }),
            },
        )
        .unwrap();
    h.workflow.approve(&admin(h.org_id), request.id).unwrap();

    let marks = h
        .repos
        .attendance
        .list_for_guard(h.org_id, guard.id)
        .unwrap();
    assert_eq!(marks.len(), 3);
    assert!(marks
        .iter()
        .all(|m| m.status == AttendanceStatus::Leave && m.marked_by == requester.user_id));
}

#[test]
fn approved_termination_closes_out_the_guard() {
    let h = harness();
    let guard = seeded_guard(&h, "G-0142");

    let request = h
        .workflow
        .submit(
            &hr_officer(h.org_id),
            Submission {
                request_type: RequestType::GuardTermination,
                title: "Terminate G-0142".to_string(),
                description: None,
                reason: Some("contract ended".to_string()),
                priority: Priority::Normal,
                entity_data: json!({"guard_id": guard.id}),
            },
        )
        .unwrap();
    h.workflow.approve(&admin(h.org_id), request.id).unwrap();

    let stored = h.repos.guards.get(h.org_id, guard.id).unwrap();
    assert!(!stored.is_active());
}

#[test]
fn client_and_branch_creation_chain_through_approvals() {
    let h = harness();
    let manager = AuthContext::new(
        UserId::new(),
        "Daniel Otieno",
        Role::RegionalManager,
        h.org_id,
    );

    let client_request = h
        .workflow
        .submit(
            &manager,
            Submission {
                request_type: RequestType::ClientCreation,
                title: "Onboard Acme Mills".to_string(),
                description: None,
                reason: None,
                priority: Priority::Normal,
                entity_data: json!({"name": "Acme Mills"}),
            },
        )
        .unwrap();
    h.workflow.approve(&manager, client_request.id).unwrap();

    let clients = h.repos.clients.list(h.org_id).unwrap();
    assert_eq!(clients.len(), 1);

    let branch_request = h
        .workflow
        .submit(
            &manager,
            Submission {
                request_type: RequestType::ClientBranchCreation,
                title: "Add Westlands site".to_string(),
                description: None,
                reason: None,
                priority: Priority::Normal,
                entity_data: json!({
                    "client_id": clients[0].id,
                    "name": "Westlands",
                    "location": "Nairobi",
                }),
            },
        )
        .unwrap();
    h.workflow.approve(&manager, branch_request.id).unwrap();

    let branches = h
        .repos
        .branches
        .list_for_client(h.org_id, clients[0].id)
        .unwrap();
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0].name, "Westlands");
}

#[test]
fn submission_with_missing_payload_fields_never_enters_the_table() {
    let h = harness();
    let requester = hr_officer(h.org_id);

    let err = h
        .workflow
        .submit(
            &requester,
            Submission {
                request_type: RequestType::GuardEnrollment,
                title: "Enroll".to_string(),
                description: None,
                reason: None,
                priority: Priority::Normal,
                entity_data: json!({"full_name": "Joseph Kamau"}),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ApprovalError::Validation(_)));

    assert!(h
        .workflow
        .list(&admin(h.org_id), &RequestFilter::default())
        .unwrap()
        .is_empty());
}
