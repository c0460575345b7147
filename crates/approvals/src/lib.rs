//! `guardpost-approvals` — the approval-request lifecycle.
//!
//! Non-privileged roles propose entity mutations as pending requests instead
//! of writing directly; a role holding the `approve` permission on the
//! request's module decides them. On approval the `entity_data` snapshot
//! captured at submission time is applied through the target repository's
//! normal write path, atomically with the status transition. Requests are
//! never physically deleted; the table is the audit trail.

pub mod error;
pub mod notice;
pub mod registry;
pub mod request;
pub mod store;
pub mod workflow;

pub use error::{ApprovalError, ApprovalResult};
pub use notice::ApprovalNotice;
pub use registry::{EntityWriter, WriterRegistry};
pub use request::{ApprovalRequest, Priority, RequestStatus, RequestType, Submission};
pub use store::{ApprovalStore, RequestFilter};
pub use workflow::ApprovalWorkflow;
