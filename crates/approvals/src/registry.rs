//! `RequestType` → entity-writer dispatch.
//!
//! The workflow never branches on request types ad hoc: each type is bound to
//! an [`EntityWriter`] once, at construction time, and approval dispatches
//! through the table. An unregistered type is rejected at submission, so a
//! pending request always has a writer waiting for it.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::{ApprovalError, ApprovalResult};
use crate::request::{ApprovalRequest, RequestType};

/// Applies an approved `entity_data` snapshot through one entity repository's
/// normal write path.
pub trait EntityWriter: Send + Sync {
    /// Field-presence (and shape) validation of a proposed payload.
    ///
    /// Called at submission time so a request can never reach a decider with
    /// a payload its repository would refuse for missing fields.
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()>;

    /// Perform the deferred mutation described by the request's `entity_data`.
    ///
    /// The full request is passed so writers can scope by its `org_id` and
    /// attribute derived records to its requester. Failures (uniqueness
    /// violations, vanished referents) surface as
    /// [`ApprovalError::EntityWrite`]; the caller guarantees the request
    /// stays pending when this fails.
    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()>;
}

impl<W> EntityWriter for Arc<W>
where
    W: EntityWriter + ?Sized,
{
    fn validate(&self, payload: &JsonValue) -> ApprovalResult<()> {
        (**self).validate(payload)
    }

    fn apply(&self, request: &ApprovalRequest) -> ApprovalResult<()> {
        (**self).apply(request)
    }
}

impl core::fmt::Debug for dyn EntityWriter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("EntityWriter")
    }
}

/// Dispatch table from request type to entity writer.
#[derive(Default)]
pub struct WriterRegistry {
    writers: HashMap<RequestType, Arc<dyn EntityWriter>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, request_type: RequestType, writer: Arc<dyn EntityWriter>) -> Self {
        self.writers.insert(request_type, writer);
        self
    }

    pub fn get(&self, request_type: RequestType) -> ApprovalResult<&Arc<dyn EntityWriter>> {
        self.writers.get(&request_type).ok_or_else(|| {
            ApprovalError::Validation(format!(
                "no entity writer registered for request type '{request_type}'"
            ))
        })
    }
}

impl core::fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("request_types", &self.writers.keys().collect::<Vec<_>>())
            .finish()
    }
}
