//! Opaque-payload helpers.
//!
//! Approval requests carry the full proposed record as an uninterpreted JSON
//! payload. Repositories declare which fields their create/update path needs;
//! presence is checked at submission time so a request can never reach a
//! decider with an unusable payload.

use serde_json::Value as JsonValue;

use crate::error::{DomainError, DomainResult};

/// Fail with [`DomainError::MissingField`] on the first absent or null field.
pub fn require_fields(payload: &JsonValue, fields: &'static [&'static str]) -> DomainResult<()> {
    for field in fields {
        match payload.get(*field) {
            None | Some(JsonValue::Null) => return Err(DomainError::MissingField(field)),
            Some(_) => {}
        }
    }
    Ok(())
}
