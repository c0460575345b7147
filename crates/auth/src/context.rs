use serde::{Deserialize, Serialize};

use guardpost_core::{OrgId, UserId};

use crate::permissions::{is_allowed, Action, Module};
use crate::roles::Role;

/// Resolved identity for the current actor.
///
/// Supplied explicitly to every workflow call by the caller; the session layer
/// is responsible for obtaining and refreshing it. There is no implicit global
/// and no cached permission set — checks go through the static table on every
/// call, so a role change takes effect on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: UserId,
    /// Display name, denormalized onto records for the audit trail.
    pub display_name: String,
    pub role: Role,
    pub org_id: OrgId,
}

impl AuthContext {
    pub fn new(user_id: UserId, display_name: impl Into<String>, role: Role, org_id: OrgId) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            role,
            org_id,
        }
    }

    /// Whether this actor may perform `action` in `module`.
    pub fn can(&self, module: Module, action: Action) -> bool {
        is_allowed(self.role, module, action)
    }
}
