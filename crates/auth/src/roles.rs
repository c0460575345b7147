use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role assigned to a back-office user.
///
/// The set is closed: permission evaluation is a static table over these
/// variants, so an unknown role can never be granted anything.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Always allowed, regardless of module/action. A deliberate bypass.
    SystemAdmin,
    RegionalManager,
    HrOfficer,
    OpsSupervisor,
    FinanceOfficer,
    InventoryOfficer,
    AuditorReadonly,
    ClientPortal,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "system_admin",
            Role::RegionalManager => "regional_manager",
            Role::HrOfficer => "hr_officer",
            Role::OpsSupervisor => "ops_supervisor",
            Role::FinanceOfficer => "finance_officer",
            Role::InventoryOfficer => "inventory_officer",
            Role::AuditorReadonly => "auditor_readonly",
            Role::ClientPortal => "client_portal",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system_admin" => Ok(Role::SystemAdmin),
            "regional_manager" => Ok(Role::RegionalManager),
            "hr_officer" => Ok(Role::HrOfficer),
            "ops_supervisor" => Ok(Role::OpsSupervisor),
            "finance_officer" => Ok(Role::FinanceOfficer),
            "inventory_officer" => Ok(Role::InventoryOfficer),
            "auditor_readonly" => Ok(Role::AuditorReadonly),
            "client_portal" => Ok(Role::ClientPortal),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
