//! Pure permission evaluator.
//!
//! `evaluate(role, module, action)` is a deterministic mapping with no side
//! effects and no caching: callers must re-evaluate on every check. A role is
//! granted `(module, action)` only when it appears in **both** its allowed
//! module set and its allowed action set.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Back-office module a permission applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Guards,
    Clients,
    Branches,
    Deployments,
    Attendance,
    Payroll,
    Loans,
    Invoices,
    Inventory,
    Approvals,
    Users,
    Reports,
}

/// Action a role may perform within a module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Approve,
    Export,
}

/// Outcome of a permission check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny,
}

const ALL_MODULES: &[Module] = &[
    Module::Guards,
    Module::Clients,
    Module::Branches,
    Module::Deployments,
    Module::Attendance,
    Module::Payroll,
    Module::Loans,
    Module::Invoices,
    Module::Inventory,
    Module::Approvals,
    Module::Users,
    Module::Reports,
];

fn allowed_modules(role: Role) -> &'static [Module] {
    match role {
        // SystemAdmin never reaches the table (bypass in `evaluate`).
        Role::SystemAdmin => ALL_MODULES,
        Role::RegionalManager => &[
            Module::Guards,
            Module::Clients,
            Module::Branches,
            Module::Deployments,
            Module::Attendance,
            Module::Approvals,
            Module::Reports,
        ],
        Role::HrOfficer => &[
            Module::Guards,
            Module::Attendance,
            Module::Payroll,
            Module::Loans,
            Module::Reports,
        ],
        Role::OpsSupervisor => &[Module::Guards, Module::Deployments, Module::Attendance],
        Role::FinanceOfficer => &[
            Module::Payroll,
            Module::Loans,
            Module::Invoices,
            Module::Reports,
        ],
        Role::InventoryOfficer => &[Module::Inventory],
        Role::AuditorReadonly => ALL_MODULES,
        Role::ClientPortal => &[Module::Deployments, Module::Attendance, Module::Invoices],
    }
}

fn allowed_actions(role: Role) -> &'static [Action] {
    match role {
        Role::SystemAdmin => &[
            Action::View,
            Action::Create,
            Action::Edit,
            Action::Delete,
            Action::Approve,
            Action::Export,
        ],
        Role::RegionalManager => &[
            Action::View,
            Action::Create,
            Action::Edit,
            Action::Approve,
            Action::Export,
        ],
        Role::HrOfficer => &[Action::View, Action::Create, Action::Edit, Action::Export],
        Role::OpsSupervisor => &[Action::View, Action::Create, Action::Edit],
        Role::FinanceOfficer => &[
            Action::View,
            Action::Create,
            Action::Edit,
            Action::Approve,
            Action::Export,
        ],
        Role::InventoryOfficer => &[Action::View, Action::Create, Action::Edit],
        Role::AuditorReadonly => &[Action::View, Action::Export],
        Role::ClientPortal => &[Action::View],
    }
}

/// Evaluate whether `role` may perform `action` in `module`.
///
/// - No side effects
/// - Deterministic
/// - `system_admin` always evaluates to `Allow` (deliberate bypass)
pub fn evaluate(role: Role, module: Module, action: Action) -> Decision {
    if role == Role::SystemAdmin {
        return Decision::Allow;
    }

    if allowed_modules(role).contains(&module) && allowed_actions(role).contains(&action) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Boolean convenience over [`evaluate`].
pub fn is_allowed(role: Role, module: Module, action: Action) -> bool {
    evaluate(role, module, action) == Decision::Allow
}
