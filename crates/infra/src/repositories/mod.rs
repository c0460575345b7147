//! In-memory entity repositories over the org-isolated tenant store.

pub mod attendance;
pub mod clients;
pub mod deployments;
pub mod guards;
pub mod invoicing;
pub mod payroll;

pub use attendance::InMemoryAttendanceRepository;
pub use clients::{InMemoryBranchRepository, InMemoryClientRepository};
pub use deployments::InMemoryDeploymentRepository;
pub use guards::InMemoryGuardRepository;
pub use invoicing::InMemoryInvoiceRepository;
pub use payroll::InMemoryPayrollRepository;
