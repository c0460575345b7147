//! In-memory infrastructure: tenant-isolated stores, entity repositories,
//! the approval store, and the entity-writer wiring.
//!
//! Everything here is backed by `std::sync` primitives and intended for the
//! embedded/single-process deployment; the traits it implements are the seam
//! where a database-backed deployment would plug in.

pub mod approval_store;
pub mod repositories;
pub mod tenant_store;
pub mod writers;

#[cfg(test)]
mod integration_tests;

pub use approval_store::InMemoryApprovalStore;
pub use tenant_store::{InMemoryTenantStore, TenantStore};
pub use writers::{standard_registry, Repositories};
