//! `guardpost-clients` — client and branch records and their repositories.
//!
//! A client is a customer organization that contracts guards; a branch is one
//! of its physical sites, the unit deployments are assigned to.

pub mod branch;
pub mod client;

pub use branch::{Branch, BranchId, BranchRepository, NewBranch};
pub use client::{Client, ClientId, ClientRepository, ClientStatus, NewClient};
