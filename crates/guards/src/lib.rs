//! `guardpost-guards` — guard records and their repository contract.

pub mod guard;

pub use guard::{Guard, GuardId, GuardRepository, GuardStatus, NewGuard};
