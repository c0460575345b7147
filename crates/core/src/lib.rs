//! `guardpost-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod payload;

pub use entity::{Entity, OrgScoped};
pub use error::{DomainError, DomainResult};
pub use id::{OrgId, RecordId, RequestId, UserId};
