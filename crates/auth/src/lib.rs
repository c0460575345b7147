//! `guardpost-auth` — pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the session
//! layer resolves the authenticated identity into an [`AuthContext`] and every
//! workflow call receives it explicitly. No implicit globals, no caching.

pub mod context;
pub mod permissions;
pub mod roles;

pub use context::AuthContext;
pub use permissions::{evaluate, is_allowed, Action, Decision, Module};
pub use roles::Role;
