//! `guardpost-events` — notification/audit fan-out (mechanics only).
//!
//! The workflow publishes "request submitted" / "request decided" notices for
//! external listeners (UI badge counts, email, audit sinks). Delivery is
//! best-effort and not part of the workflow's correctness contract.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
