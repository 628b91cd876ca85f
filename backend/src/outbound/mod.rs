//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and the backing
//! store. They contain no business logic.
//!
//! - **memory**: process-local record store.

pub mod memory;
