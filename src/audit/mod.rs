//! Audit log of ledger writes
//!
//! Every record the JSON ledger creates or updates is appended to
//! `audit.log` as one JSON line, with before/after snapshots for updates.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
