//! # Speedway Audit
//!
//! Bounded audit trail of match events and rejected requests.
//! `AuditTrail` plugs into `MatchService` as an observer.

mod audit_logger;

pub use audit_logger::{AuditEntry, AuditEventType, AuditLogger, AuditStats, AuditTrail};
