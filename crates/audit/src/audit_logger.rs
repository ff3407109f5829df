//! AuditLogger - Who changed which match, and what was turned down

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use speedway_domain::MatchEvent;
use speedway_usecase::{MatchObserver, ServiceError};

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: String,
    pub event_type: AuditEventType,
    pub match_id: String,
    pub action: String,
    pub heat: Option<u8>,
    pub success: bool,
    pub reason: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Types of audit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    MatchCreated,
    Substitution,
    HeatScored,
    Nomination,
    Confirmation,
    Resolution,
    Rejected,
}

impl AuditEventType {
    fn of(event: &MatchEvent) -> Self {
        match event {
            MatchEvent::MatchCreated { .. } => AuditEventType::MatchCreated,
            MatchEvent::SubstitutionApplied { .. } => AuditEventType::Substitution,
            MatchEvent::HeatScored { .. } => AuditEventType::HeatScored,
            MatchEvent::NominationsResolved { .. } => AuditEventType::Nomination,
            MatchEvent::MatchConfirmed { .. } => AuditEventType::Confirmation,
            MatchEvent::DiscrepancyResolved { .. } => AuditEventType::Resolution,
        }
    }
}

/// Audit logger
#[derive(Debug)]
pub struct AuditLogger {
    entries: VecDeque<AuditEntry>,
    max_entries: usize,
}

impl AuditLogger {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Log an audit entry, dropping the oldest when full
    pub fn log(&mut self, entry: AuditEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Log an accepted match event
    pub fn log_event(&mut self, event: &MatchEvent) {
        let heat = match event {
            MatchEvent::SubstitutionApplied { heat, .. } | MatchEvent::HeatScored { heat, .. } => {
                Some(*heat)
            }
            _ => None,
        };
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::of(event),
            match_id: event.match_id().to_string(),
            action: event.name().to_string(),
            heat,
            success: true,
            reason: None,
            metadata: serde_json::to_value(event).ok(),
        });
    }

    /// Log a request the service refused
    pub fn log_rejection(&mut self, match_id: &str, operation: &str, kind: &str, reason: &str) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::Rejected,
            match_id: match_id.to_string(),
            action: operation.to_string(),
            heat: None,
            success: false,
            reason: Some(reason.to_string()),
            metadata: Some(serde_json::json!({ "kind": kind })),
        });
    }

    /// Most recent entries first
    pub fn get_recent(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    pub fn get_recent_rejections(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| !e.success)
            .take(limit)
            .collect()
    }

    /// Entries of one match, oldest first
    pub fn for_match(&self, match_id: &str) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.match_id == match_id)
            .collect()
    }

    pub fn get_stats(&self) -> AuditStats {
        AuditStats {
            total_entries: self.entries.len(),
            rejection_count: self.entries.iter().filter(|e| !e.success).count(),
        }
    }

    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

/// Audit statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStats {
    pub total_entries: usize,
    pub rejection_count: usize,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new(10000)
    }
}

/// Thread-safe logger that can be handed to `MatchService` as an observer
#[derive(Debug, Default)]
pub struct AuditTrail {
    logger: Mutex<AuditLogger>,
}

impl AuditTrail {
    pub fn new(max_entries: usize) -> Self {
        Self {
            logger: Mutex::new(AuditLogger::new(max_entries)),
        }
    }

    /// Run `f` against the underlying logger
    pub fn with_logger<T>(&self, f: impl FnOnce(&AuditLogger) -> T) -> T {
        let logger = self.logger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&logger)
    }

    pub fn get_stats(&self) -> AuditStats {
        self.with_logger(AuditLogger::get_stats)
    }

    pub fn export_json(&self) -> serde_json::Value {
        self.with_logger(AuditLogger::export_json)
    }
}

impl MatchObserver for AuditTrail {
    fn on_event(&self, event: &MatchEvent) {
        let mut logger = self.logger.lock().unwrap_or_else(PoisonError::into_inner);
        logger.log_event(event);
    }

    fn on_rejected(&self, match_id: &str, operation: &str, error: &ServiceError) {
        let mut logger = self.logger.lock().unwrap_or_else(PoisonError::into_inner);
        logger.log_rejection(match_id, operation, error.kind(), &error.to_string());
    }
}
