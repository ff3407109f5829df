//! Observer port for accepted and rejected requests

use speedway_domain::MatchEvent;

use crate::error::ServiceError;

/// Receives every event the service commits and every request it turns down
///
/// Called after the match has been saved, while the match lock is still
/// held, so observers see events of one match in order.
pub trait MatchObserver: Send + Sync {
    fn on_event(&self, event: &MatchEvent);

    fn on_rejected(&self, _match_id: &str, _operation: &str, _error: &ServiceError) {}
}
