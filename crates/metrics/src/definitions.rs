//! Metric name and label definitions.
//!
//! Every metric the handoff crates emit is named here so hosts can document
//! and dashboard them from one place.

/// Connection-request resolution metrics
pub mod routing {
    /// Requests accepted into a connection
    pub const REQUESTS_ACCEPTED_TOTAL: &str = "handoff_requests_accepted_total";
    /// Requests rejected (single or bulk)
    pub const REQUESTS_REJECTED_TOTAL: &str = "handoff_requests_rejected_total";
    /// Resolution attempts that ended in an error result
    pub const RESOLUTION_ERRORS_TOTAL: &str = "handoff_resolution_errors_total";
    /// Bulk rejection sweeps that had at least one request to process
    pub const SWEEPS_TOTAL: &str = "handoff_reject_all_sweeps_total";
    /// Requests currently waiting for an acceptor
    pub const PENDING_REQUESTS: &str = "handoff_pending_requests";
    /// Connections currently active
    pub const ACTIVE_CONNECTIONS: &str = "handoff_active_connections";
}

/// Common label keys
pub mod labels {
    /// Error classification (not_found, ambiguous, already_connected, ...)
    pub const REASON: &str = "reason";
    /// Transport channel id of the requestor
    pub const CHANNEL: &str = "channel";
}
