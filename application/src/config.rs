/// Per-call snapshot of the escalation settings. The orchestrator takes one
/// snapshot at the start of each invocation and never re-reads mid-call, so a
/// runtime configuration change cannot drift a call that is already running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationSettings {
    pub enabled: bool,
    pub escalation_address: String,
    pub from_address: String,
    /// `None` leaves the collection unbounded.
    pub max_threads_per_ban: Option<u64>,
    pub max_comments_per_ban: Option<u64>,
    /// Per-item deletion errors swallowed per collection before the purge
    /// aborts.
    pub max_item_errors_per_collection: u32,
}

impl Default for EscalationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            escalation_address: "partner-support@edx.org".to_string(),
            from_address: "no-reply@example.com".to_string(),
            max_threads_per_ban: None,
            max_comments_per_ban: None,
            max_item_errors_per_collection: 5,
        }
    }
}
