/// State of the live collection subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Subscribed, first snapshot not received yet.
    #[default]
    Connecting,
    /// Snapshots are arriving.
    Live,
    /// Subscription ended; the list is stale.
    Stopped,
}

impl SyncStatus {
    /// Status bar text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Live => "live",
            Self::Stopped => "stopped",
        }
    }
}
