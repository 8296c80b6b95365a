//! Consistency-level resolution.
//!
//! Maps the configured consistency token to a [`ConsistencyLevel`], or `None`
//! when the store's account default should apply. Tokens are case-sensitive;
//! an empty or unrecognized token silently falls back to the default.

/// Token accepted for strong consistency.
pub const CONSISTENCY_LEVEL_STRONG: &str = "Strong";
/// Token accepted for bounded-staleness consistency.
pub const CONSISTENCY_LEVEL_BOUNDED_STALENESS: &str = "Bounded_Staleness";
/// Token accepted for session consistency.
pub const CONSISTENCY_LEVEL_SESSION: &str = "Session";
/// Token accepted for consistent-prefix consistency.
pub const CONSISTENCY_LEVEL_CONSISTENT_PREFIX: &str = "Consistent_Prefix";
/// Token accepted for eventual consistency.
pub const CONSISTENCY_LEVEL_EVENTUAL: &str = "Eventual";

/// Read/write guarantee level requested for repository operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    /// Linearizable reads.
    Strong,
    /// Reads lag writes by a bounded window.
    BoundedStaleness,
    /// Read-your-own-writes within a session.
    Session,
    /// Reads never see out-of-order writes.
    ConsistentPrefix,
    /// No ordering guarantee.
    Eventual,
}

impl ConsistencyLevel {
    /// Wire/log representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyLevel::Strong => CONSISTENCY_LEVEL_STRONG,
            ConsistencyLevel::BoundedStaleness => CONSISTENCY_LEVEL_BOUNDED_STALENESS,
            ConsistencyLevel::Session => CONSISTENCY_LEVEL_SESSION,
            ConsistencyLevel::ConsistentPrefix => CONSISTENCY_LEVEL_CONSISTENT_PREFIX,
            ConsistencyLevel::Eventual => CONSISTENCY_LEVEL_EVENTUAL,
        }
    }
}

impl std::fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a configuration token to a consistency level.
///
/// Returns `None` for an empty or unrecognized token, meaning the backing
/// store's account default applies. Pure and infallible.
pub fn resolve(token: &str) -> Option<ConsistencyLevel> {
    match token {
        CONSISTENCY_LEVEL_STRONG => Some(ConsistencyLevel::Strong),
        CONSISTENCY_LEVEL_BOUNDED_STALENESS => Some(ConsistencyLevel::BoundedStaleness),
        CONSISTENCY_LEVEL_SESSION => Some(ConsistencyLevel::Session),
        CONSISTENCY_LEVEL_CONSISTENT_PREFIX => Some(ConsistencyLevel::ConsistentPrefix),
        CONSISTENCY_LEVEL_EVENTUAL => Some(ConsistencyLevel::Eventual),
        _ => None,
    }
}
