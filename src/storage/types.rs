use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of newsreel appears to be running. Please close it and try again.")]
    InstanceLocked,

    #[error("Database migration failed: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map lock-related sqlx failures to `InstanceLocked`.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY, SQLITE_LOCKED and SQLITE_CANTOPEN all surface as one of these.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("database is locked")
        || lower.contains("database table is locked")
        || lower.contains("sqlite_busy")
        || lower.contains("sqlite_locked")
        || lower.contains("unable to open database file")
}

// ============================================================================
// Engagement Stats
// ============================================================================

/// Per-installation engagement counters.
///
/// Serialized as `{"articlesRead":…,"coinsEarned":…,"adsWatched":…}`.
/// Missing fields in a stored record read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngagementStats {
    pub articles_read: u64,
    pub coins_earned: u64,
    pub ads_watched: u64,
}

impl EngagementStats {
    /// Overlay the fields present in `update`.
    pub fn merged(self, update: StatsUpdate) -> Self {
        Self {
            articles_read: update.articles_read.unwrap_or(self.articles_read),
            coins_earned: update.coins_earned.unwrap_or(self.coins_earned),
            ads_watched: update.ads_watched.unwrap_or(self.ads_watched),
        }
    }
}

/// Partial update: `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsUpdate {
    pub articles_read: Option<u64>,
    pub coins_earned: Option<u64>,
    pub ads_watched: Option<u64>,
}
