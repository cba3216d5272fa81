mod kv;
mod schema;
mod stats;
mod types;

pub use kv::{KeyValueBackend, MemoryBackend};
pub use schema::Database;
pub use stats::{StatsStore, STATS_KEY};
pub use types::{DatabaseError, EngagementStats, StatsUpdate};
