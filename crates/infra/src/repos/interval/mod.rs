mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderIntervalRepo;
pub use postgres::PostgresReminderIntervalRepo;

use docwatch_domain::ReminderInterval;

/// Read-only view of the interval catalog. The catalog is seeded once
/// (migration for postgres, `default_catalog` for the in-memory repo) and
/// acts as a whitelist: resolving codes drops anything it does not know.
#[async_trait::async_trait]
pub trait IReminderIntervalRepo: Send + Sync {
    async fn find_all(&self) -> Vec<ReminderInterval>;
    async fn find_by_codes(&self, codes: &[String]) -> Vec<ReminderInterval>;
    async fn find(&self, interval_id: i64) -> Option<ReminderInterval>;
}
