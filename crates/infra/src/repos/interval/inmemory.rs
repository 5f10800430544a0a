use super::IReminderIntervalRepo;
use docwatch_domain::{default_catalog, ReminderInterval};

pub struct InMemoryReminderIntervalRepo {
    intervals: Vec<ReminderInterval>,
}

impl InMemoryReminderIntervalRepo {
    pub fn new() -> Self {
        Self {
            intervals: default_catalog(),
        }
    }
}

#[async_trait::async_trait]
impl IReminderIntervalRepo for InMemoryReminderIntervalRepo {
    async fn find_all(&self) -> Vec<ReminderInterval> {
        self.intervals.clone()
    }

    async fn find_by_codes(&self, codes: &[String]) -> Vec<ReminderInterval> {
        self.intervals
            .iter()
            .filter(|interval| codes.contains(&interval.code))
            .cloned()
            .collect()
    }

    async fn find(&self, interval_id: i64) -> Option<ReminderInterval> {
        self.intervals
            .iter()
            .find(|interval| interval.id == interval_id)
            .cloned()
    }
}
