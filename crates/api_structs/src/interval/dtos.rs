use docwatch_domain::ReminderInterval;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderIntervalDTO {
    pub code: String,
    pub label: String,
    pub days_before: u32,
}

impl ReminderIntervalDTO {
    pub fn new(interval: ReminderInterval) -> Self {
        Self {
            code: interval.code,
            label: interval.label,
            days_before: interval.days_before,
        }
    }
}

/// A catalog interval together with its enabled flag for one document
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReminderDTO {
    pub code: String,
    pub label: String,
    pub days_before: u32,
    pub enabled: bool,
}

impl DocumentReminderDTO {
    pub fn new(interval: ReminderInterval, enabled: bool) -> Self {
        Self {
            code: interval.code,
            label: interval.label,
            days_before: interval.days_before,
            enabled,
        }
    }
}
