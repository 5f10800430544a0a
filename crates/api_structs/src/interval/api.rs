use crate::dtos::ReminderIntervalDTO;
use serde::{Deserialize, Serialize};

pub mod list_reminder_intervals {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminder_intervals: Vec<ReminderIntervalDTO>,
    }
}
