use crate::dtos::ReminderIntervalDTO;
use chrono::NaiveDate;
use docwatch_domain::{Document, ReminderInterval, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDTO {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub expiration_date: NaiveDate,
    pub timezone: String,
    pub attachment_url: Option<String>,
    pub reminders: Vec<ReminderIntervalDTO>,
    pub created: i64,
    pub updated: i64,
}

impl DocumentDTO {
    pub fn new(document: Document, reminders: Vec<ReminderInterval>) -> Self {
        Self {
            id: document.id,
            user_id: document.user_id,
            name: document.name,
            description: document.description,
            identifier: document.identifier,
            expiration_date: document.expiration_date,
            timezone: document.timezone.name().to_string(),
            attachment_url: document.attachment_url,
            reminders: reminders.into_iter().map(ReminderIntervalDTO::new).collect(),
            created: document.created,
            updated: document.updated,
        }
    }
}
