use crate::dtos::{DocumentDTO, DocumentReminderDTO};
use chrono::NaiveDate;
use docwatch_domain::{Document, ReminderInterval, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub document: DocumentDTO,
}

impl DocumentResponse {
    pub fn new(document: Document, reminders: Vec<ReminderInterval>) -> Self {
        Self {
            document: DocumentDTO::new(document, reminders),
        }
    }
}

pub mod create_document {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub description: Option<String>,
        pub identifier: Option<String>,
        /// Calendar date, e.g. "2025-03-10"
        pub expiration_date: NaiveDate,
        /// IANA timezone name, e.g. "America/New_York"
        pub timezone: String,
        pub attachment_url: Option<String>,
        /// Interval codes to enable, e.g. ["7d", "0d"]
        #[serde(default)]
        pub reminders: Vec<String>,
    }

    pub type APIResponse = DocumentResponse;
}

pub mod get_document {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub document_id: ID,
    }

    pub type APIResponse = DocumentResponse;
}

pub mod list_documents {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub documents: Vec<DocumentDTO>,
    }
}

pub mod update_document {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub document_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: Option<String>,
        pub description: Option<String>,
        pub identifier: Option<String>,
        pub expiration_date: Option<NaiveDate>,
        pub timezone: Option<String>,
        pub attachment_url: Option<String>,
        /// Full replacement set of interval codes; omitted leaves the
        /// enabled set untouched
        pub reminders: Option<Vec<String>>,
    }

    pub type APIResponse = DocumentResponse;
}

pub mod delete_document {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub document_id: ID,
    }
}

pub mod get_document_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub document_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub document_id: ID,
        pub name: String,
        pub reminders: Vec<DocumentReminderDTO>,
    }
}

pub mod toggle_document_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub document_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub code: String,
        pub enabled: bool,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminder: DocumentReminderDTO,
    }
}
