use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;
use chrono_tz::Tz;

/// A `Document` is anything with an expiration date that its owner wants to
/// be reminded about: a passport, a certificate, a contract.
///
/// The expiration date is a plain calendar date. When reminder fire instants
/// are computed it is interpreted at local midnight in `timezone`, never in
/// the server timezone.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub expiration_date: NaiveDate,
    pub timezone: Tz,
    pub attachment_url: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl Document {
    /// Expiration date as shown to the owner in notifications,
    /// e.g. "Mon, 10 Mar, 2025".
    pub fn expiration_display(&self) -> String {
        self.expiration_date.format("%a, %-d %b, %Y").to_string()
    }
}

impl Entity for Document {
    fn id(&self) -> &ID {
        &self.id
    }
}
