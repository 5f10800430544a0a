use crate::shared::entity::{Entity, ID};
use std::fmt::Display;
use std::str::FromStr;

/// Append-only record of a reminder delivery attempt on one channel.
/// Written by the executor, never read back for scheduling decisions.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    pub id: ID,
    pub user_id: ID,
    pub document_id: ID,
    pub interval_id: i64,
    pub channel: NotificationChannel,
    pub status: NotificationStatus,
    /// Raw provider response or error message
    pub response: String,
    pub created: i64,
}

impl Entity for NotificationLog {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationChannel {
    Email,
    Sms,
}

impl Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Sms => "sms",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NotificationChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(NotificationChannel::Email),
            "sms" => Ok(NotificationChannel::Sms),
            _ => Err(format!("Invalid notification channel: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Failed,
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NotificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(NotificationStatus::Sent),
            "failed" => Ok(NotificationStatus::Failed),
            _ => Err(format!("Invalid notification status: {}", s)),
        }
    }
}
