mod document;
mod interval;
mod notification;
mod reminder;
mod scheduled_task;
pub mod scheduling;
mod shared;
mod user;

pub use document::Document;
pub use interval::{default_catalog, ReminderInterval};
pub use notification::{NotificationChannel, NotificationLog, NotificationStatus};
pub use reminder::DocumentReminder;
pub use scheduled_task::{ScheduledTask, TaskStatus};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use user::User;
