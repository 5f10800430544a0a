mod config;
mod queue;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use queue::{TaskQueue, TaskQueueConfig};
pub use repos::{
    DeleteResult, IDocumentReminderRepo, IDocumentRepo, INotificationLogRepo,
    IReminderIntervalRepo, IScheduledTaskRepo, IUserRepo, Repos,
};
pub use services::{IEmailService, ISmsService, LoggingEmailService, LoggingSmsService};
pub use system::ISys;
use system::RealSys;

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct DocwatchContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// Handle to the delayed dispatch queue, shared by the scheduling
    /// producers and the dispatch loop consumer
    pub queue: TaskQueue,
    pub email_service: Arc<dyn IEmailService>,
    pub sms_service: Arc<dyn ISmsService>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl DocwatchContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let queue = TaskQueue::new(repos.scheduled_tasks.clone(), config.dispatch.clone());
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            queue,
            email_service: Arc::new(LoggingEmailService),
            sms_service: Arc::new(LoggingSmsService),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> DocwatchContext {
    DocwatchContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// In-memory context for tests and local experiments. Swap out `sys` or the
/// transport services on the returned value as needed.
pub fn setup_test_context() -> DocwatchContext {
    let repos = Repos::create_inmemory();
    let config = Config::new();
    let queue = TaskQueue::new(repos.scheduled_tasks.clone(), config.dispatch.clone());
    DocwatchContext {
        repos,
        config,
        sys: Arc::new(RealSys {}),
        queue,
        email_service: Arc::new(LoggingEmailService),
        sms_service: Arc::new(LoggingSmsService),
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!("../../migrations").run(&pool).await
}
