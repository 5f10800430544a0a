use crate::queue::TaskQueueConfig;
use docwatch_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Secret used to sign and verify auth tokens
    pub jwt_secret: String,
    /// Knobs for the delayed dispatch queue and its polling loop
    pub dispatch: TaskQueueConfig,
    /// Upper bound in millis for a single transport call. A call that runs
    /// past this is treated as a failed channel delivery.
    pub transport_timeout_millis: u64,
}

impl Config {
    pub fn new() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find JWT_SECRET environment variable. Going to create one.");
                create_random_secret(32)
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let mut dispatch = TaskQueueConfig::default();
        if let Some(poll) = env_number("REMINDER_POLL_INTERVAL_SECS") {
            dispatch.poll_interval_secs = poll;
        }
        if let Some(lease) = env_number("REMINDER_LEASE_TIMEOUT_SECS") {
            dispatch.lease_timeout_millis = lease as i64 * 1000;
        }
        if let Some(attempts) = env_number("REMINDER_MAX_ATTEMPTS") {
            dispatch.max_attempts = attempts as i64;
        }

        let transport_timeout_millis = env_number("TRANSPORT_TIMEOUT_SECS")
            .map(|secs| secs * 1000)
            .unwrap_or(10_000);

        Self {
            port,
            jwt_secret,
            dispatch,
            transport_timeout_millis,
        }
    }
}

fn env_number(var: &str) -> Option<u64> {
    let value = std::env::var(var).ok()?;
    match value.parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                "The given {}: {} is not a valid number, falling back to the default.",
                var, value
            );
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
