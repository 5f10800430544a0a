use tracing::info;

/// Outbound email transport. Implementations return the raw provider
/// response for the notification log.
#[async_trait::async_trait]
pub trait IEmailService: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<String>;
}

/// Outbound SMS transport.
#[async_trait::async_trait]
pub trait ISmsService: Send + Sync {
    async fn send(&self, to: &str, message: &str) -> anyhow::Result<String>;
}

/// Writes the send to the application log instead of calling a provider.
pub struct LoggingEmailService;

#[async_trait::async_trait]
impl IEmailService for LoggingEmailService {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> anyhow::Result<String> {
        info!("Sending email to: {}, subject: {}", to, subject);
        Ok("logged".into())
    }
}

/// Writes the send to the application log instead of calling a provider.
pub struct LoggingSmsService;

#[async_trait::async_trait]
impl ISmsService for LoggingSmsService {
    async fn send(&self, to: &str, message: &str) -> anyhow::Result<String> {
        info!("Sending SMS to: {}, message: {}", to, message);
        Ok("logged".into())
    }
}
